//! Handler lists keyed by line and event kind

use std::sync::Arc;

use super::{EventKind, Line};

/// Event handler
///
/// Handlers are shared so a dispatch can run them after the registry lock
/// has been released.
pub type Handler = Arc<dyn Fn() + Send + Sync>;

/// Identifies one registration, used to remove it again
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    /// Line the handler listens on
    pub line: Line,
    /// Event kind the handler listens for
    pub kind: EventKind,
    /// Registration id, unique per registry
    pub id: u64,
}

struct Entry {
    id: u64,
    handler: Handler,
}

/// One ordered handler list per (line, event kind)
pub struct CallbackRegistry {
    lists: [[Vec<Entry>; EventKind::COUNT]; Line::COUNT],
    next_id: u64,
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("handlers", &self.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl CallbackRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            lists: core::array::from_fn(|_| core::array::from_fn(|_| Vec::new())),
            next_id: 0,
        }
    }

    /// Append `handler` to the list for `line` and `kind`
    pub fn register(&mut self, line: Line, kind: EventKind, handler: Handler) -> Token {
        let id = self.next_id;
        self.next_id += 1;
        self.list_mut(line, kind).push(Entry { id, handler });
        Token { line, kind, id }
    }

    /// Remove the registration behind `token`
    ///
    /// Returns `false` if it was already removed.
    pub fn remove(&mut self, token: Token) -> bool {
        let list = self.list_mut(token.line, token.kind);
        match list.iter().position(|entry| entry.id == token.id) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Handlers for `line` and `kind`, in registration order
    pub fn snapshot(&self, line: Line, kind: EventKind) -> Vec<Handler> {
        self.lists[line.index()][kind.index()]
            .iter()
            .map(|entry| Arc::clone(&entry.handler))
            .collect()
    }

    /// Total number of registered handlers
    pub fn len(&self) -> usize {
        self.lists.iter().flatten().map(Vec::len).sum()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.lists.iter().flatten().all(Vec::is_empty)
    }

    /// Remove every handler; ids keep increasing
    pub fn clear(&mut self) {
        self.lists.iter_mut().flatten().for_each(Vec::clear);
    }

    fn list_mut(&mut self, line: Line, kind: EventKind) -> &mut Vec<Entry> {
        &mut self.lists[line.index()][kind.index()]
    }
}
