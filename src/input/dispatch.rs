//! Bounded fire-and-forget handler execution

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::Error;
use super::registry::Handler;

/// How long dropping a [`Dispatcher`] waits for its workers
pub const WORKER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Fixed pool of worker threads fed by a bounded queue
///
/// [`submit`](Self::submit) never blocks: when every worker is busy and the
/// queue is full the invocation is dropped with a warning. A panicking
/// handler is logged and its worker keeps serving. Dropping the dispatcher
/// lets queued handlers finish and joins the workers; workers still busy
/// after [`WORKER_JOIN_TIMEOUT`] are detached with a warning.
pub struct Dispatcher {
    sender: Option<SyncSender<Handler>>,
    workers: Vec<JoinHandle<()>>,
}

impl core::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Spawn `workers` threads sharing a queue of `queue_depth` slots
    ///
    /// Both counts are raised to at least one.
    pub fn new(workers: usize, queue_depth: usize) -> Result<Self, Error> {
        let (sender, receiver) = mpsc::sync_channel::<Handler>(queue_depth.max(1));
        let receiver = Arc::new(Mutex::new(receiver));

        let mut dispatcher = Self {
            sender: Some(sender),
            workers: Vec::with_capacity(workers.max(1)),
        };
        for index in 0..workers.max(1) {
            let receiver = Arc::clone(&receiver);
            let handle = thread::Builder::new()
                .name(format!("sh1106-dispatch-{index}"))
                .spawn(move || worker_loop(&receiver))?;
            dispatcher.workers.push(handle);
        }

        log::debug!("input: dispatcher started with {} workers", dispatcher.workers.len());
        Ok(dispatcher)
    }

    /// Queue `handler` for execution
    ///
    /// Returns `false` if it was dropped.
    pub fn submit(&self, handler: Handler) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        match sender.try_send(handler) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::warn!("input: dispatch queue full, dropping handler invocation");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("input: dispatch workers gone, dropping handler invocation");
                false
            }
        }
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // closing the channel ends every worker loop once the queue drains
        self.sender.take();
        let current = thread::current().id();
        // the last reference may be released by a handler on a worker
        let mut pending: Vec<JoinHandle<()>> = self
            .workers
            .drain(..)
            .filter(|handle| handle.thread().id() != current)
            .collect();

        let deadline = Instant::now() + WORKER_JOIN_TIMEOUT;
        while !pending.is_empty() {
            let (finished, busy): (Vec<_>, Vec<_>) =
                pending.into_iter().partition(JoinHandle::is_finished);
            for handle in finished {
                if handle.join().is_err() {
                    log::warn!("input: dispatch worker exited abnormally");
                }
            }
            pending = busy;
            if pending.is_empty() {
                break;
            }
            if Instant::now() >= deadline {
                log::warn!(
                    "input: detaching {} dispatch workers still running a handler",
                    pending.len()
                );
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }
}

fn worker_loop(receiver: &Mutex<Receiver<Handler>>) {
    loop {
        let next = receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        let Ok(handler) = next else {
            break;
        };
        if catch_unwind(AssertUnwindSafe(|| handler())).is_err() {
            log::warn!("input: event handler panicked");
        }
    }
}
