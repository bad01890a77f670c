//! Polled joystick input
//!
//! Turns the raw levels of up to seven digital lines (a four-way stick plus
//! three buttons) into click, hold and release events delivered to
//! registered handlers.
//!
//! - [`Debouncer`] classifies level samples into events
//! - [`CallbackRegistry`] keeps handlers per line and event kind
//! - [`Dispatcher`] runs handlers on a small worker pool
//! - [`Joystick`] ties them to [`InputPin`](embedded_hal::digital::InputPin)s
//!   and a poll thread
//!
//! Requires the `std` feature.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sh1106::input::{EventKind, Joystick, JoystickConfig, JoystickPins, Line};
//! # use core::convert::Infallible;
//! # struct Pin;
//! # impl embedded_hal::digital::ErrorType for Pin { type Error = Infallible; }
//! # impl embedded_hal::digital::InputPin for Pin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! # }
//! let pins = JoystickPins {
//!     up: Some(Pin),
//!     button1: Some(Pin),
//!     ..JoystickPins::default()
//! };
//! let config = JoystickConfig::new().hold_duration(Duration::from_millis(800));
//! let joystick = match Joystick::new(pins, config) {
//!     Ok(joystick) => joystick,
//!     Err(_) => return,
//! };
//!
//! let token = joystick.on_click(Line::Up, || log::info!("up"));
//! joystick.on(Line::Button1, EventKind::Hold, || log::info!("long press"));
//!
//! if joystick.start().is_ok() {
//!     std::thread::sleep(Duration::from_secs(1));
//!     joystick.remove(token);
//!     joystick.stop();
//! }
//! ```

mod debounce;
mod dispatch;
mod joystick;
mod registry;

pub use debounce::{ButtonState, Debouncer, Phase};
pub use dispatch::{Dispatcher, WORKER_JOIN_TIMEOUT};
pub use joystick::{Joystick, JoystickConfig, JoystickPins};
pub use registry::{CallbackRegistry, Handler, Token};

use std::time::Duration;

/// Default time a line must stay pressed before a hold fires
pub const DEFAULT_HOLD_DURATION: Duration = Duration::from_millis(500);

/// Default time between two polls of the lines
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default number of handler worker threads
pub const DEFAULT_DISPATCH_WORKERS: usize = 4;

/// Default number of handler invocations that may wait for a worker
pub const DEFAULT_DISPATCH_QUEUE_DEPTH: usize = 64;

/// Logical input line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Line {
    /// Stick up
    Up,
    /// Stick down
    Down,
    /// Stick left
    Left,
    /// Stick right
    Right,
    /// First push button
    Button1,
    /// Second push button
    Button2,
    /// Third push button
    Button3,
}

impl Line {
    /// Number of lines
    pub const COUNT: usize = 7;

    /// Every line, in poll order
    pub const ALL: [Line; Line::COUNT] = [
        Line::Up,
        Line::Down,
        Line::Left,
        Line::Right,
        Line::Button1,
        Line::Button2,
        Line::Button3,
    ];

    /// Position in [`ALL`](Self::ALL)
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Kind of input event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Line went from released to pressed
    Click,
    /// Line stayed pressed past the hold duration (fires once per press)
    Hold,
    /// Line went from pressed to released
    Release,
}

impl EventKind {
    /// Number of event kinds
    pub const COUNT: usize = 3;

    /// Every event kind
    pub const ALL: [EventKind; EventKind::COUNT] =
        [EventKind::Click, EventKind::Hold, EventKind::Release];

    /// Position in [`ALL`](Self::ALL)
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Electrical level that means "pressed"
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    /// Low level is pressed (pull-up wiring)
    #[default]
    ActiveLow,
    /// High level is pressed
    ActiveHigh,
}

impl Polarity {
    /// Map a raw level to the logical pressed state
    pub const fn is_pressed(self, is_high: bool) -> bool {
        match self {
            Self::ActiveLow => !is_high,
            Self::ActiveHigh => is_high,
        }
    }
}

/// Errors from the input engine
#[derive(Debug)]
pub enum Error {
    /// A poll or worker thread could not be spawned
    Spawn(std::io::Error),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "Failed to spawn input thread: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Spawn(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_indices_match_poll_order() {
        for (i, line) in Line::ALL.iter().enumerate() {
            assert_eq!(line.index(), i);
        }
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_polarity() {
        assert_eq!(Polarity::default(), Polarity::ActiveLow);
        assert!(Polarity::ActiveLow.is_pressed(false));
        assert!(!Polarity::ActiveLow.is_pressed(true));
        assert!(Polarity::ActiveHigh.is_pressed(true));
    }
}
