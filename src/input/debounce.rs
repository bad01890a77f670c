//! Edge and hold classification of sampled line levels

use std::time::{Duration, Instant};

use super::{DEFAULT_HOLD_DURATION, DEFAULT_POLL_INTERVAL, EventKind, Line};

/// Last observed state of one line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Logical pressed state at the last sample
    pub pressed: bool,
    /// When the current press began, `None` while released
    pub press_started: Option<Instant>,
}

/// Derived state of a line at a given instant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Released, or never sampled
    Idle,
    /// Pressed for less than the hold duration
    Pressed,
    /// Pressed for at least the hold duration
    Held,
}

/// Per-line debounce state machine
///
/// Feed it one logical sample per line per poll. A press edge yields
/// [`EventKind::Click`], a release edge [`EventKind::Release`], and a press
/// that has lasted at least the hold duration yields one
/// [`EventKind::Hold`]: the hold fires on the single poll whose elapsed time
/// falls in `[hold, hold + poll_interval)`.
///
/// ```
/// use std::time::{Duration, Instant};
/// use sh1106::input::{Debouncer, EventKind, Line};
///
/// let mut debouncer = Debouncer::default();
/// let t0 = Instant::now();
/// assert_eq!(debouncer.update(Line::Up, true, t0), Some(EventKind::Click));
/// assert_eq!(
///     debouncer.update(Line::Up, true, t0 + Duration::from_millis(500)),
///     Some(EventKind::Hold)
/// );
/// assert_eq!(
///     debouncer.update(Line::Up, false, t0 + Duration::from_millis(550)),
///     Some(EventKind::Release)
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Debouncer {
    states: [Option<ButtonState>; Line::COUNT],
    hold_duration: Duration,
    poll_interval: Duration,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_DURATION, DEFAULT_POLL_INTERVAL)
    }
}

impl Debouncer {
    /// Create a debouncer with no line sampled yet
    pub fn new(hold_duration: Duration, poll_interval: Duration) -> Self {
        Self {
            states: [None; Line::COUNT],
            hold_duration,
            poll_interval,
        }
    }

    /// Hold threshold
    pub fn hold_duration(&self) -> Duration {
        self.hold_duration
    }

    /// Change the hold threshold; applies to presses already in progress
    pub fn set_hold_duration(&mut self, duration: Duration) {
        self.hold_duration = duration;
    }

    /// Width of the hold window
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Change the hold window width
    ///
    /// Read at evaluation time, so changing it mid-press can skip or repeat
    /// a hold for that press.
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    /// Record one sample of `line` taken at `now`
    pub fn update(&mut self, line: Line, pressed: bool, now: Instant) -> Option<EventKind> {
        let state = self.states[line.index()].get_or_insert_with(ButtonState::default);

        let event = match (state.pressed, pressed) {
            (false, true) => {
                state.press_started = Some(now);
                Some(EventKind::Click)
            }
            (true, true) => {
                let elapsed = state
                    .press_started
                    .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
                let window_end = self.hold_duration.saturating_add(self.poll_interval);
                (elapsed >= self.hold_duration && elapsed < window_end).then_some(EventKind::Hold)
            }
            (true, false) => {
                state.press_started = None;
                Some(EventKind::Release)
            }
            (false, false) => None,
        };
        state.pressed = pressed;
        event
    }

    /// State of `line`, `None` before its first sample
    pub fn state(&self, line: Line) -> Option<ButtonState> {
        self.states[line.index()]
    }

    /// Derived phase of `line` at `now`
    pub fn phase(&self, line: Line, now: Instant) -> Phase {
        match self.states[line.index()] {
            Some(ButtonState {
                pressed: true,
                press_started,
            }) => {
                let elapsed = press_started
                    .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
                if elapsed >= self.hold_duration {
                    Phase::Held
                } else {
                    Phase::Pressed
                }
            }
            _ => Phase::Idle,
        }
    }

    /// Forget every line
    pub fn reset(&mut self) {
        self.states = [None; Line::COUNT];
    }
}
