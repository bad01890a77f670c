//! Polling engine binding input pins to the debouncer and handlers

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use embedded_hal::digital::InputPin;

use super::debounce::{Debouncer, Phase};
use super::dispatch::Dispatcher;
use super::registry::{CallbackRegistry, Handler, Token};
use super::{
    DEFAULT_DISPATCH_QUEUE_DEPTH, DEFAULT_DISPATCH_WORKERS, DEFAULT_HOLD_DURATION,
    DEFAULT_POLL_INTERVAL, Error, EventKind, Line, Polarity,
};

/// Shortest wait between two polls of the running poll thread
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Input pins, one per line; absent lines are never polled
pub struct JoystickPins<P> {
    /// Stick up
    pub up: Option<P>,
    /// Stick down
    pub down: Option<P>,
    /// Stick left
    pub left: Option<P>,
    /// Stick right
    pub right: Option<P>,
    /// First push button
    pub button1: Option<P>,
    /// Second push button
    pub button2: Option<P>,
    /// Third push button
    pub button3: Option<P>,
}

impl<P> Default for JoystickPins<P> {
    fn default() -> Self {
        Self {
            up: None,
            down: None,
            left: None,
            right: None,
            button1: None,
            button2: None,
            button3: None,
        }
    }
}

impl<P> JoystickPins<P> {
    /// Pins indexed by [`Line::index`]
    fn into_array(self) -> [Option<P>; Line::COUNT] {
        [
            self.up,
            self.down,
            self.left,
            self.right,
            self.button1,
            self.button2,
            self.button3,
        ]
    }
}

/// Joystick timing, polarity and dispatch settings
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use sh1106::input::{JoystickConfig, Line, Polarity};
///
/// let config = JoystickConfig::new()
///     .hold_duration(Duration::from_millis(750))
///     .poll_interval(Duration::from_millis(20))
///     .polarity(Line::Button3, Polarity::ActiveHigh);
/// assert_eq!(config.line_polarity(Line::Button3), Polarity::ActiveHigh);
/// assert_eq!(config.line_polarity(Line::Up), Polarity::ActiveLow);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoystickConfig {
    hold_duration: Duration,
    poll_interval: Duration,
    polarity: [Polarity; Line::COUNT],
    dispatch_workers: usize,
    dispatch_queue_depth: usize,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl JoystickConfig {
    /// Defaults: 500 ms hold, 50 ms poll, active-low lines, 4 workers, 64 queued
    pub fn new() -> Self {
        Self {
            hold_duration: DEFAULT_HOLD_DURATION,
            poll_interval: DEFAULT_POLL_INTERVAL,
            polarity: [Polarity::default(); Line::COUNT],
            dispatch_workers: DEFAULT_DISPATCH_WORKERS,
            dispatch_queue_depth: DEFAULT_DISPATCH_QUEUE_DEPTH,
        }
    }

    /// Time a line must stay pressed before a hold fires
    pub fn hold_duration(mut self, duration: Duration) -> Self {
        self.hold_duration = duration;
        self
    }

    /// Time between two polls
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Electrical polarity of one line
    pub fn polarity(mut self, line: Line, polarity: Polarity) -> Self {
        self.polarity[line.index()] = polarity;
        self
    }

    /// Electrical polarity of every line
    pub fn polarity_all(mut self, polarity: Polarity) -> Self {
        self.polarity = [polarity; Line::COUNT];
        self
    }

    /// Number of handler worker threads (at least one)
    pub fn dispatch_workers(mut self, workers: usize) -> Self {
        self.dispatch_workers = workers;
        self
    }

    /// Handler invocations that may wait for a worker before new ones are dropped
    pub fn dispatch_queue_depth(mut self, depth: usize) -> Self {
        self.dispatch_queue_depth = depth;
        self
    }

    /// Configured polarity of `line`
    pub fn line_polarity(&self, line: Line) -> Polarity {
        self.polarity[line.index()]
    }
}

struct State<P> {
    pins: [Option<P>; Line::COUNT],
    polarity: [Polarity; Line::COUNT],
    debouncer: Debouncer,
    registry: CallbackRegistry,
}

struct Shared<P> {
    state: Mutex<State<P>>,
    dispatcher: Dispatcher,
}

impl<P: InputPin> Shared<P> {
    fn lock(&self) -> MutexGuard<'_, State<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self, now: Instant) {
        for (line, kind, handlers) in self.sample(now) {
            log::trace!("input: {:?} {:?} -> {} handlers", line, kind, handlers.len());
            self.submit_all(handlers);
        }
    }

    /// Read every present line and collect the handlers of fired events
    fn sample(&self, now: Instant) -> Vec<(Line, EventKind, Vec<Handler>)> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let mut fired = Vec::new();

        for line in Line::ALL {
            let Some(pin) = state.pins[line.index()].as_mut() else {
                continue;
            };
            let is_high = match pin.is_high() {
                Ok(level) => level,
                Err(e) => {
                    log::warn!("input: failed to read {:?}: {:?}", line, e);
                    continue;
                }
            };
            let pressed = state.polarity[line.index()].is_pressed(is_high);
            if let Some(kind) = state.debouncer.update(line, pressed, now) {
                fired.push((line, kind, state.registry.snapshot(line, kind)));
            }
        }
        fired
    }

    fn submit_all(&self, handlers: Vec<Handler>) {
        for handler in handlers {
            self.dispatcher.submit(handler);
        }
    }
}

struct Poller {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Poll thread ownership; dropped with the last [`Joystick`] handle
struct Control {
    poller: Mutex<Option<Poller>>,
}

impl Control {
    fn lock(&self) -> MutexGuard<'_, Option<Poller>> {
        self.poller.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop(&self) {
        let Some(Poller { stop, handle }) = self.lock().take() else {
            return;
        };
        let _ = stop.send(());
        if handle.thread().id() != thread::current().id() && handle.join().is_err() {
            log::warn!("input: poll thread exited abnormally");
        }
        log::debug!("input: polling stopped");
    }
}

impl Drop for Control {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Polled joystick with click, hold and release handlers
///
/// Handles are cheap to clone and share one engine, so a handler may
/// capture a clone to register or remove handlers while it runs. Such a
/// handler keeps the engine alive until it is removed; call
/// [`stop`](Self::stop) explicitly in that case. Otherwise dropping the last
/// handle stops the poll thread.
///
/// Handlers run on dispatcher worker threads, never on the poll thread and
/// never while the engine's lock is held. Dropping the last handle waits up
/// to [`WORKER_JOIN_TIMEOUT`](super::WORKER_JOIN_TIMEOUT) for
/// running handlers; a handler that blocks longer (for example on the thread
/// doing the drop) is left running detached.
pub struct Joystick<P> {
    // dropped first: the poll thread is joined before the engine goes away
    control: Arc<Control>,
    shared: Arc<Shared<P>>,
}

impl<P> Clone for Joystick<P> {
    fn clone(&self) -> Self {
        Self {
            control: Arc::clone(&self.control),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P> core::fmt::Debug for Joystick<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Joystick")
            .field("dispatcher", &self.shared.dispatcher)
            .finish_non_exhaustive()
    }
}

impl<P: InputPin> Joystick<P> {
    /// Create an engine; polling starts with [`start`](Self::start) or
    /// manual [`tick`](Self::tick) calls
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if a dispatcher worker cannot be spawned.
    pub fn new(pins: JoystickPins<P>, config: JoystickConfig) -> Result<Self, Error> {
        let dispatcher = Dispatcher::new(config.dispatch_workers, config.dispatch_queue_depth)?;
        let state = State {
            pins: pins.into_array(),
            polarity: config.polarity,
            debouncer: Debouncer::new(config.hold_duration, config.poll_interval),
            registry: CallbackRegistry::new(),
        };
        Ok(Self {
            control: Arc::new(Control {
                poller: Mutex::new(None),
            }),
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                dispatcher,
            }),
        })
    }

    /// Register `handler` for `kind` events on `line`
    pub fn on<F>(&self, line: Line, kind: EventKind, handler: F) -> Token
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared
            .lock()
            .registry
            .register(line, kind, Arc::new(handler))
    }

    /// Register a click handler
    pub fn on_click<F>(&self, line: Line, handler: F) -> Token
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(line, EventKind::Click, handler)
    }

    /// Register a hold handler
    pub fn on_hold<F>(&self, line: Line, handler: F) -> Token
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(line, EventKind::Hold, handler)
    }

    /// Register a release handler
    pub fn on_release<F>(&self, line: Line, handler: F) -> Token
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(line, EventKind::Release, handler)
    }

    /// Remove a registration; `false` if it was already gone
    pub fn remove(&self, token: Token) -> bool {
        self.shared.lock().registry.remove(token)
    }

    /// Remove every handler
    pub fn clear_handlers(&self) {
        self.shared.lock().registry.clear();
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.shared.lock().registry.len()
    }

    /// Run the current handlers for `line` and `kind` as if the event fired
    pub fn dispatch(&self, line: Line, kind: EventKind) {
        let handlers = self.shared.lock().registry.snapshot(line, kind);
        self.shared.submit_all(handlers);
    }

    /// Poll every line once, as the poll thread does each interval
    pub fn tick(&self, now: Instant) {
        self.shared.tick(now);
    }

    /// Derived phase of `line` right now
    pub fn phase(&self, line: Line) -> Phase {
        self.shared.lock().debouncer.phase(line, Instant::now())
    }

    /// Forget every line's press state
    pub fn reset(&self) {
        self.shared.lock().debouncer.reset();
    }

    /// Hold threshold
    pub fn hold_duration(&self) -> Duration {
        self.shared.lock().debouncer.hold_duration()
    }

    /// Change the hold threshold
    pub fn set_hold_duration(&self, duration: Duration) {
        self.shared.lock().debouncer.set_hold_duration(duration);
    }

    /// Poll interval
    pub fn poll_interval(&self) -> Duration {
        self.shared.lock().debouncer.poll_interval()
    }

    /// Change the poll interval; the poll thread picks it up on its next wait
    pub fn set_poll_interval(&self, interval: Duration) {
        self.shared.lock().debouncer.set_poll_interval(interval);
    }

    /// Whether the poll thread is running
    pub fn is_running(&self) -> bool {
        self.control.lock().is_some()
    }

    /// Stop the poll thread after its current pass; no-op when stopped
    pub fn stop(&self) {
        self.control.stop();
    }
}

impl<P> Joystick<P>
where
    P: InputPin + Send + 'static,
{
    /// Spawn the poll thread; no-op when already running
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the thread cannot be spawned.
    pub fn start(&self) -> Result<(), Error> {
        let mut poller = self.control.lock();
        if poller.is_some() {
            return Ok(());
        }

        let (stop, stop_rx) = mpsc::channel();
        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("sh1106-joystick".into())
            .spawn(move || poll_loop(&shared, &stop_rx))?;
        *poller = Some(Poller { stop, handle });

        log::debug!("input: polling started");
        Ok(())
    }
}

/// Fixed-rate poll schedule
///
/// Each tick is stamped with its scheduled deadline, so samples of a press
/// are exactly one interval apart and the hold window catches one of them
/// no matter how long a pass over the pins takes. A loop that falls more
/// than one interval behind restarts the schedule from the current time.
fn poll_loop<P: InputPin>(shared: &Shared<P>, stop: &Receiver<()>) {
    let mut deadline = Instant::now();
    loop {
        let interval = shared.lock().debouncer.poll_interval().max(MIN_POLL_INTERVAL);
        deadline += interval;
        let now = Instant::now();
        if now.saturating_duration_since(deadline) > interval {
            log::trace!("input: poll loop behind schedule, resyncing");
            deadline = now;
        }
        match stop.recv_timeout(deadline.saturating_duration_since(now)) {
            Err(RecvTimeoutError::Timeout) => shared.tick(deadline),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::channel;

    const WAIT: Duration = Duration::from_secs(2);
    const MS: Duration = Duration::from_millis(1);

    /// Level shared with the test; idle high (released for active-low)
    #[derive(Clone)]
    struct MockPin {
        high: Arc<AtomicBool>,
        fail: Arc<AtomicBool>,
        latency: Duration,
    }

    impl MockPin {
        fn new() -> Self {
            Self::with_latency(Duration::ZERO)
        }

        /// Every read blocks for `latency`
        fn with_latency(latency: Duration) -> Self {
            Self {
                high: Arc::new(AtomicBool::new(true)),
                fail: Arc::new(AtomicBool::new(false)),
                latency,
            }
        }

        fn press(&self) {
            self.high.store(false, Ordering::SeqCst);
        }

        fn release(&self) {
            self.high.store(true, Ordering::SeqCst);
        }
    }

    impl ErrorType for MockPin {
        type Error = ErrorKind;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            if !self.latency.is_zero() {
                thread::sleep(self.latency);
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(ErrorKind::Other);
            }
            Ok(self.high.load(Ordering::SeqCst))
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    fn joystick(up: &MockPin, down: &MockPin) -> Joystick<MockPin> {
        let pins = JoystickPins {
            up: Some(up.clone()),
            down: Some(down.clone()),
            ..JoystickPins::default()
        };
        // one worker keeps delivery in submission order
        Joystick::new(pins, JoystickConfig::new().dispatch_workers(1)).unwrap()
    }

    fn record(
        joystick: &Joystick<MockPin>,
        line: Line,
        kind: EventKind,
        tx: &Sender<(Line, EventKind)>,
    ) -> Token {
        let tx = tx.clone();
        joystick.on(line, kind, move || {
            let _ = tx.send((line, kind));
        })
    }

    #[test]
    fn test_tick_reports_click_hold_release() {
        let (up, down) = (MockPin::new(), MockPin::new());
        let joystick = joystick(&up, &down);
        let (tx, rx) = channel();
        for kind in EventKind::ALL {
            record(&joystick, Line::Up, kind, &tx);
        }

        let t0 = Instant::now();
        up.press();
        for i in 0..14 {
            joystick.tick(t0 + MS * 50 * i);
        }
        up.release();
        joystick.tick(t0 + MS * 700);

        let events: Vec<_> = (0..3).map(|_| rx.recv_timeout(WAIT).unwrap()).collect();
        assert_eq!(
            events,
            [
                (Line::Up, EventKind::Click),
                (Line::Up, EventKind::Hold),
                (Line::Up, EventKind::Release)
            ]
        );
        assert!(rx.recv_timeout(MS * 100).is_err());
    }

    #[test]
    fn test_absent_lines_are_skipped() {
        let pins: JoystickPins<MockPin> = JoystickPins::default();
        let joystick = Joystick::new(pins, JoystickConfig::new()).unwrap();
        let (tx, rx) = channel();
        record(&joystick, Line::Button1, EventKind::Click, &tx);
        joystick.tick(Instant::now());
        assert!(rx.recv_timeout(MS * 100).is_err());
        assert_eq!(joystick.phase(Line::Button1), Phase::Idle);
    }

    #[test]
    fn test_read_error_leaves_state_untouched() {
        let (up, down) = (MockPin::new(), MockPin::new());
        let joystick = joystick(&up, &down);
        let (tx, rx) = channel();
        record(&joystick, Line::Up, EventKind::Click, &tx);
        record(&joystick, Line::Down, EventKind::Click, &tx);

        up.fail.store(true, Ordering::SeqCst);
        up.press();
        down.press();
        joystick.tick(Instant::now());
        // the healthy line still reports
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Down, EventKind::Click));
        assert_eq!(joystick.phase(Line::Up), Phase::Idle);

        up.fail.store(false, Ordering::SeqCst);
        joystick.tick(Instant::now());
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Up, EventKind::Click));
    }

    #[test]
    fn test_active_high_polarity() {
        let pin = MockPin::new();
        let pins = JoystickPins {
            button2: Some(pin.clone()),
            ..JoystickPins::default()
        };
        let config = JoystickConfig::new().polarity(Line::Button2, Polarity::ActiveHigh);
        let joystick = Joystick::new(pins, config).unwrap();
        let (tx, rx) = channel();
        joystick.on_click(Line::Button2, move || {
            let _ = tx.send(());
        });

        // idle level is high, which is pressed for this line
        joystick.tick(Instant::now());
        assert!(rx.recv_timeout(WAIT).is_ok());
        assert_eq!(joystick.phase(Line::Button2), Phase::Pressed);
    }

    #[test]
    fn test_handler_removes_itself_and_sibling() {
        let (up, down) = (MockPin::new(), MockPin::new());
        let joystick = joystick(&up, &down);
        let (tx, rx) = channel();
        let tokens = Arc::new(Mutex::new(Vec::new()));

        let handle = joystick.clone();
        let owned = Arc::clone(&tokens);
        let own = joystick.on_click(Line::Up, move || {
            for token in owned.lock().unwrap().drain(..) {
                handle.remove(token);
            }
            let _ = tx.send(());
        });
        let sibling = joystick.on_click(Line::Down, || {});
        tokens.lock().unwrap().extend([own, sibling]);
        assert_eq!(joystick.handler_count(), 2);

        up.press();
        joystick.tick(Instant::now());
        rx.recv_timeout(WAIT).unwrap();
        assert_eq!(joystick.handler_count(), 0);
        assert!(!joystick.remove(own));
    }

    #[test]
    #[allow(clippy::panic)]
    fn test_panicking_handler_does_not_stop_others() {
        let (up, down) = (MockPin::new(), MockPin::new());
        let joystick = joystick(&up, &down);
        let (tx, rx) = channel();
        joystick.on_click(Line::Up, || panic!("handler failure"));
        record(&joystick, Line::Up, EventKind::Click, &tx);
        record(&joystick, Line::Up, EventKind::Release, &tx);

        up.press();
        joystick.tick(Instant::now());
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Up, EventKind::Click));

        up.release();
        joystick.tick(Instant::now());
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Up, EventKind::Release));
    }

    #[test]
    fn test_manual_dispatch() {
        let (up, down) = (MockPin::new(), MockPin::new());
        let joystick = joystick(&up, &down);
        let (tx, rx) = channel();
        record(&joystick, Line::Left, EventKind::Hold, &tx);
        joystick.dispatch(Line::Left, EventKind::Hold);
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Left, EventKind::Hold));
    }

    #[test]
    fn test_start_stop_idempotent() {
        let (up, down) = (MockPin::new(), MockPin::new());
        let joystick = joystick(&up, &down);
        joystick.set_poll_interval(MS * 5);
        let (tx, rx) = channel();
        record(&joystick, Line::Down, EventKind::Click, &tx);
        record(&joystick, Line::Down, EventKind::Release, &tx);

        joystick.start().unwrap();
        joystick.start().unwrap();
        assert!(joystick.is_running());

        down.press();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Down, EventKind::Click));

        joystick.stop();
        joystick.stop();
        assert!(!joystick.is_running());

        // the restarted thread must see the release before the next press
        down.release();
        joystick.start().unwrap();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Down, EventKind::Release));
        down.press();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Down, EventKind::Click));
        joystick.stop();
    }

    #[test]
    fn test_slow_pin_still_fires_one_hold() {
        let up = MockPin::with_latency(MS * 20);
        let pins = JoystickPins {
            up: Some(up.clone()),
            ..JoystickPins::default()
        };
        let config = JoystickConfig::new()
            .hold_duration(MS * 200)
            .poll_interval(MS * 50)
            .dispatch_workers(1);
        let joystick = Joystick::new(pins, config).unwrap();
        let (tx, rx) = channel();
        for kind in EventKind::ALL {
            record(&joystick, Line::Up, kind, &tx);
        }

        joystick.start().unwrap();
        up.press();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Up, EventKind::Click));
        thread::sleep(MS * 600);
        up.release();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Up, EventKind::Hold));
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), (Line::Up, EventKind::Release));
        joystick.stop();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropping_last_handle_stops_polling() {
        let (up, down) = (MockPin::new(), MockPin::new());
        let joystick = joystick(&up, &down);
        joystick.set_poll_interval(MS * 5);
        joystick.start().unwrap();
        let weak = Arc::downgrade(&joystick.shared);
        drop(joystick);
        // the poll thread held the only other reference
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_settings_round_trip() {
        let (up, down) = (MockPin::new(), MockPin::new());
        let joystick = joystick(&up, &down);
        assert_eq!(joystick.hold_duration(), DEFAULT_HOLD_DURATION);
        assert_eq!(joystick.poll_interval(), DEFAULT_POLL_INTERVAL);
        joystick.set_hold_duration(MS * 300);
        joystick.set_poll_interval(MS * 20);
        assert_eq!(joystick.hold_duration(), MS * 300);
        assert_eq!(joystick.poll_interval(), MS * 20);
    }
}
