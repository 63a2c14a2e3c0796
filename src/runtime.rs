use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum HostEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The event source is gone; no more input will ever arrive
    Disconnected,
}

/// What a key press means to the game screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Tap,
    Info,
    Quit,
}

impl Command {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Self::Quit)
            }
            KeyCode::Char(' ') | KeyCode::Enter => Some(Self::Tap),
            KeyCode::Char('i') | KeyCode::Char('?') => Some(Self::Info),
            KeyCode::Esc | KeyCode::Char('q') => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait HostEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<HostEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => tx.send(HostEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => tx.send(HostEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::warn!(error = %err, "terminal event reader stopped");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<HostEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<HostEvent>) -> Self {
        Self { rx }
    }
}

impl HostEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<HostEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Every step also reports how much wall time went by since the previous
/// one, so countdowns can be advanced no matter which event woke the loop.
pub struct Runner<E: HostEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    last_step: Instant,
}

impl<E: HostEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            last_step: Instant::now(),
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&mut self) -> (HostEvent, Duration) {
        let event = match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => HostEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => HostEvent::Disconnected,
        };

        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_step);
        self.last_step = now;
        (event, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let mut runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        assert_matches!(runner.step(), (HostEvent::Tick, _));
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(HostEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let mut runner = Runner::new(es, ticker);

        assert_matches!(runner.step(), (HostEvent::Resize, _));
    }

    #[test]
    fn step_reports_a_closed_source() {
        let (tx, rx) = mpsc::channel::<HostEvent>();
        drop(tx);
        let mut runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(100)),
        );

        assert_matches!(runner.step(), (HostEvent::Disconnected, _));
    }

    #[test]
    fn step_reports_elapsed_time() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(20)),
        );

        let (_, elapsed) = runner.step();
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from_key(&key(KeyCode::Char(' '))), Some(Command::Tap));
        assert_eq!(Command::from_key(&key(KeyCode::Enter)), Some(Command::Tap));
        assert_eq!(Command::from_key(&key(KeyCode::Char('i'))), Some(Command::Info));
        assert_eq!(Command::from_key(&key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(Command::from_key(&key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(
            Command::from_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(Command::from_key(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut release = key(KeyCode::Char(' '));
        release.kind = KeyEventKind::Release;
        assert_eq!(Command::from_key(&release), None);
    }
}
