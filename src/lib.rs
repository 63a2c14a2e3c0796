// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds terminal setup and the event loop.
pub mod app_dirs;
pub mod config;
pub mod countdown;
pub mod host;
pub mod persist;
pub mod runtime;
pub mod session;
pub mod ui;

pub use countdown::{Countdown, IntervalCountdown};
pub use host::SessionHost;
pub use session::{GameSession, Phase, RoundSettings, SavedRound};
