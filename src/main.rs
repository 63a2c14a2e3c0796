use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::Mutex,
    time::Duration,
};
use timefighter::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    countdown::{Countdown, IntervalCountdown},
    host::SessionHost,
    persist::{FileRoundStore, RoundStore},
    runtime::{Command, CrosstermEventSource, FixedTicker, HostEvent, Runner},
    ui::TuiView,
};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;
const LOG_ENV: &str = "TIMEFIGHTER_LOG";

/// tap as fast as you can before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A one-button reaction game. The first tap starts the clock; every tap scores a point until time runs out. Quitting mid-round parks the round so the next launch resumes it."
)]
pub struct Cli {
    /// length of a round in seconds
    #[clap(short = 's', long)]
    round_secs: Option<u32>,

    /// countdown tick interval in milliseconds
    #[clap(short = 't', long)]
    tick_ms: Option<u64>,

    /// ignore a round saved by a previous run and start fresh
    #[clap(long)]
    fresh: bool,

    /// persist the effective round settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(secs) = self.round_secs {
            config.round_secs = secs;
        }
        if let Some(ms) = self.tick_ms {
            config.tick_interval_ms = ms;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn init_logging() {
    let path = AppDirs::log_path();
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());
    if cli.save_config {
        config_store.save(&config)?;
        tracing::info!(path = %config_store.path().display(), "config saved");
    }

    let round_store = FileRoundStore::new();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut host = resume_host(&config, &round_store, cli.fresh);
    let outcome = start_tui(&mut terminal, &mut host);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    shutdown(host, &round_store);
    outcome
}

/// Build the host from whatever round the last run parked, then drop the
/// parked copy. Runs only once the terminal is up, so a failed setup leaves
/// the saved round in place.
fn resume_host(
    config: &Config,
    store: &impl RoundStore,
    fresh: bool,
) -> SessionHost<IntervalCountdown, TuiView> {
    let saved = if fresh { None } else { store.load() };
    let host = SessionHost::create(config, IntervalCountdown::new(), TuiView::new(), saved);

    if let Err(err) = store.clear() {
        tracing::warn!(error = %err, "could not clear saved round");
    }
    host
}

fn start_tui<B: Backend, C: Countdown>(
    terminal: &mut Terminal<B>,
    host: &mut SessionHost<C, TuiView>,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| f.render_widget(host.surface(), f.area()))?;

        let (event, elapsed) = runner.step();
        if on_step(host, event, elapsed) == Flow::Quit {
            return Ok(());
        }
    }
}

/// One pass of the event loop: age what is on screen, let the countdown
/// catch up, then react to the event
fn on_step<C: Countdown>(
    host: &mut SessionHost<C, TuiView>,
    event: HostEvent,
    elapsed: Duration,
) -> Flow {
    host.surface_mut().age(elapsed);
    host.advance(elapsed);
    handle_event(host, event)
}

fn handle_event<C: Countdown>(host: &mut SessionHost<C, TuiView>, event: HostEvent) -> Flow {
    match event {
        HostEvent::Tick | HostEvent::Resize => {}
        HostEvent::Disconnected => {
            tracing::warn!("terminal input closed");
            return Flow::Quit;
        }
        HostEvent::Key(key) => {
            let command = Command::from_key(&key);
            // With the dialog open, tap/info keys only close it
            if matches!(command, Some(Command::Tap | Command::Info))
                && host.surface_mut().dismiss_about()
            {
                return Flow::Continue;
            }

            match command {
                Some(Command::Tap) => host.tap(),
                Some(Command::Info) => host.info_requested(),
                Some(Command::Quit) => return Flow::Quit,
                None => {}
            }
        }
    }
    Flow::Continue
}

/// A round still on the clock is parked for the next launch; otherwise
/// nothing is kept.
fn shutdown<C: Countdown>(host: SessionHost<C, TuiView>, store: &impl RoundStore) {
    if !host.is_running() {
        tracing::info!("exiting with no round in progress");
        return;
    }

    let saved = host.save();
    match store.save(&saved) {
        Ok(()) => tracing::info!(
            score = saved.score,
            time_left = saved.time_left,
            "round saved for next launch"
        ),
        Err(err) => tracing::warn!(error = %err, "could not save round"),
    }
}
