//! Glue between a screen and its game session.
//!
//! The host owns the session and the surface it draws on. Input and lifecycle
//! events come in through `tap`, `advance`, `save` and `info_requested`;
//! everything the session changes goes back out as formatted text.

use std::time::Duration;

use crate::config::{Config, Messages};
use crate::countdown::Countdown;
use crate::session::{GameSession, Phase, SavedRound, SessionListener};

/// Receives pre-formatted score and time text
pub trait DisplaySink {
    fn show_score(&mut self, text: &str);
    fn show_time_left(&mut self, text: &str);
    /// Visual feedback for a tap. Purely cosmetic.
    fn bounce(&mut self) {}
}

pub trait RoundNotifier {
    /// Once per round, with the score as it stood when the clock ran out
    fn notify_game_over(&mut self, final_score: u32, message: &str);
}

pub trait InfoSink {
    fn show_info(&mut self, title: &str, body: &str);
}

/// Everything a screen has to provide to host a session
pub trait HostSurface: DisplaySink + RoundNotifier + InfoSink {}

impl<T: DisplaySink + RoundNotifier + InfoSink> HostSurface for T {}

struct Relay<'a, S> {
    surface: &'a mut S,
    messages: &'a Messages,
}

impl<S: HostSurface> SessionListener for Relay<'_, S> {
    fn score_changed(&mut self, score: u32) {
        self.surface.show_score(&self.messages.score_text(score));
    }

    fn time_left_changed(&mut self, secs: u32) {
        self.surface.show_time_left(&self.messages.time_left_text(secs));
    }

    fn game_over(&mut self, final_score: u32) {
        self.surface
            .notify_game_over(final_score, &self.messages.game_over_text(final_score));
    }
}

pub struct SessionHost<C: Countdown, S: HostSurface> {
    session: GameSession<C>,
    surface: S,
    messages: Messages,
}

impl<C: Countdown, S: HostSurface> SessionHost<C, S> {
    /// Bring up a screen: fresh when `saved` is `None`, resumed otherwise.
    pub fn create(config: &Config, countdown: C, mut surface: S, saved: Option<SavedRound>) -> Self {
        let messages = config.messages.clone();
        tracing::info!(
            round_secs = config.round_secs,
            tick_interval_ms = config.tick_interval_ms,
            restoring = saved.is_some(),
            "creating session host"
        );

        let session = {
            let mut relay = Relay {
                surface: &mut surface,
                messages: &messages,
            };
            GameSession::restore(config.round_settings(), countdown, saved, &mut relay)
        };

        Self {
            session,
            surface,
            messages,
        }
    }

    pub fn tap(&mut self) {
        self.surface.bounce();
        let mut relay = Relay {
            surface: &mut self.surface,
            messages: &self.messages,
        };
        self.session.tap(&mut relay);
    }

    /// Let `elapsed` pass on the countdown and deliver whatever fired, in order
    pub fn advance(&mut self, elapsed: Duration) {
        let mut relay = Relay {
            surface: &mut self.surface,
            messages: &self.messages,
        };
        self.session.poll(elapsed, &mut relay);
    }

    pub fn info_requested(&mut self) {
        let title = self.messages.about_title_text();
        self.surface.show_info(&title, &self.messages.about_body);
    }

    /// The screen is going away but may come back: stop the clock and hand
    /// over what is needed to resume.
    pub fn save(self) -> SavedRound {
        self.session.suspend()
    }

    pub fn is_running(&self) -> bool {
        self.session.phase() == Phase::Running
    }

    pub fn session(&self) -> &GameSession<C> {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
