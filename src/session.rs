use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::countdown::{Countdown, CountdownEvent, CountdownFired, CountdownId};

/// Round length and tick period, fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettings {
    pub initial_secs: u32,
    pub tick_interval: Duration,
}

impl RoundSettings {
    pub fn new(initial_secs: u32, tick_interval: Duration) -> Self {
        Self {
            initial_secs,
            tick_interval,
        }
    }

    pub fn initial_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.initial_secs))
    }
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No countdown armed, waiting for the first tap
    Idle,
    Running,
    /// Only held while the game-over notification goes out
    Ended,
}

/// What survives a suspend: enough to resume the round where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRound {
    pub score: u32,
    pub time_left: u32,
}

/// Receives every observable change a session makes
pub trait SessionListener {
    fn score_changed(&mut self, score: u32);
    fn time_left_changed(&mut self, secs: u32);
    /// Called once per round, before the score is zeroed
    fn game_over(&mut self, final_score: u32);
}

/// One screen's worth of game: score, clock and phase for the current round.
#[derive(Debug)]
pub struct GameSession<C: Countdown> {
    settings: RoundSettings,
    countdown: C,
    armed: Option<CountdownId>,
    phase: Phase,
    score: u32,
    time_left: u32,
}

impl<C: Countdown> GameSession<C> {
    /// A fresh idle session. Nothing is pushed to a listener until `reset`.
    pub fn new(settings: RoundSettings, countdown: C) -> Self {
        Self {
            settings,
            countdown,
            armed: None,
            phase: Phase::Idle,
            score: 0,
            time_left: settings.initial_secs,
        }
    }

    /// Rebuild a session from a saved round, or start clean when there is none.
    ///
    /// A saved round whose clock exceeds the configured round length can't have
    /// come from this configuration, so it is discarded like a missing one.
    /// A valid round resumes immediately with the countdown armed for the time
    /// that was left, not the full round length.
    pub fn restore<L: SessionListener>(
        settings: RoundSettings,
        countdown: C,
        saved: Option<SavedRound>,
        listener: &mut L,
    ) -> Self {
        let mut session = Self::new(settings, countdown);

        let saved = match saved {
            Some(round) if round.time_left <= settings.initial_secs => round,
            Some(round) => {
                tracing::warn!(
                    score = round.score,
                    time_left = round.time_left,
                    initial_secs = settings.initial_secs,
                    "discarding saved round outside the configured duration"
                );
                session.reset(listener);
                return session;
            }
            None => {
                session.reset(listener);
                return session;
            }
        };

        session.score = saved.score;
        session.time_left = saved.time_left;
        session.arm(Duration::from_secs(u64::from(saved.time_left)));
        tracing::info!(
            score = saved.score,
            time_left = saved.time_left,
            "resuming saved round"
        );

        listener.score_changed(session.score);
        listener.time_left_changed(session.time_left);
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn settings(&self) -> RoundSettings {
        self.settings
    }

    pub fn countdown(&self) -> &C {
        &self.countdown
    }

    /// Count a tap. The first tap of a round also starts the clock, and counts.
    pub fn tap<L: SessionListener>(&mut self, listener: &mut L) {
        if self.phase == Phase::Idle {
            self.start();
        }

        self.score = self.score.saturating_add(1);
        listener.score_changed(self.score);
    }

    /// Arm the countdown for a full round
    pub fn start(&mut self) {
        self.arm(self.settings.initial_duration());
    }

    fn arm(&mut self, total: Duration) {
        // `Countdown::start` cancels whatever was armed before
        let id = self.countdown.start(total, self.settings.tick_interval);
        self.armed = Some(id);
        self.phase = Phase::Running;
        tracing::debug!(id = id.get(), ?total, "round running");
    }

    /// Let `elapsed` pass on the countdown and deliver whatever fired, in order
    pub fn poll<L: SessionListener>(&mut self, elapsed: Duration, listener: &mut L) {
        for fired in self.countdown.poll(elapsed) {
            self.on_countdown(fired, listener);
        }
    }

    /// Deliver one fired countdown item.
    ///
    /// Items from a countdown this session no longer holds are dropped.
    pub fn on_countdown<L: SessionListener>(&mut self, fired: CountdownFired, listener: &mut L) {
        if self.phase != Phase::Running || self.armed != Some(fired.id) {
            tracing::trace!(id = fired.id.get(), phase = ?self.phase, "stale countdown item");
            return;
        }

        match fired.event {
            CountdownEvent::Tick { remaining } => {
                self.time_left = (remaining.as_millis() / 1000) as u32;
                listener.time_left_changed(self.time_left);
            }
            CountdownEvent::Finish => {
                self.end(listener);
            }
        }
    }

    /// Close out a running round: report the score, then reset.
    /// Returns the final score, or `None` if no round was running.
    pub fn end<L: SessionListener>(&mut self, listener: &mut L) -> Option<u32> {
        if self.phase != Phase::Running {
            return None;
        }

        self.phase = Phase::Ended;
        let final_score = self.score;
        tracing::info!(final_score, "round over");
        listener.game_over(final_score);

        self.reset(listener);
        Some(final_score)
    }

    /// Back to idle with a full clock. Does not start the countdown.
    pub fn reset<L: SessionListener>(&mut self, listener: &mut L) {
        self.countdown.cancel();
        self.armed = None;
        self.score = 0;
        self.time_left = self.settings.initial_secs;
        self.phase = Phase::Idle;
        tracing::debug!("session reset");

        listener.score_changed(self.score);
        listener.time_left_changed(self.time_left);
    }

    pub fn save(&self) -> SavedRound {
        SavedRound {
            score: self.score,
            time_left: self.time_left,
        }
    }

    /// Capture the round and silence the countdown. The session is consumed,
    /// so nothing can be delivered into it afterwards.
    pub fn suspend(mut self) -> SavedRound {
        let saved = self.save();
        self.countdown.cancel();
        tracing::info!(
            score = saved.score,
            time_left = saved.time_left,
            "session suspended"
        );
        saved
    }
}
