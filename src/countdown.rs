use std::time::Duration;

/// Identifies one armed countdown. Every `start` hands out a new id, so
/// anything fired by an earlier countdown can be told apart and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownId(pub(crate) u64);

impl CountdownId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// An interval boundary was crossed; `remaining` never goes below zero
    Tick { remaining: Duration },
    /// The full duration is spent. Delivered once, after the final tick.
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownFired {
    pub id: CountdownId,
    pub event: CountdownEvent,
}

/// Interval countdown driven by the host event loop.
///
/// The host owns the clock: it reports how much time passed through `poll`
/// and delivers the returned items to the session one at a time.
pub trait Countdown {
    /// Arm a countdown for `total`, ticking every `interval`.
    /// Any countdown armed before is cancelled first.
    fn start(&mut self, total: Duration, interval: Duration) -> CountdownId;

    /// Stop delivery of further ticks and the finish. Safe to call repeatedly.
    fn cancel(&mut self);

    fn is_running(&self) -> bool;

    /// Advance by `elapsed` and collect everything that became due.
    fn poll(&mut self, elapsed: Duration) -> Vec<CountdownFired>;
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    id: CountdownId,
    total: Duration,
    interval: Duration,
    elapsed: Duration,
    boundaries_crossed: u32,
}

/// Fixed-period countdown. Boundaries fall at whole multiples of the interval,
/// plus a last one at `total` when the interval does not divide it. The
/// boundary where the remaining time reaches zero also fires the finish.
#[derive(Debug, Default)]
pub struct IntervalCountdown {
    next_id: u64,
    armed: Option<Armed>,
}

impl IntervalCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left on the armed countdown as of the last boundary crossed
    pub fn remaining(&self) -> Option<Duration> {
        self.armed.map(|a| {
            a.total
                .saturating_sub(a.interval.saturating_mul(a.boundaries_crossed))
        })
    }
}

impl Countdown for IntervalCountdown {
    fn start(&mut self, total: Duration, interval: Duration) -> CountdownId {
        self.cancel();

        let id = CountdownId(self.next_id);
        self.next_id += 1;
        self.armed = Some(Armed {
            id,
            total,
            interval: interval.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            boundaries_crossed: 0,
        });
        tracing::trace!(id = id.get(), ?total, ?interval, "countdown armed");
        id
    }

    fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            tracing::trace!(id = armed.id.get(), "countdown cancelled");
        }
    }

    fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    fn poll(&mut self, elapsed: Duration) -> Vec<CountdownFired> {
        let Some(mut armed) = self.armed else {
            return Vec::new();
        };

        armed.elapsed = armed.elapsed.saturating_add(elapsed);

        let mut fired = Vec::new();
        loop {
            let boundary = armed
                .interval
                .saturating_mul(armed.boundaries_crossed + 1)
                .min(armed.total);
            if boundary > armed.elapsed {
                break;
            }

            armed.boundaries_crossed += 1;
            let remaining = armed.total - boundary;
            fired.push(CountdownFired {
                id: armed.id,
                event: CountdownEvent::Tick { remaining },
            });

            if remaining.is_zero() {
                fired.push(CountdownFired {
                    id: armed.id,
                    event: CountdownEvent::Finish,
                });
                self.armed = None;
                return fired;
            }
        }

        self.armed = Some(armed);
        fired
    }
}
