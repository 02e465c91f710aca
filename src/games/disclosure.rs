use crate::games::types::RoundId;
use std::time::{Duration, Instant};

/// An outcome that has been decided but is held back until `ready_at`
#[derive(Debug, Clone)]
struct PendingDisclosure<T> {
    round: RoundId,
    ready_at: Instant,
    value: T,
}

/// Result of polling the gate for a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisclosureStatus<T> {
    /// The round is current but its cosmetic delay has not elapsed
    Pending { remaining: Duration },
    /// The delay elapsed; the value is handed out exactly once
    Ready(T),
    /// A newer round started, the round was cancelled, or it was already taken
    Superseded,
}

/// Holds at most one pending disclosure, keyed by round id.
///
/// Scheduling a new round drops whatever the previous round had pending, so a
/// stale result can never be shown after a newer round has started.
#[derive(Debug)]
pub struct DisclosureGate<T> {
    current: Option<PendingDisclosure<T>>,
    last_round: u64,
}

impl<T> DisclosureGate<T> {
    pub fn new() -> Self {
        Self {
            current: None,
            last_round: 0,
        }
    }

    /// Start a new round whose value becomes visible after `delay`
    pub fn schedule(&mut self, value: T, delay: Duration, now: Instant) -> RoundId {
        self.schedule_with(delay, now, |_| value)
    }

    /// Like [`DisclosureGate::schedule`], for values that embed their own round id
    pub fn schedule_with<F>(&mut self, delay: Duration, now: Instant, build: F) -> RoundId
    where
        F: FnOnce(RoundId) -> T,
    {
        self.last_round += 1;
        let round = RoundId(self.last_round);
        if let Some(stale) = self.current.take() {
            tracing::debug!("Round {} superseded by {}", stale.round, round);
        }
        self.current = Some(PendingDisclosure {
            round,
            ready_at: now + delay,
            value: build(round),
        });
        round
    }

    /// Check whether `round` may be disclosed at `now`
    pub fn poll(&mut self, round: RoundId, now: Instant) -> DisclosureStatus<T> {
        match self.current.as_ref() {
            Some(pending) if pending.round == round => {
                if now < pending.ready_at {
                    return DisclosureStatus::Pending {
                        remaining: pending.ready_at - now,
                    };
                }
            }
            _ => return DisclosureStatus::Superseded,
        }

        match self.current.take() {
            Some(pending) => DisclosureStatus::Ready(pending.value),
            None => DisclosureStatus::Superseded,
        }
    }

    /// Time left before the current round can be disclosed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|pending| pending.ready_at.saturating_duration_since(now))
    }

    /// Whether some round is still waiting out its delay at `now`
    pub fn is_pending(&self, now: Instant) -> bool {
        self.current
            .as_ref()
            .is_some_and(|pending| now < pending.ready_at)
    }

    /// The current round's value once its delay has elapsed, left in place for `poll`
    pub fn peek_ready(&self, now: Instant) -> Option<(RoundId, &T)> {
        self.current
            .as_ref()
            .filter(|pending| now >= pending.ready_at)
            .map(|pending| (pending.round, &pending.value))
    }

    pub fn current_round(&self) -> Option<RoundId> {
        self.current.as_ref().map(|pending| pending.round)
    }

    /// Drop the pending disclosure, if any
    pub fn cancel(&mut self) -> bool {
        self.current.take().is_some()
    }
}

impl<T> Default for DisclosureGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleep until `round` can be disclosed, then take it.
///
/// Returns `None` when the round was superseded while waiting.
pub async fn wait_for_disclosure<T>(gate: &mut DisclosureGate<T>, round: RoundId) -> Option<T> {
    loop {
        match gate.poll(round, Instant::now()) {
            DisclosureStatus::Ready(value) => return Some(value),
            DisclosureStatus::Superseded => return None,
            DisclosureStatus::Pending { remaining } => tokio::time::sleep(remaining).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disclosure_after_delay() {
        let mut gate = DisclosureGate::new();
        let start = Instant::now();
        let round = gate.schedule(5u8, Duration::from_millis(2500), start);

        assert_eq!(
            gate.poll(round, start + Duration::from_millis(1000)),
            DisclosureStatus::Pending {
                remaining: Duration::from_millis(1500)
            }
        );
        assert!(gate.is_pending(start));
        assert_eq!(
            gate.poll(round, start + Duration::from_millis(2500)),
            DisclosureStatus::Ready(5)
        );
        // handed out once
        assert_eq!(
            gate.poll(round, start + Duration::from_secs(10)),
            DisclosureStatus::Superseded
        );
    }

    #[test]
    fn test_new_round_suppresses_stale_disclosure() {
        let mut gate = DisclosureGate::new();
        let start = Instant::now();
        let first = gate.schedule("first", Duration::from_secs(3), start);
        let second = gate.schedule(
            "second",
            Duration::from_secs(3),
            start + Duration::from_secs(1),
        );

        assert!(second > first);
        let late = start + Duration::from_secs(60);
        assert_eq!(gate.poll(first, late), DisclosureStatus::Superseded);
        assert_eq!(gate.poll(second, late), DisclosureStatus::Ready("second"));
    }

    #[test]
    fn test_zero_delay_is_ready_immediately() {
        let mut gate = DisclosureGate::new();
        let now = Instant::now();
        let round = gate.schedule(1u32, Duration::ZERO, now);
        assert!(!gate.is_pending(now));
        assert_eq!(gate.poll(round, now), DisclosureStatus::Ready(1));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut gate = DisclosureGate::new();
        let start = Instant::now();
        let round = gate.schedule(7u8, Duration::from_secs(1), start);

        assert_eq!(gate.peek_ready(start), None);
        let later = start + Duration::from_secs(1);
        assert_eq!(gate.peek_ready(later), Some((round, &7)));
        assert_eq!(gate.peek_ready(later), Some((round, &7)));
        assert_eq!(gate.poll(round, later), DisclosureStatus::Ready(7));
        assert_eq!(gate.peek_ready(later), None);
    }

    #[test]
    fn test_cancel() {
        let mut gate = DisclosureGate::new();
        let now = Instant::now();
        let round = gate.schedule((), Duration::from_secs(1), now);
        assert_eq!(gate.current_round(), Some(round));
        assert!(gate.cancel());
        assert!(!gate.cancel());
        assert_eq!(gate.poll(round, now + Duration::from_secs(2)), DisclosureStatus::Superseded);
        assert_eq!(gate.remaining(now), None);
    }

    #[tokio::test]
    async fn test_wait_for_disclosure() {
        let mut gate = DisclosureGate::new();
        let round = gate.schedule(42u64, Duration::from_millis(20), Instant::now());
        assert_eq!(wait_for_disclosure(&mut gate, round).await, Some(42));

        let stale = gate.schedule(1u64, Duration::from_millis(20), Instant::now());
        gate.schedule(2u64, Duration::ZERO, Instant::now());
        assert_eq!(wait_for_disclosure(&mut gate, stale).await, None);
    }
}
