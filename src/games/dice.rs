use crate::games::disclosure::{DisclosureGate, DisclosureStatus};
use crate::games::rng::{OutcomeGenerator, RandomSource};
use crate::games::types::RoundId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Face of a six-sided die, always in `1..=6`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub struct DieFace(u8);

impl DieFace {
    pub fn new(value: u8) -> Option<Self> {
        (1..=6).contains(&value).then_some(Self(value))
    }

    /// Face for a zero-based index; out-of-range indices saturate to 6
    pub(crate) fn from_index(index: u32) -> Self {
        Self(index.min(5) as u8 + 1)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<DieFace> for u8 {
    fn from(face: DieFace) -> u8 {
        face.0
    }
}

impl TryFrom<u8> for DieFace {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DieFace::new(value).ok_or_else(|| format!("die face {} outside 1..=6", value))
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dice roll game: no stake, no payout, just a face shown after the roll animation
#[derive(Debug)]
pub struct DiceRoll<S> {
    generator: OutcomeGenerator<S>,
    gate: DisclosureGate<DieFace>,
    delay: Duration,
}

impl<S: RandomSource> DiceRoll<S> {
    pub fn new(source: S, delay: Duration) -> Self {
        Self {
            generator: OutcomeGenerator::new(source),
            gate: DisclosureGate::new(),
            delay,
        }
    }

    /// Draw a face for a new round. Any earlier pending roll is discarded.
    pub fn roll(&mut self, now: Instant) -> RoundId {
        let face = self.generator.draw_die();
        let round = self.gate.schedule(face, self.delay, now);
        tracing::debug!("Dice round {} rolled", round);
        round
    }

    pub fn poll(&mut self, round: RoundId, now: Instant) -> DisclosureStatus<DieFace> {
        self.gate.poll(round, now)
    }

    pub fn gate_mut(&mut self) -> &mut DisclosureGate<DieFace> {
        &mut self.gate
    }

    pub fn is_rolling(&self, now: Instant) -> bool {
        self.gate.is_pending(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::rng::ScriptedSource;

    #[test]
    fn test_face_bounds() {
        assert!(DieFace::new(0).is_none());
        assert!(DieFace::new(7).is_none());
        assert_eq!(DieFace::new(3).map(DieFace::value), Some(3));
        assert!(serde_json::from_str::<DieFace>("9").is_err());
        assert_eq!(serde_json::to_string(&DieFace::from_index(1)).unwrap(), "2");
    }

    #[test]
    fn test_roll_disclosed_after_delay() {
        let source = ScriptedSource::new([ScriptedSource::bucket(3, 6)]);
        let mut dice = DiceRoll::new(source, Duration::from_millis(2500));
        let start = Instant::now();
        let round = dice.roll(start);

        assert!(dice.is_rolling(start));
        assert!(matches!(
            dice.poll(round, start + Duration::from_millis(100)),
            DisclosureStatus::Pending { .. }
        ));
        assert_eq!(
            dice.poll(round, start + Duration::from_millis(2500)),
            DisclosureStatus::Ready(DieFace(4))
        );
    }

    #[test]
    fn test_reroll_supersedes_pending_roll() {
        let source = ScriptedSource::new([0.0, 0.99]);
        let mut dice = DiceRoll::new(source, Duration::from_secs(2));
        let start = Instant::now();
        let first = dice.roll(start);
        let second = dice.roll(start + Duration::from_millis(500));

        let late = start + Duration::from_secs(10);
        assert_eq!(dice.poll(first, late), DisclosureStatus::Superseded);
        assert_eq!(dice.poll(second, late), DisclosureStatus::Ready(DieFace(6)));
    }
}
