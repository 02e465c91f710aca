use crate::games::disclosure::{DisclosureGate, DisclosureStatus};
use crate::games::rng::{OutcomeGenerator, RandomSource};
use crate::games::types::RoundId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Side a coin lands on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoinFace {
    Heads,
    Tails,
}

impl fmt::Display for CoinFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinFace::Heads => write!(f, "HEADS"),
            CoinFace::Tails => write!(f, "TAILS"),
        }
    }
}

/// Coin flip game: the side is decided at flip time and shown after the spin
#[derive(Debug)]
pub struct CoinFlip<S> {
    generator: OutcomeGenerator<S>,
    gate: DisclosureGate<CoinFace>,
    delay: Duration,
}

impl<S: RandomSource> CoinFlip<S> {
    pub fn new(source: S, delay: Duration) -> Self {
        Self {
            generator: OutcomeGenerator::new(source),
            gate: DisclosureGate::new(),
            delay,
        }
    }

    pub fn flip(&mut self, now: Instant) -> RoundId {
        let face = self.generator.draw_coin();
        let round = self.gate.schedule(face, self.delay, now);
        tracing::debug!("Coin round {} flipped", round);
        round
    }

    pub fn poll(&mut self, round: RoundId, now: Instant) -> DisclosureStatus<CoinFace> {
        self.gate.poll(round, now)
    }

    pub fn gate_mut(&mut self) -> &mut DisclosureGate<CoinFace> {
        &mut self.gate
    }

    pub fn is_flipping(&self, now: Instant) -> bool {
        self.gate.is_pending(now)
    }
}
