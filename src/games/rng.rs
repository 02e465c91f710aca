//! Random outcome generation
//!
//! Every draw is derived from unit floats in `[0, 1)`. The source of those
//! floats is injected so tests can replay exact sequences and the CLI can pick
//! between a seeded and an entropy-backed generator.

use crate::games::coin::CoinFace;
use crate::games::dice::DieFace;
use crate::games::roulette::Pocket;
use crate::games::scratch::{Prize, TicketSerial};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Supplier of uniformly distributed floats in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Adapter from any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Reproducible stream
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Stream seeded from the operating system
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed list of unit values, starting over when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Values are clamped into `[0, 1)`. An empty script always yields 0.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_finite() { v.clamp(0.0, UNIT_MAX) } else { 0.0 })
            .collect();
        Self { values, cursor: 0 }
    }

    /// Unit value that maps onto `index` out of `buckets` equal buckets
    pub fn bucket(index: u32, buckets: u32) -> f64 {
        (f64::from(index) + 0.5) / f64::from(buckets.max(1))
    }

    /// Script that makes the next pocket draw land on `pocket`
    pub fn pocket(pocket: u8) -> Self {
        Self::new([Self::bucket(u32::from(pocket), Pocket::COUNT)])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}

const UNIT_MAX: f64 = 1.0 - f64::EPSILON;

/// Draws game outcomes from an injected source
#[derive(Debug, Clone)]
pub struct OutcomeGenerator<S> {
    source: S,
}

impl<S: RandomSource> OutcomeGenerator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Uniform index in `0..n`
    pub fn draw_index(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        let scaled = (self.source.next_unit() * f64::from(n)).floor();
        (scaled.max(0.0) as u32).min(n - 1)
    }

    pub fn draw_die(&mut self) -> DieFace {
        DieFace::from_index(self.draw_index(6))
    }

    pub fn draw_coin(&mut self) -> CoinFace {
        if self.source.next_unit() > 0.5 {
            CoinFace::Heads
        } else {
            CoinFace::Tails
        }
    }

    pub fn draw_pocket(&mut self) -> Pocket {
        Pocket::from_index(self.draw_index(Pocket::COUNT))
    }

    pub fn draw_lucky_number(&mut self) -> u8 {
        self.draw_index(9) as u8 + 1
    }

    /// One scratch cell value. With `force_match_probability` the value is the
    /// lucky number; otherwise it is uniform and never equals the lucky number.
    pub fn draw_cell(&mut self, lucky: u8, force_match_probability: f64) -> u8 {
        if self.source.next_unit() < force_match_probability {
            return lucky;
        }
        let number = self.draw_index(9) as u8 + 1;
        if number == lucky {
            if lucky >= 9 {
                1
            } else {
                lucky + 1
            }
        } else {
            number
        }
    }

    pub fn draw_prize(&mut self) -> Prize {
        Prize::ALL[self.draw_index(Prize::ALL.len() as u32) as usize]
    }

    pub fn draw_serial(&mut self) -> TicketSerial {
        let high = self.draw_index(10_000) as u16;
        let low = self.draw_index(10_000) as u16;
        TicketSerial::new(high, low)
    }
}
