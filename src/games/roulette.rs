//! European roulette with an even-money colour bet and a running balance
//!
//! The outcome and all balance movements are settled the moment a spin is
//! accepted. The wheel then counts as spinning until the cosmetic delay has
//! passed, during which the table refuses new bets and new spins.

use crate::config::RouletteConfig;
use crate::games::disclosure::{DisclosureGate, DisclosureStatus};
use crate::games::rng::{OutcomeGenerator, RandomSource};
use crate::games::types::RoundId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

/// A wheel position in `0..=36`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "u8")]
pub struct Pocket(u8);

impl Pocket {
    pub const COUNT: u32 = 37;

    pub fn new(number: u8) -> Option<Self> {
        (number <= 36).then_some(Self(number))
    }

    pub(crate) fn from_index(index: u32) -> Self {
        Self(index.min(Self::COUNT - 1) as u8)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn color(self) -> PocketColor {
        classify(self)
    }
}

impl From<Pocket> for u8 {
    fn from(pocket: Pocket) -> u8 {
        pocket.0
    }
}

impl TryFrom<u8> for Pocket {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Pocket::new(value).ok_or_else(|| format!("pocket {} outside 0..=36", value))
    }
}

impl fmt::Display for Pocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PocketColor {
    Red,
    Black,
    Green,
}

impl fmt::Display for PocketColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PocketColor::Red => write!(f, "RED"),
            PocketColor::Black => write!(f, "BLACK"),
            PocketColor::Green => write!(f, "ZERO"),
        }
    }
}

/// Colour the player backs for a round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum BetColor {
    Red,
    Black,
}

impl fmt::Display for BetColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetColor::Red => write!(f, "RED"),
            BetColor::Black => write!(f, "BLACK"),
        }
    }
}

impl std::str::FromStr for BetColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(BetColor::Red),
            "black" => Ok(BetColor::Black),
            other => Err(format!("unknown bet colour '{}'", other)),
        }
    }
}

pub fn classify(pocket: Pocket) -> PocketColor {
    if pocket.0 == 0 {
        PocketColor::Green
    } else if RED_NUMBERS.contains(&pocket.0) {
        PocketColor::Red
    } else {
        PocketColor::Black
    }
}

/// Win/loss for one colour bet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinEvaluation {
    pub won: bool,
    pub payout: i64,
}

/// Zero matches neither colour.
pub fn evaluate(bet: BetColor, pocket: Pocket, payout: i64) -> SpinEvaluation {
    let won = matches!(
        (bet, classify(pocket)),
        (BetColor::Red, PocketColor::Red) | (BetColor::Black, PocketColor::Black)
    );
    SpinEvaluation {
        won,
        payout: if won { payout } else { 0 },
    }
}

/// Where the table is in its round cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TablePhase {
    Idle,
    Spinning,
    Settled,
}

/// Reasons a spin is refused. Nothing changes on the table when refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SpinRejected {
    #[error("The wheel is already spinning")]
    AlreadySpinning,

    #[error("No bet placed for this round")]
    NoBet,

    #[error("Insufficient balance: {balance} available, stake is {stake}")]
    InsufficientBalance { balance: i64, stake: i64 },
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BetRejected {
    #[error("Bets cannot change while the wheel is spinning")]
    SpinInProgress,
}

/// Everything the presentation layer shows once the wheel stops
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinReport {
    pub round: RoundId,
    pub bet: BetColor,
    pub pocket: Pocket,
    pub color: PocketColor,
    pub won: bool,
    pub payout: i64,
    pub stake: i64,
    pub balance_after: i64,
}

/// Roulette table holding the session balance
#[derive(Debug)]
pub struct RouletteTable<S> {
    generator: OutcomeGenerator<S>,
    gate: DisclosureGate<SpinReport>,
    phase: TablePhase,
    bet: Option<BetColor>,
    balance: i64,
    stake: i64,
    payout: i64,
    spin_delay: Duration,
    last_report: Option<SpinReport>,
}

impl<S: RandomSource> RouletteTable<S> {
    pub fn new(source: S, config: &RouletteConfig) -> Self {
        Self {
            generator: OutcomeGenerator::new(source),
            gate: DisclosureGate::new(),
            phase: TablePhase::Idle,
            bet: None,
            balance: config.starting_balance,
            stake: config.stake,
            payout: config.payout,
            spin_delay: Duration::from_millis(config.spin_delay_ms),
            last_report: None,
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn stake(&self) -> i64 {
        self.stake
    }

    pub fn bet(&self) -> Option<BetColor> {
        self.bet
    }

    /// Phase at `now`; a spin whose delay has elapsed reads as settled
    pub fn phase(&mut self, now: Instant) -> TablePhase {
        self.refresh(now);
        self.phase
    }

    /// Result of the most recent settled round
    pub fn last_report(&self) -> Option<&SpinReport> {
        self.last_report.as_ref()
    }

    /// Whether `spin` would be accepted at `now`
    pub fn can_spin(&mut self, now: Instant) -> bool {
        self.check_spin(now).is_ok()
    }

    /// Choose the colour for the next round. Leaves the balance alone.
    pub fn place_bet(&mut self, color: BetColor, now: Instant) -> Result<(), BetRejected> {
        self.refresh(now);
        if self.phase == TablePhase::Spinning {
            tracing::warn!("Bet on {} refused: wheel is spinning", color);
            return Err(BetRejected::SpinInProgress);
        }
        self.bet = Some(color);
        self.phase = TablePhase::Idle;
        Ok(())
    }

    /// Debit the stake, draw a pocket and settle the bet.
    ///
    /// The returned report is final; the same report is disclosed through
    /// [`RouletteTable::poll`] once the spin delay has elapsed.
    pub fn spin(&mut self, now: Instant) -> Result<SpinReport, SpinRejected> {
        let bet = self.check_spin(now).inspect_err(|reason| {
            tracing::warn!("Spin refused: {}", reason);
        })?;

        self.phase = TablePhase::Spinning;
        self.balance -= self.stake;

        let pocket = self.generator.draw_pocket();
        let evaluation = evaluate(bet, pocket, self.payout);
        if evaluation.won {
            self.balance += evaluation.payout;
        }
        self.bet = None;

        let stake = self.stake;
        let balance_after = self.balance;
        let build = move |round| SpinReport {
            round,
            bet,
            pocket,
            color: pocket.color(),
            won: evaluation.won,
            payout: evaluation.payout,
            stake,
            balance_after,
        };
        let round = self.gate.schedule_with(self.spin_delay, now, build);
        let report = build(round);

        tracing::debug!(
            "Roulette round {}: {} on {} ({}), balance {}",
            report.round,
            bet,
            pocket,
            report.color,
            self.balance
        );

        self.refresh(now);
        Ok(report)
    }

    /// Disclose the round's report once the wheel has stopped
    pub fn poll(&mut self, round: RoundId, now: Instant) -> DisclosureStatus<SpinReport> {
        let status = self.gate.poll(round, now);
        match &status {
            // a table that already settled may hold the next bet by now
            DisclosureStatus::Ready(report) if self.phase == TablePhase::Spinning => {
                self.settle(*report)
            }
            _ => {}
        }
        status
    }

    fn check_spin(&mut self, now: Instant) -> Result<BetColor, SpinRejected> {
        self.refresh(now);
        if self.phase == TablePhase::Spinning {
            return Err(SpinRejected::AlreadySpinning);
        }
        let bet = self.bet.ok_or(SpinRejected::NoBet)?;
        if self.balance < self.stake {
            return Err(SpinRejected::InsufficientBalance {
                balance: self.balance,
                stake: self.stake,
            });
        }
        Ok(bet)
    }

    /// Move a finished spin to the settled phase. The report stays in the
    /// gate so the round can still be disclosed through `poll`.
    fn refresh(&mut self, now: Instant) {
        if self.phase != TablePhase::Spinning || self.gate.is_pending(now) {
            return;
        }
        match self.gate.peek_ready(now) {
            Some((_, report)) => {
                let report = *report;
                self.settle(report);
            }
            None => self.phase = TablePhase::Settled,
        }
    }

    fn settle(&mut self, report: SpinReport) {
        self.phase = TablePhase::Settled;
        self.last_report = Some(report);
    }
}
