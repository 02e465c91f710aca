//! Monte-Carlo return-to-player estimates
//!
//! Plays many rounds against an injected source and aggregates wagers and
//! payouts, the same way the house edge is checked for each game.

use crate::config::{RouletteConfig, ScratchConfig};
use crate::games::rng::{OutcomeGenerator, RandomSource};
use crate::games::roulette::{BetColor, RouletteTable};
use crate::games::scratch::ScratchTicket;
use crate::games::types::GameKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Aggregated results of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationReport {
    pub game: GameKind,
    pub rounds_played: u64,
    pub wins: u64,
    pub total_wagered: i64,
    pub total_paid: i64,
    pub win_rate: f64,
    pub return_to_player: f64,
    pub house_edge: f64,
}

impl SimulationReport {
    fn from_totals(game: GameKind, rounds: u64, wins: u64, wagered: i64, paid: i64) -> Self {
        let win_rate = if rounds == 0 {
            0.0
        } else {
            wins as f64 / rounds as f64
        };
        let return_to_player = if wagered == 0 {
            0.0
        } else {
            paid as f64 / wagered as f64
        };
        Self {
            game,
            rounds_played: rounds,
            wins,
            total_wagered: wagered,
            total_paid: paid,
            win_rate,
            return_to_player,
            house_edge: if wagered == 0 { 0.0 } else { 1.0 - return_to_player },
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} over {} rounds", self.game.title(), self.rounds_played)?;
        writeln!(f, "  wins:       {} ({:.2}%)", self.wins, self.win_rate * 100.0)?;
        writeln!(f, "  wagered:    {}", self.total_wagered)?;
        writeln!(f, "  paid:       {}", self.total_paid)?;
        writeln!(f, "  RTP:        {:.2}%", self.return_to_player * 100.0)?;
        write!(f, "  house edge: {:.2}%", self.house_edge * 100.0)
    }
}

/// Play `rounds` colour bets on one table.
///
/// The bankroll is sized so the balance guard never stops the run.
pub fn simulate_roulette<S: RandomSource>(
    config: &RouletteConfig,
    source: S,
    bet: BetColor,
    rounds: u64,
) -> SimulationReport {
    let bankroll = config
        .stake
        .saturating_mul(i64::try_from(rounds).unwrap_or(i64::MAX))
        .max(config.stake);
    let table_config = RouletteConfig {
        starting_balance: bankroll,
        spin_delay_ms: 0,
        ..config.clone()
    };
    let mut table = RouletteTable::new(source, &table_config);
    let now = Instant::now();

    let (mut played, mut wins, mut wagered, mut paid) = (0u64, 0u64, 0i64, 0i64);
    for _ in 0..rounds {
        if table.place_bet(bet, now).is_err() {
            break;
        }
        let report = match table.spin(now) {
            Ok(report) => report,
            Err(reason) => {
                tracing::warn!("Simulation stopped after {} rounds: {}", played, reason);
                break;
            }
        };
        played += 1;
        wagered += report.stake;
        paid += report.payout;
        if report.won {
            wins += 1;
        }
    }

    let report = SimulationReport::from_totals(GameKind::Roulette, played, wins, wagered, paid);
    tracing::debug!(
        "Roulette simulation: {} rounds, RTP {:.4}",
        played,
        report.return_to_player
    );
    report
}

/// Deal `tickets` scratch tickets, each bought at the configured price
pub fn simulate_scratch<S: RandomSource>(
    config: &ScratchConfig,
    source: S,
    tickets: u64,
) -> SimulationReport {
    let mut generator = OutcomeGenerator::new(source);
    let price = i64::from(config.ticket_price);

    let (mut wins, mut paid) = (0u64, 0i64);
    for _ in 0..tickets {
        let ticket = ScratchTicket::generate(&mut generator, config.force_match_probability);
        if ticket.total_win() > 0 {
            wins += 1;
            paid += i64::from(ticket.total_win());
        }
    }

    let wagered = price.saturating_mul(i64::try_from(tickets).unwrap_or(i64::MAX));
    let report = SimulationReport::from_totals(GameKind::Scratch, tickets, wins, wagered, paid);
    tracing::debug!(
        "Scratch simulation: {} tickets, RTP {:.4}",
        tickets,
        report.return_to_player
    );
    report
}
