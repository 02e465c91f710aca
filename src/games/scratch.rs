//! Speeto scratch tickets
//!
//! A ticket is fully decided when it is dealt: lucky number, six cells and the
//! total win. Scratching only changes how much of the foil is gone.

use crate::config::ScratchConfig;
use crate::errors::TicketError;
use crate::games::coverage::{CoverageProgress, CoverageSurface};
use crate::games::rng::{OutcomeGenerator, RandomSource};
use crate::games::types::RoundId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CELLS_PER_TICKET: usize = 6;

/// Prize printed under a cell
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub enum Prize {
    Five,
    Ten,
    Fifty,
    Hundred,
    FiveHundred,
    Thousand,
}

impl Prize {
    pub const ALL: [Prize; 6] = [
        Prize::Five,
        Prize::Ten,
        Prize::Fifty,
        Prize::Hundred,
        Prize::FiveHundred,
        Prize::Thousand,
    ];

    pub fn amount(self) -> u32 {
        match self {
            Prize::Five => 5,
            Prize::Ten => 10,
            Prize::Fifty => 50,
            Prize::Hundred => 100,
            Prize::FiveHundred => 500,
            Prize::Thousand => 1000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Prize::Five => "$5",
            Prize::Ten => "$10",
            Prize::Fifty => "$50",
            Prize::Hundred => "$100",
            Prize::FiveHundred => "$500",
            Prize::Thousand => "$1000",
        }
    }
}

impl fmt::Display for Prize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Prize {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let amount: u32 = digits
            .parse()
            .map_err(|_| TicketError::UnknownPrize(s.to_string()))?;
        Prize::ALL
            .into_iter()
            .find(|prize| prize.amount() == amount)
            .ok_or_else(|| TicketError::UnknownPrize(s.to_string()))
    }
}

impl From<Prize> for String {
    fn from(prize: Prize) -> String {
        prize.label().to_string()
    }
}

impl TryFrom<String> for Prize {
    type Error = TicketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Serial printed in the ticket footer, e.g. `0042-9137`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TicketSerial {
    high: u16,
    low: u16,
}

impl TicketSerial {
    /// Each half is reduced to four digits
    pub fn new(high: u16, low: u16) -> Self {
        Self {
            high: high % 10_000,
            low: low % 10_000,
        }
    }
}

impl fmt::Display for TicketSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:04}", self.high, self.low)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScratchCell {
    pub value: u8,
    pub prize: Prize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScratchTicket {
    serial: TicketSerial,
    lucky_number: u8,
    cells: [ScratchCell; CELLS_PER_TICKET],
    total_win: u32,
}

impl ScratchTicket {
    /// Deal a ticket. Each cell matches the lucky number with
    /// `force_match_probability`, and never matches otherwise.
    pub fn generate<S: RandomSource>(
        generator: &mut OutcomeGenerator<S>,
        force_match_probability: f64,
    ) -> Self {
        let serial = generator.draw_serial();
        let lucky_number = generator.draw_lucky_number();
        let cells = std::array::from_fn(|_| {
            let value = generator.draw_cell(lucky_number, force_match_probability);
            let prize = generator.draw_prize();
            ScratchCell { value, prize }
        });
        Self::assemble(serial, lucky_number, cells)
    }

    /// Build a ticket from printed values, validating every number and label
    pub fn from_labels(lucky_number: u8, cells: &[(u8, &str)]) -> Result<Self, TicketError> {
        let parsed = cells
            .iter()
            .map(|&(value, label)| -> Result<ScratchCell, TicketError> {
                Ok(ScratchCell {
                    value,
                    prize: label.parse()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(TicketSerial::new(0, 0), lucky_number, parsed)
    }

    pub fn from_cells(
        serial: TicketSerial,
        lucky_number: u8,
        cells: Vec<ScratchCell>,
    ) -> Result<Self, TicketError> {
        check_number(lucky_number)?;
        for cell in &cells {
            check_number(cell.value)?;
        }
        let actual = cells.len();
        let cells: [ScratchCell; CELLS_PER_TICKET] =
            cells.try_into().map_err(|_| TicketError::CellCount {
                expected: CELLS_PER_TICKET,
                actual,
            })?;
        Ok(Self::assemble(serial, lucky_number, cells))
    }

    fn assemble(
        serial: TicketSerial,
        lucky_number: u8,
        cells: [ScratchCell; CELLS_PER_TICKET],
    ) -> Self {
        let total_win = evaluate_cells(lucky_number, &cells);
        Self {
            serial,
            lucky_number,
            cells,
            total_win,
        }
    }

    pub fn serial(&self) -> TicketSerial {
        self.serial
    }

    pub fn lucky_number(&self) -> u8 {
        self.lucky_number
    }

    pub fn cells(&self) -> &[ScratchCell; CELLS_PER_TICKET] {
        &self.cells
    }

    /// Fixed when the ticket was dealt
    pub fn total_win(&self) -> u32 {
        self.total_win
    }

    /// Indices of cells that pay out
    pub fn winning_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| cell.value == self.lucky_number)
            .map(|(i, _)| i)
    }
}

fn check_number(value: u8) -> Result<(), TicketError> {
    if (1..=9).contains(&value) {
        Ok(())
    } else {
        Err(TicketError::NumberOutOfRange(value))
    }
}

/// Sum of prizes on cells showing the lucky number
pub fn evaluate_cells(lucky_number: u8, cells: &[ScratchCell]) -> u32 {
    cells
        .iter()
        .filter(|cell| cell.value == lucky_number)
        .map(|cell| cell.prize.amount())
        .sum()
}

/// Win printed on `ticket`, recomputed from its cells
pub fn evaluate_ticket(ticket: &ScratchTicket) -> u32 {
    evaluate_cells(ticket.lucky_number, &ticket.cells)
}

/// The scratch card game: one live ticket and the foil covering it
#[derive(Debug)]
pub struct ScratchCard<S> {
    generator: OutcomeGenerator<S>,
    config: ScratchConfig,
    ticket: ScratchTicket,
    surface: CoverageSurface,
    round: RoundId,
}

impl<S: RandomSource> ScratchCard<S> {
    /// Create the game with a first ticket already dealt
    pub fn new(source: S, config: &ScratchConfig) -> Self {
        let mut generator = OutcomeGenerator::new(source);
        let ticket = ScratchTicket::generate(&mut generator, config.force_match_probability);
        let surface = fresh_surface(config);
        Self {
            generator,
            config: config.clone(),
            ticket,
            surface,
            round: RoundId(1),
        }
    }

    /// Replace the ticket and its foil in one step
    pub fn new_ticket(&mut self) -> &ScratchTicket {
        self.ticket =
            ScratchTicket::generate(&mut self.generator, self.config.force_match_probability);
        self.surface = fresh_surface(&self.config);
        self.round = RoundId(self.round.0 + 1);
        tracing::debug!(
            "Scratch ticket {} dealt as round {}",
            self.ticket.serial(),
            self.round
        );
        &self.ticket
    }

    /// Scratch at `(x, y)` with the configured brush radius
    pub fn scratch(&mut self, x: f64, y: f64) -> CoverageProgress {
        let progress = self.surface.scratch(x, y, self.config.brush_radius);
        if progress.just_revealed {
            tracing::info!(
                "Ticket {} revealed, win {}",
                self.ticket.serial(),
                self.ticket.total_win()
            );
        }
        progress
    }

    pub fn ticket(&self) -> &ScratchTicket {
        &self.ticket
    }

    pub fn surface(&self) -> &CoverageSurface {
        &self.surface
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    pub fn brush_radius(&self) -> f64 {
        self.config.brush_radius
    }

    pub fn is_revealed(&self) -> bool {
        self.surface.is_reveal_threshold_met()
    }

    /// The ticket's win, available only once enough foil is gone
    pub fn disclosed_win(&self) -> Option<u32> {
        self.is_revealed().then_some(self.ticket.total_win())
    }
}

fn fresh_surface(config: &ScratchConfig) -> CoverageSurface {
    CoverageSurface::with_threshold(
        config.surface_width,
        config.surface_height,
        config.reveal_threshold,
    )
}
