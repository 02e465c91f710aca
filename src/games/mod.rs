//! Game rules, outcome generation and round bookkeeping

pub mod coin;
pub mod coverage;
pub mod dice;
pub mod disclosure;
pub mod rng;
pub mod roulette;
pub mod scratch;
pub mod simulation;
pub mod types;

pub use coin::{CoinFace, CoinFlip};
pub use coverage::{CoverageProgress, CoverageSurface, DEFAULT_REVEAL_THRESHOLD};
pub use dice::{DiceRoll, DieFace};
pub use disclosure::{wait_for_disclosure, DisclosureGate, DisclosureStatus};
pub use rng::{OutcomeGenerator, RandomSource, RngSource, ScriptedSource};
pub use roulette::{
    classify, evaluate, BetColor, BetRejected, Pocket, PocketColor, RouletteTable, SpinEvaluation,
    SpinRejected, SpinReport, TablePhase,
};
pub use scratch::{
    evaluate_cells, evaluate_ticket, Prize, ScratchCard, ScratchCell, ScratchTicket, TicketSerial,
    CELLS_PER_TICKET,
};
pub use simulation::{simulate_roulette, simulate_scratch, SimulationReport};
pub use types::{GameKind, RoundId, UnknownGame};
