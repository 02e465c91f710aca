//! Luckbox - casual chance games
//!
//! Four games share one core: dice, coin flip, a Speeto scratch ticket and
//! single-zero roulette with a colour bet. Outcomes are drawn from an
//! injectable [`RandomSource`], settled immediately, and disclosed after a
//! cosmetic delay through a [`DisclosureGate`] keyed by round id.

pub mod config;
pub mod errors;
pub mod games;

pub use config::{ConfigBuilder, ConfigLoader, LuckboxConfig};
pub use errors::{ConfigurationError, LuckboxError, LuckboxResult, TicketError};
pub use games::{
    DisclosureGate, DisclosureStatus, GameKind, OutcomeGenerator, RandomSource, RoundId,
};
