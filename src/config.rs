//! Configuration management with validation and defaults
//!
//! Game constants (stake, payout, reveal threshold, disclosure delays) are
//! gathered here so a table can be tuned from a TOML file or the environment
//! without touching the rule code.

use crate::errors::{ConfigurationError, LuckboxResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Complete game configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LuckboxConfig {
    pub roulette: RouletteConfig,
    pub scratch: ScratchConfig,
    pub quick: QuickGameConfig,
}

/// Roulette table and ledger settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RouletteConfig {
    pub starting_balance: i64,
    /// Debited when a spin starts, win or lose
    pub stake: i64,
    /// Credited when the bet colour matches the pocket
    pub payout: i64,
    pub spin_delay_ms: u64,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            stake: 100,
            payout: 200,
            spin_delay_ms: 4000,
        }
    }
}

/// Scratch ticket generation and reveal settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScratchConfig {
    pub surface_width: u32,
    pub surface_height: u32,
    pub brush_radius: f64,
    /// Fraction of the surface that must be uncovered, strictly exceeded
    pub reveal_threshold: f64,
    pub force_match_probability: f64,
    /// Nominal wager used by the return-to-player simulation
    pub ticket_price: u32,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            surface_width: 400,
            surface_height: 300,
            brush_radius: 30.0,
            reveal_threshold: 0.60,
            force_match_probability: 0.30,
            ticket_price: 100,
        }
    }
}

/// Dice roll and coin flip settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuickGameConfig {
    pub dice_delay_ms: u64,
    pub coin_delay_ms: u64,
}

impl Default for QuickGameConfig {
    fn default() -> Self {
        Self {
            dice_delay_ms: 2500,
            coin_delay_ms: 3000,
        }
    }
}

impl LuckboxConfig {
    /// Same rules, no cosmetic delays. Used by the simulator and by tests.
    pub fn instant() -> Self {
        Self {
            roulette: RouletteConfig {
                spin_delay_ms: 0,
                ..Default::default()
            },
            quick: QuickGameConfig {
                dice_delay_ms: 0,
                coin_delay_ms: 0,
            },
            ..Default::default()
        }
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let roulette = &self.roulette;
        if roulette.stake <= 0 {
            return Err(ConfigurationError::invalid(
                "roulette.stake",
                roulette.stake,
                "Stake must be positive",
            ));
        }
        if roulette.payout < 0 {
            return Err(ConfigurationError::invalid(
                "roulette.payout",
                roulette.payout,
                "Payout cannot be negative",
            ));
        }

        let scratch = &self.scratch;
        if scratch.surface_width == 0 || scratch.surface_height == 0 {
            return Err(ConfigurationError::invalid(
                "scratch.surface",
                format!("{}x{}", scratch.surface_width, scratch.surface_height),
                "Surface dimensions cannot be zero",
            ));
        }
        if !(scratch.brush_radius.is_finite() && scratch.brush_radius > 0.0) {
            return Err(ConfigurationError::invalid(
                "scratch.brush_radius",
                scratch.brush_radius,
                "Brush radius must be a positive number",
            ));
        }
        if !(0.0..1.0).contains(&scratch.reveal_threshold) {
            return Err(ConfigurationError::invalid(
                "scratch.reveal_threshold",
                scratch.reveal_threshold,
                "Threshold must lie in [0, 1)",
            ));
        }
        if !(0.0..=1.0).contains(&scratch.force_match_probability) {
            return Err(ConfigurationError::invalid(
                "scratch.force_match_probability",
                scratch.force_match_probability,
                "Probability must lie in [0, 1]",
            ));
        }

        Ok(())
    }

    pub fn spin_delay(&self) -> Duration {
        Duration::from_millis(self.roulette.spin_delay_ms)
    }

    pub fn dice_delay(&self) -> Duration {
        Duration::from_millis(self.quick.dice_delay_ms)
    }

    pub fn coin_delay(&self) -> Duration {
        Duration::from_millis(self.quick.coin_delay_ms)
    }
}

/// Configuration loader with environment variable support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> LuckboxResult<LuckboxConfig> {
        let mut config = match self.config_path {
            Some(ref path) => self.load_from_file(path)?,
            None => LuckboxConfig::default(),
        };

        apply_env_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> LuckboxResult<LuckboxConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into()
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &LuckboxConfig, path: &str) -> LuckboxResult<()> {
        let toml_string = toml::to_string_pretty(config).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, toml_string).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into()
        })
    }
}

/// Apply `LUCKBOX_*` overrides. `lookup` is `std::env::var` outside tests.
fn apply_env_overrides<F>(config: &mut LuckboxConfig, lookup: F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    fn parse<T: std::str::FromStr>(key: &str, raw: String) -> Result<T, ConfigurationError> {
        raw.trim()
            .parse()
            .map_err(|_| ConfigurationError::invalid(key, raw, "Could not parse value"))
    }

    if let Some(raw) = lookup("LUCKBOX_STARTING_BALANCE") {
        config.roulette.starting_balance = parse("LUCKBOX_STARTING_BALANCE", raw)?;
    }
    if let Some(raw) = lookup("LUCKBOX_STAKE") {
        config.roulette.stake = parse("LUCKBOX_STAKE", raw)?;
    }
    if let Some(raw) = lookup("LUCKBOX_PAYOUT") {
        config.roulette.payout = parse("LUCKBOX_PAYOUT", raw)?;
    }
    if let Some(raw) = lookup("LUCKBOX_REVEAL_THRESHOLD") {
        config.scratch.reveal_threshold = parse("LUCKBOX_REVEAL_THRESHOLD", raw)?;
    }
    if let Some(raw) = lookup("LUCKBOX_BRUSH_RADIUS") {
        config.scratch.brush_radius = parse("LUCKBOX_BRUSH_RADIUS", raw)?;
    }

    Ok(())
}

/// Builder pattern for creating configurations
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: LuckboxConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: LuckboxConfig::default(),
        }
    }

    pub fn roulette(mut self, roulette: RouletteConfig) -> Self {
        self.config.roulette = roulette;
        self
    }

    pub fn scratch(mut self, scratch: ScratchConfig) -> Self {
        self.config.scratch = scratch;
        self
    }

    pub fn quick(mut self, quick: QuickGameConfig) -> Self {
        self.config.quick = quick;
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<LuckboxConfig, ConfigurationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
