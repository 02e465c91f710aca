use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Games offered on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Dice,
    Coin,
    Scratch,
    Roulette,
}

impl GameKind {
    /// Dashboard order
    pub const ALL: [GameKind; 4] = [
        GameKind::Dice,
        GameKind::Coin,
        GameKind::Scratch,
        GameKind::Roulette,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GameKind::Dice => "dice",
            GameKind::Coin => "coin",
            GameKind::Scratch => "scratch",
            GameKind::Roulette => "roulette",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Dice => "Dice Roll",
            GameKind::Coin => "Coin Flip",
            GameKind::Scratch => "Speeto 2000",
            GameKind::Roulette => "Roulette",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            GameKind::Dice => "Roll the dice and test your luck!",
            GameKind::Coin => "Heads or Tails? Make your choice.",
            GameKind::Scratch => "Scratch to reveal your lucky numbers!",
            GameKind::Roulette => "Spin the wheel and win big!",
        }
    }

    /// Whether the game moves money at all
    pub fn has_payout(self) -> bool {
        matches!(self, GameKind::Scratch | GameKind::Roulette)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error for an unrecognised game id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown game '{0}'")]
pub struct UnknownGame(pub String);

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownGame(s.to_string()))
    }
}

/// Identifier of one round of one game instance. Strictly increasing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(kind.id().parse::<GameKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.id());
        }
        assert_eq!(" Roulette ".parse::<GameKind>().unwrap(), GameKind::Roulette);
        assert!("poker".parse::<GameKind>().is_err());
    }

    #[test]
    fn test_catalog_metadata() {
        assert_eq!(GameKind::Scratch.title(), "Speeto 2000");
        assert!(GameKind::Roulette.has_payout());
        assert!(!GameKind::Dice.has_payout());
        assert_eq!(
            serde_json::to_string(&GameKind::Coin).unwrap(),
            "\"coin\""
        );
    }
}
