//! Error taxonomy for the pet core.
//!
//! Only [`PetError::Escaped`] should stop a session. Every other variant means
//! the requested action was rejected and the state was left exactly as it was.

use std::fmt;
use thiserror::Error;

/// Why an otherwise well-formed action cannot happen right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refusal {
    Asleep,
    Frozen,
    TooTired,
    TooHungry,
    TooEnergeticToSleep,
    NotEnoughCoins { price: u32, coins: u32 },
    NotOwned,
    AlreadyOwned,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::Asleep => write!(f, "the pet is asleep"),
            Refusal::Frozen => write!(f, "the pet is frozen in stasis"),
            Refusal::TooTired => write!(f, "the pet is too tired"),
            Refusal::TooHungry => write!(f, "the pet is too hungry"),
            Refusal::TooEnergeticToSleep => write!(f, "the pet has too much energy to sleep"),
            Refusal::NotEnoughCoins { price, coins } => {
                write!(f, "costs {price} coins but only {coins} available")
            }
            Refusal::NotOwned => write!(f, "item is not in the inventory"),
            Refusal::AlreadyOwned => write!(f, "item is already owned"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PetError {
    /// Terminal state. The record accepts no further mutation until reset.
    #[error("{name} has run away from home")]
    Escaped { name: String },

    /// Malformed or out-of-range user input to a game or action.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("refused: {0}")]
    Refused(Refusal),
}

impl PetError {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PetError::Escaped { .. })
    }
}

/// Failure to read a persisted record. Never surfaced past `storage`; the
/// caller gets a fresh default state instead.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read save file: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}
