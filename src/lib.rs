//! Core of a persistent virtual pet: offline decay over wall-clock time,
//! derived personality and evolution, and a handful of mini-games played
//! against opponents that learn from the player.
//!
//! Most callers only need [`Session`]. The free functions in [`sim`],
//! [`progression`] and [`games`] operate on a bare [`PetState`] for callers
//! that manage persistence themselves.

pub mod config;
pub mod error;
pub mod games;
pub mod limits;
pub mod model;
pub mod personality;
pub mod progression;
pub mod rules;
pub mod session;
pub mod shop;
pub mod sim;
pub mod storage;

pub use error::{PetError, Refusal};
pub use model::{GameKind, PetEvent, PetState, RpsMove};
pub use rules::{DecayProfile, Rules};
pub use session::{OpenReport, Session, Stats};
pub use sim::Action;
