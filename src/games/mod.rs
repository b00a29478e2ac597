//! Mini-games played against the pet.
//!
//! Every game follows the same envelope: [`ensure_can_play`] before anything is
//! touched, then [`conclude`] to pay costs and rewards once the game is over.

pub mod guess;
pub mod parity;
pub mod rps;
pub mod tictactoe;

use crate::error::{PetError, Refusal};
use crate::model::{GameKind, PetEvent, PetState, PlaySession};
use crate::rules::{Cost, Reward, Rules};
use crate::sim::{apply_reward, settle};
use chrono::{DateTime, Utc};

/// A single line of user input during a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input<T> {
    Pick(T),
    Quit,
}

impl Input<u32> {
    /// Accepts a non-negative integer or `q` / `quit`.
    pub fn parse(s: &str) -> Result<Self, PetError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("q") || s.eq_ignore_ascii_case("quit") {
            return Ok(Input::Quit);
        }
        s.parse::<u32>()
            .map(Input::Pick)
            .map_err(|_| PetError::InvalidInput(format!("'{s}' is not a number")))
    }
}

/// Checks that a game may start. Never mutates.
pub fn ensure_can_play(state: &PetState, rules: &Rules) -> Result<(), PetError> {
    state.ensure_alive()?;
    if state.frozen {
        return Err(PetError::Refused(Refusal::Frozen));
    }
    if state.sleeping {
        return Err(PetError::Refused(Refusal::Asleep));
    }
    if state.energy < rules.game_min_energy {
        return Err(PetError::Refused(Refusal::TooTired));
    }
    Ok(())
}

/// Pays the cost, applies the reward and logs the session.
pub(crate) fn conclude(
    state: &mut PetState,
    game: GameKind,
    cost: Cost,
    reward: &Reward,
    now: DateTime<Utc>,
    rules: &Rules,
) -> Vec<PetEvent> {
    state.hunger -= cost.hunger;
    state.energy -= cost.energy;
    apply_reward(state, reward);
    *state.game_stats.entry(game).or_insert(0) += 1;
    state.history.play_sessions.push(PlaySession { game, at: now });
    log::debug!(
        "{:?} finished: affection {:+}, {} xp, {} coins",
        game,
        reward.affection,
        reward.experience,
        reward.coins
    );
    settle(state, reward.experience, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_parsing() {
        assert_eq!(Input::parse(" 42 ").unwrap(), Input::Pick(42));
        assert_eq!(Input::parse("Quit").unwrap(), Input::Quit);
        assert!(matches!(
            Input::parse("forty"),
            Err(PetError::InvalidInput(_))
        ));
        assert!(Input::parse("-3").is_err());
    }

    #[test]
    fn tired_or_sleeping_pets_do_not_play() {
        let rules = Rules::default();
        let mut st = PetState::default();
        assert!(ensure_can_play(&st, &rules).is_ok());
        st.energy = 14.0;
        assert_eq!(
            ensure_can_play(&st, &rules),
            Err(PetError::Refused(Refusal::TooTired))
        );
        st.sleeping = true;
        assert_eq!(
            ensure_can_play(&st, &rules),
            Err(PetError::Refused(Refusal::Asleep))
        );
    }

    #[test]
    fn conclude_counts_and_logs_session() {
        let rules = Rules::default();
        let mut st = PetState::default();
        let cost = Cost {
            hunger: 5.0,
            energy: 5.0,
        };
        let reward = Reward {
            affection: 1.0,
            love: 1.0,
            experience: 10,
            coins: 3,
        };
        conclude(&mut st, GameKind::Parity, cost, &reward, Utc::now(), &rules);
        assert_eq!(st.play_count(GameKind::Parity), 1);
        assert_eq!(st.history.play_sessions.len(), 1);
        assert_eq!(st.hunger, 95.0);
        assert_eq!(st.coins, 3);
        assert_eq!(st.experience, 10);
    }
}
