//! Rock-paper-scissors against an opponent that studies the user's habits.

use super::{conclude, ensure_can_play};
use crate::error::PetError;
use crate::model::{GameKind, PetEvent, PetState, RpsMove};
use crate::rules::{Reward, Rules};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    UserWins,
    PetWins,
    Tie,
}

pub fn resolve(user: RpsMove, pet: RpsMove) -> RoundOutcome {
    if user == pet {
        RoundOutcome::Tie
    } else if user.beats(pet) {
        RoundOutcome::UserWins
    } else {
        RoundOutcome::PetWins
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Basis {
    /// Fewer than three remembered moves.
    Random,
    /// An earlier occurrence of the last three moves, and what followed it.
    Pattern { offset: usize, followed_by: RpsMove },
    /// The user's most frequent move.
    Frequency(RpsMove),
}

/// Picks the pet's move from the user's move history (oldest first).
pub fn predict<R: Rng + ?Sized>(history: &VecDeque<RpsMove>, rng: &mut R) -> (RpsMove, Basis) {
    if history.len() < 3 {
        let mv = *RpsMove::ALL.choose(rng).unwrap_or(&RpsMove::Rock);
        return (mv, Basis::Random);
    }

    let moves: Vec<RpsMove> = history.iter().copied().collect();
    let last3 = &moves[moves.len() - 3..];
    if let Some((offset, window)) = moves
        .windows(4)
        .enumerate()
        .find(|(_, w)| &w[..3] == last3)
    {
        let followed_by = window[3];
        return (
            followed_by.counter(),
            Basis::Pattern {
                offset,
                followed_by,
            },
        );
    }

    let favourite = most_frequent(&moves);
    (favourite.counter(), Basis::Frequency(favourite))
}

/// Ties resolve in rock, paper, scissors order.
fn most_frequent(moves: &[RpsMove]) -> RpsMove {
    let mut best = (RpsMove::Rock, 0usize);
    for mv in RpsMove::ALL {
        let n = moves.iter().filter(|m| **m == mv).count();
        if n > best.1 {
            best = (mv, n);
        }
    }
    best.0
}

#[derive(Clone, Debug, PartialEq)]
pub struct RpsRound {
    pub user: RpsMove,
    pub pet: RpsMove,
    pub basis: Basis,
    pub outcome: RoundOutcome,
    pub reward: Reward,
    pub events: Vec<PetEvent>,
}

pub fn play_rps<R: Rng + ?Sized>(
    state: &mut PetState,
    user: RpsMove,
    now: DateTime<Utc>,
    rules: &Rules,
    rng: &mut R,
) -> Result<RpsRound, PetError> {
    ensure_can_play(state, rules)?;

    let (pet, basis) = predict(&state.ai_memory.rps_history, rng);
    let outcome = resolve(user, pet);
    let reward = match outcome {
        RoundOutcome::Tie => rules.rps.draw,
        RoundOutcome::UserWins => rules.rps.user_win,
        RoundOutcome::PetWins => rules.rps.pet_win,
    };
    log::debug!("rps: user {user}, pet {pet} ({basis:?}) -> {outcome:?}");

    state.ai_memory.remember_rps(user);
    let events = conclude(state, GameKind::Rps, rules.rps_cost, &reward, now, rules);

    Ok(RpsRound {
        user,
        pet,
        basis,
        outcome,
        reward,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::model::RpsMove::*;

    fn hist(moves: &[RpsMove]) -> VecDeque<RpsMove> {
        moves.iter().copied().collect()
    }

    #[test]
    fn repeated_trigram_predicts_what_followed() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mv, basis) = predict(&hist(&[Rock, Paper, Scissors, Rock, Paper, Scissors]), &mut rng);
        assert_eq!(
            basis,
            Basis::Pattern {
                offset: 0,
                followed_by: Rock
            }
        );
        assert_eq!(mv, Paper);
    }

    #[test]
    fn earliest_match_wins() {
        let mut rng = StdRng::seed_from_u64(1);
        let h = hist(&[
            Rock, Rock, Paper, Scissors, Rock, Rock, Paper, Paper, Rock, Rock, Paper,
        ]);
        let (mv, basis) = predict(&h, &mut rng);
        assert_eq!(
            basis,
            Basis::Pattern {
                offset: 0,
                followed_by: Scissors
            }
        );
        assert_eq!(mv, Rock);
    }

    #[test]
    fn falls_back_to_most_frequent() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mv, basis) = predict(&hist(&[Scissors, Scissors, Rock, Paper]), &mut rng);
        assert_eq!(basis, Basis::Frequency(Scissors));
        assert_eq!(mv, Rock);
    }

    #[test]
    fn frequency_tie_prefers_rock_then_paper() {
        let mut rng = StdRng::seed_from_u64(1);
        let (_, basis) = predict(&hist(&[Scissors, Paper, Rock]), &mut rng);
        assert_eq!(basis, Basis::Frequency(Rock));
    }

    #[test]
    fn short_history_is_random() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let (mv, basis) = predict(&hist(&[Rock, Rock]), &mut rng);
            assert_eq!(basis, Basis::Random);
            seen.insert(mv);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn resolution_table() {
        assert_eq!(resolve(Rock, Scissors), RoundOutcome::UserWins);
        assert_eq!(resolve(Rock, Paper), RoundOutcome::PetWins);
        assert_eq!(resolve(Paper, Paper), RoundOutcome::Tie);
    }

    #[test]
    fn round_updates_memory_costs_and_rewards() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut st = PetState::default();
        for _ in 0..3 {
            st.ai_memory.remember_rps(Rock);
        }
        // Frequency fallback: user loves rock, pet throws paper.
        let round = play_rps(&mut st, Scissors, Utc::now(), &rules, &mut rng).unwrap();
        assert_eq!(round.pet, Paper);
        assert_eq!(round.outcome, RoundOutcome::UserWins);
        assert_eq!(st.affection, 56.0);
        assert_eq!(st.coins, 8);
        assert_eq!(st.hunger, 96.0);
        assert_eq!(st.energy, 94.0);
        assert_eq!(st.ai_memory.rps_history.back(), Some(&Scissors));
        assert_eq!(st.play_count(GameKind::Rps), 1);
    }

    #[test]
    fn memory_stays_bounded_over_many_rounds() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut st = PetState::default();
        for i in 0..40 {
            st.energy = 100.0;
            st.hunger = 100.0;
            play_rps(&mut st, RpsMove::ALL[i % 3], Utc::now(), &rules, &mut rng).unwrap();
        }
        assert_eq!(st.ai_memory.rps_history.len(), crate::model::RPS_MEMORY);
    }

    #[test]
    fn tired_pet_refuses_without_changes() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut st = PetState::default();
        st.energy = 5.0;
        let before = st.clone();
        assert!(play_rps(&mut st, Rock, Utc::now(), &rules, &mut rng).is_err());
        assert_eq!(st, before);
    }
}
