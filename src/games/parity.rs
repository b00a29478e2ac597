//! Even/odd: both sides show a number from 1 to 10. The pet tracks which
//! parity the user leans towards and, once the lean is obvious, plays the
//! other one.

use super::{conclude, ensure_can_play};
use crate::error::PetError;
use crate::model::{GameKind, PetEvent, PetState};
use crate::rules::{Reward, Rules};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

const EVENS: [u32; 5] = [2, 4, 6, 8, 10];
const ODDS: [u32; 5] = [1, 3, 5, 7, 9];

/// Positive bias means the user has been picking even numbers.
pub fn pet_pick<R: Rng + ?Sized>(bias: i32, trigger: i32, rng: &mut R) -> u32 {
    if bias.abs() > trigger {
        let pool = if bias > 0 { &ODDS } else { &EVENS };
        return *pool.choose(rng).unwrap_or(&pool[0]);
    }
    rng.gen_range(1..=10)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParityRound {
    pub user: u32,
    pub pet: u32,
    pub sum: u32,
    pub even: bool,
    pub reward: Reward,
    pub events: Vec<PetEvent>,
}

pub fn play_parity<R: Rng + ?Sized>(
    state: &mut PetState,
    user: u32,
    now: DateTime<Utc>,
    rules: &Rules,
    rng: &mut R,
) -> Result<ParityRound, PetError> {
    ensure_can_play(state, rules)?;
    if !(1..=10).contains(&user) {
        return Err(PetError::InvalidInput(format!("{user} is outside 1..=10")));
    }

    let pet = pet_pick(state.ai_memory.parity_bias, rules.parity_bias_trigger, rng);
    let sum = user + pet;
    let bias = &mut state.ai_memory.parity_bias;
    *bias = if user % 2 == 0 {
        bias.saturating_add(1)
    } else {
        bias.saturating_sub(1)
    };

    let reward = rules.parity;
    let events = conclude(state, GameKind::Parity, rules.parity_cost, &reward, now, rules);
    Ok(ParityRound {
        user,
        pet,
        sum,
        even: sum % 2 == 0,
        reward,
        events,
    })
}
