//! Guess-the-number: the pet hides a number from 1 to 100 and answers
//! higher or lower until the user finds it or gives up.

use super::{conclude, ensure_can_play, Input};
use crate::error::PetError;
use crate::model::{GameKind, PetEvent, PetState};
use crate::rules::{Reward, Rules};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::cmp::Ordering;

pub const LOWEST: u32 = 1;
pub const HIGHEST: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Higher,
    Lower,
    Correct,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Solved { attempts: u32 },
    OutOfAttempts,
    Abandoned,
}

/// One round of "guess my number", fed one guess at a time.
#[derive(Clone, Debug)]
pub struct GuessSession {
    secret: u32,
    attempts: u32,
    max_attempts: u32,
    outcome: Option<GuessOutcome>,
}

impl GuessSession {
    pub fn new<R: Rng + ?Sized>(max_attempts: u32, rng: &mut R) -> Self {
        Self::with_secret(rng.gen_range(LOWEST..=HIGHEST), max_attempts)
    }

    pub fn with_secret(secret: u32, max_attempts: u32) -> Self {
        Self {
            secret: secret.clamp(LOWEST, HIGHEST),
            attempts: 0,
            max_attempts: max_attempts.max(1),
            outcome: None,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn remaining(&self) -> u32 {
        self.max_attempts - self.attempts
    }

    pub fn outcome(&self) -> Option<GuessOutcome> {
        self.outcome
    }

    /// Only meaningful once the round is over.
    pub fn reveal(&self) -> Option<u32> {
        self.outcome.map(|_| self.secret)
    }

    pub fn quit(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(GuessOutcome::Abandoned);
        }
    }

    /// Out-of-range guesses are rejected and do not use up an attempt.
    pub fn guess(&mut self, n: u32) -> Result<Feedback, PetError> {
        if self.outcome.is_some() {
            return Err(PetError::InvalidInput("the round is over".into()));
        }
        if !(LOWEST..=HIGHEST).contains(&n) {
            return Err(PetError::InvalidInput(format!(
                "{n} is outside {LOWEST}..={HIGHEST}"
            )));
        }

        self.attempts += 1;
        let feedback = match n.cmp(&self.secret) {
            Ordering::Equal => Feedback::Correct,
            Ordering::Less => Feedback::Higher,
            Ordering::Greater => Feedback::Lower,
        };
        if feedback == Feedback::Correct {
            self.outcome = Some(GuessOutcome::Solved {
                attempts: self.attempts,
            });
        } else if self.attempts >= self.max_attempts {
            self.outcome = Some(GuessOutcome::OutOfAttempts);
        }
        Ok(feedback)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GuessGame {
    pub secret: u32,
    pub feedback: Vec<(u32, Feedback)>,
    pub rejected: usize,
    pub outcome: GuessOutcome,
    pub reward: Reward,
    pub events: Vec<PetEvent>,
}

pub fn guess_reward(outcome: GuessOutcome, rules: &Rules) -> Reward {
    match outcome {
        GuessOutcome::Solved { attempts } => rules.guess.solved_reward(attempts),
        GuessOutcome::OutOfAttempts => rules.guess.failed,
        GuessOutcome::Abandoned => Reward::NONE,
    }
}

/// Settles a round; an unfinished session counts as abandoned.
pub fn finish_guess(
    state: &mut PetState,
    session: &GuessSession,
    now: DateTime<Utc>,
    rules: &Rules,
) -> Result<(GuessOutcome, Reward, Vec<PetEvent>), PetError> {
    ensure_can_play(state, rules)?;
    let outcome = session.outcome().unwrap_or(GuessOutcome::Abandoned);
    let reward = guess_reward(outcome, rules);
    let events = conclude(state, GameKind::Guess, rules.guess_cost, &reward, now, rules);
    Ok((outcome, reward, events))
}

pub fn play_guess<I, R>(
    state: &mut PetState,
    guesses: I,
    now: DateTime<Utc>,
    rules: &Rules,
    rng: &mut R,
) -> Result<GuessGame, PetError>
where
    I: IntoIterator<Item = Input<u32>>,
    R: Rng + ?Sized,
{
    ensure_can_play(state, rules)?;
    let mut session = GuessSession::new(rules.guess.max_attempts, rng);
    let mut feedback = Vec::new();
    let mut rejected = 0;

    for input in guesses {
        let n = match input {
            Input::Quit => break,
            Input::Pick(n) => n,
        };
        match session.guess(n) {
            Ok(f) => feedback.push((n, f)),
            Err(e) => {
                log::debug!("guess: {e}");
                rejected += 1;
            }
        }
        if session.outcome().is_some() {
            break;
        }
    }
    session.quit();

    let (outcome, reward, events) = finish_guess(state, &session, now, rules)?;
    Ok(GuessGame {
        secret: session.secret,
        feedback,
        rejected,
        outcome,
        reward,
        events,
    })
}
