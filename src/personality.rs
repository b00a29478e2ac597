//! Derived personality: stress, favourite game, facial expression and body
//! shape. Everything here is a pure function of the stored attributes.

use crate::model::{GameKind, PetState};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Frozen,
    Asleep,
    Stressed,
    Tired,
    Hungry,
    Happy,
    Content,
    Neutral,
    Sad,
    Angry,
}

pub struct ExpressionRule {
    pub expression: Expression,
    pub applies: fn(&PetState) -> bool,
}

/// Checked top to bottom, first match wins. The last rule always matches.
pub const EXPRESSION_RULES: [ExpressionRule; 10] = [
    ExpressionRule {
        expression: Expression::Frozen,
        applies: |s| s.frozen,
    },
    ExpressionRule {
        expression: Expression::Asleep,
        applies: |s| s.sleeping,
    },
    ExpressionRule {
        expression: Expression::Stressed,
        applies: |s| s.personality.stress > 70.0,
    },
    ExpressionRule {
        expression: Expression::Tired,
        applies: |s| s.energy < 20.0,
    },
    ExpressionRule {
        expression: Expression::Hungry,
        applies: |s| s.hunger < 20.0,
    },
    ExpressionRule {
        expression: Expression::Happy,
        applies: |s| s.affection > 70.0,
    },
    ExpressionRule {
        expression: Expression::Content,
        applies: |s| s.affection > 30.0,
    },
    ExpressionRule {
        expression: Expression::Neutral,
        applies: |s| s.affection > -20.0,
    },
    ExpressionRule {
        expression: Expression::Sad,
        applies: |s| s.affection > -50.0,
    },
    ExpressionRule {
        expression: Expression::Angry,
        applies: |_| true,
    },
];

pub fn expression(state: &PetState) -> Expression {
    EXPRESSION_RULES
        .iter()
        .find(|rule| (rule.applies)(state))
        .map(|rule| rule.expression)
        .unwrap_or(Expression::Angry)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Triangle,
    Square,
    Pentagon,
    Hexagon,
}

/// Body shape follows the favourite game unless affection is extreme.
pub fn shape(state: &PetState) -> Shape {
    if state.affection > 70.0 {
        return Shape::Circle;
    }
    if state.affection < -30.0 {
        return Shape::Triangle;
    }
    match state.personality.favorite_game {
        Some(GameKind::Rps) => Shape::Triangle,
        Some(GameKind::TicTacToe) => Shape::Square,
        Some(GameKind::Parity) => Shape::Pentagon,
        Some(GameKind::Guess) => Shape::Hexagon,
        None => Shape::Circle,
    }
}

/// Stress from the current vitals; capped at 100.
pub fn stress_of(hunger: f64, energy: f64, affection: f64, sleep_debt: f64, abuse: f64) -> f64 {
    let mut stress = 0.0;
    if hunger < 30.0 {
        stress += 30.0;
    }
    if energy < 30.0 {
        stress += 20.0;
    }
    if affection < 0.0 {
        stress += 30.0;
    }
    stress += sleep_debt;
    stress += abuse * 5.0;
    stress.min(100.0)
}

/// Most played game once more than five games were played. Ties go to the
/// kind declared first in [`GameKind::ALL`].
pub fn favorite_game(state: &PetState) -> Option<GameKind> {
    if state.total_plays() <= 5 {
        return state.personality.favorite_game;
    }
    let mut best: Option<(GameKind, u32)> = None;
    for game in GameKind::ALL {
        let n = state.play_count(game);
        match best {
            Some((_, top)) if n <= top => {}
            _ => best = Some((game, n)),
        }
    }
    best.map(|(game, _)| game)
}

pub fn recompute_personality(state: &mut PetState) {
    let p = &state.personality;
    let stress = stress_of(
        state.hunger,
        state.energy,
        state.affection,
        p.sleep_deprivation,
        p.psychological_abuse,
    );
    let favorite = favorite_game(state);

    let p = &mut state.personality;
    p.stress = stress.max(0.0);
    p.favorite_game = favorite;
}
