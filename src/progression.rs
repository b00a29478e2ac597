use crate::model::{EvolutionForm, GameKind, PetEvent, PetState};
use crate::rules::Rules;

/// Adds `amount` experience and carries over as many level-ups as it covers.
/// Evolution is re-classified afterwards.
pub fn grant_experience(state: &mut PetState, amount: u32, rules: &Rules) -> Vec<PetEvent> {
    let mut events = Vec::new();
    if state.is_escaped() {
        return events;
    }

    state.experience = state.experience.saturating_add(amount);
    // A zero threshold from a hand-edited save would never terminate.
    state.experience_to_next = state.experience_to_next.max(1);

    while state.experience >= state.experience_to_next {
        state.experience -= state.experience_to_next;
        state.level += 1;
        state.experience_to_next =
            ((state.experience_to_next as f64 * rules.level_growth) as u32).max(1);
        let bonus = rules.level_coin_bonus.saturating_mul(state.level);
        state.coins = state.coins.saturating_add(bonus);
        log::info!("{} reached level {} (+{} coins)", state.name, state.level, bonus);
        events.push(PetEvent::LevelUp {
            level: state.level,
            coins: bonus,
        });
    }

    events.extend(classify_evolution(state, rules));
    events
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArchetypeScores {
    pub athletic: u32,
    pub intellectual: u32,
    pub premium: u32,
    pub rebellious: u32,
}

impl ArchetypeScores {
    pub fn of(state: &PetState) -> Self {
        let p = &state.personality;
        let mind_games = state.play_count(GameKind::TicTacToe) + state.play_count(GameKind::Guess);
        let points = |cond: bool, pts: u32| if cond { pts } else { 0 };

        Self {
            athletic: points(state.walk_count() > 10, 30)
                + points(p.healthy_food_count > 15, 25)
                + points(state.energy > 70.0, 15),
            intellectual: points(mind_games > 15, 40)
                + points(p.junk_food_count < 5, 20)
                + points(state.affection > 60.0, 15),
            premium: points(p.premium_food_count > 10, 40)
                + points(state.affection > 80.0, 25)
                + points(state.inventory.equipped_accessory.is_some(), 20),
            rebellious: points(p.junk_food_count > 20, 35)
                + points(p.sleep_deprivation > 40.0, 25)
                + points(state.affection < 20.0, 30),
        }
    }

    /// Highest-scoring archetype; ties resolve in declaration order.
    pub fn best(&self) -> (EvolutionForm, u32) {
        let ranked = [
            (EvolutionForm::Athletic, self.athletic),
            (EvolutionForm::Intellectual, self.intellectual),
            (EvolutionForm::Premium, self.premium),
            (EvolutionForm::Rebellious, self.rebellious),
        ];
        let mut best = ranked[0];
        for entry in &ranked[1..] {
            if entry.1 > best.1 {
                best = *entry;
            }
        }
        best
    }
}

pub fn target_form(state: &PetState, rules: &Rules) -> EvolutionForm {
    if state.level < rules.evolution_min_level {
        return EvolutionForm::Basic;
    }
    let (form, score) = ArchetypeScores::of(state).best();
    if score > rules.evolution_threshold {
        form
    } else {
        EvolutionForm::Basic
    }
}

/// Writes the current form. Returns the change event when the form moved.
pub fn classify_evolution(state: &mut PetState, rules: &Rules) -> Option<PetEvent> {
    if state.is_escaped() {
        return None;
    }
    let to = target_form(state, rules);
    let from = state.evolution_form;
    if to == from {
        return None;
    }
    state.evolution_form = to;
    log::info!("{} evolved: {:?} -> {:?}", state.name, from, to);
    Some(PetEvent::Evolved { from, to })
}
