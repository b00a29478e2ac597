use crate::model::{EvolutionForm, PetState, Status, RPS_MEMORY};
use crate::rules::Rules;

fn clamp_pct(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

/// Restores every bound and runs the escape check. Idempotent.
///
/// Returns `true` only on the call that flips the pet from alive to escaped.
pub fn enforce_limits(state: &mut PetState, rules: &Rules) -> bool {
    state.hunger = clamp_pct(state.hunger);
    state.energy = clamp_pct(state.energy);
    state.affection = if state.affection.is_nan() {
        0.0
    } else {
        state.affection.clamp(-100.0, 100.0)
    };

    let p = &mut state.personality;
    p.sleep_deprivation = clamp_pct(p.sleep_deprivation);
    p.stress = clamp_pct(p.stress);
    p.psychological_abuse = clamp_pct(p.psychological_abuse);

    let history = &mut state.ai_memory.rps_history;
    while history.len() > RPS_MEMORY {
        history.pop_front();
    }

    if state.level < rules.evolution_min_level {
        state.evolution_form = EvolutionForm::Basic;
    }

    if state.status == Status::Alive
        && (state.affection < rules.escape_affection_below
            || state.abuse_accumulator > rules.escape_abuse_above)
    {
        state.status = Status::Escaped;
        log::info!(
            "{} escaped (affection {:.1}, abuse {})",
            state.name,
            state.affection,
            state.abuse_accumulator
        );
        return true;
    }
    false
}
