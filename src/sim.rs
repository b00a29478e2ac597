use crate::error::{PetError, Refusal};
use crate::limits::enforce_limits;
use crate::model::{Feeding, FoodKind, PetEvent, PetState, SleepCycle, Status, Walk};
use crate::personality::{recompute_personality, stress_of};
use crate::progression::grant_experience;
use crate::rules::{Reward, Rules};
use chrono::{DateTime, TimeZone, Timelike, Utc};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Feed(FoodKind),
    ToggleSleep,
    Caress,
    Walk,
    Rename(String),
    Freeze,
    Thaw,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionReport {
    pub events: Vec<PetEvent>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecayReport {
    pub hours: f64,
    pub applied: bool,
    pub night_penalty: bool,
    pub escaped: bool,
}

/// Hours between `last_seen` and `now`. Negative when the clock went backwards.
pub fn elapsed_hours<Tz: TimeZone>(state: &PetState, now: &DateTime<Tz>) -> f64 {
    let secs = now.timestamp() - state.last_seen.timestamp();
    secs as f64 / 3600.0
}

/// Brings the record up to `now` in a single linear step.
///
/// The local hour of `now` (in its own time zone) decides whether the
/// nocturnal neglect penalty applies.
pub fn apply_offline_decay<Tz: TimeZone>(
    state: &mut PetState,
    now: &DateTime<Tz>,
    rules: &Rules,
) -> DecayReport {
    let mut report = DecayReport::default();
    if state.is_escaped() {
        return report;
    }

    let now_utc = now.with_timezone(&Utc);
    if state.frozen {
        state.last_seen = now_utc;
        return report;
    }

    let hours = elapsed_hours(state, now);
    report.hours = hours;
    if hours < rules.min_offline_hours {
        return report;
    }

    let rates = if state.sleeping {
        rules.asleep
    } else {
        rules.awake
    };
    state.hunger += rates.hunger * hours;
    state.energy += rates.energy * hours;
    state.personality.sleep_deprivation += rates.sleep_deprivation * hours;
    report.applied = true;

    let night = &rules.night;
    let hour = now.hour();
    if !state.sleeping
        && (night.first_hour..=night.last_hour).contains(&hour)
        && state.energy < night.energy_below
    {
        state.affection += night.affection;
        state.abuse_accumulator = state.abuse_accumulator.saturating_add(night.abuse);
        state.personality.psychological_abuse += night.psychological_abuse;
        report.night_penalty = true;
        log::warn!(
            "{} was left awake and exhausted at {:02}:00",
            state.name,
            hour
        );
    }

    state.last_seen = now_utc;
    report.escaped = enforce_limits(state, rules);
    if state.hunger < 20.0 {
        state.personality.critical_hunger_count += 1;
    }
    recompute_personality(state);

    log::debug!(
        "decayed {:.2}h (sleeping={}): hunger {:.1}, energy {:.1}",
        hours,
        state.sleeping,
        state.hunger,
        state.energy
    );
    report
}

/// What a status line would show at `now`, without touching the record.
#[derive(Clone, Debug, PartialEq)]
pub struct Vitals {
    pub name: String,
    pub status: Status,
    pub sleeping: bool,
    pub frozen: bool,
    pub hunger: f64,
    pub energy: f64,
    pub stress: f64,
    /// Affection rescaled to 0..=100.
    pub affection_pct: f64,
}

pub fn project_vitals<Tz: TimeZone>(state: &PetState, now: &DateTime<Tz>, rules: &Rules) -> Vitals {
    let mut hunger = state.hunger;
    let mut energy = state.energy;
    let mut sleep_debt = state.personality.sleep_deprivation;

    let hours = elapsed_hours(state, now);
    if !state.frozen && !state.is_escaped() && hours >= rules.min_offline_hours {
        let rates = if state.sleeping {
            rules.asleep
        } else {
            rules.awake
        };
        hunger += rates.hunger * hours;
        energy += rates.energy * hours;
        sleep_debt += rates.sleep_deprivation * hours;
    }
    let hunger = hunger.clamp(0.0, 100.0);
    let energy = energy.clamp(0.0, 100.0);
    let stress = stress_of(
        hunger,
        energy,
        state.affection,
        sleep_debt.clamp(0.0, 100.0),
        state.personality.psychological_abuse,
    );

    Vitals {
        name: state.name.clone(),
        status: state.status,
        sleeping: state.sleeping,
        frozen: state.frozen,
        hunger,
        energy,
        stress,
        affection_pct: (state.affection + 100.0) / 2.0,
    }
}

/// Clamp, escape check, personality and experience after a mutation.
pub(crate) fn settle(state: &mut PetState, experience: u32, rules: &Rules) -> Vec<PetEvent> {
    let mut events = Vec::new();
    if enforce_limits(state, rules) {
        events.push(PetEvent::Escaped);
        recompute_personality(state);
        return events;
    }
    recompute_personality(state);
    events.extend(grant_experience(state, experience, rules));
    enforce_limits(state, rules);
    events
}

pub(crate) fn apply_reward(state: &mut PetState, reward: &Reward) {
    state.affection += reward.affection;
    state.personality.love_received += reward.love;
    state.coins = state.coins.saturating_add(reward.coins);
}

pub fn apply_action(
    state: &mut PetState,
    action: Action,
    now: DateTime<Utc>,
    rules: &Rules,
) -> Result<ActionReport, PetError> {
    state.ensure_alive()?;
    if state.frozen && !matches!(action, Action::Thaw | Action::Freeze | Action::Rename(_)) {
        return Err(PetError::Refused(Refusal::Frozen));
    }

    let mut events = Vec::new();
    let experience = match action {
        Action::Feed(food) => feed(state, food, now, rules, &mut events)?,
        Action::ToggleSleep => toggle_sleep(state, now, rules, &mut events)?,
        Action::Caress => caress(state, rules, &mut events)?,
        Action::Walk => walk(state, now, rules, &mut events)?,
        Action::Rename(name) => {
            let trimmed = name.trim();
            if trimmed.is_empty() || trimmed.chars().count() > rules.name_max_len {
                return Err(PetError::InvalidInput(format!(
                    "name must be 1 to {} characters",
                    rules.name_max_len
                )));
            }
            let from = std::mem::replace(&mut state.name, trimmed.to_string());
            events.push(PetEvent::Renamed {
                from,
                to: state.name.clone(),
            });
            0
        }
        Action::Freeze => {
            if !state.frozen {
                state.frozen = true;
                state.last_seen = now;
                events.push(PetEvent::Froze);
            }
            0
        }
        Action::Thaw => {
            if state.frozen {
                state.frozen = false;
                state.last_seen = now;
                events.push(PetEvent::Thawed);
            }
            0
        }
    };

    events.extend(settle(state, experience, rules));
    Ok(ActionReport { events })
}

fn feed(
    state: &mut PetState,
    food: FoodKind,
    now: DateTime<Utc>,
    rules: &Rules,
    events: &mut Vec<PetEvent>,
) -> Result<u32, PetError> {
    if state.sleeping {
        return Err(PetError::Refused(Refusal::Asleep));
    }
    if food != FoodKind::Standard && state.inventory.food_count(food) == 0 {
        return Err(PetError::Refused(Refusal::NotOwned));
    }

    if state.hunger > rules.overfed_above {
        let p = &mut state.personality;
        p.overfeeding_count += 1;
        let annoyed = p.overfeeding_count > rules.overfeed_tolerance;
        if annoyed {
            state.affection += rules.overfeed_affection;
        }
        events.push(PetEvent::Overfed { annoyed });
        return Ok(0);
    }

    if food != FoodKind::Standard {
        state.inventory.take_food(food);
    }
    let effect = rules.food(food);
    let gained = if food == FoodKind::Standard && state.hunger < rules.standard_food_hungry_below {
        rules.standard_food_hungry
    } else {
        effect.hunger
    };
    state.hunger += gained;
    state.affection += effect.affection;
    state.personality.love_received += effect.love;
    match food {
        FoodKind::Standard => {}
        FoodKind::Junk => state.personality.junk_food_count += 1,
        FoodKind::Healthy => state.personality.healthy_food_count += 1,
        FoodKind::Premium => state.personality.premium_food_count += 1,
    }
    state.history.feedings.push(Feeding { at: now, food });
    events.push(PetEvent::Fed { food, gained });
    Ok(effect.experience)
}

fn toggle_sleep(
    state: &mut PetState,
    now: DateTime<Utc>,
    rules: &Rules,
    events: &mut Vec<PetEvent>,
) -> Result<u32, PetError> {
    if !state.sleeping {
        if state.energy > rules.sleep_max_energy {
            return Err(PetError::Refused(Refusal::TooEnergeticToSleep));
        }
        state.sleeping = true;
        state.history.sleep_cycles.push(SleepCycle {
            started: now,
            energy_at_start: state.energy,
        });
        events.push(PetEvent::FellAsleep);
        return Ok(0);
    }

    let too_early = state
        .history
        .sleep_cycles
        .last()
        .map(|cycle| ((now - cycle.started).num_seconds() as f64 / 3600.0) < rules.min_sleep_hours)
        .unwrap_or(false);
    if too_early {
        state.affection += rules.early_wake_affection;
        state.personality.psychological_abuse += rules.early_wake_psychological_abuse;
    }
    state.sleeping = false;
    events.push(PetEvent::WokeUp { too_early });
    Ok(0)
}

fn caress(state: &mut PetState, rules: &Rules, events: &mut Vec<PetEvent>) -> Result<u32, PetError> {
    if state.sleeping {
        return Err(PetError::Refused(Refusal::Asleep));
    }
    let welcomed = if state.affection < -20.0 {
        state.affection += 0.5;
        false
    } else if state.affection < 20.0 {
        state.affection += 2.0;
        true
    } else {
        state.affection += 4.0;
        state.personality.love_received += 1.0;
        true
    };
    events.push(PetEvent::Caressed { welcomed });
    Ok(rules.caress_experience)
}

fn walk(
    state: &mut PetState,
    now: DateTime<Utc>,
    rules: &Rules,
    events: &mut Vec<PetEvent>,
) -> Result<u32, PetError> {
    if state.sleeping {
        return Err(PetError::Refused(Refusal::Asleep));
    }
    if state.energy < rules.walk_min_energy {
        return Err(PetError::Refused(Refusal::TooTired));
    }
    if state.hunger < rules.walk_min_hunger {
        return Err(PetError::Refused(Refusal::TooHungry));
    }
    state.energy -= rules.walk_cost.energy;
    state.hunger -= rules.walk_cost.hunger;
    apply_reward(state, &rules.walk_reward);
    state.history.walks.push(Walk { at: now });
    events.push(PetEvent::Walked);
    Ok(rules.walk_reward.experience)
}
