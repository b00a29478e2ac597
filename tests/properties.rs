use chrono::{DateTime, Duration, TimeZone, Utc};
use kota::games::guess::play_guess;
use kota::games::parity::play_parity;
use kota::games::rps::play_rps;
use kota::games::tictactoe::play_tictactoe;
use kota::games::Input;
use kota::model::{FoodKind, Status};
use kota::personality::recompute_personality;
use kota::shop::{purchase, CATALOG};
use kota::sim::{apply_action, apply_offline_decay};
use kota::{Action, DecayProfile, PetState, RpsMove, Rules};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Debug)]
enum Op {
    Wait(u32),
    Feed(FoodKind),
    Sleep,
    Caress,
    Walk,
    Rps(RpsMove),
    Parity(u32),
    TicTacToe(Vec<u32>),
    Guess(Vec<u32>),
    Buy(usize),
    Grant(u32),
    Hurt(u32),
}

fn food() -> impl Strategy<Value = FoodKind> {
    prop_oneof![
        Just(FoodKind::Standard),
        Just(FoodKind::Junk),
        Just(FoodKind::Healthy),
        Just(FoodKind::Premium),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0_u32..2_000).prop_map(Op::Wait),
        food().prop_map(Op::Feed),
        Just(Op::Sleep),
        Just(Op::Caress),
        Just(Op::Walk),
        (0_usize..3).prop_map(|i| Op::Rps(RpsMove::ALL[i])),
        (0_u32..12).prop_map(Op::Parity),
        prop::collection::vec(0_u32..10, 0..8).prop_map(Op::TicTacToe),
        prop::collection::vec(0_u32..110, 0..12).prop_map(Op::Guess),
        (0_usize..CATALOG.len()).prop_map(Op::Buy),
        (0_u32..5_000).prop_map(Op::Grant),
        (0_u32..4).prop_map(Op::Hurt),
    ]
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 20, 0, 0).unwrap()
}

/// Runs one operation. Errors are part of normal play and are ignored.
fn run(state: &mut PetState, op: &Op, now: &mut DateTime<Utc>, rules: &Rules, rng: &mut StdRng) {
    let t = *now;
    let _ = match op {
        Op::Wait(minutes) => {
            *now += Duration::minutes(i64::from(*minutes));
            apply_offline_decay(state, &*now, rules);
            Ok(())
        }
        Op::Feed(f) => apply_action(state, Action::Feed(*f), t, rules).map(drop),
        Op::Sleep => apply_action(state, Action::ToggleSleep, t, rules).map(drop),
        Op::Caress => apply_action(state, Action::Caress, t, rules).map(drop),
        Op::Walk => apply_action(state, Action::Walk, t, rules).map(drop),
        Op::Rps(mv) => play_rps(state, *mv, t, rules, rng).map(drop),
        Op::Parity(n) => play_parity(state, *n, t, rules, rng).map(drop),
        Op::TicTacToe(cells) => {
            play_tictactoe(state, cells.iter().map(|c| Input::Pick(*c)), t, rules, rng).map(drop)
        }
        Op::Guess(ns) => play_guess(state, ns.iter().map(|n| Input::Pick(*n)), t, rules, rng).map(drop),
        Op::Buy(i) => purchase(state, CATALOG[*i]).map(drop),
        Op::Grant(coins) => {
            if !state.is_escaped() {
                state.coins = state.coins.saturating_add(*coins);
            }
            Ok(())
        }
        // Nights of neglect, compressed: wait into the small hours while exhausted.
        Op::Hurt(n) => {
            for _ in 0..*n {
                if state.is_escaped() {
                    break;
                }
                state.energy = 5.0;
                state.sleeping = false;
                let mut night = now
                    .date_naive()
                    .and_hms_opt(2, 0, 0)
                    .map(|d| d.and_utc())
                    .unwrap_or(*now);
                while night <= *now {
                    night += Duration::days(1);
                }
                *now = night;
                apply_offline_decay(state, &*now, rules);
            }
            Ok(())
        }
    };
}

fn assert_bounded(state: &PetState) -> Result<(), TestCaseError> {
    prop_assert!((0.0..=100.0).contains(&state.hunger), "hunger {}", state.hunger);
    prop_assert!((0.0..=100.0).contains(&state.energy), "energy {}", state.energy);
    prop_assert!((-100.0..=100.0).contains(&state.affection), "affection {}", state.affection);
    let p = &state.personality;
    prop_assert!((0.0..=100.0).contains(&p.sleep_deprivation));
    prop_assert!((0.0..=100.0).contains(&p.stress));
    prop_assert!((0.0..=100.0).contains(&p.psychological_abuse));
    prop_assert!(state.ai_memory.rps_history.len() <= kota::model::RPS_MEMORY);
    prop_assert!(state.level >= 1);
    prop_assert!(state.experience < state.experience_to_next);
    Ok(())
}

proptest! {
    #[test]
    fn bounds_hold_after_every_operation(
        ops in prop::collection::vec(op(), 1..60),
        seed in any::<u64>(),
        classic in any::<bool>(),
    ) {
        let rules = Rules::for_profile(if classic { DecayProfile::Classic } else { DecayProfile::Gentle });
        let mut rng = StdRng::seed_from_u64(seed);
        let mut now = start();
        let mut state = PetState::new("Prop", now);

        for op in &ops {
            run(&mut state, op, &mut now, &rules, &mut rng);
            assert_bounded(&state)?;
        }
    }

    #[test]
    fn escape_is_permanent(
        before in prop::collection::vec(op(), 0..30),
        after in prop::collection::vec(op(), 1..30),
        seed in any::<u64>(),
    ) {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut now = start();
        let mut state = PetState::new("Prop", now);

        for op in &before {
            run(&mut state, op, &mut now, &rules, &mut rng);
        }
        state.affection = -95.0;
        apply_offline_decay(&mut state, &(now + Duration::hours(1)), &rules);
        prop_assert_eq!(state.status, Status::Escaped);

        let frozen = state.clone();
        for op in &after {
            run(&mut state, op, &mut now, &rules, &mut rng);
            prop_assert_eq!(&state, &frozen);
        }
    }

    #[test]
    fn recompute_is_idempotent_anywhere(
        ops in prop::collection::vec(op(), 0..40),
        seed in any::<u64>(),
    ) {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut now = start();
        let mut state = PetState::new("Prop", now);
        for op in &ops {
            run(&mut state, op, &mut now, &rules, &mut rng);
        }
        recompute_personality(&mut state);
        let once = state.clone();
        recompute_personality(&mut state);
        prop_assert_eq!(state, once);
    }

    #[test]
    fn awake_decay_only_goes_down(hours in 1_i64..400, split in 1_i64..400) {
        let rules = Rules::default();
        let t0 = start();
        let mut state = PetState::new("Prop", t0);

        let mid = t0 + Duration::minutes(split.min(hours * 60));
        apply_offline_decay(&mut state, &mid, &rules);
        let (h1, e1) = (state.hunger, state.energy);
        apply_offline_decay(&mut state, &(t0 + Duration::hours(hours)), &rules);

        prop_assert!(h1 <= 100.0 && e1 <= 100.0);
        prop_assert!(state.hunger <= h1);
        prop_assert!(state.energy <= e1);
        if h1 > 0.0 && state.last_seen > mid {
            let gap = (state.last_seen - mid).num_seconds() as f64 / 3600.0;
            if gap >= rules.min_offline_hours {
                prop_assert!(state.hunger < h1);
            }
        }
    }

    #[test]
    fn sleeping_energy_never_drops(hours in 1_i64..400) {
        let rules = Rules::default();
        let t0 = start();
        let mut state = PetState::new("Prop", t0);
        state.energy = 40.0;
        state.sleeping = true;
        apply_offline_decay(&mut state, &(t0 + Duration::hours(hours)), &rules);
        prop_assert!(state.energy >= 40.0);
    }
}
