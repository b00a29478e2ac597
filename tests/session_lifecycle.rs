use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use kota::config::{save_settings_atomic, Paths, Settings};
use kota::games::guess::GuessOutcome;
use kota::games::tictactoe::MatchResult;
use kota::games::Input;
use kota::model::{Accessory, FoodKind, Status};
use kota::shop::Item;
use kota::storage::LoadSource;
use kota::{Action, DecayProfile, GameKind, PetEvent, RpsMove, Session};
use std::fs;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap()
}

fn paths_with(dir: &std::path::Path, settings: Settings) -> Paths {
    let paths = Paths::in_dir(dir);
    save_settings_atomic(&paths.settings_path, &settings).unwrap();
    paths
}

fn seeded(seed: u64) -> Settings {
    Settings {
        seed: Some(seed),
        ..Settings::default()
    }
}

#[test]
fn a_day_with_the_pet() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_with(dir.path(), seeded(11));

    let (mut s, report) = Session::open_in(paths.clone(), &t0());
    assert_eq!(report.source, LoadSource::Fresh);
    assert_eq!(s.state().name, "Ente");

    s.act(Action::Rename("Kota".into()), t0()).unwrap();
    for mv in [RpsMove::Rock, RpsMove::Paper, RpsMove::Scissors] {
        s.play_rps(mv, t0()).unwrap();
    }
    s.play_parity(7, t0()).unwrap();
    let ttt = s
        .play_tictactoe((0..9).map(Input::Pick), t0())
        .unwrap();
    assert_ne!(ttt.result, MatchResult::Abandoned);
    let guess = s.play_guess([Input::Pick(50), Input::Quit], t0()).unwrap();
    assert!(matches!(
        guess.outcome,
        GuessOutcome::Solved { attempts: 1 } | GuessOutcome::Abandoned
    ));
    assert_eq!(s.state().total_plays(), 6);
    assert_eq!(s.state().personality.favorite_game, Some(GameKind::Rps));
    s.save(t0()).unwrap();

    let evening = t0() + Duration::hours(8);
    let (s, report) = Session::open_in(paths, &evening);
    assert_eq!(report.source, LoadSource::Restored);
    assert!(report.decay.applied);
    assert_eq!(s.state().name, "Kota");
    assert!(s.state().hunger < 100.0);
    assert_eq!(s.stats(evening).total_plays, 6);
}

#[test]
fn shopping_with_earned_coins() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let (mut s, _) = Session::open_in(paths_with(dir.path(), seeded(3)), &t0());

    assert!(s.purchase(Item::Accessory(Accessory::Hat)).is_err());
    while s.state().coins < 62 {
        s.act(Action::Caress, t0()).unwrap();
    }
    let coins = s.state().coins;
    s.purchase(Item::Accessory(Accessory::Hat)).unwrap();
    s.purchase(Item::Food(FoodKind::Healthy)).unwrap();
    assert_eq!(s.state().coins, coins - 62);

    s.equip(Accessory::Hat).unwrap();
    assert_eq!(s.state().inventory.equipped_accessory, Some(Accessory::Hat));

    s.act(Action::Walk, t0()).unwrap();
    s.act(Action::Feed(FoodKind::Healthy), t0()).unwrap();
    assert_eq!(s.state().inventory.food_count(FoodKind::Healthy), 0);
    assert_eq!(s.state().personality.healthy_food_count, 1);
    assert!(s.act(Action::Feed(FoodKind::Healthy), t0()).is_err());
}

#[test]
fn neglect_ends_in_an_escape_that_survives_reload() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_with(
        dir.path(),
        Settings {
            decay_profile: DecayProfile::Classic,
            ..seeded(5)
        },
    );
    let (mut s, _) = Session::open_in(paths.clone(), &t0());
    s.save(t0()).unwrap();

    // Every visit lands at 03:00 local time with an exhausted pet.
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let mut escaped_after = None;
    for night in 1..=40 {
        let visit = tz
            .with_ymd_and_hms(2024, 3, 2, 3, 0, 0)
            .unwrap()
            + Duration::days(night);
        let (mut s, report) = Session::open_in(paths.clone(), &visit);
        if report.events.contains(&PetEvent::Escaped) {
            escaped_after = Some(night);
            s.save(visit.with_timezone(&Utc)).unwrap();
            break;
        }
        assert!(report.decay.night_penalty);
        s.save(visit.with_timezone(&Utc)).unwrap();
    }

    assert!(escaped_after.is_some());
    let later = t0() + Duration::days(60);
    let (mut s, report) = Session::open_in(paths.clone(), &later);
    assert_eq!(report.source, LoadSource::Restored);
    assert_eq!(s.state().status, Status::Escaped);
    assert!(report.events.contains(&PetEvent::Escaped));
    let err = s.act(Action::Caress, later).unwrap_err();
    assert!(err.is_terminal());

    assert!(s.reset(later).unwrap());
    assert!(!s.is_escaped());
    assert!(!paths.save_path.exists());
}

#[test]
fn corrupt_save_starts_over() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_with(dir.path(), seeded(1));
    fs::write(&paths.save_path, b"\x00\x01 definitely not json").unwrap();

    let (s, report) = Session::open_in(paths, &t0());
    assert!(matches!(report.source, LoadSource::Recovered(_)));
    assert_eq!(s.state().status, Status::Alive);
    assert_eq!(s.state().hunger, 100.0);
}

#[test]
fn saves_from_an_older_build_load_with_defaults() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let paths = paths_with(dir.path(), seeded(1));
    let seen = t0().timestamp();
    fs::write(
        &paths.save_path,
        format!(r#"{{ "name": "Old", "hunger": 80, "lastSeen": {seen}, "mood": "legacy" }}"#),
    )
    .unwrap();

    let (s, report) = Session::open_in(paths, &t0());
    assert_eq!(report.source, LoadSource::Restored);
    assert_eq!(s.state().name, "Old");
    assert_eq!(s.state().hunger, 80.0);
    assert_eq!(s.state().energy, 100.0);
    assert_eq!(s.state().level, 1);
}
