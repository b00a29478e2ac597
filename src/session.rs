//! One run of the pet: load the record, catch up on the time it was away,
//! take actions, save.

use crate::config::{load_settings, project_paths, Paths, Settings};
use crate::error::PetError;
use crate::games::guess::{play_guess, GuessGame};
use crate::games::parity::{play_parity, ParityRound};
use crate::games::rps::{play_rps, RpsRound};
use crate::games::tictactoe::{play_tictactoe, TicTacToeGame};
use crate::games::Input;
use crate::model::{Accessory, EvolutionForm, GameKind, PetEvent, PetState, RpsMove};
use crate::personality::{expression, shape, Expression, Shape};
use crate::rules::Rules;
use crate::shop::{self, Item, Receipt};
use crate::sim::{apply_action, apply_offline_decay, project_vitals, Action, ActionReport, DecayReport, Vitals};
use crate::storage::{self, LoadSource};
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct OpenReport {
    pub source: LoadSource,
    pub decay: DecayReport,
    pub events: Vec<PetEvent>,
}

pub struct Session {
    settings: Settings,
    rules: Rules,
    paths: Paths,
    state: PetState,
    rng: StdRng,
}

impl Session {
    /// Opens the pet in the per-user data directory, decayed to the local now.
    pub fn open() -> Result<(Self, OpenReport)> {
        let paths = project_paths()?;
        Ok(Self::open_in(paths, &Local::now()))
    }

    pub fn open_in<Tz: TimeZone>(paths: Paths, now: &DateTime<Tz>) -> (Self, OpenReport) {
        let settings = load_settings(&paths.settings_path);
        let rules = settings.rules();
        let loaded = storage::load_or_init(
            &paths.save_path,
            &settings.pet_name,
            now.with_timezone(&Utc),
        );
        let mut state = loaded.state;

        let decay = apply_offline_decay(&mut state, now, &rules);
        let mut events = Vec::new();
        if decay.night_penalty {
            events.push(PetEvent::NocturnalNeglect);
        }
        // Also reported for a pet that ran away before this session.
        if decay.escaped || state.is_escaped() {
            events.push(PetEvent::Escaped);
        }

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        log::info!(
            "opened {} ({:?}, {:.1}h away)",
            state.name,
            loaded.source,
            decay.hours
        );

        let session = Self {
            settings,
            rules,
            paths,
            state,
            rng,
        };
        let report = OpenReport {
            source: loaded.source,
            decay,
            events,
        };
        (session, report)
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_escaped(&self) -> bool {
        self.state.is_escaped()
    }

    pub fn expression(&self) -> Expression {
        expression(&self.state)
    }

    pub fn shape(&self) -> Shape {
        shape(&self.state)
    }

    pub fn vitals<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vitals {
        project_vitals(&self.state, now, &self.rules)
    }

    pub fn act(&mut self, action: Action, now: DateTime<Utc>) -> Result<ActionReport, PetError> {
        apply_action(&mut self.state, action, now, &self.rules)
    }

    pub fn play_rps(&mut self, user: RpsMove, now: DateTime<Utc>) -> Result<RpsRound, PetError> {
        play_rps(&mut self.state, user, now, &self.rules, &mut self.rng)
    }

    pub fn play_parity(&mut self, user: u32, now: DateTime<Utc>) -> Result<ParityRound, PetError> {
        play_parity(&mut self.state, user, now, &self.rules, &mut self.rng)
    }

    pub fn play_tictactoe<I>(&mut self, moves: I, now: DateTime<Utc>) -> Result<TicTacToeGame, PetError>
    where
        I: IntoIterator<Item = Input<u32>>,
    {
        play_tictactoe(&mut self.state, moves, now, &self.rules, &mut self.rng)
    }

    pub fn play_guess<I>(&mut self, guesses: I, now: DateTime<Utc>) -> Result<GuessGame, PetError>
    where
        I: IntoIterator<Item = Input<u32>>,
    {
        play_guess(&mut self.state, guesses, now, &self.rules, &mut self.rng)
    }

    pub fn purchase(&mut self, item: Item) -> Result<Receipt, PetError> {
        shop::purchase(&mut self.state, item)
    }

    pub fn equip(&mut self, accessory: Accessory) -> Result<Vec<PetEvent>, PetError> {
        shop::equip(&mut self.state, accessory, &self.rules)
    }

    pub fn unequip(&mut self) -> Result<Vec<PetEvent>, PetError> {
        shop::unequip(&mut self.state, &self.rules)
    }

    /// Stamps `now` as the last time the pet was seen and writes the record.
    pub fn save(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.state.last_seen = now;
        storage::save_atomic(&self.paths.save_path, &self.state)?;
        log::info!("saved {} to {}", self.state.name, self.paths.save_path.display());
        Ok(())
    }

    /// Deletes the save and hatches a new pet. The only way out of an escape.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<bool> {
        let existed = storage::reset(&self.paths.save_path)?;
        self.state = PetState::new(&self.settings.pet_name, now);
        log::info!("reset, new pet {}", self.state.name);
        Ok(existed)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Stats {
        Stats::of(&self.state, now)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub name: String,
    pub level: u32,
    pub form: EvolutionForm,
    pub coins: u32,
    pub plays: BTreeMap<GameKind, u32>,
    pub total_plays: u32,
    pub favorite_game: Option<GameKind>,
    pub feedings: usize,
    pub play_sessions: usize,
    pub walks: usize,
    pub sleep_cycles: usize,
    pub love_received: f64,
    pub stress: f64,
    pub psychological_abuse: f64,
    pub abuse_accumulator: u32,
    /// Hours since the first meal, if it has ever eaten.
    pub age_hours: Option<f64>,
}

impl Stats {
    pub fn of(state: &PetState, now: DateTime<Utc>) -> Self {
        let h = &state.history;
        let p = &state.personality;
        let age_hours = h
            .feedings
            .iter()
            .map(|f| f.at)
            .min()
            .map(|first| (now - first).num_seconds().max(0) as f64 / 3600.0);

        Self {
            name: state.name.clone(),
            level: state.level,
            form: state.evolution_form,
            coins: state.coins,
            plays: state.game_stats.clone(),
            total_plays: state.total_plays(),
            favorite_game: p.favorite_game,
            feedings: h.feedings.len(),
            play_sessions: h.play_sessions.len(),
            walks: h.walks.len(),
            sleep_cycles: h.sleep_cycles.len(),
            love_received: p.love_received,
            stress: p.stress,
            psychological_abuse: p.psychological_abuse,
            abuse_accumulator: state.abuse_accumulator,
            age_hours,
        }
    }
}
