use crate::error::PetError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

pub const SAVE_VERSION: u32 = 1;
pub const RPS_MEMORY: usize = 30;
pub const DEFAULT_NAME: &str = "Ente";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Rps,
    TicTacToe,
    Parity,
    Guess,
}

impl GameKind {
    /// Declaration order, also the tie-break order for the favourite game.
    pub const ALL: [GameKind; 4] = [
        GameKind::Rps,
        GameKind::TicTacToe,
        GameKind::Parity,
        GameKind::Guess,
    ];
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Alive,
    Escaped,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EvolutionForm {
    #[default]
    Basic,
    Athletic,
    Intellectual,
    Premium,
    Rebellious,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    #[default]
    Standard,
    Junk,
    Healthy,
    Premium,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Accessory {
    Bow,
    Hat,
    Scarf,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RpsMove {
    #[serde(rename = "R")]
    Rock,
    #[serde(rename = "P")]
    Paper,
    #[serde(rename = "S")]
    Scissors,
}

impl RpsMove {
    pub const ALL: [RpsMove; 3] = [RpsMove::Rock, RpsMove::Paper, RpsMove::Scissors];

    /// The move that beats `self`.
    pub fn counter(self) -> RpsMove {
        match self {
            RpsMove::Rock => RpsMove::Paper,
            RpsMove::Paper => RpsMove::Scissors,
            RpsMove::Scissors => RpsMove::Rock,
        }
    }

    pub fn beats(self, other: RpsMove) -> bool {
        other.counter() == self
    }
}

impl FromStr for RpsMove {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "rock" => Ok(RpsMove::Rock),
            "p" | "paper" => Ok(RpsMove::Paper),
            "s" | "scissors" => Ok(RpsMove::Scissors),
            other => Err(PetError::InvalidInput(format!(
                "'{other}' is not rock, paper or scissors"
            ))),
        }
    }
}

impl fmt::Display for RpsMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RpsMove::Rock => "rock",
            RpsMove::Paper => "paper",
            RpsMove::Scissors => "scissors",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Personality {
    pub sleep_deprivation: f64,
    pub stress: f64,
    pub psychological_abuse: f64,
    pub love_received: f64,
    /// `None` while the pet has no favourite yet ("neutral").
    #[serde(deserialize_with = "lenient::option")]
    pub favorite_game: Option<GameKind>,
    pub junk_food_count: u32,
    pub healthy_food_count: u32,
    pub premium_food_count: u32,
    pub overfeeding_count: u32,
    pub critical_hunger_count: u32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            sleep_deprivation: 0.0,
            stress: 0.0,
            psychological_abuse: 0.0,
            love_received: 0.0,
            favorite_game: None,
            junk_food_count: 0,
            healthy_food_count: 0,
            premium_food_count: 0,
            overfeeding_count: 0,
            critical_hunger_count: 0,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AiMemory {
    #[serde(deserialize_with = "lenient::deque")]
    pub rps_history: VecDeque<RpsMove>,
    pub parity_bias: i32,
}

impl AiMemory {
    pub fn remember_rps(&mut self, mv: RpsMove) {
        self.rps_history.push_back(mv);
        while self.rps_history.len() > RPS_MEMORY {
            self.rps_history.pop_front();
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Inventory {
    #[serde(deserialize_with = "lenient::map")]
    pub food: BTreeMap<FoodKind, u32>,
    #[serde(deserialize_with = "lenient::set")]
    pub accessories: BTreeSet<Accessory>,
    #[serde(deserialize_with = "lenient::option")]
    pub equipped_accessory: Option<Accessory>,
}

impl Inventory {
    pub fn food_count(&self, food: FoodKind) -> u32 {
        self.food.get(&food).copied().unwrap_or(0)
    }

    /// Removes one unit of `food`. Returns false when none is left.
    pub fn take_food(&mut self, food: FoodKind) -> bool {
        match self.food.get_mut(&food) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Feeding {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub at: DateTime<Utc>,
    pub food: FoodKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaySession {
    pub game: GameKind,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SleepCycle {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub started: DateTime<Utc>,
    pub energy_at_start: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Walk {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct History {
    #[serde(deserialize_with = "lenient::vec")]
    pub feedings: Vec<Feeding>,
    /// Sessions without a recognisable game are dropped on load.
    #[serde(deserialize_with = "lenient::vec")]
    pub play_sessions: Vec<PlaySession>,
    #[serde(deserialize_with = "lenient::vec")]
    pub sleep_cycles: Vec<SleepCycle>,
    #[serde(deserialize_with = "lenient::vec")]
    pub walks: Vec<Walk>,
}

/// The persisted aggregate. Every field falls back to its default when the
/// save file omits it, and unknown fields are ignored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PetState {
    pub version: u32,
    pub name: String,
    pub hunger: f64,
    pub energy: f64,
    pub affection: f64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub last_seen: DateTime<Utc>,
    pub sleeping: bool,
    pub frozen: bool,
    pub abuse_accumulator: u32,
    pub personality: Personality,
    #[serde(deserialize_with = "lenient::map")]
    pub game_stats: BTreeMap<GameKind, u32>,
    pub ai_memory: AiMemory,
    pub status: Status,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub coins: u32,
    pub evolution_form: EvolutionForm,
    pub inventory: Inventory,
    pub history: History,
}

impl Default for PetState {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, Utc::now())
    }
}

impl PetState {
    pub fn new(name: &str, now: DateTime<Utc>) -> Self {
        Self {
            version: SAVE_VERSION,
            name: name.to_string(),
            hunger: 100.0,
            energy: 100.0,
            affection: 50.0,
            last_seen: now,
            sleeping: false,
            frozen: false,
            abuse_accumulator: 0,
            personality: Personality::default(),
            game_stats: GameKind::ALL.iter().map(|g| (*g, 0)).collect(),
            ai_memory: AiMemory::default(),
            status: Status::Alive,
            level: 1,
            experience: 0,
            experience_to_next: 100,
            coins: 0,
            evolution_form: EvolutionForm::Basic,
            inventory: Inventory::default(),
            history: History::default(),
        }
    }

    pub fn is_escaped(&self) -> bool {
        self.status == Status::Escaped
    }

    /// Gate for every mutating operation.
    pub fn ensure_alive(&self) -> Result<(), PetError> {
        if self.is_escaped() {
            return Err(PetError::Escaped {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    pub fn play_count(&self, game: GameKind) -> u32 {
        self.game_stats.get(&game).copied().unwrap_or(0)
    }

    pub fn total_plays(&self) -> u32 {
        self.game_stats.values().sum()
    }

    pub fn walk_count(&self) -> usize {
        self.history.walks.len()
    }
}

/// Field deserializers for saves written by other builds: entries this build
/// cannot read are dropped instead of failing the whole record.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::collections::{BTreeMap, BTreeSet, VecDeque};

    fn items<'de, D: Deserializer<'de>, T: DeserializeOwned>(d: D) -> Result<Vec<T>, D::Error> {
        let items = match Value::deserialize(d)? {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        Ok(items
            .into_iter()
            .filter_map(|v| T::deserialize(v).ok())
            .collect())
    }

    pub fn vec<'de, D: Deserializer<'de>, T: DeserializeOwned>(d: D) -> Result<Vec<T>, D::Error> {
        items(d)
    }

    pub fn deque<'de, D, T>(d: D) -> Result<VecDeque<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        items(d).map(VecDeque::from)
    }

    pub fn set<'de, D, T>(d: D) -> Result<BTreeSet<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Ord,
    {
        Ok(items(d)?.into_iter().collect())
    }

    pub fn map<'de, D, K, V>(d: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        D: Deserializer<'de>,
        K: DeserializeOwned + Ord,
        V: DeserializeOwned,
    {
        let entries = match Value::deserialize(d)? {
            Value::Object(entries) => entries,
            _ => return Ok(BTreeMap::new()),
        };
        Ok(entries
            .into_iter()
            .filter_map(|(k, v)| {
                let key = K::deserialize(Value::String(k)).ok()?;
                Some((key, V::deserialize(v).ok()?))
            })
            .collect())
    }

    pub fn option<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(T::deserialize(Value::deserialize(d)?).ok())
    }
}

/// Observable side effects of an operation, reported once per occurrence.
/// Rendering them is the caller's business.
#[derive(Clone, Debug, PartialEq)]
pub enum PetEvent {
    LevelUp { level: u32, coins: u32 },
    Evolved { from: EvolutionForm, to: EvolutionForm },
    Escaped,
    NocturnalNeglect,
    Fed { food: FoodKind, gained: f64 },
    Overfed { annoyed: bool },
    FellAsleep,
    WokeUp { too_early: bool },
    Caressed { welcomed: bool },
    Walked,
    Renamed { from: String, to: String },
    Froze,
    Thawed,
}
