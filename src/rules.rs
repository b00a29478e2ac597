use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecayProfile {
    /// Slow metabolism, fast recovery.
    #[default]
    Gentle,
    /// The original, harsher rates.
    Classic,
}

/// Signed change per hour for one regime (asleep or awake).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayRates {
    pub hunger: f64,
    pub energy: f64,
    pub sleep_deprivation: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NightPenalty {
    pub first_hour: u32,
    pub last_hour: u32,
    pub energy_below: f64,
    pub affection: f64,
    pub abuse: u32,
    pub psychological_abuse: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cost {
    pub hunger: f64,
    pub energy: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reward {
    pub affection: f64,
    pub love: f64,
    pub experience: u32,
    pub coins: u32,
}

impl Reward {
    pub const NONE: Reward = Reward {
        affection: 0.0,
        love: 0.0,
        experience: 0,
        coins: 0,
    };
}

/// Win / draw / loss payouts from the user's point of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Payouts {
    pub user_win: Reward,
    pub draw: Reward,
    pub pet_win: Reward,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuessRules {
    pub max_attempts: u32,
    pub solved_affection: f64,
    pub solved_love: f64,
    pub coins_base: u32,
    pub coins_floor: u32,
    pub experience_base: u32,
    pub experience_floor: u32,
    /// Deducted from both bases per attempt used.
    pub per_attempt: u32,
    pub failed: Reward,
}

impl GuessRules {
    pub fn solved_reward(&self, attempts: u32) -> Reward {
        let step = self.per_attempt.saturating_mul(attempts);
        Reward {
            affection: self.solved_affection,
            love: self.solved_love,
            experience: self
                .experience_base
                .saturating_sub(step)
                .max(self.experience_floor),
            coins: self.coins_base.saturating_sub(step).max(self.coins_floor),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodEffect {
    pub hunger: f64,
    pub affection: f64,
    pub love: f64,
    pub experience: u32,
}

/// Every tunable constant of the simulation, in one place.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub asleep: DecayRates,
    pub awake: DecayRates,
    /// Gaps shorter than this are ignored.
    pub min_offline_hours: f64,
    pub night: NightPenalty,

    pub escape_affection_below: f64,
    pub escape_abuse_above: u32,

    pub level_growth: f64,
    pub level_coin_bonus: u32,
    pub evolution_min_level: u32,
    pub evolution_threshold: u32,

    // care actions
    pub overfed_above: f64,
    pub overfeed_tolerance: u32,
    pub overfeed_affection: f64,
    pub standard_food_hungry_below: f64,
    pub standard_food_hungry: f64,
    pub standard_food: FoodEffect,
    pub junk_food: FoodEffect,
    pub healthy_food: FoodEffect,
    pub premium_food: FoodEffect,
    pub sleep_max_energy: f64,
    pub min_sleep_hours: f64,
    pub early_wake_affection: f64,
    pub early_wake_psychological_abuse: f64,
    pub walk_min_energy: f64,
    pub walk_min_hunger: f64,
    pub walk_cost: Cost,
    pub walk_reward: Reward,
    pub caress_experience: u32,
    pub name_max_len: usize,

    // games
    pub game_min_energy: f64,
    pub rps_cost: Cost,
    pub rps: Payouts,
    pub tictactoe_cost: Cost,
    pub tictactoe: Payouts,
    pub parity_cost: Cost,
    pub parity: Reward,
    pub parity_bias_trigger: i32,
    pub guess_cost: Cost,
    pub guess: GuessRules,
}

impl Default for Rules {
    fn default() -> Self {
        Self::for_profile(DecayProfile::default())
    }
}

impl Rules {
    pub fn for_profile(profile: DecayProfile) -> Self {
        let (asleep, awake) = match profile {
            DecayProfile::Gentle => (
                DecayRates {
                    hunger: -0.5,
                    energy: 50.0,
                    sleep_deprivation: -3.0,
                },
                DecayRates {
                    hunger: -4.2,
                    energy: -4.2,
                    sleep_deprivation: 2.0,
                },
            ),
            DecayProfile::Classic => (
                DecayRates {
                    hunger: -2.0,
                    energy: 12.5,
                    sleep_deprivation: -3.0,
                },
                DecayRates {
                    hunger: -10.0,
                    energy: -6.25,
                    sleep_deprivation: 2.0,
                },
            ),
        };

        Self {
            asleep,
            awake,
            min_offline_hours: 0.02,
            night: NightPenalty {
                first_hour: 0,
                last_hour: 6,
                energy_below: 30.0,
                affection: -15.0,
                abuse: 10,
                psychological_abuse: 5.0,
            },

            escape_affection_below: -90.0,
            escape_abuse_above: 300,

            level_growth: 1.5,
            level_coin_bonus: 10,
            evolution_min_level: 5,
            evolution_threshold: 50,

            overfed_above: 90.0,
            overfeed_tolerance: 15,
            overfeed_affection: -2.0,
            standard_food_hungry_below: 40.0,
            standard_food_hungry: 35.0,
            standard_food: FoodEffect {
                hunger: 25.0,
                affection: 3.0,
                love: 1.0,
                experience: 5,
            },
            junk_food: FoodEffect {
                hunger: 20.0,
                affection: 5.0,
                love: 0.0,
                experience: 5,
            },
            healthy_food: FoodEffect {
                hunger: 30.0,
                affection: 2.0,
                love: 0.0,
                experience: 10,
            },
            premium_food: FoodEffect {
                hunger: 45.0,
                affection: 8.0,
                love: 2.0,
                experience: 15,
            },
            sleep_max_energy: 70.0,
            min_sleep_hours: 4.0,
            early_wake_affection: -5.0,
            early_wake_psychological_abuse: 2.0,
            walk_min_energy: 20.0,
            walk_min_hunger: 15.0,
            walk_cost: Cost {
                hunger: 20.0,
                energy: 10.0,
            },
            walk_reward: Reward {
                affection: 10.0,
                love: 0.0,
                experience: 20,
                coins: 5,
            },
            caress_experience: 2,
            name_max_len: 18,

            game_min_energy: 15.0,
            rps_cost: Cost {
                hunger: 4.0,
                energy: 6.0,
            },
            rps: Payouts {
                user_win: Reward {
                    affection: 6.0,
                    love: 2.0,
                    experience: 15,
                    coins: 8,
                },
                draw: Reward {
                    affection: 1.0,
                    love: 0.0,
                    experience: 8,
                    coins: 3,
                },
                pet_win: Reward {
                    affection: -1.0,
                    love: 0.0,
                    experience: 5,
                    coins: 1,
                },
            },
            tictactoe_cost: Cost {
                hunger: 7.0,
                energy: 9.0,
            },
            tictactoe: Payouts {
                user_win: Reward {
                    affection: 8.0,
                    love: 0.0,
                    experience: 30,
                    coins: 15,
                },
                draw: Reward {
                    affection: 3.0,
                    love: 0.0,
                    experience: 15,
                    coins: 8,
                },
                pet_win: Reward {
                    affection: 1.0,
                    love: 0.0,
                    experience: 10,
                    coins: 4,
                },
            },
            parity_cost: Cost {
                hunger: 3.0,
                energy: 4.0,
            },
            parity: Reward {
                affection: 2.0,
                love: 0.0,
                experience: 10,
                coins: 4,
            },
            parity_bias_trigger: 5,
            guess_cost: Cost {
                hunger: 8.0,
                energy: 10.0,
            },
            guess: GuessRules {
                max_attempts: 10,
                solved_affection: 12.0,
                solved_love: 3.0,
                coins_base: 55,
                coins_floor: 5,
                experience_base: 60,
                experience_floor: 10,
                per_attempt: 5,
                failed: Reward {
                    affection: 1.0,
                    love: 0.0,
                    experience: 5,
                    coins: 2,
                },
            },
        }
    }

    pub fn food(&self, food: crate::model::FoodKind) -> FoodEffect {
        use crate::model::FoodKind;
        match food {
            FoodKind::Standard => self.standard_food,
            FoodKind::Junk => self.junk_food,
            FoodKind::Healthy => self.healthy_food,
            FoodKind::Premium => self.premium_food,
        }
    }
}
