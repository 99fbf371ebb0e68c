//! Plant configuration: tunable economy, maintenance, overdrive, and event
//! parameters.
//!
//! Every field has a default matching [`crate::constants`], and every struct is
//! `#[serde(default)]`, so a JSON file only needs the values it overrides:
//!
//! ```json
//! { "seed": 7, "overdrive": { "activation_cost": 50000 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{costs, economy, events, overdrive};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration for a plant session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Seed for the session RNG.
    pub seed: u64,
    /// Tick length used by fixed-step drivers, in milliseconds.
    pub tick_ms: f64,
    /// Starting balance.
    pub starting_balance: f64,
    pub economy: EconomyConfig,
    pub maintenance: MaintenanceCosts,
    pub overdrive: OverdriveConfig,
    pub events: EventConfig,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_ms: 1000.0 / 60.0,
            starting_balance: 0.0,
            economy: EconomyConfig::default(),
            maintenance: MaintenanceCosts::default(),
            overdrive: OverdriveConfig::default(),
            events: EventConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub power_price: f64,
    pub base_operating_cost: f64,
    /// Billed hours per simulated hour.
    pub time_acceleration: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            power_price: costs::POWER_PRICE,
            base_operating_cost: costs::BASE_OPERATING_COST,
            time_acceleration: economy::TIME_ACCELERATION,
        }
    }
}

/// Prices of the paid maintenance operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceCosts {
    pub fuel: f64,
    pub coolant: f64,
    pub turbine: f64,
}

impl Default for MaintenanceCosts {
    fn default() -> Self {
        Self {
            fuel: costs::FUEL_COST,
            coolant: costs::COOLANT_COST,
            turbine: costs::TURBINE_MAINTENANCE_COST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverdriveConfig {
    pub duration_ms: f64,
    pub cooldown_ms: f64,
    pub activation_cost: f64,
    pub temp_bonus: f64,
    pub wear_multiplier: f64,
}

impl Default for OverdriveConfig {
    fn default() -> Self {
        Self {
            duration_ms: overdrive::DURATION_MS,
            cooldown_ms: overdrive::COOLDOWN_MS,
            activation_cost: overdrive::ACTIVATION_COST,
            temp_bonus: overdrive::TEMP_BONUS,
            wear_multiplier: overdrive::WEAR_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Expected spawns per second while below the concurrency cap.
    pub spawn_rate_per_second: f64,
    pub max_concurrent: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            spawn_rate_per_second: events::SPAWN_RATE_PER_SECOND,
            max_concurrent: events::MAX_CONCURRENT,
        }
    }
}

impl PlantConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PlantConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }
        fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be zero or more, got {value}"),
                })
            }
        }

        positive("tick_ms", self.tick_ms)?;
        non_negative("starting_balance", self.starting_balance)?;

        non_negative("economy.power_price", self.economy.power_price)?;
        non_negative("economy.base_operating_cost", self.economy.base_operating_cost)?;
        positive("economy.time_acceleration", self.economy.time_acceleration)?;

        non_negative("maintenance.fuel", self.maintenance.fuel)?;
        non_negative("maintenance.coolant", self.maintenance.coolant)?;
        non_negative("maintenance.turbine", self.maintenance.turbine)?;

        positive("overdrive.duration_ms", self.overdrive.duration_ms)?;
        non_negative("overdrive.cooldown_ms", self.overdrive.cooldown_ms)?;
        non_negative("overdrive.activation_cost", self.overdrive.activation_cost)?;
        non_negative("overdrive.temp_bonus", self.overdrive.temp_bonus)?;
        non_negative("overdrive.wear_multiplier", self.overdrive.wear_multiplier)?;

        let rate = self.events.spawn_rate_per_second;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::Invalid {
                field: "events.spawn_rate_per_second",
                reason: format!("must be within [0, 1], got {rate}"),
            });
        }
        if self.events.max_concurrent == 0 {
            return Err(ConfigError::Invalid {
                field: "events.max_concurrent",
                reason: "must allow at least one event".into(),
            });
        }
        Ok(())
    }
}
