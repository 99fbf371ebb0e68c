//! Plant constants: physics gains, default tuning, costs, and event rates.
//!
//! Plain `f64`/`usize` values with no runtime dependency. Anything a game
//! designer might want to rebalance is mirrored in [`crate::config`], whose
//! defaults are taken from here.

/// All timings in the simulation are milliseconds.
pub const MS_PER_SECOND: f64 = 1000.0;

pub mod turbine {
    pub const MAX_RPM: f64 = 3600.0;
    pub const MAX_OUTPUT: f64 = 1000.0;
    /// Fraction of the RPM gap closed per second.
    pub const RPM_RESPONSE: f64 = 0.3;
    /// Health lost per second at full RPM.
    pub const WEAR_RATE: f64 = 0.001;
    /// Efficiency floor at zero health.
    pub const BASE_EFFICIENCY: f64 = 0.5;
}

pub mod reactor {
    pub const AMBIENT_TEMP: f64 = 20.0;
    pub const BASE_MAX_TEMP: f64 = 1000.0;
    pub const MAX_POWER: f64 = 1000.0;
    pub const FUEL_ROD_COUNT: usize = 5;
    pub const FULL: f64 = 100.0;

    /// Fraction of the control-rod gap closed per second.
    pub const ROD_RESPONSE: f64 = 0.5;
    /// Fraction of the coolant-flow gap closed per second.
    pub const COOLANT_RESPONSE: f64 = 0.5;

    /// Degrees per second added at fission rate 1.
    pub const HEAT_GAIN: f64 = 70.0;
    /// Degrees per second removed at full flow and quality.
    pub const COOLING_GAIN: f64 = 40.0;
    /// Upper bound of the uniform boost applied to the heating term.
    pub const HEAT_NOISE: f64 = 0.2;
    /// Upper bound of the uniform boost applied to the cooling term.
    pub const COOLING_NOISE: f64 = 0.1;
    /// Temperature at which a fully withdrawn core produces `MAX_POWER`.
    pub const NOMINAL_TEMP: f64 = 500.0;

    pub const FUEL_BURN_RATE: f64 = 0.01;
    pub const COOLANT_DEGRADATION_RATE: f64 = 0.05;

    pub const MELTDOWN_PENALTY: f64 = 5_000_000.0;
    /// Charged on every tick SCRAM stays engaged.
    pub const SCRAM_PENALTY: f64 = 1_000_000.0;

    /// Fractions of `max_temp` for the status banner.
    pub const WARNING_TEMP_RATIO: f64 = 0.6;
    pub const DANGER_TEMP_RATIO: f64 = 0.8;

    /// Undrained notices kept before the oldest are dropped.
    pub const MAX_PENDING_NOTICES: usize = 64;
}

pub mod overdrive {
    pub const DURATION_MS: f64 = 45_000.0;
    pub const COOLDOWN_MS: f64 = 5_000.0;
    pub const ACTIVATION_COST: f64 = 30_000.0;
    pub const TEMP_BONUS: f64 = 400.0;
    pub const WEAR_MULTIPLIER: f64 = 3.0;
}

pub mod costs {
    /// Currency per MWh sold.
    pub const POWER_PRICE: f64 = 500.0;
    /// Currency per billed hour.
    pub const BASE_OPERATING_COST: f64 = 100_000.0;
    pub const FUEL_COST: f64 = 1_000_000.0;
    pub const COOLANT_COST: f64 = 100_000.0;
    pub const TURBINE_MAINTENANCE_COST: f64 = 250_000.0;
}

pub mod economy {
    pub const MS_PER_HOUR: f64 = 3_600_000.0;
    /// Billed hours per simulated hour.
    pub const TIME_ACCELERATION: f64 = 5.0;

    pub const STABLE_ZONE_FACTOR: f64 = 1.2;
    pub const UNSTABLE_ZONE_FACTOR: f64 = 0.8;

    /// Share of the base operating cost charged per fully worn component.
    pub const WEAR_COST_SHARE: f64 = 0.1;
    /// Share of the base operating cost charged at full reactor load.
    pub const LOAD_COST_SHARE: f64 = 0.5;
    /// Upper bound of per-billed-hour wear at full load.
    pub const WEAR_RATE: f64 = 0.1;

    /// Cost per unit of deviation from the chemistry targets.
    pub const PH_COST: f64 = 1000.0;
    pub const CONDUCTIVITY_COST: f64 = 10.0;
    pub const OXYGEN_COST: f64 = 100.0;

    /// Full width of the per-billed-hour chemistry random walk.
    pub const PH_DRIFT: f64 = 0.1;
    pub const CONDUCTIVITY_DRIFT: f64 = 5.0;
    pub const OXYGEN_DRIFT: f64 = 0.5;

    /// Per-tick values are multiplied by this for per-hour display.
    pub const DISPLAY_HOURLY_SCALE: f64 = 3600.0;
}

pub mod chemistry {
    pub const PH_TARGET: f64 = 7.0;
    pub const CONDUCTIVITY_TARGET: f64 = 100.0;
    pub const OXYGEN_TARGET: f64 = 5.0;

    /// Deviations at which a gauge reads empty.
    pub const PH_GAUGE_SPAN: f64 = 2.0;
    pub const CONDUCTIVITY_GAUGE_SPAN: f64 = 50.0;
    pub const OXYGEN_GAUGE_SPAN: f64 = 3.0;

    /// Deviations tolerated before a chemistry-imbalance event fails.
    pub const PH_TOLERANCE: f64 = 1.0;
    pub const CONDUCTIVITY_TOLERANCE: f64 = 20.0;
    pub const OXYGEN_TOLERANCE: f64 = 2.0;
}

pub mod events {
    pub const MAX_CONCURRENT: usize = 2;
    pub const SPAWN_RATE_PER_SECOND: f64 = 0.002;

    pub const INITIAL_POWER_DEMAND: f64 = 0.5;
    pub const POWER_DEMAND_DRIFT: f64 = 0.01;
    pub const MIN_POWER_DEMAND: f64 = 0.3;
    pub const MAX_POWER_DEMAND: f64 = 0.9;
}

pub mod particles {
    pub const SPAWN_TEMP: f64 = 100.0;
    pub const SPAWN_CHANCE_AT_FULL_POWER: f64 = 0.5;
    pub const FIELD_WIDTH: f64 = 600.0;
    pub const SPAWN_Y: f64 = 400.0;
    pub const MIN_VELOCITY: f64 = 1.0;
    pub const VELOCITY_SPREAD: f64 = 2.0;
    pub const FADE_PER_FRAME: f64 = 0.01;
    /// Reference frame length the particle speeds are tuned against.
    pub const FRAME_MS: f64 = 16.0;
}
