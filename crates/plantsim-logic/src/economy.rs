//! Plant economy: grid revenue, operating costs, the profit ledger, and the
//! wear and chemistry drift that feed back into costs.
//!
//! Revenue is billed on the turbine output passed in by the caller. The
//! reactor passes the turbine's output from the *previous* tick, because the
//! turbine is advanced after the reactor within a frame.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EconomyConfig;
use crate::constants::economy;
use crate::plant::{Component, CoolantChemistry, GridZone, WearFactors};

/// Running balance plus the figures of the most recent tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub revenue: f64,
    pub operating_costs: f64,
    /// `revenue - operating_costs` for the last posted tick.
    pub profit: f64,
    /// Persistent balance. Penalties floor it at zero; posted losses do not.
    pub total_profit: f64,
    /// Net penalties and bonuses applied since the last [`Ledger::begin_tick`].
    pub adjustments: f64,
}

impl Ledger {
    pub fn with_balance(balance: f64) -> Self {
        Self {
            revenue: 0.0,
            operating_costs: 0.0,
            profit: 0.0,
            total_profit: balance,
            adjustments: 0.0,
        }
    }

    pub fn begin_tick(&mut self) {
        self.adjustments = 0.0;
    }

    /// Deduct `amount`, never taking the balance below zero.
    /// Returns the amount actually removed.
    pub fn apply_penalty(&mut self, amount: f64) -> f64 {
        let before = self.total_profit;
        self.total_profit = (self.total_profit - amount).max(0.0);
        let taken = before - self.total_profit;
        self.adjustments -= taken;
        taken
    }

    pub fn apply_bonus(&mut self, amount: f64) {
        self.total_profit += amount;
        self.adjustments += amount;
    }

    pub fn can_afford(&self, cost: f64) -> bool {
        self.total_profit >= cost
    }

    /// Debit `cost` only if the balance covers it.
    pub fn try_spend(&mut self, cost: f64) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.total_profit -= cost;
        true
    }

    /// Record a tick's revenue and costs and add the profit to the balance.
    pub fn post(&mut self, revenue: f64, operating_costs: f64) {
        self.revenue = revenue;
        self.operating_costs = operating_costs;
        self.profit = revenue - operating_costs;
        self.total_profit += self.profit;
    }

    /// Per-tick figures scaled for an hourly read-out.
    pub fn hourly(&self) -> HourlyRates {
        HourlyRates {
            revenue: self.revenue * economy::DISPLAY_HOURLY_SCALE,
            operating_costs: self.operating_costs * economy::DISPLAY_HOURLY_SCALE,
            profit: self.profit * economy::DISPLAY_HOURLY_SCALE,
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::with_balance(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRates {
    pub revenue: f64,
    pub operating_costs: f64,
    pub profit: f64,
}

/// Billed hours covered by a tick of `delta_ms`.
pub fn hour_fraction(delta_ms: f64, time_acceleration: f64) -> f64 {
    delta_ms / economy::MS_PER_HOUR * time_acceleration
}

/// Revenue before zone pricing.
pub fn base_revenue(turbine_output: f64, power_price: f64, hour_fraction: f64) -> f64 {
    turbine_output * power_price * hour_fraction
}

/// Split `base_revenue` evenly across zones, then apply each zone's price
/// multiplier and its stability bonus or penalty.
pub fn grid_revenue(
    base_revenue: f64,
    turbine_output: f64,
    max_power: f64,
    zones: &[GridZone],
) -> f64 {
    if zones.is_empty() {
        return 0.0;
    }
    let share = base_revenue / zones.len() as f64;
    zones
        .iter()
        .map(|zone| {
            let stability = if zone.is_stable(turbine_output, max_power) {
                economy::STABLE_ZONE_FACTOR
            } else {
                economy::UNSTABLE_ZONE_FACTOR
            };
            share * zone.price_multiplier * stability
        })
        .sum()
}

/// Cost of running with coolant chemistry off target.
pub fn chemistry_cost(chemistry: &CoolantChemistry, hour_fraction: f64) -> f64 {
    (chemistry.ph_deviation() * economy::PH_COST
        + chemistry.conductivity_deviation() * economy::CONDUCTIVITY_COST
        + chemistry.oxygen_deviation() * economy::OXYGEN_COST)
        * hour_fraction
}

/// Inputs to the operating cost formula.
#[derive(Debug, Clone, Copy)]
pub struct CostInputs<'a> {
    pub base_operating_cost: f64,
    /// Reactor power output over rated power.
    pub power_ratio: f64,
    pub wear: &'a WearFactors,
    pub chemistry: &'a CoolantChemistry,
    pub hour_fraction: f64,
}

/// Base cost, plus load, wear, and chemistry surcharges.
pub fn operating_costs(inputs: &CostInputs) -> f64 {
    let base = inputs.base_operating_cost * inputs.hour_fraction;
    let load = inputs.power_ratio
        * inputs.base_operating_cost
        * economy::LOAD_COST_SHARE
        * inputs.hour_fraction;
    let wear = inputs.wear.total_wear()
        * inputs.base_operating_cost
        * economy::WEAR_COST_SHARE
        * inputs.hour_fraction;
    base + load + wear + chemistry_cost(inputs.chemistry, inputs.hour_fraction)
}

/// Wear every component by a random amount scaled by load and billed time.
pub fn decay_wear(
    wear: &mut WearFactors,
    power_ratio: f64,
    hour_fraction: f64,
    multiplier: f64,
    rng: &mut impl Rng,
) {
    for component in Component::ALL {
        let load = power_ratio * hour_fraction * multiplier;
        let amount = rng.gen::<f64>() * economy::WEAR_RATE * load;
        // Negative load would otherwise repair components.
        let amount = amount.max(0.0);
        let current = wear.get(component);
        wear.set(component, current - amount);
    }
}

/// Random-walk each chemistry parameter around its current value.
pub fn drift_chemistry(chemistry: &mut CoolantChemistry, hour_fraction: f64, rng: &mut impl Rng) {
    chemistry.ph += (rng.gen::<f64>() - 0.5) * economy::PH_DRIFT * hour_fraction;
    chemistry.conductivity +=
        (rng.gen::<f64>() - 0.5) * economy::CONDUCTIVITY_DRIFT * hour_fraction;
    chemistry.dissolved_oxygen += (rng.gen::<f64>() - 0.5) * economy::OXYGEN_DRIFT * hour_fraction;
}

/// Everything the financial step reads from the rest of the plant.
#[derive(Debug, Clone, Copy)]
pub struct FinanceInputs<'a> {
    pub delta_ms: f64,
    /// Turbine output from the previous tick.
    pub turbine_output: f64,
    pub power_output: f64,
    pub max_power: f64,
    pub zones: &'a [GridZone],
    /// 1.0 normally, the overdrive wear multiplier while boosted.
    pub wear_multiplier: f64,
}

/// Figures computed by one financial step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialTick {
    pub hour_fraction: f64,
    pub revenue: f64,
    pub operating_costs: f64,
    pub profit: f64,
}

/// Per-tick revenue, cost, and profit accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialEngine {
    pub config: EconomyConfig,
    pub ledger: Ledger,
}

impl FinancialEngine {
    pub fn new(config: EconomyConfig, starting_balance: f64) -> Self {
        Self {
            config,
            ledger: Ledger::with_balance(starting_balance),
        }
    }

    /// Bill one tick, then wear components and drift chemistry.
    pub fn update(
        &mut self,
        inputs: &FinanceInputs,
        wear: &mut WearFactors,
        chemistry: &mut CoolantChemistry,
        rng: &mut impl Rng,
    ) -> FinancialTick {
        let hours = hour_fraction(inputs.delta_ms, self.config.time_acceleration);
        let power_ratio = if inputs.max_power > 0.0 {
            inputs.power_output / inputs.max_power
        } else {
            0.0
        };

        let base = base_revenue(inputs.turbine_output, self.config.power_price, hours);
        let revenue = grid_revenue(base, inputs.turbine_output, inputs.max_power, inputs.zones);
        let costs = operating_costs(&CostInputs {
            base_operating_cost: self.config.base_operating_cost,
            power_ratio,
            wear: &*wear,
            chemistry: &*chemistry,
            hour_fraction: hours,
        });

        self.ledger.post(revenue, costs);

        decay_wear(wear, power_ratio, hours, inputs.wear_multiplier, rng);
        drift_chemistry(chemistry, hours, rng);

        FinancialTick {
            hour_fraction: hours,
            revenue,
            operating_costs: costs,
            profit: revenue - costs,
        }
    }
}

impl Default for FinancialEngine {
    fn default() -> Self {
        Self::new(EconomyConfig::default(), 0.0)
    }
}
