//! Plant sub-state: fuel rods, component wear, coolant chemistry, grid zones.

use serde::{Deserialize, Serialize};

use crate::constants::{chemistry, reactor};

/// A single fuel rod. Health 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelRod {
    pub health: f64,
}

impl FuelRod {
    pub fn fresh() -> Self {
        Self { health: 100.0 }
    }
}

/// A fresh core load of `reactor::FUEL_ROD_COUNT` rods.
pub fn fresh_fuel_load() -> Vec<FuelRod> {
    vec![FuelRod::fresh(); reactor::FUEL_ROD_COUNT]
}

/// Mean health across all rods, 0 for an empty core.
pub fn average_fuel_health(rods: &[FuelRod]) -> f64 {
    if rods.is_empty() {
        return 0.0;
    }
    rods.iter().map(|r| r.health).sum::<f64>() / rods.len() as f64
}

/// Wear-tracked plant components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    TurbineBearing,
    PumpSeals,
    ValveIntegrity,
    SensorAccuracy,
}

impl Component {
    pub const ALL: [Component; 4] = [
        Component::TurbineBearing,
        Component::PumpSeals,
        Component::ValveIntegrity,
        Component::SensorAccuracy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Component::TurbineBearing => "Turbine Bearing",
            Component::PumpSeals => "Pump Seals",
            Component::ValveIntegrity => "Valve Integrity",
            Component::SensorAccuracy => "Sensor Accuracy",
        }
    }
}

/// Condition of each wear-tracked component, 0..=100 (100 = new).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WearFactors {
    pub turbine_bearing: f64,
    pub pump_seals: f64,
    pub valve_integrity: f64,
    pub sensor_accuracy: f64,
}

impl WearFactors {
    pub fn new() -> Self {
        Self {
            turbine_bearing: 100.0,
            pump_seals: 100.0,
            valve_integrity: 100.0,
            sensor_accuracy: 100.0,
        }
    }

    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::TurbineBearing => self.turbine_bearing,
            Component::PumpSeals => self.pump_seals,
            Component::ValveIntegrity => self.valve_integrity,
            Component::SensorAccuracy => self.sensor_accuracy,
        }
    }

    pub fn get_mut(&mut self, component: Component) -> &mut f64 {
        match component {
            Component::TurbineBearing => &mut self.turbine_bearing,
            Component::PumpSeals => &mut self.pump_seals,
            Component::ValveIntegrity => &mut self.valve_integrity,
            Component::SensorAccuracy => &mut self.sensor_accuracy,
        }
    }

    /// Set a component's condition, clamped to 0..=100.
    pub fn set(&mut self, component: Component, value: f64) {
        *self.get_mut(component) = value.clamp(0.0, 100.0);
    }

    /// Multiply every component's condition by `factor`.
    pub fn scale_all(&mut self, factor: f64) {
        for c in Component::ALL {
            let v = self.get(c) * factor;
            self.set(c, v);
        }
    }

    pub fn average(&self) -> f64 {
        Component::ALL.iter().map(|&c| self.get(c)).sum::<f64>() / Component::ALL.len() as f64
    }

    /// Sum of `(1 - condition/100)` over all components.
    pub fn total_wear(&self) -> f64 {
        Component::ALL
            .iter()
            .map(|&c| 1.0 - self.get(c) / 100.0)
            .sum()
    }
}

impl Default for WearFactors {
    fn default() -> Self {
        Self::new()
    }
}

/// Primary coolant chemistry. Each value random-walks around its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoolantChemistry {
    pub ph: f64,
    /// µS/cm
    pub conductivity: f64,
    /// ppb
    pub dissolved_oxygen: f64,
}

/// Gauge readings for the chemistry panel, each 0..=100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChemistryGauges {
    pub ph: f64,
    pub conductivity: f64,
    pub dissolved_oxygen: f64,
}

impl CoolantChemistry {
    pub fn nominal() -> Self {
        Self {
            ph: chemistry::PH_TARGET,
            conductivity: chemistry::CONDUCTIVITY_TARGET,
            dissolved_oxygen: chemistry::OXYGEN_TARGET,
        }
    }

    pub fn ph_deviation(&self) -> f64 {
        (self.ph - chemistry::PH_TARGET).abs()
    }

    pub fn conductivity_deviation(&self) -> f64 {
        (self.conductivity - chemistry::CONDUCTIVITY_TARGET).abs()
    }

    pub fn oxygen_deviation(&self) -> f64 {
        (self.dissolved_oxygen - chemistry::OXYGEN_TARGET).abs()
    }

    /// Whether any parameter is outside the imbalance-event tolerance.
    pub fn out_of_spec(&self) -> bool {
        self.ph_deviation() > chemistry::PH_TOLERANCE
            || self.conductivity_deviation() > chemistry::CONDUCTIVITY_TOLERANCE
            || self.oxygen_deviation() > chemistry::OXYGEN_TOLERANCE
    }

    pub fn gauges(&self) -> ChemistryGauges {
        fn gauge(deviation: f64, span: f64) -> f64 {
            (100.0 - deviation / span * 100.0).max(0.0)
        }
        ChemistryGauges {
            ph: gauge(self.ph_deviation(), chemistry::PH_GAUGE_SPAN),
            conductivity: gauge(
                self.conductivity_deviation(),
                chemistry::CONDUCTIVITY_GAUGE_SPAN,
            ),
            dissolved_oxygen: gauge(self.oxygen_deviation(), chemistry::OXYGEN_GAUGE_SPAN),
        }
    }
}

impl Default for CoolantChemistry {
    fn default() -> Self {
        Self::nominal()
    }
}

/// A demand segment of the grid with its own price and stability threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridZone {
    pub name: String,
    /// Fraction of reactor rated power this zone wants.
    pub demand: f64,
    pub price_multiplier: f64,
    /// Fraction of demand that must be met for the stability bonus.
    pub stability_required: f64,
}

/// Index of the industrial zone in [`default_grid_zones`].
pub const INDUSTRIAL_ZONE: usize = 0;

impl GridZone {
    pub fn new(name: &str, demand: f64, price_multiplier: f64, stability_required: f64) -> Self {
        Self {
            name: name.to_string(),
            demand,
            price_multiplier,
            stability_required,
        }
    }

    /// Fraction of this zone's demand met by `turbine_output`, capped at 1.
    pub fn demand_met(&self, turbine_output: f64, max_power: f64) -> f64 {
        let wanted = max_power * self.demand;
        if wanted <= 0.0 {
            return 1.0;
        }
        (turbine_output / wanted).min(1.0)
    }

    pub fn is_stable(&self, turbine_output: f64, max_power: f64) -> bool {
        self.demand_met(turbine_output, max_power) >= self.stability_required
    }
}

pub fn default_grid_zones() -> Vec<GridZone> {
    vec![
        GridZone::new("Industrial", 0.8, 1.2, 0.95),
        GridZone::new("Residential", 0.5, 1.0, 0.9),
        GridZone::new("Commercial", 0.6, 1.1, 0.85),
    ]
}
