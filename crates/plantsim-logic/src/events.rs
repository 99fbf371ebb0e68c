//! Plant events: timed modifiers that perturb the plant and grade the
//! operator's response when they run out.
//!
//! Each [`EventKind`] is plain data (name, description, duration) plus two
//! state transitions: [`EventKind::on_start`] runs when the event is picked,
//! [`EventKind::on_expire`] when its timer reaches zero. Both act on the
//! reactor and turbine passed in, never on captured state.
//!
//! The scheduler keeps at most `max_concurrent` events running and spawns new
//! ones at a per-second rate, so the spawn odds do not depend on frame length.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::constants::{events, MS_PER_SECOND};
use crate::cues::PlantNotice;
use crate::plant::INDUSTRIAL_ZONE;
use crate::reactor::ReactorCore;
use crate::turbine::Turbine;

/// Half-widths of the chemistry kick applied by a chemistry imbalance.
const IMBALANCE_PH_KICK: f64 = 2.0;
const IMBALANCE_CONDUCTIVITY_KICK: f64 = 50.0;
const IMBALANCE_OXYGEN_KICK: f64 = 5.0;
const IMBALANCE_EFFICIENCY_LOSS: f64 = 0.8;
const IMBALANCE_PENALTY: f64 = 200_000.0;

const EMERGENCY_DEMAND: f64 = 0.9;
const EMERGENCY_PRICE: f64 = 2.0;
const EMERGENCY_REQUIRED_OUTPUT: f64 = 0.9;
const EMERGENCY_PENALTY: f64 = 1_000_000.0;
const EMERGENCY_BONUS: f64 = 500_000.0;
/// Industrial zone settings restored when an emergency ends.
const INDUSTRIAL_DEMAND: f64 = 0.8;
const INDUSTRIAL_PRICE: f64 = 1.2;

const WEAR_ALERT_FACTOR: f64 = 0.7;
const WEAR_ALERT_THRESHOLD: f64 = 50.0;
const WEAR_ALERT_EFFICIENCY_LOSS: f64 = 0.8;
const WEAR_ALERT_PENALTY: f64 = 300_000.0;

const PUMP_FAULT_EFFICIENCY: f64 = 0.5;

const SURGE_TARGET_OUTPUT: f64 = 0.8;
const SURGE_REQUIRED_OUTPUT: f64 = 0.7;
const SURGE_PENALTY: f64 = 500_000.0;

const GLITCH_NOISE: f64 = 20.0;

const VIBRATION_EFFICIENCY_LOSS: f64 = 0.7;
const VIBRATION_RPM_LIMIT: f64 = 0.8;
const VIBRATION_DAMAGE: f64 = 30.0;

const FREQUENCY_TARGET_OUTPUT: f64 = 0.5;
const FREQUENCY_TOLERANCE: f64 = 0.1;
const FREQUENCY_PENALTY: f64 = 300_000.0;

/// The event catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ChemistryImbalance,
    GridZoneEmergency,
    ComponentWearAlert,
    CoolantPumpMalfunction,
    PowerDemandSurge,
    ControlRodSensorGlitch,
    TurbineVibration,
    GridFrequencyDeviation,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::ChemistryImbalance,
        EventKind::GridZoneEmergency,
        EventKind::ComponentWearAlert,
        EventKind::CoolantPumpMalfunction,
        EventKind::PowerDemandSurge,
        EventKind::ControlRodSensorGlitch,
        EventKind::TurbineVibration,
        EventKind::GridFrequencyDeviation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::ChemistryImbalance => "Chemistry Imbalance",
            EventKind::GridZoneEmergency => "Grid Zone Emergency",
            EventKind::ComponentWearAlert => "Component Wear Alert",
            EventKind::CoolantPumpMalfunction => "Coolant Pump Malfunction",
            EventKind::PowerDemandSurge => "Power Demand Surge",
            EventKind::ControlRodSensorGlitch => "Control Rod Sensor Glitch",
            EventKind::TurbineVibration => "Turbine Vibration",
            EventKind::GridFrequencyDeviation => "Grid Frequency Deviation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EventKind::ChemistryImbalance => {
                "Coolant chemistry parameters out of spec! Adjust system or face efficiency loss."
            }
            EventKind::GridZoneEmergency => {
                "Critical power needed in Industrial Zone! Maintain 90% output for 30 seconds!"
            }
            EventKind::ComponentWearAlert => {
                "Multiple components showing excessive wear! Address immediately!"
            }
            EventKind::CoolantPumpMalfunction => {
                "Coolant pump efficiency dropping! Increase coolant flow to compensate!"
            }
            EventKind::PowerDemandSurge => {
                "Grid demanding more power! Increase output to 80% within 20 seconds!"
            }
            EventKind::ControlRodSensorGlitch => {
                "Control rod position sensors malfunctioning! Manual adjustment needed!"
            }
            EventKind::TurbineVibration => {
                "High turbine vibration detected! Reduce RPM or risk damage!"
            }
            EventKind::GridFrequencyDeviation => {
                "Grid frequency unstable! Maintain exact 50% power output!"
            }
        }
    }

    pub fn duration_ms(self) -> f64 {
        match self {
            EventKind::ChemistryImbalance => 20_000.0,
            EventKind::GridZoneEmergency => 30_000.0,
            EventKind::ComponentWearAlert => 25_000.0,
            EventKind::CoolantPumpMalfunction => 15_000.0,
            EventKind::PowerDemandSurge => 20_000.0,
            EventKind::ControlRodSensorGlitch => 12_000.0,
            EventKind::TurbineVibration => 15_000.0,
            EventKind::GridFrequencyDeviation => 25_000.0,
        }
    }

    /// Output fraction the operator is asked to reach, where the event names one.
    pub fn target_output(self) -> Option<f64> {
        match self {
            EventKind::PowerDemandSurge => Some(SURGE_TARGET_OUTPUT),
            _ => None,
        }
    }

    /// Effect applied the moment the event is picked.
    pub fn on_start(self, reactor: &mut ReactorCore, turbine: &mut Turbine, rng: &mut impl Rng) {
        match self {
            EventKind::ChemistryImbalance => {
                let chem = &mut reactor.chemistry;
                chem.ph += (rng.gen::<f64>() - 0.5) * IMBALANCE_PH_KICK;
                chem.conductivity += (rng.gen::<f64>() - 0.5) * IMBALANCE_CONDUCTIVITY_KICK;
                chem.dissolved_oxygen += (rng.gen::<f64>() - 0.5) * IMBALANCE_OXYGEN_KICK;
            }
            EventKind::GridZoneEmergency => {
                if let Some(zone) = reactor.grid_zones.get_mut(INDUSTRIAL_ZONE) {
                    zone.demand = EMERGENCY_DEMAND;
                    zone.price_multiplier = EMERGENCY_PRICE;
                }
            }
            EventKind::ComponentWearAlert => reactor.wear.scale_all(WEAR_ALERT_FACTOR),
            EventKind::CoolantPumpMalfunction => reactor.coolant_efficiency = PUMP_FAULT_EFFICIENCY,
            EventKind::ControlRodSensorGlitch => reactor.control_rod_noise = GLITCH_NOISE,
            EventKind::TurbineVibration => turbine.efficiency *= VIBRATION_EFFICIENCY_LOSS,
            EventKind::PowerDemandSurge | EventKind::GridFrequencyDeviation => {}
        }
    }

    /// Effect applied when the timer runs out: grade the operator, undo
    /// temporary modifiers.
    pub fn on_expire(self, reactor: &mut ReactorCore, turbine: &mut Turbine) {
        let max_power = reactor.max_power;
        let ledger = &mut reactor.finance.ledger;
        match self {
            EventKind::ChemistryImbalance => {
                if reactor.chemistry.out_of_spec() {
                    reactor.coolant_efficiency *= IMBALANCE_EFFICIENCY_LOSS;
                    ledger.apply_penalty(IMBALANCE_PENALTY);
                }
            }
            EventKind::GridZoneEmergency => {
                if turbine.output < max_power * EMERGENCY_REQUIRED_OUTPUT {
                    ledger.apply_penalty(EMERGENCY_PENALTY);
                } else {
                    ledger.apply_bonus(EMERGENCY_BONUS);
                }
                if let Some(zone) = reactor.grid_zones.get_mut(INDUSTRIAL_ZONE) {
                    zone.demand = INDUSTRIAL_DEMAND;
                    zone.price_multiplier = INDUSTRIAL_PRICE;
                }
            }
            EventKind::ComponentWearAlert => {
                if reactor.wear.average() < WEAR_ALERT_THRESHOLD {
                    turbine.efficiency *= WEAR_ALERT_EFFICIENCY_LOSS;
                    ledger.apply_penalty(WEAR_ALERT_PENALTY);
                }
            }
            EventKind::CoolantPumpMalfunction => reactor.coolant_efficiency = 1.0,
            EventKind::PowerDemandSurge => {
                if turbine.output < max_power * SURGE_REQUIRED_OUTPUT {
                    ledger.apply_penalty(SURGE_PENALTY);
                }
            }
            EventKind::ControlRodSensorGlitch => reactor.control_rod_noise = 0.0,
            EventKind::TurbineVibration => {
                if turbine.rpm > turbine.max_rpm * VIBRATION_RPM_LIMIT {
                    turbine.health = (turbine.health - VIBRATION_DAMAGE).max(0.0);
                }
                turbine.recompute_efficiency();
            }
            EventKind::GridFrequencyDeviation => {
                let deviation = (turbine.output / max_power - FREQUENCY_TARGET_OUTPUT).abs();
                if deviation > FREQUENCY_TOLERANCE {
                    ledger.apply_penalty(FREQUENCY_PENALTY);
                }
            }
        }
    }
}

/// A running event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub kind: EventKind,
    pub time_remaining_ms: f64,
}

impl ActiveEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            time_remaining_ms: kind.duration_ms(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }

    /// Whole seconds left, rounded up, for display.
    pub fn is_expired(&self) -> bool {
        self.time_remaining_ms <= 0.0
    }

    pub fn seconds_remaining(&self) -> u64 {
        (self.time_remaining_ms / MS_PER_SECOND).ceil().max(0.0) as u64
    }

    /// "Name: description (Ns)" banner text.
    pub fn banner(&self) -> String {
        format!(
            "{}: {} ({}s)",
            self.name(),
            self.description(),
            self.seconds_remaining()
        )
    }
}

/// Active events, their scheduler, and the drifting grid power demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSystem {
    pub config: EventConfig,
    /// Oldest first; the front entry is the one displayed.
    pub active: Vec<ActiveEvent>,
    /// Informational grid demand, 0.3..=0.9.
    pub power_demand: f64,
}

impl EventSystem {
    pub fn new(config: EventConfig) -> Self {
        Self {
            config,
            active: Vec::new(),
            power_demand: events::INITIAL_POWER_DEMAND,
        }
    }

    /// Event shown to the operator.
    pub fn headline(&self) -> Option<&ActiveEvent> {
        self.active.first()
    }

    pub fn is_running(&self, kind: EventKind) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn has_capacity(&self) -> bool {
        self.active.len() < self.config.max_concurrent
    }

    /// Probability that a tick of `delta_ms` spawns an event.
    pub fn spawn_chance(&self, delta_ms: f64) -> f64 {
        self.config.spawn_rate_per_second * (delta_ms / MS_PER_SECOND)
    }

    /// Drop events that ran out on an earlier tick, then count the rest down.
    ///
    /// Returns the kinds whose timers reached zero on this tick, oldest first.
    /// Those stay in the active list until the next call, so they still hold
    /// a slot for the rest of the tick.
    pub fn tick_timers(&mut self, delta_ms: f64) -> Vec<EventKind> {
        self.active.retain(|event| !event.is_expired());
        self.active
            .iter_mut()
            .filter_map(|event| {
                event.time_remaining_ms -= delta_ms;
                event.is_expired().then_some(event.kind)
            })
            .collect()
    }

    /// Roll for a new event. Always consumes the roll draw, and a second
    /// draw for the pick when the roll succeeds.
    pub fn roll_spawn(&self, delta_ms: f64, rng: &mut impl Rng) -> Option<EventKind> {
        let roll = rng.gen::<f64>();
        if roll >= self.spawn_chance(delta_ms) || !self.has_capacity() {
            return None;
        }
        let count = EventKind::ALL.len();
        let index = ((rng.gen::<f64>() * count as f64) as usize).min(count - 1);
        Some(EventKind::ALL[index])
    }

    /// Random-walk the grid demand figure.
    pub fn drift_demand(&mut self, delta_ms: f64, rng: &mut impl Rng) {
        let step = (rng.gen::<f64>() - 0.5) * events::POWER_DEMAND_DRIFT;
        self.power_demand += step * (delta_ms / MS_PER_SECOND);
        self.power_demand = self
            .power_demand
            .clamp(events::MIN_POWER_DEMAND, events::MAX_POWER_DEMAND);
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new(EventConfig::default())
    }
}

/// Start `kind` immediately if there is room. Returns whether it started.
pub fn start_event(
    reactor: &mut ReactorCore,
    turbine: &mut Turbine,
    kind: EventKind,
    rng: &mut impl Rng,
) -> bool {
    if !reactor.events.has_capacity() {
        return false;
    }
    kind.on_start(reactor, turbine, rng);
    reactor.events.active.push(ActiveEvent::new(kind));
    log::info!("Event started: {} ({}s)", kind.name(), kind.duration_ms() / MS_PER_SECOND);
    reactor.notify(PlantNotice::EventStarted(kind));
    true
}

/// One event-system step: expire, maybe spawn, drift demand.
pub fn update_events(
    reactor: &mut ReactorCore,
    turbine: &mut Turbine,
    delta_ms: f64,
    rng: &mut impl Rng,
) {
    for kind in reactor.events.tick_timers(delta_ms) {
        kind.on_expire(reactor, turbine);
        log::info!("Event expired: {}", kind.name());
        reactor.notify(PlantNotice::EventExpired(kind));
    }

    if let Some(kind) = reactor.events.roll_spawn(delta_ms, rng) {
        start_event(reactor, turbine, kind, rng);
    }

    reactor.events.drift_demand(delta_ms, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::Component;
    use crate::testing::{FixedRng, ScriptedRng};

    fn plant_with_balance(balance: f64) -> (ReactorCore, Turbine) {
        let mut reactor = ReactorCore::new();
        reactor.finance.ledger.total_profit = balance;
        (reactor, Turbine::new())
    }

    #[test]
    fn test_catalog_is_complete() {
        assert_eq!(EventKind::ALL.len(), 8);
        for kind in EventKind::ALL {
            assert!(!kind.name().is_empty());
            assert!(!kind.description().is_empty());
            assert!(kind.duration_ms() >= 12_000.0);
        }
    }

    #[test]
    fn test_zero_draw_spawns_first_event() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        update_events(&mut reactor, &mut turbine, 16.0, &mut FixedRng::zero());
        assert_eq!(reactor.events.len(), 1);
        assert_eq!(reactor.events.active[0].kind, EventKind::ChemistryImbalance);
        assert_eq!(
            reactor.drain_notices(),
            vec![PlantNotice::EventStarted(EventKind::ChemistryImbalance)]
        );
    }

    #[test]
    fn test_midpoint_draw_never_spawns() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        for _ in 0..100 {
            update_events(&mut reactor, &mut turbine, 1000.0, &mut FixedRng::midpoint());
        }
        assert!(reactor.events.is_empty());
        assert_eq!(reactor.events.power_demand, 0.5);
    }

    #[test]
    fn test_concurrency_cap() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        for _ in 0..10 {
            update_events(&mut reactor, &mut turbine, 16.0, &mut FixedRng::zero());
        }
        assert_eq!(reactor.events.len(), 2);
        assert!(!start_event(
            &mut reactor,
            &mut turbine,
            EventKind::TurbineVibration,
            &mut FixedRng::midpoint()
        ));
    }

    #[test]
    fn test_pick_uses_second_draw() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        // Roll succeeds, pick lands in the last eighth.
        let mut rng = ScriptedRng::new(&[0.0, 0.99, 0.5]);
        update_events(&mut reactor, &mut turbine, 16.0, &mut rng);
        assert_eq!(
            reactor.events.headline().map(|e| e.kind),
            Some(EventKind::GridFrequencyDeviation)
        );
    }

    #[test]
    fn test_expiry_removes_and_notifies() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        let mut rng = FixedRng::midpoint();
        start_event(&mut reactor, &mut turbine, EventKind::CoolantPumpMalfunction, &mut rng);
        assert_eq!(reactor.coolant_efficiency, 0.5);
        reactor.drain_notices();

        update_events(&mut reactor, &mut turbine, 14_000.0, &mut rng);
        assert_eq!(reactor.events.active[0].seconds_remaining(), 1);
        update_events(&mut reactor, &mut turbine, 1_000.0, &mut rng);
        assert_eq!(reactor.coolant_efficiency, 1.0);
        assert_eq!(
            reactor.drain_notices(),
            vec![PlantNotice::EventExpired(EventKind::CoolantPumpMalfunction)]
        );
        // Held for the rest of its last tick, gone on the next.
        assert_eq!(reactor.events.len(), 1);
        assert!(reactor.events.active[0].is_expired());

        update_events(&mut reactor, &mut turbine, 16.0, &mut rng);
        assert!(reactor.events.is_empty());
        assert!(reactor.drain_notices().is_empty());
        assert_eq!(reactor.coolant_efficiency, 1.0);
    }

    #[test]
    fn test_expiring_event_blocks_spawn_in_its_last_tick() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        let mut rng = FixedRng::midpoint();
        start_event(&mut reactor, &mut turbine, EventKind::ControlRodSensorGlitch, &mut rng);
        start_event(&mut reactor, &mut turbine, EventKind::PowerDemandSurge, &mut rng);

        // A zero draw always wins the spawn roll, but both slots are still taken.
        update_events(&mut reactor, &mut turbine, 12_000.0, &mut FixedRng::zero());
        let kinds: Vec<_> = reactor.events.active.iter().map(|e| e.kind).collect();
        let expected = vec![EventKind::ControlRodSensorGlitch, EventKind::PowerDemandSurge];
        assert_eq!(kinds, expected);
        assert!(reactor.events.active[0].is_expired());
        assert_eq!(reactor.control_rod_noise, 0.0);

        // The slot opens on the following tick.
        update_events(&mut reactor, &mut turbine, 16.0, &mut FixedRng::zero());
        let kinds: Vec<_> = reactor.events.active.iter().map(|e| e.kind).collect();
        let expected = vec![EventKind::PowerDemandSurge, EventKind::ChemistryImbalance];
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_chemistry_imbalance_penalty() {
        let (mut reactor, mut turbine) = plant_with_balance(1_000_000.0);
        // Kick every parameter to the edge of its range.
        EventKind::ChemistryImbalance.on_start(&mut reactor, &mut turbine, &mut FixedRng::zero());
        assert!((reactor.chemistry.ph - 6.0).abs() < 1e-9);
        assert!((reactor.chemistry.conductivity - 75.0).abs() < 1e-9);
        assert!((reactor.chemistry.dissolved_oxygen - 2.5).abs() < 1e-9);

        EventKind::ChemistryImbalance.on_expire(&mut reactor, &mut turbine);
        assert!((reactor.coolant_efficiency - 0.8).abs() < 1e-9);
        assert_eq!(reactor.total_profit(), 800_000.0);
    }

    #[test]
    fn test_chemistry_restored_avoids_penalty() {
        let (mut reactor, mut turbine) = plant_with_balance(1_000_000.0);
        let mut rng = FixedRng::midpoint();
        EventKind::ChemistryImbalance.on_start(&mut reactor, &mut turbine, &mut rng);
        EventKind::ChemistryImbalance.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.coolant_efficiency, 1.0);
        assert_eq!(reactor.total_profit(), 1_000_000.0);
    }

    #[test]
    fn test_grid_emergency_met_pays_bonus() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        let mut rng = FixedRng::midpoint();
        EventKind::GridZoneEmergency.on_start(&mut reactor, &mut turbine, &mut rng);
        assert_eq!(reactor.grid_zones[INDUSTRIAL_ZONE].demand, 0.9);
        assert_eq!(reactor.grid_zones[INDUSTRIAL_ZONE].price_multiplier, 2.0);

        turbine.output = 950.0;
        reactor.finance.ledger.begin_tick();
        EventKind::GridZoneEmergency.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.total_profit(), 500_000.0);
        assert_eq!(reactor.finance.ledger.adjustments, 500_000.0);
        assert_eq!(reactor.grid_zones[INDUSTRIAL_ZONE].demand, 0.8);
        assert_eq!(reactor.grid_zones[INDUSTRIAL_ZONE].price_multiplier, 1.2);
    }

    #[test]
    fn test_grid_emergency_missed_penalty_floors() {
        let (mut reactor, mut turbine) = plant_with_balance(400_000.0);
        turbine.output = 100.0;
        EventKind::GridZoneEmergency.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.total_profit(), 0.0);
    }

    #[test]
    fn test_component_wear_alert() {
        let (mut reactor, mut turbine) = plant_with_balance(1_000_000.0);
        reactor.wear.set(Component::PumpSeals, 60.0);
        let mut rng = FixedRng::midpoint();
        EventKind::ComponentWearAlert.on_start(&mut reactor, &mut turbine, &mut rng);
        assert!((reactor.wear.pump_seals - 42.0).abs() < 1e-9);
        assert!((reactor.wear.turbine_bearing - 70.0).abs() < 1e-9);

        // Average 63.0 is above the threshold.
        EventKind::ComponentWearAlert.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.total_profit(), 1_000_000.0);

        reactor.wear.scale_all(0.5);
        EventKind::ComponentWearAlert.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.total_profit(), 700_000.0);
        assert!((turbine.efficiency - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_power_demand_surge() {
        let (mut reactor, mut turbine) = plant_with_balance(1_000_000.0);
        assert_eq!(EventKind::PowerDemandSurge.target_output(), Some(0.8));
        turbine.output = 700.0;
        EventKind::PowerDemandSurge.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.total_profit(), 1_000_000.0);
        turbine.output = 699.0;
        EventKind::PowerDemandSurge.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.total_profit(), 500_000.0);
    }

    #[test]
    fn test_sensor_glitch_noise() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        let mut rng = FixedRng::midpoint();
        EventKind::ControlRodSensorGlitch.on_start(&mut reactor, &mut turbine, &mut rng);
        assert_eq!(reactor.control_rod_noise, 20.0);
        EventKind::ControlRodSensorGlitch.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.control_rod_noise, 0.0);
    }

    #[test]
    fn test_turbine_vibration_damages_fast_turbine() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        EventKind::TurbineVibration.on_start(&mut reactor, &mut turbine, &mut FixedRng::midpoint());
        assert!((turbine.efficiency - 0.7).abs() < 1e-9);

        turbine.rpm = 3000.0;
        EventKind::TurbineVibration.on_expire(&mut reactor, &mut turbine);
        assert_eq!(turbine.health, 70.0);
        assert!((turbine.efficiency - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_turbine_vibration_spares_slow_turbine() {
        let (mut reactor, mut turbine) = plant_with_balance(0.0);
        EventKind::TurbineVibration.on_start(&mut reactor, &mut turbine, &mut FixedRng::midpoint());
        turbine.rpm = 2000.0;
        EventKind::TurbineVibration.on_expire(&mut reactor, &mut turbine);
        assert_eq!(turbine.health, 100.0);
        assert_eq!(turbine.efficiency, 1.0);
    }

    #[test]
    fn test_grid_frequency_deviation() {
        let (mut reactor, mut turbine) = plant_with_balance(1_000_000.0);
        turbine.output = 550.0;
        EventKind::GridFrequencyDeviation.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.total_profit(), 1_000_000.0);
        turbine.output = 700.0;
        EventKind::GridFrequencyDeviation.on_expire(&mut reactor, &mut turbine);
        assert_eq!(reactor.total_profit(), 700_000.0);
    }

    #[test]
    fn test_power_demand_stays_in_band() {
        let mut events = EventSystem::default();
        for _ in 0..1000 {
            events.drift_demand(100_000.0, &mut FixedRng::zero());
        }
        assert_eq!(events.power_demand, 0.3);
        for _ in 0..1000 {
            events.drift_demand(100_000.0, &mut FixedRng::new(0.999));
        }
        assert_eq!(events.power_demand, 0.9);
    }

    #[test]
    fn test_banner_text() {
        let event = ActiveEvent {
            kind: EventKind::TurbineVibration,
            time_remaining_ms: 4_200.0,
        };
        assert_eq!(
            event.banner(),
            "Turbine Vibration: High turbine vibration detected! Reduce RPM or risk damage! (5s)"
        );
    }
}
