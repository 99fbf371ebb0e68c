//! Reactor core dynamics and the operator control surface.
//!
//! [`ReactorCore::update`] runs one frame in a fixed order:
//!
//! 1. damage gate (a melted core never changes again)
//! 2. overdrive timers
//! 3. control rods lag toward target, with sensor noise when a glitch is active
//! 4. coolant flow lags toward target
//! 5. fission rate from rod withdrawal and fuel health
//! 6. temperature from heating minus cooling
//! 7. power output (not capped at rated power)
//! 8. steam plume
//! 9. fuel burn-up
//! 10. coolant degradation
//! 11. meltdown check
//! 12. SCRAM hold and penalty
//! 13. events
//! 14. finances, billed on the turbine's output from the previous frame
//!
//! The turbine is owned by the caller and passed in. The driver must advance
//! the turbine *after* the reactor; see [`crate::sim::Simulation::step`].

use rand::Rng;

use crate::config::{MaintenanceCosts, PlantConfig};
use crate::constants::{reactor as limits, MS_PER_SECOND};
use crate::cues::{MaintenanceKind, PlantNotice, PlantStatus};
use crate::economy::{FinanceInputs, FinancialEngine, FinancialTick};
use crate::events::{self, EventSystem};
use crate::overdrive::{Overdrive, OverdriveTransition};
use crate::particles::SteamField;
use crate::plant::{self, default_grid_zones, CoolantChemistry, FuelRod, GridZone, WearFactors};
use crate::turbine::Turbine;

/// Move `current` toward `target` by `rate` of the gap per second, never
/// overshooting on a long frame.
fn lag(current: f64, target: f64, rate: f64, seconds: f64) -> f64 {
    current + (target - current) * (seconds * rate).min(1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReactorCore {
    /// °C, never below ambient.
    pub temperature: f64,
    /// Unboosted temperature ceiling.
    pub base_max_temp: f64,
    /// Current ceiling; raised while overdrive is active.
    pub max_temp: f64,
    pub power_output: f64,
    pub max_power: f64,

    /// 0 = fully withdrawn, 100 = fully inserted.
    pub control_rod_position: f64,
    pub target_control_rod_position: f64,
    pub coolant_flow: f64,
    pub target_coolant_flow: f64,
    pub fission_rate: f64,

    pub damaged: bool,
    pub scram_active: bool,
    pub overdrive: Overdrive,

    pub fuel_rods: Vec<FuelRod>,
    pub coolant_quality: f64,
    /// Pump efficiency multiplier. Events lower it; the heat model does not read it.
    pub coolant_efficiency: f64,
    /// Peak-to-peak sensor noise on the rod drive, set by sensor glitches.
    pub control_rod_noise: f64,
    pub wear: WearFactors,
    pub chemistry: CoolantChemistry,
    pub grid_zones: Vec<GridZone>,

    pub finance: FinancialEngine,
    pub maintenance: MaintenanceCosts,
    pub events: EventSystem,
    pub steam: SteamField,

    notices: Vec<PlantNotice>,
}

impl ReactorCore {
    pub fn new() -> Self {
        Self::with_config(&PlantConfig::default())
    }

    pub fn with_config(config: &PlantConfig) -> Self {
        let overdrive = Overdrive::new(config.overdrive.clone());
        Self {
            temperature: limits::AMBIENT_TEMP,
            base_max_temp: limits::BASE_MAX_TEMP,
            max_temp: overdrive.max_temp(limits::BASE_MAX_TEMP),
            power_output: 0.0,
            max_power: limits::MAX_POWER,
            control_rod_position: limits::FULL,
            target_control_rod_position: limits::FULL,
            coolant_flow: limits::FULL,
            target_coolant_flow: limits::FULL,
            fission_rate: 0.0,
            damaged: false,
            scram_active: false,
            overdrive,
            fuel_rods: plant::fresh_fuel_load(),
            coolant_quality: limits::FULL,
            coolant_efficiency: 1.0,
            control_rod_noise: 0.0,
            wear: WearFactors::new(),
            chemistry: CoolantChemistry::nominal(),
            grid_zones: default_grid_zones(),
            finance: FinancialEngine::new(config.economy.clone(), config.starting_balance),
            maintenance: config.maintenance.clone(),
            events: EventSystem::new(config.events.clone()),
            steam: SteamField::new(),
            notices: Vec::new(),
        }
    }

    /// Advance the core by `delta_ms`.
    ///
    /// Returns the financial figures for the frame, or `None` once the core
    /// has melted down.
    pub fn update(
        &mut self,
        delta_ms: f64,
        turbine: &mut Turbine,
        rng: &mut impl Rng,
    ) -> Option<FinancialTick> {
        if self.damaged {
            return None;
        }
        self.finance.ledger.begin_tick();
        let seconds = delta_ms / MS_PER_SECOND;
        let was_critical = self.status() == PlantStatus::Danger;

        self.tick_overdrive(delta_ms);

        let noise = if self.control_rod_noise != 0.0 {
            (rng.gen::<f64>() - 0.5) * self.control_rod_noise
        } else {
            0.0
        };
        self.control_rod_position = lag(
            self.control_rod_position,
            self.target_control_rod_position + noise,
            limits::ROD_RESPONSE,
            seconds,
        )
        .clamp(0.0, limits::FULL);

        self.coolant_flow = lag(
            self.coolant_flow,
            self.target_coolant_flow,
            limits::COOLANT_RESPONSE,
            seconds,
        )
        .clamp(0.0, limits::FULL);

        self.fission_rate = ((limits::FULL - self.control_rod_position) / limits::FULL).max(0.0)
            * (self.average_fuel_health() / limits::FULL);

        let power_factor = self.fission_rate * (1.0 + rng.gen::<f64>() * limits::HEAT_NOISE);
        let cooling_factor = (self.coolant_flow / limits::FULL)
            * (self.coolant_quality / limits::FULL)
            * (1.0 + rng.gen::<f64>() * limits::COOLING_NOISE);
        let delta_temp =
            (power_factor * limits::HEAT_GAIN - cooling_factor * limits::COOLING_GAIN) * seconds;
        self.temperature = (self.temperature + delta_temp).max(limits::AMBIENT_TEMP);

        self.power_output =
            self.fission_rate * self.max_power * (self.temperature / limits::NOMINAL_TEMP);

        let power_ratio = self.power_ratio();
        self.steam.update(self.temperature, power_ratio, delta_ms, rng);

        let burn = self.fission_rate * limits::FUEL_BURN_RATE * seconds;
        for rod in &mut self.fuel_rods {
            rod.health = (rod.health - burn).max(0.0);
        }

        let degradation =
            (self.temperature / self.max_temp) * limits::COOLANT_DEGRADATION_RATE * seconds;
        self.coolant_quality = (self.coolant_quality - degradation).max(0.0);

        if self.temperature > self.max_temp {
            self.damaged = true;
            self.finance.ledger.apply_penalty(limits::MELTDOWN_PENALTY);
            log::error!(
                "Core meltdown at {:.0}°C (limit {:.0}°C)",
                self.temperature,
                self.max_temp
            );
            self.notify(PlantNotice::Meltdown);
        } else if !was_critical && self.status() == PlantStatus::Danger {
            log::warn!("Core temperature critical: {:.0}°C", self.temperature);
            self.notify(PlantNotice::HighTemperature);
        }

        if self.scram_active {
            self.target_control_rod_position = limits::FULL;
            self.finance.ledger.apply_penalty(limits::SCRAM_PENALTY);
        }

        events::update_events(self, turbine, delta_ms, rng);

        let wear_multiplier = self.overdrive.wear_multiplier();
        let tick = self.finance.update(
            &FinanceInputs {
                delta_ms,
                turbine_output: turbine.output,
                power_output: self.power_output,
                max_power: self.max_power,
                zones: &self.grid_zones,
                wear_multiplier,
            },
            &mut self.wear,
            &mut self.chemistry,
            rng,
        );
        Some(tick)
    }

    fn tick_overdrive(&mut self, delta_ms: f64) {
        match self.overdrive.tick(delta_ms) {
            Some(OverdriveTransition::Expired) => {
                self.max_temp = self.overdrive.max_temp(self.base_max_temp);
                log::info!("Overdrive expired, cooling down");
                self.notify(PlantNotice::OverdriveDeactivated);
            }
            Some(OverdriveTransition::Ready) => {
                log::debug!("Overdrive ready");
                self.notify(PlantNotice::OverdriveReady);
            }
            None => {}
        }
    }

    // ── Control surface ──────────────────────────────────────────────

    /// Set the rod target, clamped to 0..=100. Ignored after a meltdown or
    /// while SCRAM holds the rods in.
    pub fn adjust_control_rods(&mut self, percent: f64) {
        if self.damaged || self.scram_active {
            return;
        }
        self.target_control_rod_position = percent.clamp(0.0, limits::FULL);
    }

    /// Set the coolant flow target, clamped to 0..=100.
    pub fn adjust_coolant_flow(&mut self, percent: f64) {
        if self.damaged {
            return;
        }
        self.target_coolant_flow = percent.clamp(0.0, limits::FULL);
    }

    /// Emergency shutdown. There is no way to clear it.
    pub fn scram(&mut self) {
        if self.scram_active {
            return;
        }
        self.scram_active = true;
        log::warn!("SCRAM triggered");
        self.notify(PlantNotice::ScramTriggered);
    }

    pub fn can_activate_overdrive(&self) -> bool {
        self.overdrive
            .check_activation(self.total_profit(), self.damaged)
            .is_ok()
    }

    /// Pay for and start overdrive. Returns false, changing nothing, if any
    /// guard fails.
    pub fn activate_overdrive(&mut self) -> bool {
        if let Err(block) = self
            .overdrive
            .check_activation(self.total_profit(), self.damaged)
        {
            log::debug!("Overdrive refused: {:?}", block);
            return false;
        }
        if !self
            .finance
            .ledger
            .try_spend(self.overdrive.config.activation_cost)
        {
            return false;
        }
        self.overdrive.start();
        self.max_temp = self.overdrive.max_temp(self.base_max_temp);
        log::info!(
            "Overdrive active for {:.0}s, limit raised to {:.0}°C",
            self.overdrive.time_remaining() / MS_PER_SECOND,
            self.max_temp
        );
        self.notify(PlantNotice::OverdriveActivated);
        true
    }

    pub fn can_afford_fuel_rods(&self) -> bool {
        self.finance.ledger.can_afford(self.maintenance.fuel)
    }

    pub fn can_afford_coolant(&self) -> bool {
        self.finance.ledger.can_afford(self.maintenance.coolant)
    }

    pub fn can_afford_turbine_maintenance(&self) -> bool {
        self.finance.ledger.can_afford(self.maintenance.turbine)
    }

    pub fn replace_fuel_rods(&mut self) -> bool {
        if !self.purchase(MaintenanceKind::FuelRods, self.maintenance.fuel) {
            return false;
        }
        self.fuel_rods = plant::fresh_fuel_load();
        true
    }

    pub fn replace_coolant(&mut self) -> bool {
        if !self.purchase(MaintenanceKind::Coolant, self.maintenance.coolant) {
            return false;
        }
        self.coolant_quality = limits::FULL;
        true
    }

    pub fn maintain_turbine(&mut self, turbine: &mut Turbine) -> bool {
        if !self.purchase(MaintenanceKind::Turbine, self.maintenance.turbine) {
            return false;
        }
        turbine.maintain();
        true
    }

    fn purchase(&mut self, kind: MaintenanceKind, cost: f64) -> bool {
        if !self.finance.ledger.try_spend(cost) {
            log::debug!(
                "Cannot afford {:?} ({:.0} needed, {:.0} available)",
                kind,
                cost,
                self.total_profit()
            );
            return false;
        }
        log::info!("Purchased {:?} maintenance for {:.0}", kind, cost);
        self.notify(PlantNotice::MaintenancePurchased(kind));
        true
    }

    // ── Read-outs ────────────────────────────────────────────────────

    pub fn power_ratio(&self) -> f64 {
        if self.max_power <= 0.0 {
            0.0
        } else {
            self.power_output / self.max_power
        }
    }

    pub fn average_fuel_health(&self) -> f64 {
        plant::average_fuel_health(&self.fuel_rods)
    }

    pub fn total_profit(&self) -> f64 {
        self.finance.ledger.total_profit
    }

    pub fn status(&self) -> PlantStatus {
        PlantStatus::of(self)
    }

    pub(crate) fn notify(&mut self, notice: PlantNotice) {
        if self.notices.len() >= limits::MAX_PENDING_NOTICES {
            let dropped = self.notices.remove(0);
            log::debug!("Notice buffer full, dropping {dropped:?}");
        }
        self.notices.push(notice);
    }

    /// Take the notices raised since the last call, oldest first.
    ///
    /// Callers driving [`ReactorCore::update`] directly should drain once per
    /// frame. Only the newest notices are kept otherwise.
    pub fn drain_notices(&mut self) -> Vec<PlantNotice> {
        std::mem::take(&mut self.notices)
    }
}

impl Default for ReactorCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedRng;

    fn tick(reactor: &mut ReactorCore, turbine: &mut Turbine, delta_ms: f64) {
        reactor.update(delta_ms, turbine, &mut FixedRng::midpoint());
    }

    #[test]
    fn test_undrained_notices_keep_newest() {
        let mut reactor = ReactorCore::new();
        for _ in 0..limits::MAX_PENDING_NOTICES + 10 {
            reactor.notify(PlantNotice::ScramTriggered);
        }
        reactor.notify(PlantNotice::Meltdown);
        let notices = reactor.drain_notices();
        assert_eq!(notices.len(), limits::MAX_PENDING_NOTICES);
        assert_eq!(notices.last(), Some(&PlantNotice::Meltdown));
        assert!(reactor.drain_notices().is_empty());
    }

    #[test]
    fn test_fresh_core_is_shut_down() {
        let reactor = ReactorCore::new();
        assert_eq!(reactor.temperature, 20.0);
        assert_eq!(reactor.control_rod_position, 100.0);
        assert_eq!(reactor.max_temp, 1000.0);
        assert_eq!(reactor.fuel_rods.len(), 5);
        assert_eq!(reactor.grid_zones.len(), 3);
        assert_eq!(reactor.status(), PlantStatus::Safe);
    }

    #[test]
    fn test_rod_withdrawal_lag_and_fission() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.adjust_control_rods(0.0);
        tick(&mut reactor, &mut turbine, 1000.0);
        assert_eq!(reactor.control_rod_position, 50.0);
        assert_eq!(reactor.fission_rate, 0.5);
        // Full coolant flow out-cools half fission, so the core stays at ambient.
        assert_eq!(reactor.temperature, 20.0);
        assert!((reactor.power_output - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_heating_with_reduced_coolant() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.adjust_control_rods(0.0);
        reactor.adjust_coolant_flow(0.0);
        tick(&mut reactor, &mut turbine, 1000.0);
        assert_eq!(reactor.coolant_flow, 50.0);
        // (0.5 * 1.1 * 70) - (0.5 * 1.05 * 40) = 38.5 - 21.0
        assert!((reactor.temperature - 37.5).abs() < 1e-9);
        for rod in &reactor.fuel_rods {
            assert!((rod.health - 99.995).abs() < 1e-9);
        }
        let expected_quality = 100.0 - (37.5 / 1000.0) * 0.05;
        assert!((reactor.coolant_quality - expected_quality).abs() < 1e-9);
    }

    #[test]
    fn test_long_frame_does_not_overshoot() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.adjust_control_rods(0.0);
        tick(&mut reactor, &mut turbine, 10_000.0);
        assert_eq!(reactor.control_rod_position, 0.0);
    }

    #[test]
    fn test_power_output_exceeds_rating_when_hot() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.control_rod_position = 0.0;
        reactor.target_control_rod_position = 0.0;
        reactor.temperature = 900.0;
        tick(&mut reactor, &mut turbine, 16.0);
        assert!(reactor.power_output > reactor.max_power);
    }

    #[test]
    fn test_sensor_noise_keeps_rods_in_range() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.control_rod_noise = 20.0;
        // Draws of ~1.0 push the rods outward past fully inserted.
        reactor.update(2000.0, &mut turbine, &mut FixedRng::new(0.999));
        assert_eq!(reactor.control_rod_position, 100.0);
        reactor.adjust_control_rods(0.0);
        reactor.update(2000.0, &mut turbine, &mut FixedRng::zero());
        assert_eq!(reactor.control_rod_position, 0.0);
    }

    #[test]
    fn test_control_targets_clamp() {
        let mut reactor = ReactorCore::new();
        reactor.adjust_control_rods(-20.0);
        assert_eq!(reactor.target_control_rod_position, 0.0);
        reactor.adjust_coolant_flow(250.0);
        assert_eq!(reactor.target_coolant_flow, 100.0);
    }

    #[test]
    fn test_scram_locks_rods() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.adjust_control_rods(10.0);
        reactor.scram();
        reactor.scram();
        assert_eq!(reactor.drain_notices(), vec![PlantNotice::ScramTriggered]);
        reactor.adjust_control_rods(0.0);
        assert_eq!(reactor.target_control_rod_position, 10.0);
        tick(&mut reactor, &mut turbine, 16.0);
        assert_eq!(reactor.target_control_rod_position, 100.0);
    }

    #[test]
    fn test_overdrive_purchase_and_expiry() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.finance.ledger.total_profit = 30_000.0;
        assert!(reactor.can_activate_overdrive());
        assert!(reactor.activate_overdrive());
        assert_eq!(reactor.total_profit(), 0.0);
        assert_eq!(reactor.max_temp, 1400.0);
        assert!(!reactor.activate_overdrive());

        tick(&mut reactor, &mut turbine, 45_000.0);
        assert!(!reactor.overdrive.is_active());
        assert_eq!(reactor.max_temp, 1000.0);
        assert_eq!(reactor.overdrive.cooldown_remaining(), 5_000.0);

        reactor.finance.ledger.total_profit = 100_000.0;
        assert!(!reactor.can_activate_overdrive());
        tick(&mut reactor, &mut turbine, 5_000.0);
        assert!(reactor.can_activate_overdrive());

        let notices = reactor.drain_notices();
        assert_eq!(
            notices,
            vec![
                PlantNotice::OverdriveActivated,
                PlantNotice::OverdriveDeactivated,
                PlantNotice::OverdriveReady,
            ]
        );
    }

    #[test]
    fn test_meltdown_sets_damaged() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.finance.ledger.total_profit = 10_000_000.0;
        reactor.temperature = 1500.0;
        let tick_figures = reactor.update(16.0, &mut turbine, &mut FixedRng::midpoint());
        assert!(reactor.damaged);
        assert_eq!(reactor.status(), PlantStatus::Damaged);
        let profit = tick_figures.map(|t| t.profit).unwrap_or_default();
        assert!((reactor.total_profit() - (5_000_000.0 + profit)).abs() < 1e-6);
        assert!(reactor.drain_notices().contains(&PlantNotice::Meltdown));

        let frozen = reactor.clone();
        assert!(reactor
            .update(1000.0, &mut turbine, &mut FixedRng::zero())
            .is_none());
        assert_eq!(reactor, frozen);
    }

    #[test]
    fn test_high_temperature_notice_once() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.control_rod_position = 0.0;
        reactor.target_control_rod_position = 0.0;
        reactor.coolant_flow = 0.0;
        reactor.target_coolant_flow = 0.0;
        // Uncooled full fission heats at 77°C/s.
        reactor.temperature = 790.0;
        tick(&mut reactor, &mut turbine, 1000.0);
        assert_eq!(reactor.status(), PlantStatus::Danger);
        assert_eq!(reactor.drain_notices(), vec![PlantNotice::HighTemperature]);
        tick(&mut reactor, &mut turbine, 1000.0);
        assert!(!reactor.damaged);
        assert!(reactor.drain_notices().is_empty());
    }

    #[test]
    fn test_maintenance_requires_funds() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        reactor.fuel_rods[0].health = 40.0;
        reactor.coolant_quality = 30.0;
        turbine.health = 10.0;

        assert!(!reactor.can_afford_fuel_rods());
        assert!(!reactor.replace_fuel_rods());
        assert_eq!(reactor.fuel_rods[0].health, 40.0);

        reactor.finance.ledger.total_profit = 1_350_000.0;
        assert!(reactor.replace_fuel_rods());
        assert_eq!(reactor.average_fuel_health(), 100.0);
        assert!(reactor.replace_coolant());
        assert_eq!(reactor.coolant_quality, 100.0);
        assert!(reactor.maintain_turbine(&mut turbine));
        assert_eq!(turbine.health, 100.0);
        assert_eq!(reactor.total_profit(), 0.0);
        assert!(!reactor.can_afford_turbine_maintenance());
        assert_eq!(
            reactor.drain_notices(),
            vec![
                PlantNotice::MaintenancePurchased(MaintenanceKind::FuelRods),
                PlantNotice::MaintenancePurchased(MaintenanceKind::Coolant),
                PlantNotice::MaintenancePurchased(MaintenanceKind::Turbine),
            ]
        );
    }

    #[test]
    fn test_finance_uses_turbine_output_passed_in() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        turbine.output = 1000.0;
        let figures = reactor.update(1000.0, &mut turbine, &mut FixedRng::midpoint());
        assert!(figures.map(|t| t.revenue > 0.0).unwrap_or(false));
    }
}
