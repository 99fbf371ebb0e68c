//! Steam turbine: RPM lag, shaft output and wear.

use serde::{Deserialize, Serialize};

use crate::constants::{turbine, MS_PER_SECOND};

/// Rotational model converting steam input into shaft output.
///
/// `output` always satisfies
/// `output = (rpm / max_rpm) * max_output * efficiency * (health / 100)`
/// as of the last [`Turbine::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turbine {
    pub rpm: f64,
    pub max_rpm: f64,
    /// 0.5 at zero health, 1.0 at full health.
    pub efficiency: f64,
    /// 0..=100
    pub health: f64,
    /// Percent of rated steam flow. Follows the reactor's power ratio, so it
    /// can exceed 100 while the core runs above rated power.
    pub steam_input: f64,
    pub output: f64,
    pub max_output: f64,
    /// Shaft angle in radians, accumulated for rendering only.
    pub angle: f64,
}

impl Turbine {
    pub fn new() -> Self {
        Self {
            rpm: 0.0,
            max_rpm: turbine::MAX_RPM,
            efficiency: 1.0,
            health: 100.0,
            steam_input: 0.0,
            output: 0.0,
            max_output: turbine::MAX_OUTPUT,
            angle: 0.0,
        }
    }

    /// Set steam input from the reactor's power ratio (0.0 = idle, 1.0 = rated).
    pub fn feed_steam(&mut self, power_ratio: f64) {
        self.steam_input = (power_ratio * 100.0).max(0.0);
    }

    /// Advance the turbine by `delta_ms`.
    pub fn update(&mut self, delta_ms: f64) {
        let seconds = delta_ms / MS_PER_SECOND;

        let target_rpm = (self.steam_input / 100.0) * self.max_rpm;
        let response = (seconds * turbine::RPM_RESPONSE).min(1.0);
        self.rpm += (target_rpm - self.rpm) * response;

        self.angle += (self.rpm / 60.0) * seconds * std::f64::consts::TAU;

        self.output = self.rpm_ratio() * self.max_output * self.efficiency * (self.health / 100.0);

        self.health = (self.health - self.rpm_ratio() * turbine::WEAR_RATE * seconds).max(0.0);
        self.recompute_efficiency();
    }

    /// Restore full health and efficiency. Payment is handled by the reactor.
    pub fn maintain(&mut self) {
        self.health = 100.0;
        self.efficiency = 1.0;
    }

    /// Efficiency as implied by current health.
    pub fn recompute_efficiency(&mut self) {
        self.efficiency =
            turbine::BASE_EFFICIENCY + (self.health / 100.0) * (1.0 - turbine::BASE_EFFICIENCY);
    }

    pub fn rpm_ratio(&self) -> f64 {
        if self.max_rpm <= 0.0 {
            0.0
        } else {
            self.rpm / self.max_rpm
        }
    }

    /// Share of rated output currently delivered.
    pub fn output_ratio(&self) -> f64 {
        if self.max_output <= 0.0 {
            0.0
        } else {
            self.output / self.max_output
        }
    }
}

impl Default for Turbine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_turbine_stays_still() {
        let mut t = Turbine::new();
        t.update(1000.0);
        assert_eq!(t.rpm, 0.0);
        assert_eq!(t.output, 0.0);
        assert_eq!(t.health, 100.0);
        assert_eq!(t.angle, 0.0);
    }

    #[test]
    fn test_rpm_lag_closes_thirty_percent_per_second() {
        let mut t = Turbine::new();
        t.steam_input = 100.0;
        t.update(1000.0);
        assert!((t.rpm - 1080.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_step_does_not_overshoot() {
        let mut t = Turbine::new();
        t.steam_input = 50.0;
        t.update(60_000.0);
        assert!((t.rpm - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn test_output_uses_pre_wear_health() {
        let mut t = Turbine::new();
        t.rpm = 3600.0;
        t.steam_input = 100.0;
        t.update(1000.0);
        // Output is computed before this tick's wear is applied.
        assert!((t.output - 1000.0).abs() < 1e-9);
        assert!(t.health < 100.0);
        assert!(t.efficiency < 1.0);
    }

    #[test]
    fn test_efficiency_follows_health() {
        let mut t = Turbine::new();
        t.health = 40.0;
        t.recompute_efficiency();
        assert!((t.efficiency - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_angle_accumulates_radians() {
        let mut t = Turbine::new();
        t.rpm = 60.0;
        t.steam_input = 60.0 / 3600.0 * 100.0;
        t.update(1000.0);
        // One revolution per second at 60 RPM.
        assert!((t.angle - std::f64::consts::TAU).abs() < 1e-9);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let mut t = Turbine::new();
        t.health = 0.0005;
        t.rpm = 3600.0;
        t.steam_input = 100.0;
        t.update(10_000.0);
        assert_eq!(t.health, 0.0);
        assert!((t.efficiency - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_maintain_restores() {
        let mut t = Turbine::new();
        t.health = 12.0;
        t.efficiency = 0.56;
        t.maintain();
        assert_eq!(t.health, 100.0);
        assert_eq!(t.efficiency, 1.0);
    }

    #[test]
    fn test_feed_steam_tracks_power_ratio() {
        let mut t = Turbine::new();
        t.feed_steam(0.42);
        assert!((t.steam_input - 42.0).abs() < 1e-9);
        t.feed_steam(1.3);
        assert!((t.steam_input - 130.0).abs() < 1e-9);
    }
}
