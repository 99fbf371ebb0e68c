//! Signals for the presentation layer: one-shot plant notices, ambient
//! sound levels and the status banner.
//!
//! Nothing here plays sound or draws anything. Audio and UI read these values
//! and decide what to do with them.

use serde::{Deserialize, Serialize};

use crate::constants::reactor as limits;
use crate::events::EventKind;
use crate::reactor::ReactorCore;
use crate::turbine::Turbine;

/// Paid maintenance operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaintenanceKind {
    FuelRods,
    Coolant,
    Turbine,
}

/// A one-shot transition the reactor reports to its observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlantNotice {
    OverdriveActivated,
    OverdriveDeactivated,
    OverdriveReady,
    ScramTriggered,
    MaintenancePurchased(MaintenanceKind),
    /// Temperature rose into the danger band.
    HighTemperature,
    Meltdown,
    EventStarted(EventKind),
    EventExpired(EventKind),
}

impl PlantNotice {
    /// Whether this notice should trigger the alarm sound.
    pub fn is_alarm(&self) -> bool {
        matches!(
            self,
            PlantNotice::ScramTriggered | PlantNotice::HighTemperature | PlantNotice::Meltdown
        )
    }
}

/// Reactor hum loop selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HumLevel {
    Low,
    Medium,
    High,
}

impl HumLevel {
    pub fn from_power(power_ratio: f64, overdrive_active: bool) -> Self {
        if overdrive_active || power_ratio > 0.66 {
            HumLevel::High
        } else if power_ratio > 0.33 {
            HumLevel::Medium
        } else {
            HumLevel::Low
        }
    }
}

/// Turbine whine loop selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WhineLevel {
    Low,
    High,
}

impl WhineLevel {
    pub fn from_rpm(rpm_ratio: f64) -> Self {
        if rpm_ratio >= 0.5 {
            WhineLevel::High
        } else {
            WhineLevel::Low
        }
    }
}

/// Level changes reported by [`AmbientTracker::observe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmbientChange {
    pub hum: Option<HumLevel>,
    pub whine: Option<WhineLevel>,
}

impl AmbientChange {
    pub fn is_empty(&self) -> bool {
        self.hum.is_none() && self.whine.is_none()
    }
}

/// Recomputes ambient levels every tick and reports only the changes.
#[derive(Debug, Clone, Default)]
pub struct AmbientTracker {
    hum: Option<HumLevel>,
    whine: Option<WhineLevel>,
}

impl AmbientTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, reactor: &ReactorCore, turbine: &Turbine) -> AmbientChange {
        let hum = HumLevel::from_power(reactor.power_ratio(), reactor.overdrive.is_active());
        let whine = WhineLevel::from_rpm(turbine.rpm_ratio());

        let mut change = AmbientChange::default();
        if self.hum != Some(hum) {
            self.hum = Some(hum);
            change.hum = Some(hum);
        }
        if self.whine != Some(whine) {
            self.whine = Some(whine);
            change.whine = Some(whine);
        }
        change
    }

    pub fn hum(&self) -> Option<HumLevel> {
        self.hum
    }

    pub fn whine(&self) -> Option<WhineLevel> {
        self.whine
    }
}

/// Status banner severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlantStatus {
    Safe,
    Warning,
    Danger,
    Damaged,
}

impl PlantStatus {
    pub fn classify(temperature: f64, max_temp: f64, damaged: bool) -> Self {
        if damaged {
            PlantStatus::Damaged
        } else if temperature > max_temp * limits::DANGER_TEMP_RATIO {
            PlantStatus::Danger
        } else if temperature > max_temp * limits::WARNING_TEMP_RATIO {
            PlantStatus::Warning
        } else {
            PlantStatus::Safe
        }
    }

    pub fn of(reactor: &ReactorCore) -> Self {
        Self::classify(reactor.temperature, reactor.max_temp, reactor.damaged)
    }

    pub fn message(self) -> &'static str {
        match self {
            PlantStatus::Safe => "All systems functioning normally.",
            PlantStatus::Warning => "High temperature warning",
            PlantStatus::Danger => "CRITICAL TEMPERATURE WARNING",
            PlantStatus::Damaged => "REACTOR DAMAGED - CORE MELTDOWN",
        }
    }

    /// Whether the alarm banner is shown.
    pub fn is_alarming(self) -> bool {
        self >= PlantStatus::Danger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hum_levels() {
        assert_eq!(HumLevel::from_power(0.1, false), HumLevel::Low);
        assert_eq!(HumLevel::from_power(0.33, false), HumLevel::Low);
        assert_eq!(HumLevel::from_power(0.5, false), HumLevel::Medium);
        assert_eq!(HumLevel::from_power(0.7, false), HumLevel::High);
        assert_eq!(HumLevel::from_power(0.0, true), HumLevel::High);
    }

    #[test]
    fn test_whine_levels() {
        assert_eq!(WhineLevel::from_rpm(0.49), WhineLevel::Low);
        assert_eq!(WhineLevel::from_rpm(0.5), WhineLevel::High);
    }

    #[test]
    fn test_tracker_reports_only_changes() {
        let mut reactor = ReactorCore::new();
        let mut turbine = Turbine::new();
        let mut tracker = AmbientTracker::new();

        let first = tracker.observe(&reactor, &turbine);
        assert_eq!(first.hum, Some(HumLevel::Low));
        assert_eq!(first.whine, Some(WhineLevel::Low));

        assert!(tracker.observe(&reactor, &turbine).is_empty());

        reactor.power_output = 500.0;
        let change = tracker.observe(&reactor, &turbine);
        assert_eq!(change.hum, Some(HumLevel::Medium));
        assert_eq!(change.whine, None);

        turbine.rpm = 3000.0;
        let change = tracker.observe(&reactor, &turbine);
        assert_eq!(change.hum, None);
        assert_eq!(change.whine, Some(WhineLevel::High));
        assert_eq!(tracker.whine(), Some(WhineLevel::High));
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(PlantStatus::classify(500.0, 1000.0, false), PlantStatus::Safe);
        assert_eq!(PlantStatus::classify(650.0, 1000.0, false), PlantStatus::Warning);
        assert_eq!(PlantStatus::classify(850.0, 1000.0, false), PlantStatus::Danger);
        // Overdrive raises the bands with the ceiling.
        assert_eq!(PlantStatus::classify(850.0, 1400.0, false), PlantStatus::Warning);
        assert_eq!(PlantStatus::classify(20.0, 1000.0, true), PlantStatus::Damaged);
        assert!(PlantStatus::Damaged.is_alarming());
        assert!(!PlantStatus::Warning.is_alarming());
        assert_eq!(PlantStatus::Damaged.message(), "REACTOR DAMAGED - CORE MELTDOWN");
    }

    #[test]
    fn test_alarm_notices() {
        assert!(PlantNotice::Meltdown.is_alarm());
        assert!(PlantNotice::ScramTriggered.is_alarm());
        assert!(!PlantNotice::OverdriveActivated.is_alarm());
        assert!(!PlantNotice::MaintenancePurchased(MaintenanceKind::Coolant).is_alarm());
    }
}
