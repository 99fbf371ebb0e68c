//! Overdrive, a paid, timed boost of the safe temperature ceiling.
//!
//! ```text
//! Inactive --activate--> Active --timer--> Cooldown --timer--> Inactive
//! ```
//!
//! The state is a single enum, so "active while cooling down" cannot be
//! represented.

use serde::{Deserialize, Serialize};

use crate::config::OverdriveConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OverdriveState {
    Inactive,
    Active { remaining_ms: f64 },
    Cooldown { remaining_ms: f64 },
}

/// Why an activation request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverdriveBlock {
    Damaged,
    AlreadyActive,
    CoolingDown,
    InsufficientFunds,
}

/// Transition produced by [`Overdrive::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverdriveTransition {
    /// Boost ran out; cooldown started.
    Expired,
    /// Cooldown finished; ready again.
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overdrive {
    pub config: OverdriveConfig,
    pub state: OverdriveState,
}

impl Overdrive {
    pub fn new(config: OverdriveConfig) -> Self {
        Self {
            config,
            state: OverdriveState::Inactive,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, OverdriveState::Active { .. })
    }

    pub fn time_remaining(&self) -> f64 {
        match self.state {
            OverdriveState::Active { remaining_ms } => remaining_ms,
            _ => 0.0,
        }
    }

    pub fn cooldown_remaining(&self) -> f64 {
        match self.state {
            OverdriveState::Cooldown { remaining_ms } => remaining_ms,
            _ => 0.0,
        }
    }

    /// Check every activation guard without changing anything.
    pub fn check_activation(&self, balance: f64, damaged: bool) -> Result<(), OverdriveBlock> {
        if damaged {
            return Err(OverdriveBlock::Damaged);
        }
        match self.state {
            OverdriveState::Active { .. } => Err(OverdriveBlock::AlreadyActive),
            OverdriveState::Cooldown { .. } => Err(OverdriveBlock::CoolingDown),
            OverdriveState::Inactive if balance < self.config.activation_cost => {
                Err(OverdriveBlock::InsufficientFunds)
            }
            OverdriveState::Inactive => Ok(()),
        }
    }

    /// Start the boost timer. Callers check guards and take payment first.
    pub fn start(&mut self) {
        self.state = OverdriveState::Active {
            remaining_ms: self.config.duration_ms,
        };
    }

    /// Advance timers by `delta_ms`.
    pub fn tick(&mut self, delta_ms: f64) -> Option<OverdriveTransition> {
        match self.state {
            OverdriveState::Active { remaining_ms } => {
                let remaining_ms = remaining_ms - delta_ms;
                if remaining_ms <= 0.0 {
                    self.state = if self.config.cooldown_ms > 0.0 {
                        OverdriveState::Cooldown {
                            remaining_ms: self.config.cooldown_ms,
                        }
                    } else {
                        OverdriveState::Inactive
                    };
                    Some(OverdriveTransition::Expired)
                } else {
                    self.state = OverdriveState::Active { remaining_ms };
                    None
                }
            }
            OverdriveState::Cooldown { remaining_ms } => {
                let remaining_ms = remaining_ms - delta_ms;
                if remaining_ms <= 0.0 {
                    self.state = OverdriveState::Inactive;
                    Some(OverdriveTransition::Ready)
                } else {
                    self.state = OverdriveState::Cooldown { remaining_ms };
                    None
                }
            }
            OverdriveState::Inactive => None,
        }
    }

    /// Temperature ceiling for a core whose unboosted limit is `base_max_temp`.
    pub fn max_temp(&self, base_max_temp: f64) -> f64 {
        if self.is_active() {
            base_max_temp + self.config.temp_bonus
        } else {
            base_max_temp
        }
    }

    /// Multiplier applied to component wear this tick.
    pub fn wear_multiplier(&self) -> f64 {
        if self.is_active() {
            self.config.wear_multiplier
        } else {
            1.0
        }
    }
}

impl Default for Overdrive {
    fn default() -> Self {
        Self::new(OverdriveConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards() {
        let od = Overdrive::default();
        assert_eq!(od.check_activation(29_999.0, false), Err(OverdriveBlock::InsufficientFunds));
        assert_eq!(od.check_activation(1e9, true), Err(OverdriveBlock::Damaged));
        assert_eq!(od.check_activation(30_000.0, false), Ok(()));

        let mut active = od.clone();
        active.start();
        assert_eq!(active.check_activation(1e9, false), Err(OverdriveBlock::AlreadyActive));
    }

    #[test]
    fn test_full_cycle() {
        let mut od = Overdrive::default();
        od.start();
        assert!(od.is_active());
        assert_eq!(od.time_remaining(), 45_000.0);
        assert_eq!(od.max_temp(1000.0), 1400.0);
        assert_eq!(od.wear_multiplier(), 3.0);

        assert_eq!(od.tick(44_000.0), None);
        assert_eq!(od.tick(1_000.0), Some(OverdriveTransition::Expired));
        assert!(!od.is_active());
        assert_eq!(od.cooldown_remaining(), 5_000.0);
        assert_eq!(od.max_temp(1000.0), 1000.0);
        assert_eq!(od.check_activation(1e9, false), Err(OverdriveBlock::CoolingDown));

        assert_eq!(od.tick(4_000.0), None);
        assert_eq!(od.cooldown_remaining(), 1_000.0);
        assert_eq!(od.tick(2_000.0), Some(OverdriveTransition::Ready));
        assert_eq!(od.state, OverdriveState::Inactive);
        assert_eq!(od.cooldown_remaining(), 0.0);
    }

    #[test]
    fn test_zero_cooldown_skips_to_inactive() {
        let mut od = Overdrive::new(OverdriveConfig {
            cooldown_ms: 0.0,
            ..OverdriveConfig::default()
        });
        od.start();
        assert_eq!(od.tick(50_000.0), Some(OverdriveTransition::Expired));
        assert_eq!(od.state, OverdriveState::Inactive);
    }

    #[test]
    fn test_inactive_tick_is_noop() {
        let mut od = Overdrive::default();
        assert_eq!(od.tick(1_000.0), None);
        assert_eq!(od.state, OverdriveState::Inactive);
    }
}
