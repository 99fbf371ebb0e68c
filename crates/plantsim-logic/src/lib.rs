//! Pure simulation logic for PlantSim.
//!
//! A reactor core driving a steam turbine, wrapped in a grid economy and a
//! timed event system. Nothing here renders, plays audio, or reads input:
//! callers issue commands on [`reactor::ReactorCore`] and read plain fields
//! back, so every rule is unit-testable and the same code can back a native
//! window, a web build, or the headless harness.
//!
//! All times are milliseconds. Every random draw comes from a caller-supplied
//! [`rand::Rng`], so a seeded session replays exactly.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Tunable session parameters loaded from JSON |
//! | [`constants`] | Physics, cost, and event tuning values |
//! | [`cues`] | Notices, ambient sound levels, status banner |
//! | [`economy`] | Grid revenue, operating costs, profit ledger |
//! | [`events`] | Event catalog and scheduler |
//! | [`overdrive`] | Paid temperature-ceiling boost state machine |
//! | [`particles`] | Steam plume visuals |
//! | [`plant`] | Fuel rods, component wear, coolant chemistry, grid zones |
//! | [`reactor`] | Core dynamics and operator controls |
//! | [`sim`] | Session context and frame ordering |
//! | [`turbine`] | RPM lag, shaft output, turbine wear |

pub mod config;
pub mod constants;
pub mod cues;
pub mod economy;
pub mod events;
pub mod overdrive;
pub mod particles;
pub mod plant;
pub mod reactor;
pub mod sim;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod turbine;

pub use config::{ConfigError, PlantConfig};
pub use reactor::ReactorCore;
pub use sim::{PlantSnapshot, Simulation};
pub use turbine::Turbine;
