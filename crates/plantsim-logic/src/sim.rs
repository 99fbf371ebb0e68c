//! Session context. Owns the reactor, the turbine, and the random source,
//! and advances them in the order the one-frame revenue lag depends on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::PlantConfig;
use crate::cues::{AmbientChange, AmbientTracker, PlantNotice, PlantStatus};
use crate::economy::FinancialTick;
use crate::particles::SteamParticle;
use crate::reactor::ReactorCore;
use crate::turbine::Turbine;

/// What one [`Simulation::step`] produced for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// `None` once the core has melted down.
    pub finance: Option<FinancialTick>,
    pub notices: Vec<PlantNotice>,
    pub ambient: AmbientChange,
}

pub struct Simulation<R = StdRng> {
    pub reactor: ReactorCore,
    pub turbine: Turbine,
    pub ambient: AmbientTracker,
    rng: R,
    tick_ms: f64,
    elapsed_ms: f64,
    ticks: u64,
}

impl Simulation<StdRng> {
    /// New session seeded from `config.seed`.
    pub fn new(config: &PlantConfig) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(config.seed))
    }
}

impl<R: Rng> Simulation<R> {
    pub fn with_rng(config: &PlantConfig, rng: R) -> Self {
        Self {
            reactor: ReactorCore::with_config(config),
            turbine: Turbine::new(),
            ambient: AmbientTracker::new(),
            rng,
            tick_ms: config.tick_ms,
            elapsed_ms: 0.0,
            ticks: 0,
        }
    }

    /// One frame: feed steam from last frame's power, run the reactor
    /// (which bills the turbine's last-frame output), then spin the turbine.
    pub fn step(&mut self, delta_ms: f64) -> StepReport {
        self.turbine.feed_steam(self.reactor.power_ratio());
        let finance = self
            .reactor
            .update(delta_ms, &mut self.turbine, &mut self.rng);
        self.turbine.update(delta_ms);

        self.elapsed_ms += delta_ms;
        self.ticks += 1;

        StepReport {
            finance,
            notices: self.reactor.drain_notices(),
            ambient: self.ambient.observe(&self.reactor, &self.turbine),
        }
    }

    /// Step at the configured tick length until `duration_ms` has elapsed.
    /// Returns every report in order.
    pub fn run_for(&mut self, duration_ms: f64) -> Vec<StepReport> {
        let full_ticks = (duration_ms / self.tick_ms).floor().max(0.0) as u64;
        let mut reports: Vec<StepReport> =
            (0..full_ticks).map(|_| self.step(self.tick_ms)).collect();
        // Sub-microsecond leftovers are float noise, not a frame.
        let rest = duration_ms - full_ticks as f64 * self.tick_ms;
        if rest > 1e-6 {
            reports.push(self.step(rest));
        }
        reports
    }

    /// Paid turbine overhaul; the reactor holds the balance.
    pub fn maintain_turbine(&mut self) -> bool {
        self.reactor.maintain_turbine(&mut self.turbine)
    }

    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> PlantSnapshot {
        PlantSnapshot::capture(&self.reactor, &self.turbine, self.elapsed_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurbineView {
    pub rpm: f64,
    pub max_rpm: f64,
    pub health: f64,
    pub efficiency: f64,
    pub output: f64,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    pub name: String,
    pub description: String,
    pub seconds_remaining: u64,
    pub target_output: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneView {
    pub name: String,
    pub demand_met: f64,
    pub stable: bool,
}

/// Read-only view of everything the renderer, audio, and UI consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantSnapshot {
    pub elapsed_ms: f64,
    pub temperature: f64,
    pub max_temp: f64,
    pub power_output: f64,
    pub max_power: f64,
    pub control_rod_position: f64,
    pub coolant_flow: f64,
    pub coolant_quality: f64,
    pub fuel_rod_health: Vec<f64>,
    pub steam_particles: Vec<SteamParticle>,
    /// Front entry is the one on the banner.
    pub events: Vec<EventView>,
    pub power_demand: f64,
    pub damaged: bool,
    pub scram_active: bool,
    pub overdrive_active: bool,
    pub overdrive_time_remaining: f64,
    pub overdrive_cooldown_remaining: f64,
    pub status: PlantStatus,
    pub status_message: String,
    pub total_profit: f64,
    pub hourly_revenue: f64,
    pub hourly_costs: f64,
    pub hourly_profit: f64,
    /// Chemistry gauges, each 0..=100.
    pub ph_gauge: f64,
    pub conductivity_gauge: f64,
    pub oxygen_gauge: f64,
    pub zones: Vec<ZoneView>,
    pub turbine: TurbineView,
}

impl PlantSnapshot {
    pub fn capture(reactor: &ReactorCore, turbine: &Turbine, elapsed_ms: f64) -> Self {
        let hourly = reactor.finance.ledger.hourly();
        let gauges = reactor.chemistry.gauges();
        let status = reactor.status();
        Self {
            elapsed_ms,
            temperature: reactor.temperature,
            max_temp: reactor.max_temp,
            power_output: reactor.power_output,
            max_power: reactor.max_power,
            control_rod_position: reactor.control_rod_position,
            coolant_flow: reactor.coolant_flow,
            coolant_quality: reactor.coolant_quality,
            fuel_rod_health: reactor.fuel_rods.iter().map(|r| r.health).collect(),
            steam_particles: reactor.steam.particles.clone(),
            events: reactor
                .events
                .active
                .iter()
                .map(|e| EventView {
                    name: e.name().to_string(),
                    description: e.description().to_string(),
                    seconds_remaining: e.seconds_remaining(),
                    target_output: e.kind.target_output(),
                })
                .collect(),
            power_demand: reactor.events.power_demand,
            damaged: reactor.damaged,
            scram_active: reactor.scram_active,
            overdrive_active: reactor.overdrive.is_active(),
            overdrive_time_remaining: reactor.overdrive.time_remaining(),
            overdrive_cooldown_remaining: reactor.overdrive.cooldown_remaining(),
            status,
            status_message: status.message().to_string(),
            total_profit: reactor.total_profit(),
            hourly_revenue: hourly.revenue,
            hourly_costs: hourly.operating_costs,
            hourly_profit: hourly.profit,
            ph_gauge: gauges.ph,
            conductivity_gauge: gauges.conductivity,
            oxygen_gauge: gauges.dissolved_oxygen,
            zones: reactor
                .grid_zones
                .iter()
                .map(|z| ZoneView {
                    name: z.name.clone(),
                    demand_met: z.demand_met(turbine.output, reactor.max_power),
                    stable: z.is_stable(turbine.output, reactor.max_power),
                })
                .collect(),
            turbine: TurbineView {
                rpm: turbine.rpm,
                max_rpm: turbine.max_rpm,
                health: turbine.health,
                efficiency: turbine.efficiency,
                output: turbine.output,
                angle: turbine.angle,
            },
        }
    }
}
