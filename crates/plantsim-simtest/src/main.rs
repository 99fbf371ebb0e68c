//! PlantSim Headless Simulation Harness
//!
//! Drives seeded plant sessions through scripted operator scenarios and
//! checks the outcome. Runs entirely in-process: no rendering, no audio.
//!
//! Usage:
//!   cargo run -p plantsim-simtest
//!   cargo run -p plantsim-simtest -- --verbose --seed 7 --seconds 600
//!   cargo run -p plantsim-simtest -- --config plant.json
//!
//! Log output honours `RUST_LOG` (default `info`, `debug` with `--verbose`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use plantsim_logic::cues::{HumLevel, PlantNotice, PlantStatus};
use plantsim_logic::{PlantConfig, Simulation};
use serde::Serialize;

// ── Command line ────────────────────────────────────────────────────────

struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    seconds: f64,
    verbose: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        seed: None,
        seconds: 300.0,
        verbose: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" => args.verbose = true,
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--seed" => {
                let value = iter.next().context("--seed needs a value")?;
                args.seed = Some(value.parse().with_context(|| format!("bad seed `{value}`"))?);
            }
            "--seconds" => {
                let value = iter.next().context("--seconds needs a value")?;
                args.seconds = value
                    .parse()
                    .with_context(|| format!("bad duration `{value}`"))?;
                if args.seconds.is_nan() || args.seconds <= 0.0 {
                    bail!("--seconds must be positive");
                }
            }
            other => bail!("unknown argument `{other}`"),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<PlantConfig> {
    let mut config = match &args.config {
        Some(path) => PlantConfig::load(path)
            .with_context(|| format!("loading plant config from {}", path.display()))?,
        None => PlantConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

fn run(args: &Args) -> Result<bool> {
    let config = load_config(args)?;
    println!("=== PlantSim Simulation Harness (seed {}) ===\n", config.seed);

    let mut results = Vec::new();

    // 1. Configuration handling
    results.extend(validate_config());

    // 2. Cold, shut-down plant
    results.extend(validate_cold_start(&config));

    // 3. Closed-loop operation at a steady temperature
    let summary = run_autopilot(&config, args.seconds, &mut results);

    // 4. Overdrive purchase, expiry, cooldown
    results.extend(validate_overdrive(&config));

    // 5. Uncontrolled excursion to meltdown
    results.extend(validate_meltdown(&config));

    // 6. Emergency shutdown
    results.extend(validate_scram(&config));

    // 7. Paid maintenance
    results.extend(validate_maintenance(&config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    if args.verbose {
        let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
        println!("\n--- Autopilot summary ---\n{json}");
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    Ok(failed == 0)
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config() -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let partial = PlantConfig::from_json_str(r#"{ "overdrive": { "activation_cost": 50000 } }"#);
    results.push(check(
        "config_partial_override",
        matches!(&partial, Ok(c) if c.overdrive.activation_cost == 50_000.0
            && c.economy == PlantConfig::default().economy),
        "partial JSON overrides only named fields".into(),
    ));

    let bad = PlantConfig::from_json_str(r#"{ "tick_ms": 0 }"#);
    results.push(check(
        "config_rejects_zero_tick",
        bad.is_err(),
        match bad {
            Err(e) => format!("rejected: {e}"),
            Ok(_) => "zero tick accepted".into(),
        },
    ));

    let garbage = PlantConfig::from_json_str("{ not json");
    results.push(check(
        "config_rejects_malformed",
        garbage.is_err(),
        "malformed JSON is an error".into(),
    ));

    results
}

// ── 2. Cold start ───────────────────────────────────────────────────────

fn validate_cold_start(config: &PlantConfig) -> Vec<TestResult> {
    println!("--- Cold Start ---");
    let mut results = Vec::new();
    let mut sim = Simulation::new(config);
    sim.run_for(10_000.0);

    let r = &sim.reactor;
    results.push(check(
        "cold_core_stays_ambient",
        r.temperature == 20.0 && r.fission_rate < 0.2,
        format!("T={:.1}°C fission={:.3}", r.temperature, r.fission_rate),
    ));
    results.push(check(
        "cold_turbine_idle",
        sim.turbine.output < 10.0,
        format!("rpm={:.1} output={:.1}", sim.turbine.rpm, sim.turbine.output),
    ));
    results.push(check(
        "cold_status_safe",
        r.status() == PlantStatus::Safe,
        r.status().message().into(),
    ));
    results.push(check(
        "cold_plant_costs_money",
        r.total_profit() < config.starting_balance,
        format!("balance {:.0}", r.total_profit()),
    ));

    results
}

// ── 3. Autopilot ────────────────────────────────────────────────────────

const SETPOINT: f64 = 600.0;
/// Rod position that roughly balances fresh fuel against full cooling.
const BALANCE_RODS: f64 = 45.0;
const GAIN: f64 = 0.1;
/// Degraded coolant drifts the controller's settling point upward.
const COOLANT_SWAP_QUALITY: f64 = 80.0;

/// Proportional rod controller holding the core near the setpoint.
fn autopilot_rods(temperature: f64) -> f64 {
    BALANCE_RODS + (temperature - SETPOINT) * GAIN
}

#[derive(Debug, Serialize)]
struct AutopilotSummary {
    seconds: f64,
    ticks: u64,
    min_temperature: f64,
    max_temperature: f64,
    events_started: usize,
    hum_changes: usize,
    alarms: usize,
    final_state: plantsim_logic::PlantSnapshot,
}

fn run_autopilot(
    config: &PlantConfig,
    seconds: f64,
    results: &mut Vec<TestResult>,
) -> AutopilotSummary {
    println!("--- Autopilot ({seconds:.0}s) ---");
    let mut sim = Simulation::new(config);
    sim.reactor.adjust_coolant_flow(100.0);

    let warmup_ms = 60_000.0_f64.min(seconds * 500.0);
    let mut min_temperature = f64::INFINITY;
    let mut max_temperature: f64 = 0.0;
    let mut events_started = 0;
    let mut hum_changes = 0;
    let mut alarms = 0;
    let mut high_hum_seen = false;

    while sim.elapsed_ms() < seconds * 1000.0 {
        let rods = autopilot_rods(sim.reactor.temperature);
        sim.reactor.adjust_control_rods(rods);
        if sim.reactor.coolant_quality < COOLANT_SWAP_QUALITY && sim.reactor.can_afford_coolant() {
            sim.reactor.replace_coolant();
        }
        let report = sim.step(sim.tick_ms());

        if sim.elapsed_ms() > warmup_ms {
            min_temperature = min_temperature.min(sim.reactor.temperature);
            max_temperature = max_temperature.max(sim.reactor.temperature);
        }
        for notice in &report.notices {
            if matches!(notice, PlantNotice::EventStarted(_)) {
                events_started += 1;
            }
            if notice.is_alarm() {
                alarms += 1;
            }
        }
        if let Some(level) = report.ambient.hum {
            hum_changes += 1;
            high_hum_seen |= level == HumLevel::High;
        }
        if sim.reactor.damaged {
            break;
        }
    }

    let r = &sim.reactor;
    results.push(check(
        "autopilot_no_meltdown",
        !r.damaged,
        format!("final T={:.1}°C after {:.0}s", r.temperature, sim.elapsed_ms() / 1000.0),
    ));
    results.push(check(
        "autopilot_holds_band",
        min_temperature > 400.0 && max_temperature < 800.0,
        format!("T in [{min_temperature:.1}, {max_temperature:.1}] after warm-up"),
    ));
    results.push(check(
        "autopilot_turbine_producing",
        sim.turbine.output > 300.0,
        format!(
            "turbine {:.0} MW at {:.0} rpm",
            sim.turbine.output, sim.turbine.rpm
        ),
    ));
    results.push(check(
        "autopilot_profitable",
        r.finance.ledger.profit > 0.0,
        format!(
            "hourly profit {:.0}, balance {:.0}",
            r.finance.ledger.hourly().profit,
            r.total_profit()
        ),
    ));
    results.push(check(
        "autopilot_ambient_follows_power",
        hum_changes >= 2 && high_hum_seen,
        format!("{hum_changes} hum changes, {alarms} alarms, {events_started} events"),
    ));
    results.push(check(
        "autopilot_event_cap",
        r.events.len() <= config.events.max_concurrent,
        format!("{} events active", r.events.len()),
    ));

    AutopilotSummary {
        seconds: sim.elapsed_ms() / 1000.0,
        ticks: sim.ticks(),
        min_temperature,
        max_temperature,
        events_started,
        hum_changes,
        alarms,
        final_state: sim.snapshot(),
    }
}

// ── 4. Overdrive ────────────────────────────────────────────────────────

fn validate_overdrive(config: &PlantConfig) -> Vec<TestResult> {
    println!("--- Overdrive ---");
    let mut results = Vec::new();
    let mut sim = Simulation::new(config);
    let cost = config.overdrive.activation_cost;

    sim.reactor.finance.ledger.total_profit = 0.0;
    results.push(check(
        "overdrive_needs_funds",
        !sim.reactor.activate_overdrive() && !sim.reactor.overdrive.is_active(),
        "refused at zero balance".into(),
    ));

    sim.reactor.finance.ledger.total_profit = cost;
    let activated = sim.reactor.activate_overdrive();
    results.push(check(
        "overdrive_activates",
        activated
            && sim.reactor.total_profit() == 0.0
            && sim.reactor.max_temp == sim.reactor.base_max_temp + config.overdrive.temp_bonus,
        format!("max_temp={:.0}", sim.reactor.max_temp),
    ));

    let mut notices = Vec::new();
    for report in sim.run_for(config.overdrive.duration_ms + sim.tick_ms()) {
        notices.extend(report.notices);
    }
    let od = &sim.reactor.overdrive;
    results.push(check(
        "overdrive_expires_into_cooldown",
        !od.is_active()
            && od.cooldown_remaining() > 0.0
            && sim.reactor.max_temp == sim.reactor.base_max_temp
            && notices.contains(&PlantNotice::OverdriveDeactivated),
        format!("cooldown {:.0}ms", od.cooldown_remaining()),
    ));

    sim.reactor.finance.ledger.total_profit = cost * 10.0;
    results.push(check(
        "overdrive_blocked_in_cooldown",
        !sim.reactor.activate_overdrive(),
        "second activation refused".into(),
    ));

    sim.run_for(config.overdrive.cooldown_ms + sim.tick_ms());
    results.push(check(
        "overdrive_ready_after_cooldown",
        sim.reactor.can_activate_overdrive(),
        format!("balance {:.0}", sim.reactor.total_profit()),
    ));

    results
}

// ── 5. Meltdown ─────────────────────────────────────────────────────────

fn validate_meltdown(config: &PlantConfig) -> Vec<TestResult> {
    println!("--- Meltdown ---");
    let mut results = Vec::new();
    let mut sim = Simulation::new(config);
    sim.reactor.finance.ledger.total_profit = 6_000_000.0;
    sim.reactor.adjust_control_rods(0.0);
    sim.reactor.adjust_coolant_flow(0.0);

    let mut meltdown_notice = false;
    while !sim.reactor.damaged && sim.elapsed_ms() < 120_000.0 {
        let report = sim.step(sim.tick_ms());
        meltdown_notice |= report.notices.contains(&PlantNotice::Meltdown);
    }
    let r = &sim.reactor;
    results.push(check(
        "meltdown_reached",
        r.damaged && meltdown_notice,
        format!("damaged after {:.1}s at {:.0}°C", sim.elapsed_ms() / 1000.0, r.temperature),
    ));
    results.push(check(
        "meltdown_penalty_charged",
        r.finance.ledger.adjustments <= -5_000_000.0,
        format!("balance {:.0}", r.total_profit()),
    ));
    results.push(check(
        "meltdown_status",
        r.status() == PlantStatus::Damaged,
        r.status().message().into(),
    ));

    let frozen = sim.reactor.clone();
    sim.reactor.adjust_control_rods(100.0);
    sim.reactor.adjust_coolant_flow(100.0);
    sim.run_for(10_000.0);
    results.push(check(
        "meltdown_is_final",
        sim.reactor == frozen,
        "controls ignored, core frozen".into(),
    ));

    results
}

// ── 6. SCRAM ────────────────────────────────────────────────────────────

fn validate_scram(config: &PlantConfig) -> Vec<TestResult> {
    println!("--- SCRAM ---");
    let mut results = Vec::new();
    let mut sim = Simulation::new(config);
    sim.reactor.adjust_control_rods(30.0);
    sim.run_for(20_000.0);
    let hot = sim.reactor.fission_rate;

    sim.reactor.finance.ledger.total_profit = 3_000_000.0;
    sim.reactor.scram();
    let first = sim.step(sim.tick_ms());
    results.push(check(
        "scram_notice",
        first.notices.contains(&PlantNotice::ScramTriggered),
        "alarm raised".into(),
    ));

    sim.run_for(30_000.0);
    let r = &sim.reactor;
    results.push(check(
        "scram_inserts_rods",
        r.control_rod_position > 99.0 && r.fission_rate < hot,
        format!("rods {:.2}%, fission {:.4}", r.control_rod_position, r.fission_rate),
    ));
    sim.reactor.adjust_control_rods(0.0);
    results.push(check(
        "scram_locks_rod_control",
        sim.reactor.target_control_rod_position == 100.0,
        "rod commands ignored".into(),
    ));
    results.push(check(
        "scram_penalty_repeats",
        sim.reactor.total_profit() <= 0.0,
        format!("balance {:.0} after sustained SCRAM", sim.reactor.total_profit()),
    ));

    results
}

// ── 7. Maintenance ──────────────────────────────────────────────────────

fn validate_maintenance(config: &PlantConfig) -> Vec<TestResult> {
    println!("--- Maintenance ---");
    let mut results = Vec::new();
    let mut sim = Simulation::new(config);
    let costs = config.maintenance.clone();

    sim.reactor.finance.ledger.total_profit = 0.0;
    sim.turbine.health = 40.0;
    results.push(check(
        "maintenance_needs_funds",
        !sim.maintain_turbine() && sim.turbine.health == 40.0,
        "turbine overhaul refused at zero balance".into(),
    ));

    let budget = costs.fuel + costs.coolant + costs.turbine;
    sim.reactor.finance.ledger.total_profit = budget;
    for rod in &mut sim.reactor.fuel_rods {
        rod.health = 10.0;
    }
    sim.reactor.coolant_quality = 5.0;

    let fuel = sim.reactor.replace_fuel_rods();
    let coolant = sim.reactor.replace_coolant();
    let turbine = sim.maintain_turbine();
    results.push(check(
        "maintenance_restores",
        fuel && coolant
            && turbine
            && sim.reactor.average_fuel_health() == 100.0
            && sim.reactor.coolant_quality == 100.0
            && sim.turbine.health == 100.0
            && sim.turbine.efficiency == 1.0,
        "fuel, coolant, and turbine restored".into(),
    ));
    results.push(check(
        "maintenance_debits_exact_cost",
        sim.reactor.total_profit() == 0.0,
        format!("spent {budget:.0}"),
    ));
    results.push(check(
        "maintenance_no_overdraft",
        !sim.reactor.replace_coolant() && sim.reactor.total_profit() == 0.0,
        "second purchase refused".into(),
    ));

    results
}
