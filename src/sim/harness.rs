//! Simulation harness: runs the control loop against the simulated room in
//! stepped time and prints one line per cycle.

use clap::Parser;
use hearth_rs::config::{self, Config, SensorConfig, SimulationConfig};
use hearth_rs::control::Controller;
use hearth_rs::hardware::{SimulatedHeater, SimulatedRoom, SimulatedSensor};
use std::path::PathBuf;
use std::sync::Arc;

/// Simulation Harness CLI
#[derive(Parser, Debug)]
#[command(name = "sim-harness", about = "Hysteresis simulation against a modelled room.")]
struct Cli {
    /// Path to a TOML config file (overrides defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of sampling cycles to simulate
    #[arg(long, default_value_t = 720)]
    cycles: usize,

    /// Target temperature, °C
    #[arg(long)]
    target: Option<f64>,

    /// Print only the summary
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).init();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    if let Some(target) = cli.target {
        config.control.initial_target = target;
    }
    let sim = match &config.sensor {
        SensorConfig::Simulated(sim) => sim.clone(),
        SensorConfig::OneWire { .. } => {
            eprintln!("Config selects a 1-Wire sensor; simulating with default room parameters");
            SimulationConfig::default()
        }
    };

    let room = Arc::new(SimulatedRoom::new(&sim));
    let sensor = Arc::new(SimulatedSensor::stepped(room.clone(), &sim));
    let heater = Arc::new(SimulatedHeater::new(room.clone()));
    let controller = Controller::new(&config.control, sensor, heater);
    let period = config.control.sample_interval();

    let mut switches = 0usize;
    let mut failed_reads = 0usize;
    let mut heated_cycles = 0usize;
    let mut min_temp = f64::INFINITY;
    let mut max_temp = f64::NEG_INFINITY;
    let settle = cli.cycles / 4;

    println!("cycle,sim_seconds,room_temp,reading,heater_on");
    for cycle in 0..cli.cycles {
        let outcome = controller.run_cycle().await;
        let room_temp = room.temperature().await;

        if outcome.commanded.is_some() {
            switches += 1;
        }
        if outcome.sensor_error.is_some() {
            failed_reads += 1;
        }
        if outcome.heater_on {
            heated_cycles += 1;
        }
        // ignore warm-up when reporting the controlled range
        if cycle >= settle {
            min_temp = min_temp.min(room_temp);
            max_temp = max_temp.max(room_temp);
        }

        if !cli.quiet {
            let reading = outcome.reading.map_or_else(|| "-".to_string(), |r| format!("{:.2}", r));
            println!(
                "{},{:.0},{:.2},{},{}",
                cycle,
                cycle as f64 * period.as_secs_f64(),
                room_temp,
                reading,
                outcome.heater_on
            );
        }
        room.step(period).await;
    }

    let status = controller.status().await;
    eprintln!("--- summary ---");
    eprintln!("target:          {:.1}°C", status.target_temperature);
    eprintln!("cycles:          {}", cli.cycles);
    eprintln!("heater switches: {}", switches);
    eprintln!("failed reads:    {}", failed_reads);
    eprintln!("duty cycle:      {:.1}%", 100.0 * heated_cycles as f64 / cli.cycles.max(1) as f64);
    if min_temp.is_finite() {
        eprintln!("settled range:   {:.2}..{:.2}°C", min_temp, max_temp);
    }
    Ok(())
}
