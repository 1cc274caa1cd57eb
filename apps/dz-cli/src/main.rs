use clap::{Parser, Subcommand, ValueEnum};
use dz_app::{
    AppError, AppResult, ReplayReport, Scenario, load_scenario, project_service, replay,
};
use dz_controls::{CoordinatorSnapshot, ZoneStatus};
use dz_project::{HvacConfig, config_generation};
use dz_state::{JsonStateStore, MemoryStateStore, StateFile};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dz-cli")]
#[command(about = "ductzone CLI - zoned ducted HVAC controller", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate {
        /// Path to the config file (YAML, or JSON by extension)
        config_path: PathBuf,
    },
    /// List the zones of a configuration
    Zones {
        /// Path to the config file
        config_path: PathBuf,
    },
    /// Replay a scenario against a configuration
    Replay {
        /// Path to the config file
        config_path: PathBuf,
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// JSON state file to restore from and save to
        #[arg(long)]
        state: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the contents of a state file
    State {
        /// Path to the JSON state file
        state_path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Yaml,
    Json,
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Zones { config_path } => cmd_zones(&config_path),
        Commands::Replay {
            config_path,
            scenario_path,
            state,
            format,
        } => cmd_replay(&config_path, &scenario_path, state.as_deref(), format),
        Commands::State { state_path, format } => cmd_state(&state_path, format),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = project_service::load_config(config_path)?;
    project_service::validate_config(&config)?;
    println!(
        "✓ Config is valid ({} zones, generation {})",
        config.zones.len(),
        short_generation(&config_generation(&config)?)
    );
    Ok(())
}

fn cmd_zones(config_path: &Path) -> AppResult<()> {
    let config = project_service::load_config(config_path)?;
    let zones = project_service::list_zones(&config);

    println!("Zones of '{}' (motor {}):", config.name, config.motor);
    for zone in zones {
        println!(
            "  {} - {} (vent {}, sensor {})",
            zone.id, zone.name, zone.vent, zone.sensor
        );
    }
    Ok(())
}

fn cmd_replay(
    config_path: &Path,
    scenario_path: &Path,
    state_path: Option<&Path>,
    format: OutputFormat,
) -> AppResult<()> {
    let config = project_service::load_config(config_path)?;
    let scenario = load_scenario(scenario_path)?;
    info!(
        config = %config_path.display(),
        events = scenario.events.len(),
        "replaying scenario"
    );

    let report = match state_path {
        Some(path) => replay_with_state(&config, &scenario, path)?,
        None => replay(&config, &scenario, MemoryStateStore::new())?.0,
    };

    match format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Yaml => print!("{}", to_yaml(&report)?),
        OutputFormat::Json => println!("{}", to_json(&report)?),
    }
    Ok(())
}

fn replay_with_state(
    config: &HvacConfig,
    scenario: &Scenario,
    path: &Path,
) -> AppResult<ReplayReport> {
    let mut store = JsonStateStore::open(path)?;
    store.set_generation(&config_generation(config)?)?;
    let (report, mut store) = replay(config, scenario, store)?;
    store.flush()?;
    println!("State saved to {}", store.path().display());
    Ok(report)
}

fn cmd_state(state_path: &Path, format: OutputFormat) -> AppResult<()> {
    let state = JsonStateStore::read(state_path)?;
    match format {
        OutputFormat::Text => print_state(&state),
        OutputFormat::Yaml => print!("{}", to_yaml(&state)?),
        OutputFormat::Json => println!("{}", to_json(&state)?),
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    println!("Replay log:");
    for entry in &report.log {
        let what = match &entry.event {
            Some(event) => format!("{event:?}"),
            None => "tick".to_string(),
        };
        println!("  {:>8.1}s  {}", entry.at_s, what);
        if let Some(reason) = &entry.ignored {
            println!("             ignored: {reason}");
        }
        for t in &entry.transitions {
            println!(
                "             {} vent {} -> {}",
                t.zone, t.transition.from, t.transition.to
            );
        }
        if let Some(motor) = &entry.motor {
            println!("             {motor}");
        }
    }

    println!(
        "\nCommands sent: {} vent, {} motor",
        report.vent_commands.len(),
        report.motor_calls.len()
    );
    print_snapshot(&report.snapshot);

    println!("\nZones:");
    for zone in &report.zones {
        print_zone(zone);
    }
}

fn print_snapshot(snapshot: &CoordinatorSnapshot) {
    let mode = snapshot
        .active_mode
        .map(|m| m.to_string())
        .unwrap_or_else(|| "off".to_string());
    let target = snapshot
        .motor_target
        .map(|t| format!(" @ {t}"))
        .unwrap_or_default();
    println!("\nMotor: {mode}{target} ({} zones open)", snapshot.label());
}

fn print_zone(zone: &ZoneStatus) {
    let current = zone
        .current
        .map(|c| format!("{c:.1}"))
        .unwrap_or_else(|| "-".to_string());
    let vent = if zone.vent_open { "open" } else { "closed" };
    let pending = zone
        .pending
        .map(|p| format!(", pending {p}"))
        .unwrap_or_default();
    println!(
        "  {:<16} {:<8} target {:<5} current {:<5} vent {}{}",
        zone.id.as_str(),
        zone.mode.as_str(),
        zone.target,
        current,
        vent,
        pending
    );
}

fn print_state(state: &StateFile) {
    println!("State file version {}", state.version);
    if let Some(generation) = &state.generation {
        println!("  Config generation: {}", short_generation(generation));
    }
    if let Some(saved_at) = state.saved_at {
        println!("  Saved at: {saved_at}");
    }
    if let Some(fan_mode) = &state.coordinator.fan_mode {
        println!("  Fan mode: {fan_mode}");
    }

    if state.zones.is_empty() {
        println!("No zones stored");
        return;
    }
    println!("Zones:");
    for (id, snapshot) in &state.zones {
        let mode = snapshot.mode.map(|m| m.as_str()).unwrap_or("-");
        let target = snapshot
            .target
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<16} vent {:<6} since {}  mode {:<8} target {}",
            id, snapshot.vent, snapshot.last_transition, mode, target
        );
    }
}

fn short_generation(generation: &str) -> &str {
    generation.get(..12).unwrap_or(generation)
}

fn to_yaml<T: Serialize>(value: &T) -> AppResult<String> {
    serde_yaml::to_string(value).map_err(|e| AppError::Render(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Render(e.to_string()))
}
