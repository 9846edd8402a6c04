use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use command_registry as cmdreg;
use command_registry::{CommandRegistry, MetricsHub, RemoteConfig};
use serde::Serialize;
use tracing::info;

mod script;
use script::Step;

#[derive(Parser, Debug)]
#[command(
    name = "remote",
    version,
    about = "Remote control command registry",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay the classic walkthrough on the bundled remote
    Demo,
    /// Print the slot table of a remote descriptor
    Show {
        /// Remote descriptor YAML (bundled demo when omitted)
        #[arg(long)]
        config: Option<String>,
        /// Emit the snapshot as JSON
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Press buttons: on:N, off:N, clear:N, undo
    Run {
        /// Remote descriptor YAML (bundled demo when omitted)
        #[arg(long)]
        config: Option<String>,
        /// Print prometheus metrics after the run
        #[arg(long, action = ArgAction::SetTrue)]
        metrics: bool,
        /// Emit the final report as JSON
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
        #[arg(required = true)]
        steps: Vec<String>,
    },
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => demo(),
        Commands::Show { config, json } => show(config.as_deref(), json),
        Commands::Run {
            config,
            metrics,
            json,
            steps,
        } => run(config.as_deref(), metrics, json, &steps),
    }
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_config(path: Option<&str>) -> Result<RemoteConfig> {
    match path {
        Some(p) => cmdreg::load_remote_file(p),
        None => RemoteConfig::demo(),
    }
}

fn demo() -> Result<()> {
    println!("{}", CommandRegistry::default());

    let mut remote = RemoteConfig::demo()?.build()?;
    println!("{}", remote.registry);
    println!();

    script::apply(
        &mut remote.registry,
        &[Step::On(2), Step::On(4), Step::Off(2), Step::Undo],
    )?;
    println!("{}", remote.registry);
    Ok(())
}

fn show(config: Option<&str>, json: bool) -> Result<()> {
    let remote = load_config(config)?.build()?;
    let snapshot = remote.registry.snapshot();
    if json {
        println!("{}", snapshot.to_json_pretty()?);
    } else {
        println!("{snapshot}");
    }
    Ok(())
}

#[derive(Serialize)]
struct RunReport {
    steps: Vec<Step>,
    remote: cmdreg::RemoteSnapshot,
    devices: Vec<DeviceState>,
}

#[derive(Serialize)]
struct DeviceState {
    id: String,
    kind: cmdreg::DeviceKind,
    state: String,
}

impl RunReport {
    fn new(steps: Vec<Step>, remote: &cmdreg::Remote) -> Self {
        let devices = remote
            .devices
            .iter()
            .map(|(id, d)| DeviceState {
                id: id.clone(),
                kind: d.kind(),
                state: d.state(),
            })
            .collect();
        Self {
            steps,
            remote: remote.registry.snapshot(),
            devices,
        }
    }
}

fn run(config: Option<&str>, metrics: bool, json: bool, raw: &[String]) -> Result<()> {
    let steps = script::parse_steps(raw)?;
    let hub = MetricsHub::new().map_err(anyhow::Error::msg)?;
    let mut remote = load_config(config)?.build()?;
    remote.registry = remote.registry.with_metrics(hub.dispatch.clone());

    info!(steps = steps.len(), "running script");
    script::apply(&mut remote.registry, &steps)?;

    let report = RunReport::new(steps, &remote);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for d in &report.devices {
            println!("{}\t{}\t{}", d.id, d.kind, d.state);
        }
        println!("LastCommand = {}", report.remote.last_invoked);
    }
    if metrics {
        print!("{}", hub.encode_text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_steps() {
        let cli = Cli::try_parse_from(["remote", "run", "--json", "on:2", "undo"]).unwrap();
        match cli.command {
            Commands::Run {
                config,
                metrics,
                json,
                steps,
            } => {
                assert!(config.is_none());
                assert!(!metrics);
                assert!(json);
                assert_eq!(steps, vec!["on:2", "undo"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["remote", "run"]).is_err());
    }

    #[test]
    fn test_run_report_shape() {
        let mut remote = RemoteConfig::demo().unwrap().build().unwrap();
        let steps = vec![Step::On(2), Step::On(4), Step::Off(2), Step::Undo];
        script::apply(&mut remote.registry, &steps).unwrap();

        let report = RunReport::new(steps, &remote);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["steps"][0]["step"], "on");
        assert_eq!(value["steps"][0]["slot"], 2);
        assert_eq!(value["steps"][3]["step"], "undo");
        assert_eq!(value["remote"]["capacity"], 7);
        assert_eq!(value["remote"]["last_invoked"], "LightOffCommand");
        assert_eq!(value["remote"]["slots"][4]["on"], "CeilingFanHighCommand");

        let devices = value["devices"].as_array().unwrap();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0]["id"], "ceiling_fan");
        assert_eq!(devices[0]["kind"], "ceiling_fan");
        assert_eq!(devices[0]["state"], "speed=high");
        assert_eq!(devices[1]["id"], "light");
        assert_eq!(devices[1]["state"], "on");
    }

    #[test]
    fn test_show_json_matches_snapshot() {
        let remote = RemoteConfig::demo().unwrap().build().unwrap();
        let text = remote.registry.snapshot().to_json_pretty().unwrap();
        let back: cmdreg::RemoteSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back, remote.registry.snapshot());
        assert_eq!(back.slots.len(), 7);
        assert_eq!(back.slots[0].on, "LivingRoomOnCommand");
    }
}
