use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use sinkswitch::actions::{ActionError, ConfigRow, DeckAction, SetOutput, ToggleOutput, ToggleSelection};
use sinkswitch::devices::{list_devices, DeviceEntry};
use sinkswitch::presenter::ConsolePresenter;
use sinkswitch::session::{PulseConnector, SessionConnector};
use sinkswitch_config::{ActionConfig, InstanceSettings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file, defaults to $XDG_CONFIG_HOME/sinkswitch/actions.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the key icons
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Do not raise desktop notifications for action errors
    #[arg(long)]
    no_notify: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List selectable outputs with their catalog index
    Devices,

    /// List configured action instances
    Instances,

    /// Key that sets one output as default
    SetOutput {
        instance: String,
        #[command(subcommand)]
        op: SetOutputOp,
    },

    /// Key that toggles between two outputs
    ToggleOutput {
        instance: String,
        #[command(subcommand)]
        op: ToggleOutputOp,
    },
}

#[derive(Subcommand, Debug)]
enum SetOutputOp {
    /// Render the current state once
    Status,
    /// Press the key
    Press,
    /// Configure the output by catalog index
    Select { entry: usize },
    /// Re-render on every host tick until Ctrl-C
    Watch {
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

#[derive(Subcommand, Debug)]
enum ToggleOutputOp {
    Status,
    Press,
    /// Configure device A and device B by catalog index
    Select { entry_a: usize, entry_b: usize },
    Watch {
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(ActionConfig::default_path);
    let config = Arc::new(
        ActionConfig::new(&config_path)
            .with_context(|| format!("Failed to load settings from {}", config_path.display()))?,
    );
    info!("Using settings file {}", config.path().display());

    match args.command {
        Command::Devices => print_devices().await,
        Command::Instances => {
            for instance in config.list_instances()? {
                println!("{}", instance);
            }
            Ok(())
        }
        Command::SetOutput { instance, op } => {
            let presenter = ConsolePresenter::new(&instance, &args.assets, !args.no_notify);
            let mut action = SetOutput::new(
                PulseConnector,
                InstanceSettings::new(config.clone(), &instance),
                presenter,
            );
            match op {
                SetOutputOp::Status => action.on_ready().map_err(Into::into),
                SetOutputOp::Press => action.on_key_down().map_err(Into::into),
                SetOutputOp::Select { entry } => {
                    let rows = action.config_rows()?;
                    let selection = pick(&rows[0], entry)?;
                    action.on_configuration_changed(selection.identity.clone())?;
                    println!("{}: {}", instance, selection.display_name);
                    Ok(())
                }
                SetOutputOp::Watch { interval_ms } => watch(action, Duration::from_millis(interval_ms)).await,
            }
        }
        Command::ToggleOutput { instance, op } => {
            let presenter = ConsolePresenter::new(&instance, &args.assets, !args.no_notify);
            let mut action = ToggleOutput::new(
                PulseConnector,
                InstanceSettings::new(config.clone(), &instance),
                presenter,
            );
            match op {
                ToggleOutputOp::Status => action.on_ready().map_err(Into::into),
                ToggleOutputOp::Press => action.on_key_down().map_err(Into::into),
                ToggleOutputOp::Select { entry_a, entry_b } => {
                    let rows = action.config_rows()?;
                    let device_a = pick(&rows[0], entry_a)?;
                    let device_b = pick(&rows[1], entry_b)?;
                    println!("{}: A = {}, B = {}", instance, device_a.display_name, device_b.display_name);
                    action.on_configuration_changed(ToggleSelection {
                        device_a: Some(device_a.identity.clone()),
                        device_b: Some(device_b.identity.clone()),
                    })?;
                    Ok(())
                }
                ToggleOutputOp::Watch { interval_ms } => watch(action, Duration::from_millis(interval_ms)).await,
            }
        }
    }
}

fn pick(row: &ConfigRow, entry: usize) -> Result<&DeviceEntry> {
    row.entries.get(entry).ok_or_else(|| {
        anyhow::anyhow!(
            "No output with index {} ({} available, see `sinkswitch devices`)",
            entry,
            row.entries.len()
        )
    })
}

async fn print_devices() -> Result<()> {
    let entries = tokio::task::spawn_blocking(|| {
        let mut session = PulseConnector.connect()?;
        list_devices(&mut session)
    })
    .await
    .map_err(|e| anyhow::anyhow!("Task error: {}", e))??;

    for (index, entry) in entries.iter().enumerate() {
        println!(
            "{:>3}  {}\t{}\t{}",
            index, entry.display_name, entry.identity.sink_id, entry.identity.port_id
        );
    }
    Ok(())
}

/// Run one host callback on a blocking thread; the PulseAudio controller is
/// created there and never crosses threads.
async fn run_callback<A, F>(mut action: A, callback: F) -> Result<(A, Result<(), ActionError>)>
where
    A: Send + 'static,
    F: FnOnce(&mut A) -> Result<(), ActionError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let result = callback(&mut action);
        (action, result)
    })
    .await
    .map_err(|e| anyhow::anyhow!("Task error: {}", e))
}

/// Host tick loop. A failed tick leaves the last rendered state on the key.
async fn watch<A>(action: A, interval: Duration) -> Result<()>
where
    A: DeckAction + Send + 'static,
{
    let (mut action, ready) = run_callback(action, |a| a.on_ready()).await?;
    if let Err(e) = ready {
        warn!("Initial render failed: {}", e);
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let (next, result) = run_callback(action, |a| a.on_tick()).await?;
                action = next;
                if let Err(e) = result {
                    warn!("Tick failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                return Ok(());
            }
        }
    }
}
