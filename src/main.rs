// cwctl - CharacterWorks remote control
// Main entry point

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

use characterworks::builders::{self, ListLayersOptions};
use characterworks::client::{read_success_text, CharacterWorksClient, ClientError};
use characterworks::config::{load_config, ResolvedConfig, TargetOverrides};
use characterworks::errors::describe_client_error;
use characterworks::protocol::{Channel, Command, TriggerAction};
use characterworks::Validation;

#[derive(Parser, Debug)]
#[command(name = "cwctl")]
#[command(about = "Control CharacterWorks over its HTTP API", version)]
struct Args {
    /// Device host (overrides CHARACTERWORKS_HOST and config.toml)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Device port (overrides CHARACTERWORKS_PORT and config.toml)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Config file (default: ~/.characterworks/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Check query responses against their schema
    #[arg(long, global = true)]
    validate: bool,

    /// Print the request body instead of sending it
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Play, stop, finish, pause, eject, resume, restart or finish-and-restart motions
    Trigger {
        /// Trigger action (e.g. play, stop, finish_and_restart_motions)
        action: TriggerAction,
        /// Comma-separated motion names
        motions: String,
        #[arg(long)]
        channel: Channel,
        /// Motion id (repeatable)
        #[arg(long = "id")]
        ids: Vec<String>,
    },
    /// Set the text of a layer
    SetText {
        value: String,
        #[arg(long)]
        channel: Channel,
        /// Motion name, combined with --layer into motion\layer
        #[arg(long, requires = "layer", conflicts_with = "path")]
        motion: Option<String>,
        /// Layer name inside --motion
        #[arg(long, requires = "motion")]
        layer: Option<String>,
        /// Full backslash-delimited layer path
        #[arg(long)]
        path: Option<String>,
        /// Layer id (repeatable)
        #[arg(long = "layer-id", conflicts_with = "motion")]
        layer_ids: Vec<String>,
    },
    /// Activate a cell of a grid
    ActivateGrid {
        grid: String,
        row: u32,
        column: u32,
        #[arg(long)]
        channel: Option<Channel>,
    },
    /// List motion names
    ListMotions {
        /// Include motion ids
        #[arg(long = "with-ids")]
        with_ids: bool,
    },
    /// List the layer tree
    ListLayers {
        #[arg(long)]
        parent: Option<String>,
        /// Parent id (repeatable)
        #[arg(long = "parent-id")]
        parent_ids: Vec<String>,
        #[arg(long)]
        channel: Option<Channel>,
    },
    /// List grid names
    ListGrids,
    /// List the cells of a grid
    ListCells { grid: String },
    /// Send a JSON array of commands from a file as one request
    Batch { file: PathBuf },
}

/// What one invocation sends
enum Request {
    Single(Command),
    Batch(Vec<Command>),
}

fn build_request(action: &Action) -> Result<Request> {
    let command = match action {
        Action::Trigger {
            action,
            motions,
            channel,
            ids,
        } => {
            let command = builders::trigger(*action, motions, *channel, ids.clone());
            if command.as_trigger().is_some_and(|(_, payload)| payload.motions.is_empty()) {
                bail!("No motion names given (expected a comma-separated list)");
            }
            command
        }
        Action::SetText {
            value,
            channel,
            motion,
            layer,
            path,
            layer_ids,
        } => match (motion, layer) {
            (Some(motion), Some(layer)) => {
                builders::set_text_from_motion_and_layer(motion, layer, value, *channel)
            }
            _ => {
                let path = path.as_deref().unwrap_or_default();
                if path.trim().is_empty() && layer_ids.is_empty() {
                    bail!("set-text needs --motion/--layer, --path or --layer-id");
                }
                builders::set_text_from_path(path, value, *channel, layer_ids.clone())
            }
        },
        Action::ActivateGrid {
            grid,
            row,
            column,
            channel,
        } => builders::activate_grid_cell(grid, *row, *column, *channel),
        Action::ListMotions { with_ids: false } => builders::list_motions(),
        Action::ListMotions { with_ids: true } => builders::list_motions_with_ids(),
        Action::ListLayers {
            parent,
            parent_ids,
            channel,
        } => builders::list_layers(ListLayersOptions {
            parent: parent.clone(),
            parent_id: parent_ids.clone(),
            channel: *channel,
        }),
        Action::ListGrids => builders::list_grid_names(),
        Action::ListCells { grid } => builders::list_grid_cells(grid),
        Action::Batch { file } => {
            let contents = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let commands: Vec<Command> = serde_json::from_str(&contents)
                .with_context(|| format!("{} is not a JSON array of commands", file.display()))?;
            return Ok(Request::Batch(commands));
        }
    };
    Ok(Request::Single(command))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    let text = serde_json::to_string_pretty(value).map_err(ClientError::Serialize)?;
    println!("{}", text);
    Ok(())
}

/// Send a query through its typed wrapper so the matching schema applies
async fn run_query(
    client: &CharacterWorksClient,
    command: &Command,
    config: &ResolvedConfig,
) -> Result<(), ClientError> {
    let target = &config.target;
    let validation = config.validation;

    match command {
        Command::ListMotions => print_json(&client.list_motions(target, validation).await?),
        Command::ListMotionsWithIds => {
            print_json(&client.list_motions_with_ids(target, validation).await?)
        }
        Command::ListLayers(options) => {
            print_json(&client.list_layers(options.clone(), target, validation).await?)
        }
        Command::ListGridNames => print_json(&client.list_grid_names(target, validation).await?),
        Command::ListGridCells(cells) => {
            print_json(&client.list_grid_cells(&cells.grid, target, validation).await?)
        }
        other => {
            let response = client.send_command(other, target).await?;
            let status = response.status();
            let body = read_success_text(response).await?;
            if body.trim().is_empty() {
                println!("OK ({} {})", status, other.action());
            } else {
                println!("{}", body);
            }
            Ok(())
        }
    }
}

async fn run(
    client: &CharacterWorksClient,
    request: &Request,
    config: &ResolvedConfig,
) -> Result<(), ClientError> {
    match request {
        Request::Single(command) => run_query(client, command, config).await,
        Request::Batch(commands) => {
            let results: Value = match config.validation {
                Validation::Schema => Value::Array(
                    client
                        .send_batch_and_validate(commands, &config.target)
                        .await?,
                ),
                Validation::Trust => {
                    client
                        .send_batch_and_parse(commands, &config.target)
                        .await?
                }
            };
            print_json(&results)
        }
    }
}

fn init_tracing() {
    // Default: WARN, so stdout stays clean for JSON output.
    // RUST_LOG overrides (e.g. RUST_LOG=characterworks=debug).
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Bridge log crate → tracing (reqwest and hyper log through `log`)
    tracing_log::LogTracer::init().ok();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let request = build_request(&args.command)?;

    if args.dry_run {
        match &request {
            Request::Single(command) => print_json(command)?,
            Request::Batch(commands) => print_json(commands)?,
        }
        return Ok(());
    }

    let overrides = TargetOverrides {
        host: args.host.clone(),
        port: args.port,
        validate: args.validate,
    };
    let config = load_config(&overrides, args.config.as_deref())?;
    let client = CharacterWorksClient::new()?.with_timeout(config.timeout);

    if let Err(e) = run(&client, &request, &config).await {
        eprintln!("{}", describe_client_error(&e, &config.target));
        std::process::exit(1);
    }

    Ok(())
}
