//! `slotctl` CLI — register availability and recommend meeting slots.
//!
//! ## Usage
//!
//! ```sh
//! # Check an availability expression
//! slotctl parse "02 Jan 2025 2-4 PM EST"
//!
//! # Register people and their availability (stored in timeslots.json)
//! slotctl add-user eshan
//! slotctl add-slots eshan "02 Jan 2025 2-4 PM EST" "14 Jan 2025 6-9 PM EST"
//! slotctl list-slots eshan
//! slotctl remove-slot eshan "14 Jan 2025 6-9 PM EST"
//!
//! # Recommend slots from flags
//! slotctl recommend --organizer eshan --participants kevin,marco --duration 60
//!
//! # Recommend slots from a JSON request (stdin or file)
//! echo '{"organizer":"eshan","participants":["kevin"],"eventDuration":60}' | slotctl recommend
//! slotctl recommend -i request.json -o response.json
//!
//! # Book, inspect and cancel events on stored slots
//! slotctl event create --owner eshan --title "Planning" --slot "02 Jan 2025 2-4 PM EST" --participants kevin,marco
//! slotctl event list eshan
//! slotctl event show <ID>
//! slotctl event delete <ID>
//! ```

mod config;
mod logging;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use timeslot_engine::event::{create_event, delete_event, get_event, list_events};
use timeslot_engine::registry::{create_timeslots, delete_timeslot, list_timeslots, register_user};
use timeslot_engine::wire::SlotDto;
use timeslot_engine::{
    parse_with_policy, recommend, EventRequest, MemoryStore, RecommendOptions, RecommendRequest,
    RecommendResponse,
};
use uuid::Uuid;

use crate::config::{Config, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(
    name = "slotctl",
    version,
    about = "Register availability and recommend meeting slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON store file (overrides `store_path` from the config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Config file (defaults to ./slotctl.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an availability expression and print its start and end
    Parse {
        /// e.g. "02 Jan 2025 2-4 PM EST"
        expression: String,
    },
    /// Register a user
    AddUser { name: String },
    /// Validate and store availability expressions for a user
    AddSlots {
        user: String,
        #[arg(required = true)]
        expressions: Vec<String>,
    },
    /// List a user's stored expressions
    ListSlots { user: String },
    /// Delete one stored expression (exact text)
    RemoveSlot { user: String, expression: String },
    /// Recommend meeting slots for an organizer and participants
    Recommend {
        /// JSON request file; reads stdin if omitted and no --organizer is given
        #[arg(short, long, conflicts_with = "organizer")]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        organizer: Option<String>,
        /// Comma-separated participant names
        #[arg(long, value_delimiter = ',', requires = "organizer")]
        participants: Vec<String>,
        /// Meeting length in minutes (defaults to the configured duration)
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Book and manage events on stored slots
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
}

#[derive(Subcommand)]
enum EventCommands {
    /// Book an event on one of the owner's stored slots (exact text)
    Create {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        slot: String,
        /// Comma-separated participant names
        #[arg(long, value_delimiter = ',')]
        participants: Vec<String>,
    },
    /// Print one event as JSON
    Show { id: Uuid },
    /// Print the events a user owns as a JSON array
    List { user: String },
    /// Cancel an event
    Delete { id: Uuid },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::load_or_default(DEFAULT_CONFIG_FILE)
            .context("Failed to load slotctl.toml")?,
    };
    logging::init(&config.logging, cli.verbose).context("Failed to initialize logging")?;

    let store_path = cli.store.clone().unwrap_or_else(|| config.store_path.clone());
    let options = config.recommend.options();

    match cli.command {
        Commands::Parse { expression } => {
            let interval = parse_with_policy(&expression, options.dst)
                .with_context(|| format!("Invalid time slot '{}'", expression))?;
            println!("{}", serde_json::to_string_pretty(&SlotDto::from(&interval))?);
        }
        Commands::AddUser { name } => {
            let mut store = load_store(&store_path)?;
            let user = register_user(&mut store, &name)?;
            save_store(&store_path, &store)?;
            println!("Created user {} ({})", user.name, user.id);
        }
        Commands::AddSlots { user, expressions } => {
            let mut store = load_store(&store_path)?;
            let count = create_timeslots(&mut store, &user, expressions.as_slice(), options.dst)
                .context("Failed to create time slots")?;
            save_store(&store_path, &store)?;
            println!("Stored {} time slot(s) for {}", count, user);
        }
        Commands::ListSlots { user } => {
            let store = load_store(&store_path)?;
            let slots = list_timeslots(&store, &user)?;
            if slots.is_empty() {
                println!("no time slots found for {}", user);
            }
            for slot in slots {
                println!("{}", slot);
            }
        }
        Commands::RemoveSlot { user, expression } => {
            let mut store = load_store(&store_path)?;
            delete_timeslot(&mut store, &user, &expression)?;
            save_store(&store_path, &store)?;
            println!("Deleted time slot '{}' for {}", expression, user);
        }
        Commands::Recommend {
            input,
            output,
            organizer,
            participants,
            duration,
        } => {
            let request = match organizer {
                Some(organizer) => RecommendRequest {
                    organizer,
                    participants,
                    event_duration: duration
                        .unwrap_or(config.recommend.default_duration_minutes),
                },
                None => {
                    let json = read_input(input.as_deref())?;
                    let mut request: RecommendRequest = serde_json::from_str(&json)
                        .context("Failed to decode recommendation request")?;
                    if let Some(minutes) = duration {
                        request.event_duration = minutes;
                    }
                    request
                }
            };
            request.validate()?;

            let store = load_store(&store_path)?;
            let recommendation = recommend(
                &store,
                &request.organizer,
                request.participants.as_slice(),
                request.min_duration(),
                &options,
            )
            .context("Error recommending slots")?;
            if !recommendation.skipped.is_empty() {
                tracing::info!(
                    skipped = recommendation.skipped.len(),
                    "ignored malformed stored slots"
                );
            }

            let response = RecommendResponse::from(&recommendation);
            write_output(output.as_deref(), &serde_json::to_string_pretty(&response)?)?;
        }
        Commands::Event { command } => run_event(command, &store_path, &options)?,
    }

    Ok(())
}

fn run_event(command: EventCommands, store_path: &Path, options: &RecommendOptions) -> Result<()> {
    match command {
        EventCommands::Create {
            owner,
            title,
            slot,
            participants,
        } => {
            let mut store = load_store(store_path)?;
            let request = EventRequest {
                title,
                event_owner: owner,
                event_time_slot: slot,
                participants,
            };
            let event = create_event(&mut store, &request, options.dst)
                .context("Failed to create event")?;
            save_store(store_path, &store)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        EventCommands::Show { id } => {
            let store = load_store(store_path)?;
            let event = get_event(&store, id)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        EventCommands::List { user } => {
            let store = load_store(store_path)?;
            let events = list_events(&store, &user)?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        EventCommands::Delete { id } => {
            let mut store = load_store(store_path)?;
            delete_event(&mut store, id)?;
            save_store(store_path, &store)?;
            println!("Deleted event {}", id);
        }
    }
    Ok(())
}

/// A missing store file is an empty store.
fn load_store(path: &Path) -> Result<MemoryStore> {
    match std::fs::read_to_string(path) {
        Ok(json) => MemoryStore::from_json_str(&json)
            .with_context(|| format!("Failed to decode store file: {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(MemoryStore::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read store file: {}", path.display())),
    }
}

fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let json = store.to_json_string()?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write store file: {}", path.display()))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some("-") | None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
