// SPDX-FileCopyrightText: 2026 Beacon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Beacon - emergency text and voice alerts for clinical dashboards.
//!
//! This is the operator-facing binary: credential setup, contact management,
//! test probes, alert dispatch, and the audit history.

mod alert;
mod app;
mod contacts;
mod history;
mod setup;
mod status;

use std::path::PathBuf;

use beacon_core::Urgency;
use clap::{Parser, Subcommand};

/// Beacon - emergency text and voice alerts.
#[derive(Parser, Debug)]
#[command(name = "beacon", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Store transport credentials and, optionally, a first contact.
    Setup {
        /// Provider account id (prompted when omitted).
        #[arg(long)]
        account_id: Option<String>,
        /// Sender phone number as assigned by the provider (prompted when omitted).
        #[arg(long)]
        sender: Option<String>,
    },
    /// Manage emergency contacts.
    Contact {
        #[command(subcommand)]
        action: ContactCommand,
    },
    /// Send a text-only test probe.
    Test {
        #[command(flatten)]
        recipient: alert::RecipientArgs,
    },
    /// Raise an emergency alert on both channels.
    Send {
        #[command(flatten)]
        recipient: alert::RecipientArgs,
        /// Urgency level: low, medium, high, critical.
        #[arg(long, short, default_value = "high")]
        urgency: Urgency,
        /// Free-text notes for the responder.
        #[arg(long, short, default_value = "")]
        notes: String,
        /// JSON file with patient fields (age, gender, vitals, symptom flags).
        #[arg(long)]
        context: Option<PathBuf>,
        /// Case id, overriding any in the context file.
        #[arg(long)]
        case_id: Option<String>,
    },
    /// Show recorded alerts.
    History {
        /// Show at most this many of the most recent alerts.
        #[arg(long, short)]
        limit: Option<usize>,
        /// Output JSON lines.
        #[arg(long)]
        json: bool,
    },
    /// Show the credential and contact configuration.
    Status {
        /// Output JSON.
        #[arg(long)]
        json: bool,
    },
    /// Ask the provider for the delivery state of an alert's text message.
    Delivery {
        /// Alert id, as shown by `beacon send` or `beacon history`.
        alert_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ContactCommand {
    /// Add a contact. Numbers are normalized to international form.
    Add {
        name: String,
        phone: String,
        /// Lower is contacted first.
        #[arg(long, short, default_value_t = 1)]
        priority: u32,
    },
    /// List active contacts by priority.
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => beacon_config::load_and_validate_path(path),
        None => beacon_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            beacon_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    let color = app::use_color(cli.plain);

    let result = match cli.command {
        Commands::Setup { account_id, sender } => {
            setup::run_setup(&config, account_id, sender, color).await
        }
        Commands::Contact { action } => match action {
            ContactCommand::Add {
                name,
                phone,
                priority,
            } => contacts::run_add(&config, &name, &phone, priority, color),
            ContactCommand::List => contacts::run_list(&config, color),
        },
        Commands::Test { recipient } => alert::run_test(&config, &recipient, color).await,
        Commands::Send {
            recipient,
            urgency,
            notes,
            context,
            case_id,
        } => {
            let request = alert::SendRequest {
                urgency,
                notes,
                context,
                case_id,
            };
            alert::run_send(&config, &recipient, request, color).await
        }
        Commands::History { limit, json } => history::run_history(&config, limit, json, color),
        Commands::Status { json } => status::run_status(&config, json, color),
        Commands::Delivery { alert_id } => alert::run_delivery(&config, &alert_id, color).await,
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            app::print_error(&e, color);
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so command output on stdout stays scriptable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("beacon={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
