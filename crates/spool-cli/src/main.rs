//! `spool` - enqueue, take and inspect deferred jobs from the shell.

mod config;
mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spool_core::{Channel, Payload, Queue, RetrievalMode};
use tracing::debug;

use crate::config::CliConfig;

/// Deferred job queue over a folder of files or a sqlite table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "spool.toml")]
    config: PathBuf,

    /// Channel to operate on
    #[arg(long, default_value = spool_core::DEFAULT_CHANNEL)]
    channel: String,

    /// Override the retrieval mode (oldest-first, newest-first)
    #[arg(long)]
    mode: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append a job to the channel
    Add {
        /// Job type tag
        job_type: String,
        /// JSON object payload
        #[arg(default_value = "{}")]
        payload: String,
    },
    /// Remove one job and print it as JSON
    Get,
    /// Print whether the channel holds a job; exit status 1 when it does not
    Has,
    /// Create the backend's storage
    Init,
}

/// Exit status for any error.
const EXIT_ERROR: u8 = 2;

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    /// `has` found nothing.
    Empty,
}

impl Outcome {
    fn code(self) -> u8 {
        match self {
            Outcome::Done => 0,
            Outcome::Empty => 1,
        }
    }
}

fn status(result: &Result<Outcome>) -> u8 {
    match result {
        Ok(outcome) => outcome.code(),
        Err(_) => EXIT_ERROR,
    }
}

fn main() -> ExitCode {
    logging::init("warn");

    let result = run(Cli::parse(), &mut io::stdout().lock());
    if let Err(e) = &result {
        eprintln!("error: {e:#}");
    }
    ExitCode::from(status(&result))
}

fn run(cli: Cli, out: &mut impl Write) -> Result<Outcome> {
    let file = CliConfig::load(&cli.config)?;
    let mut config = file.queue_config();
    if let Some(mode) = &cli.mode {
        config.mode = mode.parse::<RetrievalMode>()?;
    }
    let channel = Channel::new(cli.channel).context("invalid channel")?;
    debug!(config = %cli.config.display(), channel = %channel, "starting");

    let mut queue = Queue::with_config(config).context("invalid configuration")?;
    if file.create_table || matches!(cli.command, Command::Init) {
        queue.backend()?.prepare().context("preparing storage")?;
    }

    match cli.command {
        Command::Add { job_type, payload } => {
            let payload: Payload =
                serde_json::from_str(&payload).context("payload must be a JSON object")?;
            queue.add_to(&channel, job_type, payload)?;
        }
        Command::Get => {
            let job = queue.get_from(&channel)?;
            writeln!(out, "{}", serde_json::to_string(&job)?)?;
        }
        Command::Has => {
            let present = queue.has_in(&channel)?;
            writeln!(out, "{present}")?;
            if !present {
                return Ok(Outcome::Empty);
            }
        }
        Command::Init => {}
    }
    Ok(Outcome::Done)
}
