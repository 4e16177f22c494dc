use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use sesh_core::{decode_repos, encode_repos, load_session};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "sesh",
    about = "Validate, encode, and inspect agent session manifests"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the repo configurations in a session manifest
    Validate {
        /// Path to the manifest (YAML, or JSON with a .json extension)
        file: PathBuf,
    },

    /// Validate a manifest and emit its canonical persisted JSON
    Encode {
        /// Path to the manifest
        file: PathBuf,

        /// Write the resource JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the observed state recorded in a session manifest
    Status {
        /// Path to the manifest
        file: PathBuf,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Validate { file } => run_validate(&file),
            Commands::Encode { file, output } => run_encode(&file, output.as_deref()),
            Commands::Status { file } => run_status(&file),
        }
    }
}

/// Validate every repo entry, reporting each one; first invalid entry aborts.
fn run_validate(file: &Path) -> Result<()> {
    let session = load_session(file)?;
    let repos = &session.spec.repos;
    if repos.is_empty() {
        println!("{}: no repos to validate", file.display());
        return Ok(());
    }

    for (index, repo) in repos.iter().enumerate() {
        let url = repo
            .input
            .as_ref()
            .map_or("<missing>", |input| input.url.as_str());
        match repo.validate() {
            Ok(()) => println!("repos[{index}] ok: {url}"),
            Err(e) => bail!("repos[{index}]: {e}"),
        }
    }
    println!("{} repos valid", repos.len());
    Ok(())
}

/// Validate, encode, round-trip check, and emit the resource JSON.
fn run_encode(file: &Path, output: Option<&Path>) -> Result<()> {
    let session = load_session(file)?;
    let maps = encode_repos(&session.spec.repos)?;

    // Decode what was just encoded and compare against the source, so a
    // schema change that breaks the round trip is caught before anything
    // is written.
    let values: Vec<Value> = maps.into_iter().map(Value::Object).collect();
    let decoded = decode_repos(&values)?;
    if decoded != session.spec.repos {
        bail!("encoded repos did not decode back to the originals");
    }
    debug!(repos = decoded.len(), "round trip verified");

    let json = serde_json::to_string_pretty(&session)?;
    match output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Print phase, timestamps, reconcile records, and conditions.
fn run_status(file: &Path) -> Result<()> {
    let session = load_session(file)?;
    let Some(status) = &session.status else {
        println!("{}: no status recorded", file.display());
        return Ok(());
    };

    if let Some(phase) = &status.phase {
        println!("phase: {phase}");
    }
    if let Some(start) = &status.start_time {
        println!("started: {start}");
    }
    if let Some(end) = &status.completion_time {
        println!("completed: {end}");
    }
    for (index, record) in status.reconciled_repos.iter().enumerate() {
        let outcome = record.status.as_deref().unwrap_or("unknown");
        println!("repos[{index}] {} ({}): {outcome}", record.url, record.branch);
    }
    if let Some(workflow) = &status.reconciled_workflow {
        let outcome = workflow.status.as_deref().unwrap_or("unknown");
        println!("workflow {}: {outcome}", workflow.git_url);
    }
    for condition in &status.conditions {
        match &condition.reason {
            Some(reason) => println!(
                "condition {}: {} ({reason})",
                condition.condition_type, condition.status
            ),
            None => println!("condition {}: {}", condition.condition_type, condition.status),
        }
    }

    if status.repos_consistent(&session.spec.repos) {
        println!("reconciled repos consistent with spec");
    } else {
        println!(
            "reconciled repos out of sync: {} recorded, {} in spec",
            status.reconciled_repos.len(),
            session.spec.repos.len()
        );
    }
    Ok(())
}
