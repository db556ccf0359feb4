//! # Studwork CLI
//!
//! Loads a project JSON file, runs the framing pipeline and prints the
//! cut, buy and hardware lists as text or JSON.
//!
//! ```text
//! frame_cli example --out room.json
//! frame_cli plan room.json
//! frame_cli --output json layout room.json --wall front
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use frame_core::envelope::compute_wall_heights;
use frame_core::project::frame_wall;
use frame_core::{calculate, Project};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod output;

use error::{CliError, CliResult};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "frame_cli")]
#[command(about = "Studwork - timber wall framing, cut lists and buy lists", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    output: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the cut, buy and hardware lists for a project
    Plan {
        /// Project JSON file
        project: PathBuf,
    },

    /// Show the stud layout and members of one wall
    Layout {
        /// Project JSON file
        project: PathBuf,

        /// Wall id
        #[arg(short, long)]
        wall: String,
    },

    /// Check a project without calculating it
    Validate {
        /// Project JSON file
        project: PathBuf,
    },

    /// Write a sample four-wall project
    Example {
        /// Project name
        #[arg(long, default_value = "Garden Room")]
        name: String,

        /// Front and back wall length (mm)
        #[arg(long, default_value_t = 4000.0)]
        width: f64,

        /// Side wall length (mm)
        #[arg(long, default_value_t = 3000.0)]
        depth: f64,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn load_project(path: &Path) -> CliResult<Project> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let project = Project::from_json(&json)?;
    debug!(path = %path.display(), walls = project.walls.len(), "project loaded");
    Ok(project)
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Plan { project } => {
            let project = load_project(&project)?;
            let bundle = calculate(&project);
            if !bundle.issues.is_empty() {
                warn!(issues = bundle.issues.len(), "project calculated with issues");
            }
            match cli.output {
                OutputFormat::Text => output::print_plan(&bundle),
                OutputFormat::Json => output::print_json(&bundle)?,
            }
        }

        Commands::Layout { project, wall } => {
            let project = load_project(&project)?;
            if project.wall(&wall).is_none() {
                return Err(CliError::UnknownWall(wall));
            }

            let heighted = compute_wall_heights(&project.envelope, &project.walls);
            for issue in &heighted.issues {
                warn!(%issue, "wall heights");
            }
            let Some(mut target) = heighted.value.into_iter().find(|w| w.id == wall) else {
                return Err(CliError::UnknownWall(wall));
            };

            let (layout, members) = frame_wall(&target, &project.envelope, &project.settings)?;
            target.members = members;

            match cli.output {
                OutputFormat::Text => output::print_layout(&target, &layout),
                OutputFormat::Json => output::print_json(&serde_json::json!({
                    "wall": target,
                    "layout": layout,
                }))?,
            }
        }

        Commands::Validate { project } => {
            let project = load_project(&project)?;
            let issues = project.validate();
            match cli.output {
                OutputFormat::Json => output::print_json(&issues)?,
                OutputFormat::Text if issues.is_empty() => {
                    println!("✓ {} is valid", project.meta.name)
                }
                OutputFormat::Text => {
                    for issue in &issues {
                        println!("✗ [{}] {}", issue.error_code(), issue);
                    }
                }
            }
        }

        Commands::Example {
            name,
            width,
            depth,
            out,
        } => {
            let json = Project::garden_room(name, width, depth).to_json()?;
            match out {
                Some(path) => {
                    fs::write(&path, json).map_err(|source| CliError::Write {
                        path: path.clone(),
                        source,
                    })?;
                    info!(path = %path.display(), "example project written");
                }
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(frame_error) = e.frame_error() {
                if let Ok(json) = serde_json::to_string_pretty(frame_error) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{json}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
