//! Main CLI application structure

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{check_cmd, graph_cmd, infer_cmd, parse_cmd};
use crate::storage::Config;

/// Exit code for blocking document problems
pub const EXIT_BLOCKED: u8 = 2;

#[derive(Parser)]
#[command(name = "taskdeps")]
#[command(author, version, about = "Parse task checklists and infer dependencies between tasks")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format, else text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Use this project config file instead of searching for taskdeps.toml
    #[arg(long, global = true, env = "TASKDEPS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by commands that run inference
#[derive(Args, Debug, Clone)]
pub struct InferenceArgs {
    /// Task checklist, task JSON, or `-` for stdin
    pub file: PathBuf,

    /// Minimum confidence for auto-applied edges (0-100)
    #[arg(
        long,
        short = 't',
        env = "TASKDEPS_THRESHOLD",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub threshold: Option<u8>,

    /// Treat the input as task JSON instead of a checklist
    #[arg(long)]
    pub json_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a task checklist and validate declared dependencies
    Parse {
        /// Task checklist, or `-` for stdin
        file: PathBuf,
    },

    /// Infer dependencies between tasks
    Infer(InferenceArgs),

    /// Show incomplete tasks whose inferred blockers are done
    Ready {
        #[command(flatten)]
        args: InferenceArgs,

        /// Also use edges that are pending review
        #[arg(long)]
        include_pending: bool,
    },

    /// Show incomplete tasks waiting on other tasks
    Blocked {
        #[command(flatten)]
        args: InferenceArgs,

        /// Also use edges that are pending review
        #[arg(long)]
        include_pending: bool,
    },

    /// Print tasks with blockers first
    Order {
        #[command(flatten)]
        args: InferenceArgs,

        /// Also use edges that are pending review
        #[arg(long)]
        include_pending: bool,
    },

    /// Check the structure of a planning document (proposal.md, tasks.md, design.md)
    Check {
        /// Document to check
        file: PathBuf,
    },

    /// Editor hook: read a tool event from stdin and check the edited document
    Hook,
}

/// Main entry point for the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Document checks run without configuration
    let config = match (&cli.command, &cli.config) {
        (Commands::Check { .. } | Commands::Hook, _) => Config::default(),
        (_, Some(path)) => Config::with_project_file(path)?,
        (_, None) => Config::load()?,
    };
    let format = cli.format.unwrap_or_else(|| config.default_format());
    let output = Output::new(format, cli.verbose);

    output.verbose("taskdeps starting");
    if let Some(path) = &config.project_path {
        output.verbose(&format!("Using config: {}", path.display()));
    }

    let code = match cli.command {
        Commands::Parse { file } => parse_cmd::run(&output, &file)?,

        Commands::Infer(args) => {
            let threshold = args.threshold.unwrap_or_else(|| config.threshold());
            infer_cmd::run(&output, &args, threshold)?
        }

        Commands::Ready { args, include_pending } => {
            let threshold = args.threshold.unwrap_or_else(|| config.threshold());
            graph_cmd::ready(&output, &args, threshold, include_pending)?
        }
        Commands::Blocked { args, include_pending } => {
            let threshold = args.threshold.unwrap_or_else(|| config.threshold());
            graph_cmd::blocked(&output, &args, threshold, include_pending)?
        }
        Commands::Order { args, include_pending } => {
            let threshold = args.threshold.unwrap_or_else(|| config.threshold());
            graph_cmd::order(&output, &args, threshold, include_pending)?
        }

        Commands::Check { file } => check_cmd::check(&output, &file)?,
        Commands::Hook => check_cmd::hook(&output)?,
    };

    output.verbose("Command completed");
    Ok(code)
}
