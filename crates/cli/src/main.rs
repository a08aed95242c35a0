mod commands;
mod config;
mod error;
mod layout;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{cmd_create, cmd_generate, cmd_validate};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Flowsmith workflow definition toolchain.
#[derive(Parser)]
#[command(
    name = "flowsmith",
    version,
    about = "Validate JSON workflow definitions and generate their orchestration classes"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log validator and generator progress at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to a flowsmith.toml (default: ./flowsmith.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding one folder per workflow (overrides workflows_dir)
    #[arg(long, global = true)]
    workflows_dir: Option<PathBuf>,

    /// Directory with stub overrides (overrides stub_dir)
    #[arg(long, global = true)]
    stub_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate workflow definition files and print their diagnostics
    Validate {
        /// Definition JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Also check each file against the definition JSON Schema
        #[arg(long)]
        schema: bool,
    },

    /// Generate Base and Implementation classes from workflow definitions
    Generate {
        /// Workflow folder to generate (default: every folder)
        name: Option<String>,
    },

    /// Scaffold a new workflow folder with a starter definition
    Create {
        /// Workflow name, e.g. Billing
        name: String,
        /// Name of the first workflow state
        #[arg(long, default_value = "Start")]
        start: String,
        /// Overwrite an existing definition file
        #[arg(long)]
        force: bool,
    },
}

/// Settings shared by every subcommand.
pub(crate) struct Context {
    pub config: config::Config,
    pub output: OutputFormat,
    pub quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            std::process::exit(1);
        }
    };
    if let Some(dir) = cli.workflows_dir {
        config.workflows_dir = dir;
    }
    if let Some(dir) = cli.stub_dir {
        config.stub_dir = Some(dir);
    }

    let ctx = Context {
        config,
        output: cli.output,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Validate { files, schema } => {
            cmd_validate(&files, schema, &ctx);
        }
        Commands::Generate { name } => {
            cmd_generate(name.as_deref(), &ctx);
        }
        Commands::Create { name, start, force } => {
            cmd_create(&name, &start, force, &ctx);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
