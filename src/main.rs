//! Graph Lab - Interactive graph workbench
//!
//! Reads graph commands from a terminal or a script file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use graph_lab::shell::Shell;
use graph_lab::{Config, OutputFormat};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "graph-lab")]
#[command(about = "Build graphs and analyze their structure")]
struct Cli {
    /// Path to the YAML config file (default: graph-lab.yaml)
    #[arg(long, env = "GRAPH_LAB_CONFIG")]
    config: Option<PathBuf>,

    /// Print outcomes as JSON
    #[arg(long)]
    json: bool,

    /// Start in directed mode
    #[arg(long)]
    directed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands interactively from stdin
    Repl,

    /// Execute a script of commands, one per line
    Run {
        /// Script file path
        script: PathBuf,

        /// Stop at the first failing line
        #[arg(long)]
        fail_fast: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing (stderr, so stdout stays clean for outcomes)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,graph_lab=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration, then apply CLI flags
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;
    if cli.json {
        config.output = OutputFormat::Json;
    }
    if cli.directed {
        config.mode.directed = true;
    }
    tracing::debug!(?config, "Configuration resolved");

    match cli.command {
        Commands::Repl => run_repl(&config),
        Commands::Run { script, fail_fast } => run_script(&config, &script, fail_fast),
    }
}

fn run_repl(config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut shell = Shell::from_config(config);
    if stdin.is_terminal() {
        println!("graph-lab: type `help` for commands, Ctrl-D to exit");
        shell = shell.with_prompt("graph-lab> ");
    }
    shell.run(stdin.lock(), io::stdout().lock())?;
    Ok(())
}

fn run_script(config: &Config, script: &Path, fail_fast: bool) -> Result<()> {
    let file = File::open(script)
        .with_context(|| format!("Failed to open script {}", script.display()))?;
    tracing::info!("Running script: {}", script.display());

    let mut shell = Shell::from_config(config).fail_fast(fail_fast);
    let stats = shell.run(BufReader::new(file), io::stdout().lock())?;

    if fail_fast && stats.failed > 0 {
        anyhow::bail!(
            "Script {} stopped after {} successful command(s)",
            script.display(),
            stats.executed
        );
    }
    Ok(())
}
