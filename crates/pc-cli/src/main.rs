//! prompt-compress: command-line front end for the prompt rewriter.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "prompt-compress")]
#[command(about = "Rewrite verbose LLM prompts into compact ones", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Optimize one prompt
    Optimize {
        /// Input file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directive language (english, mandarin)
        #[arg(long)]
        lang: Option<String>,

        /// Re-apply each rule until the text stops changing
        #[arg(long)]
        fixed_point: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the structural validator; exits 1 when anything is flagged
    Validate {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Optimize every record of a JSONL corpus
    Batch {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long)]
        concurrency: Option<usize>,

        /// Per-document timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List the rule catalog
    Catalog {
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Optimize { input, output, lang, fixed_point, json } => {
            let config = commands::with_optimize_overrides(config, lang.as_deref(), fixed_point)?;
            commands::optimize(&config, input.as_deref(), output.as_deref(), json)
        }
        Commands::Validate { input } => {
            let clean = commands::validate(&config, input.as_deref())?;
            if !clean {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Batch { input, output, concurrency, timeout_ms } => {
            let config = commands::with_batch_overrides(config, concurrency, timeout_ms)?;
            commands::batch(&config, &input, &output).await
        }
        Commands::Catalog { json } => commands::catalog(&config, json),
        Commands::Serve { host, port } => commands::serve(config, host, port).await,
    }
}

#[cfg(test)]
mod tests;
