// SPDX-FileCopyrightText: 2026 Tollgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tollgate - token-budget guard and cost accountant.
//!
//! This is the binary entry point for the Tollgate CLI.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tollgate - token-budget guard and cost accountant for the OpenAI Responses API.
#[derive(Parser, Debug)]
#[command(name = "tollgate", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a prompt with a JSON schema and print the accounted response.
    Process {
        /// User prompt text.
        #[arg(long)]
        prompt: String,
        /// Path to a JSON schema file describing the expected output.
        #[arg(long)]
        schema: PathBuf,
        /// Schema name tag sent with the request.
        #[arg(long)]
        name: Option<String>,
        /// Sampling temperature.
        #[arg(long)]
        temperature: Option<f32>,
        /// Caller-identity tag.
        #[arg(long)]
        user: Option<String>,
    },
    /// Count tokens in a text for the configured model.
    Count {
        text: String,
    },
    /// Compute the cost of a token split.
    Cost {
        #[arg(long)]
        input: u64,
        #[arg(long)]
        output: u64,
        /// Model to price. Defaults to the configured model.
        #[arg(long)]
        model: Option<String>,
    },
    /// List priced models.
    Models,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => tollgate_config::load_and_validate_path(path),
        None => tollgate_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tollgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.log_level);

    let result = match cli.command {
        Commands::Process {
            prompt,
            schema,
            name,
            temperature,
            user,
        } => {
            commands::run_process(
                &config,
                commands::ProcessArgs {
                    prompt,
                    schema,
                    name,
                    temperature,
                    user,
                },
            )
            .await
        }
        Commands::Count { text } => commands::run_count(&config, &text),
        Commands::Cost {
            input,
            output,
            model,
        } => commands::run_cost(&config, input, output, model.as_deref()),
        Commands::Models => commands::run_models(&config),
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("tollgate: {e}");
            std::process::exit(1);
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tollgate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
