// SPDX-FileCopyrightText: 2026 Reelgen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reelgen - turn an image and a prompt into a short video.
//!
//! This is the binary entry point. Chat integrations embed
//! `reelgen-pipeline` directly; the binary drives the same pipeline from the
//! command line with a stdout surface.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod shutdown;
mod surface;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reelgen_config::ReelgenConfig;
use reelgen_core::{GenerationRequest, GroupId, UserId};
use reelgen_pipeline::Orchestrator;
use tracing::{error, info};

use crate::surface::StdoutSurface;

/// reelgen - turn an image and a prompt into a short video.
#[derive(Parser, Debug)]
#[command(name = "reelgen", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a video from an image and deliver it to stdout.
    Generate {
        /// Image file to animate.
        #[arg(long)]
        image: PathBuf,
        /// What should happen in the video.
        #[arg(long)]
        prompt: String,
        /// Group the request comes from; omit for a direct request.
        #[arg(long)]
        group: Option<String>,
        /// Requesting user.
        #[arg(long, default_value = "cli")]
        user: String,
    },
    /// Print configuration and API connectivity status.
    Doctor,
    /// Remove stale files from the video cache.
    Sweep,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => reelgen_config::load_and_validate_path(path),
        None => reelgen_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            reelgen_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let code = match cli.command {
        Some(Commands::Generate {
            image,
            prompt,
            group,
            user,
        }) => run_generate(config, image, prompt, group, user).await,
        Some(Commands::Doctor) => run_doctor(config).await,
        Some(Commands::Sweep) => run_sweep(config).await,
        None => {
            println!("reelgen: use --help for available commands");
            0
        }
    };
    std::process::exit(code);
}

fn build_orchestrator(config: ReelgenConfig) -> Option<Orchestrator> {
    match Orchestrator::new(config) {
        Ok(orchestrator) => Some(orchestrator),
        Err(e) => {
            error!(error = %e, "failed to initialize pipeline");
            eprintln!("reelgen: {e}");
            None
        }
    }
}

async fn run_generate(
    config: ReelgenConfig,
    image: PathBuf,
    prompt: String,
    group: Option<String>,
    user: String,
) -> i32 {
    let bytes = match tokio::fs::read(&image).await {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("reelgen: cannot read {}: {e}", image.display());
            return 2;
        }
    };

    let Some(orchestrator) = build_orchestrator(config) else {
        return 1;
    };

    if let Err(e) = orchestrator.maintenance().await {
        error!(error = %e, "startup cache sweep failed");
    }

    let cancel = shutdown::install_signal_handler();
    let request = GenerationRequest::new(group.map(GroupId), UserId(user), prompt, Some(bytes));
    let outcome = orchestrator.handle(request, &StdoutSurface, &cancel).await;

    if outcome.succeeded {
        info!(transport = ?outcome.transport, "done");
        0
    } else {
        1
    }
}

async fn run_doctor(config: ReelgenConfig) -> i32 {
    let Some(orchestrator) = build_orchestrator(config) else {
        return 1;
    };
    println!("{}", orchestrator.status_report().await);
    println!();
    println!("{}", orchestrator.help_text());
    0
}

async fn run_sweep(config: ReelgenConfig) -> i32 {
    let Some(orchestrator) = build_orchestrator(config) else {
        return 1;
    };
    match orchestrator.maintenance().await {
        Ok(removed) => {
            println!(
                "reelgen: removed {removed} stale file(s) from {}",
                orchestrator.delivery().videos_dir().display()
            );
            0
        }
        Err(e) => {
            eprintln!("reelgen: {e}");
            1
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reelgen={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
