// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use petal::backends::camera::FacingMode;
use petal::config::Config;
use std::path::PathBuf;
use std::sync::Mutex;

mod cli;

#[derive(Parser)]
#[command(name = "petal")]
#[command(about = "Identify flowers from photos or the camera")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Classifier service base URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive terminal UI (default)
    Terminal,

    /// List available cameras
    List,

    /// Upload an image file and print the classification
    Classify {
        /// Image to classify
        file: PathBuf,
    },

    /// Capture a frame from the camera and classify it
    Capture {
        /// Camera to use: front or back
        #[arg(short, long)]
        facing: Option<FacingMode>,

        /// Use an image file as the camera instead of real hardware
        #[arg(long)]
        image: Option<PathBuf>,

        /// Also save the captured JPEG (file, or directory for a timestamped name)
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Search the flower catalogue
    Search {
        /// Keywords
        query: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Terminal));

    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=petal=debug, RUST_LOG=info
    init_logging(interactive);

    let mut config = Config::load();
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    match cli.command {
        None | Some(Commands::Terminal) => petal::terminal::run(config),
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Classify { file }) => cli::classify_file(&config, &file),
        Some(Commands::Capture {
            facing,
            image,
            save,
        }) => cli::capture(
            &config,
            facing.unwrap_or(config.facing_mode),
            image,
            save,
        ),
        Some(Commands::Search { query }) => cli::search(&config, &query),
    }
}

/// Log to stderr, or to a file while the terminal UI owns the screen
fn init_logging(interactive: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    if interactive {
        if let Some(file) = log_file() {
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
            return;
        }
        // Nowhere to write without corrupting the screen
        builder.with_writer(std::io::sink).init();
        return;
    }
    builder.with_writer(std::io::stderr).init();
}

fn log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join("petal");
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("petal.log"))
        .ok()
}
