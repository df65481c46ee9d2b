// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use comic_recapper::app::AppModel;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "comic-recapper")]
#[command(about = "UPC-A barcode scanner for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Scan a barcode and submit it without the GUI
    Scan {
        /// Camera index to use (from 'comic-recapper list')
        #[arg(short, long, default_value = "0")]
        camera: usize,

        /// Recap endpoint to submit to (default: configured endpoint)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Also write the captured frame to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Give up after this many seconds without a barcode
        #[arg(short, long, default_value = "60")]
        timeout: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=comic_recapper=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Scan {
            camera,
            endpoint,
            output,
            timeout,
        }) => cli::scan(camera, endpoint, output, timeout),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(180.0),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
