//! health-host: serves the startup, readiness and liveness probes

#![allow(missing_docs)]

use clap::Parser;
use platform_health::server;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "health-host", version, about = "Startup and dependency health probes")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "HEALTH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    match server::builder::run_server(args.config.as_deref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
