// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result
    )
)]

use clap::Parser;
use color_eyre::eyre::Result;
use ordo::cli::{run, to_error_json, Args};
use ordo::logging::{get_log_file_path, init_logging, parse_rotation, LogConfig};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();
    let data_dir = args.data_dir();

    let log_config = LogConfig {
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..LogConfig::for_data_dir(&data_dir)
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", get_log_file_path());
        eprintln!();
        return Err(e);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&args, &mut out).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            let cwd = std::env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            eprintln!("{}", to_error_json(&cwd, &err));
            Ok(ExitCode::FAILURE)
        }
    }
}
