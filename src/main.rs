use clap::Parser;
use retrosheet_processor::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();
    cli::setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Dropping the processing future abandons in-flight parses as a unit.
        tokio::select! {
            result = cli::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                match signal {
                    Ok(()) => Err(retrosheet_processor::RetroError::Interrupted {
                        reason: "Processing interrupted by user".to_string(),
                    }
                    .into()),
                    Err(e) => Err(anyhow::anyhow!("Failed to listen for CTRL+C: {}", e)),
                }
            }
        }
    });

    match result {
        Ok(stats) if stats.archives_requested > 0 && stats.archives_unavailable == stats.archives_requested => {
            eprintln!("Error: none of the requested archives could be retrieved");
            process::exit(1);
        }
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
