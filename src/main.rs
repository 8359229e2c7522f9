//! wsi-redact - Overwrite the macro image of a Whole Slide Image.
//!
//! This binary parses the command line, sets up logging and runs the
//! requested command.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wsi_redact::{
    config::{Cli, Command, InspectConfig, RedactConfig},
    ExplicitPages, MacroPage, Redactor, SlideSummary,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Redact(config) => run_redact(config),
        Command::Inspect(config) => run_inspect(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "wsi_redact=debug"
    } else {
        "wsi_redact=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// =============================================================================
// Redact Command
// =============================================================================

fn run_redact(config: RedactConfig) -> ExitCode {
    init_logging(config.verbose);

    let fill = match config.validate() {
        Ok(fill) => fill,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let redactor = Redactor::new()
        .with_fill(fill)
        .with_codec(config.placeholder_codec());

    let result = if config.uses_macro_policy() {
        redactor.redact_pages(&config.input, &config.output, &MacroPage)
    } else {
        let pages = ExplicitPages::new(config.pages.iter().copied());
        redactor.redact_pages(&config.input, &config.output, &pages)
    };

    match result {
        Ok(report) => {
            if report.pages.is_empty() {
                info!("No pages selected, output is identical to input");
            }
            for page in &report.pages {
                println!(
                    "Redacted page {} ({}x{}): {} of {} bytes",
                    page.index, page.width, page.height, page.payload_len, page.capacity
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Redaction failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

fn run_inspect(config: InspectConfig) -> ExitCode {
    init_logging(config.verbose);

    let summary = match SlideSummary::from_path(&config.input) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Cannot inspect {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", summary.to_table());
    }

    ExitCode::SUCCESS
}
