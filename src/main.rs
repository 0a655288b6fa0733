//! bordercrop - crop a uniform-color border away from an image
//!
//! CLI entry point

use anyhow::Result;
use bordercrop::{
    cli::usage_error_line, exit_codes, BorderError, Cli, Config, CropOptions, CropPipeline,
    ProgressCallback,
};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::Level;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("Error: {}", usage_error_line(&e));
            std::process::exit(exit_codes::INVALID_ARGS);
        }
    };

    let result = run(&cli);

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code_for(&e)
        }
    });
}

// ============ Progress Callback Implementation ============

/// Prints stage results to stdout in verbose mode
struct VerboseProgress {
    verbose: bool,
}

impl ProgressCallback for VerboseProgress {
    fn on_step_complete(&self, step: &str, message: &str) {
        if self.verbose {
            println!("{}: {}", step, message);
        }
    }

    fn on_debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }
}

// ============ Crop Command ============

fn run(cli: &Cli) -> Result<()> {
    let options = resolve_options(cli);
    init_logging(options.verbose);

    let progress = VerboseProgress {
        verbose: options.verbose,
    };
    let report = CropPipeline::new(options).run_with_progress(&progress)?;

    if report.is_unchanged() {
        tracing::info!("no border removed");
    }
    Ok(())
}

/// Merge command-line flags over the configuration file
fn resolve_options(cli: &Cli) -> CropOptions {
    let file_config = match &cli.config {
        Some(path) => Config::load_from_path(path).unwrap_or_else(|e| {
            eprintln!("Warning: {}", e);
            Config::default()
        }),
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: {}", e);
            Config::default()
        }),
    };

    file_config.merge_with_cli(&cli.input, &cli.output, &cli.overrides())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<BorderError>() {
        Some(BorderError::ImageNotFound(_))
        | Some(BorderError::ImageLoad { .. })
        | Some(BorderError::InvalidImage(_)) => exit_codes::INPUT_NOT_FOUND,
        Some(BorderError::LowConfidenceBackground { .. }) => exit_codes::LOW_CONFIDENCE,
        Some(BorderError::InvalidCropBox(_)) => exit_codes::INVALID_CROP_BOX,
        Some(BorderError::UnsupportedFormat(_))
        | Some(BorderError::ImageSave { .. })
        | Some(BorderError::IoError(_)) => exit_codes::OUTPUT_ERROR,
        None => exit_codes::GENERAL_ERROR,
    }
}
