//! Command-line interface
//!
//! Every flag takes a value, so an invocation is always the program name
//! followed by `-<key> <value>` pairs.

use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::config::CliOverrides;

/// Process exit codes
pub mod exit_codes {
    /// Run completed and the output was written
    pub const SUCCESS: i32 = 0;
    /// Unclassified failure
    pub const GENERAL_ERROR: i32 = 1;
    /// Malformed command line (also used by clap itself)
    pub const INVALID_ARGS: i32 = 2;
    /// Input missing, unreadable or not an image
    pub const INPUT_NOT_FOUND: i32 = 3;
    /// No color covers a majority of the border ring
    pub const LOW_CONFIDENCE: i32 = 4;
    /// Nothing but background would remain
    pub const INVALID_CROP_BOX: i32 = 5;
    /// Output could not be encoded or written
    pub const OUTPUT_ERROR: i32 = 6;
}

/// Detect a uniform-color border around an image and crop it away
#[derive(Debug, Parser)]
#[command(name = "bordercrop", version, about, long_about = None)]
pub struct Cli {
    /// Input image
    #[arg(short = 'i', long = "input", value_name = "INPUT_PATH")]
    pub input: PathBuf,

    /// Output image; the encoder follows the extension
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
    pub output: PathBuf,

    /// Background pixels to keep around the content [default: 0]
    #[arg(short = 'b', long = "border-size", value_name = "PIXELS")]
    pub border_size: Option<u32>,

    /// Print format, size and color type of the input [default: false]
    #[arg(short = 'v', long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub verbose: Option<bool>,

    /// Open the cropped image in a viewer before saving [default: false]
    #[arg(short = 's', long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub show: Option<bool>,

    /// Configuration file with defaults for -b, -v and -s
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Condense a clap error into a single line
///
/// Keeps the headline and any indented lines that continue it, dropping
/// the usage block and tips that follow the first blank line.
pub fn usage_error_line(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let mut lines = rendered.lines();
    let headline = lines
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches("error:")
        .trim();

    let mut message = headline.to_string();
    for detail in lines.take_while(|line| !line.trim().is_empty()) {
        message.push(' ');
        message.push_str(detail.trim());
    }
    message
}

impl Cli {
    /// Flags given explicitly on the command line
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            border_size: self.border_size,
            verbose: self.verbose,
            show: self.show,
        }
    }
}
