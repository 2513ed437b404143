//! Command-line interface module

use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::selection::{ChainSelector, DirectorySelector, PromptSelector};
use crate::conversion::{ConversionResult, ExportOptions};
use crate::error::ConversionError;

pub mod path_mapping;
pub mod selection;

/// Main CLI arguments
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "psd2png")]
#[command(about = "Batch convert PSD documents into flattened PNG images, mirroring the folder tree")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// Root folder containing PSD files
    #[arg()]
    pub input: Option<PathBuf>,

    /// Destination root for PNG files
    #[arg()]
    pub output: Option<PathBuf>,

    /// Ask on the terminal for any folder not given on the command line
    #[arg(long, conflicts_with = "dialog")]
    pub prompt: bool,

    /// Use a native folder picker for any folder not given (requires the `gui` feature)
    #[arg(long)]
    pub dialog: bool,

    /// Flatten onto white instead of keeping the alpha channel
    #[arg(long)]
    pub no_transparency: bool,

    /// List the conversions that would happen without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub export_options: ExportOptions,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: Args) -> ConversionResult<Self> {
        if args.dialog && !cfg!(feature = "gui") {
            return Err(ConversionError::configuration(
                "--dialog requires psd2png to be built with the `gui` feature",
            ));
        }

        let export_options = ExportOptions::default().with_transparency(!args.no_transparency);
        export_options
            .validate()
            .map_err(ConversionError::configuration)?;

        Ok(Self {
            args,
            export_options,
        })
    }

    /// Selector answering the two folder prompts
    pub fn selector(&self) -> ChainSelector {
        let explicit = [self.args.input.clone(), self.args.output.clone()];
        ChainSelector::new(explicit, self.fallback_selector())
    }

    fn fallback_selector(&self) -> Option<Box<dyn DirectorySelector>> {
        if self.args.prompt {
            return Some(Box::new(PromptSelector::new()));
        }
        self.dialog_selector()
    }

    #[cfg(feature = "gui")]
    fn dialog_selector(&self) -> Option<Box<dyn DirectorySelector>> {
        if self.args.dialog {
            Some(Box::new(selection::DialogSelector))
        } else {
            None
        }
    }

    #[cfg(not(feature = "gui"))]
    fn dialog_selector(&self) -> Option<Box<dyn DirectorySelector>> {
        None
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.args.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            println!("{} {}", style("✓").green(), message);
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    /// Show a plain line (if not in quiet mode)
    pub fn show_info(message: &str, quiet: bool) {
        if !quiet {
            println!("{}", message);
        }
    }
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &ConversionError) {
    CliUtils::show_error(&error.user_message());

    match error {
        ConversionError::DirectoryEnumeration { .. } => {
            eprintln!("\nTip: check that the input folder exists and is readable");
        }
        ConversionError::Configuration { .. } => {
            eprintln!("\nTry 'psd2png --help' for usage information.");
        }
        _ => {}
    }
}
