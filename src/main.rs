use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use psd2png::cli::selection::ChainSelector;
use psd2png::cli::{handle_error, Args, CliConfig, CliUtils};
use psd2png::conversion::batch::{display_relative, plan, run_session, select_roots};
use psd2png::conversion::{PsdEngine, RunSummary};
use psd2png::notify::ConsoleSink;
use psd2png::ConversionError;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match CliConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            handle_error(&e);
            return ExitCode::FAILURE;
        }
    };

    // Set up logging; RUST_LOG overrides the verbosity flags
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.default_log_filter()),
    )
    .format_timestamp(None)
    .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ConversionError>() {
                Some(conversion) => handle_error(conversion),
                None => CliUtils::show_error(&format!("{:#}", e)),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> Result<()> {
    let mut selector = config.selector();

    if config.args.dry_run {
        return dry_run(config, &mut selector);
    }

    let mut sink = ConsoleSink::new(config.is_quiet());
    let summary = run_session(&mut selector, &PsdEngine, &config.export_options, &mut sink)?;

    if let (Some(summary), Some(report)) = (summary, &config.args.report) {
        write_report(&summary, report)?;
    }

    Ok(())
}

fn dry_run(config: &CliConfig, selector: &mut ChainSelector) -> Result<()> {
    let Some(roots) = select_roots(selector) else {
        return Ok(());
    };

    let planned = plan(&roots)?;
    for (source, target) in &planned {
        CliUtils::show_info(
            &format!(
                "{} -> {}",
                display_relative(&roots.input, source),
                target.file.display()
            ),
            config.is_quiet(),
        );
    }
    CliUtils::show_info(
        &format!("{} PSD files would be converted", planned.len()),
        config.is_quiet(),
    );
    Ok(())
}

fn write_report(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = summary.to_json().context("Failed to serialize run report")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write run report {}", path.display()))?;
    info!("Run report written to {}", path.display());
    Ok(())
}
