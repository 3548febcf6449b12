mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;
use std::thread;

use anyhow::{anyhow, bail, Context};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ProcessArgs};
use dotenv::dotenv;
use progress::{ProgressView, RunOutcome};
use scansift_core::deliver::{deliver, FLAGGED_FOLDER, SELECTED_FOLDER};
use scansift_core::resolve::{flagged_files, selected_files};
use scansift_core::{export, AppConfig, SelectionEngine, Thresholds};
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let guard = logging::init_logger();

    let args = Cli::parse();

    let config = match scansift_core::config::load_configuration(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    match args.command {
        Some(Commands::Process(process_args)) => {
            if let Err(err) = run_process(&config, process_args) {
                error!("Error: {:#}", err);
                drop(guard);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }
}

fn run_process(config: &AppConfig, args: ProcessArgs) -> anyhow::Result<()> {
    let parent = args.parent.clone().or_else(|| config.parent_folder.clone());
    let jpg_dir = pick_dir(args.jpg_dir.clone(), parent.as_deref(), |p| config.jpg_dir(p))?;
    let tif_dir = pick_dir(args.tif_dir.clone(), parent.as_deref(), |p| config.tif_dir(p))?;

    let low = args.low.unwrap_or(config.low_threshold);
    let high = args.high.unwrap_or(config.high_threshold);
    Thresholds::new(low, high).context("Low threshold must be less than High threshold")?;

    let engine = SelectionEngine::from_config(config)
        .with_workers(args.workers.unwrap_or(config.workers));

    info!(
        "Processing '{}' against '{}' (low {}%, high {}%)",
        jpg_dir.display(),
        tif_dir.display(),
        low,
        high
    );

    let (tx, rx) = mpsc::channel();
    let worker = {
        let jpg_dir = jpg_dir.clone();
        let tif_dir = tif_dir.clone();
        thread::spawn(move || engine.process(&jpg_dir, &tif_dir, low, high, &tx))
    };

    let outcome = ProgressView::new().drive(rx);
    let stats = worker
        .join()
        .map_err(|_| anyhow!("Processing thread panicked"))?;

    let (summary, flagged_count, records) = match outcome {
        RunOutcome::Complete {
            summary,
            flagged_count,
            records,
        } => (summary, flagged_count, records),
        RunOutcome::Failed(message) => bail!(message),
    };

    println!();
    info!("{}", summary.green());
    info!(
        "Flagged Files Count: {}",
        format!("{}", flagged_count).yellow()
    );
    if let Ok(stats) = stats {
        info!(
            "{} decided, {} skipped, {} total in {}",
            format!("{}", stats.decided).green(),
            format!("{}", stats.skipped).red(),
            stats.total_files,
            format!("{:.2}s", stats.duration.as_secs_f64()).green(),
        );
    }

    if let Some(path) = &args.tsv {
        export::write_tsv(&records, path)
            .with_context(|| format!("Failed to save TSV log to {}", path.display()))?;
        info!("TSV log has been saved to {}", path.display());
    }

    if let Some(path) = &args.xlsx {
        export::write_xlsx(&records, path)
            .with_context(|| format!("Failed to save Excel log to {}", path.display()))?;
        info!("Excel log has been saved to {}", path.display());
    }

    if let Some(dest) = &args.copy_flagged {
        let files = flagged_files(&records, &tif_dir).found;
        copy_files(&files, dest, FLAGGED_FOLDER, args.overwrite, "flagged")?;
    }

    if let Some(dest) = &args.copy_selected {
        let files = selected_files(&records, &jpg_dir, &tif_dir).found;
        copy_files(&files, dest, SELECTED_FOLDER, args.overwrite, "selected")?;
    }

    Ok(())
}

fn pick_dir(
    explicit: Option<PathBuf>,
    parent: Option<&Path>,
    under_parent: impl Fn(&Path) -> PathBuf,
) -> anyhow::Result<PathBuf> {
    match (explicit, parent) {
        (Some(dir), _) => Ok(dir),
        (None, Some(parent)) => Ok(under_parent(parent)),
        (None, None) => bail!("Please select a parent folder (or pass --jpg-dir and --tif-dir)."),
    }
}

fn copy_files(
    files: &[PathBuf],
    dest_parent: &Path,
    folder_name: &str,
    overwrite: bool,
    what: &str,
) -> anyhow::Result<()> {
    if files.is_empty() {
        info!("There are no {} files to copy.", what);
        return Ok(());
    }

    let mut overwrite = overwrite;
    if !overwrite && dest_parent.join(folder_name).exists() {
        let prompt = format!(
            "The folder '{}' already exists in {}. Overwrite its contents?",
            folder_name,
            dest_parent.display()
        );
        if !prompt_confirm(&prompt, Some(false))? {
            info!("Skipped copying {} files.", what);
            return Ok(());
        }
        overwrite = true;
    }

    let report = deliver(files, dest_parent, folder_name, overwrite)?;

    if report.failed.is_empty() {
        info!(
            "All {} {} files were copied successfully to '{}'.",
            format!("{}", report.copied).green(),
            what,
            report.destination.display()
        );
    } else {
        warn!(
            "Copied {} {} files successfully. Failed to copy {} files:",
            report.copied,
            what,
            format!("{}", report.failed.len()).red()
        );
        for (path, message) in &report.failed {
            warn!("{}: {}", path.display(), message);
        }
    }

    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
