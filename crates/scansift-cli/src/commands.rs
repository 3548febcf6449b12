use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scansift")]
#[command(about = "Pick the archival format (JPG or TIFF) for every scanned page", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./Config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Decide a format for every JPG/TIF page pair
    Process(ProcessArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Folder containing the JPG and TIF subfolders
    pub parent: Option<PathBuf>,

    /// JPG folder (overrides PARENT/JPG)
    #[arg(long)]
    pub jpg_dir: Option<PathBuf>,

    /// TIF folder (overrides PARENT/TIF)
    #[arg(long)]
    pub tif_dir: Option<PathBuf>,

    /// Low gray threshold (%)
    #[arg(long)]
    pub low: Option<f64>,

    /// High gray threshold (%)
    #[arg(long)]
    pub high: Option<f64>,

    /// Pages decoded at once
    #[arg(long)]
    pub workers: Option<usize>,

    /// Save the decision log as tab-separated text
    #[arg(long)]
    pub tsv: Option<PathBuf>,

    /// Save the decision log as an Excel workbook
    #[arg(long)]
    pub xlsx: Option<PathBuf>,

    /// Copy flagged TIFFs into DEST/"Flagged Files"
    #[arg(long, value_name = "DEST")]
    pub copy_flagged: Option<PathBuf>,

    /// Copy every selected file into DEST/"Selected Files"
    #[arg(long, value_name = "DEST")]
    pub copy_selected: Option<PathBuf>,

    /// Replace existing destination folders without asking
    #[arg(long)]
    pub overwrite: bool,
}
