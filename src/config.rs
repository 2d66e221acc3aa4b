use std::path::PathBuf;

use clap::Parser;

use crate::data::catalog::SortPolicy;

/// Interactive viewer for 12-lead ECG records stored in WFDB format
#[derive(Parser, Debug)]
#[command(name = "ecg-viewer")]
#[command(about = "Browse patients and plot their 12-lead ECG records")]
#[command(version)]
pub struct Cli {
    /// Dataset root holding `metadata.csv` and the `files/` records folder
    #[arg(long, env = "ECG_VIEWER_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Metadata table (defaults to <BASE_DIR>/metadata.csv)
    #[arg(long, env = "ECG_VIEWER_METADATA")]
    pub metadata: Option<PathBuf>,

    /// Records root with one folder per patient (defaults to <BASE_DIR>/files)
    #[arg(long, env = "ECG_VIEWER_RECORDS")]
    pub records: Option<PathBuf>,

    /// How many patient IDs to list before each prompt
    #[arg(long, default_value_t = 20)]
    pub list_limit: usize,

    /// Ordering of the patient ID list
    #[arg(long, value_enum, default_value_t = SortPolicy::Numeric)]
    pub sort: SortPolicy,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn metadata_path(&self) -> PathBuf {
        self.metadata
            .clone()
            .unwrap_or_else(|| self.base_dir.join("metadata.csv"))
    }

    pub fn records_root(&self) -> PathBuf {
        self.records
            .clone()
            .unwrap_or_else(|| self.base_dir.join("files"))
    }
}
