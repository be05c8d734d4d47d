use clap::Parser;
use std::path::PathBuf;

use fesprite::CompositeMode;

#[derive(Parser)]
#[command(name = "fesprite", version, about = "FESPRITE CLI")]
pub struct CliArgs {
    /// Head sheet name (a key in head.json)
    #[arg(long)]
    pub head: Option<String>,

    /// Body sheet name (a key in body.json; single file mode)
    #[arg(long)]
    pub body: Option<String>,

    /// Root input directory holding sheets and data tables
    #[arg(short, long, default_value = "inputs")]
    pub input_dir: PathBuf,

    /// Output filename (single file mode)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory for batch compositing (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Compositing mode (idle or full)
    #[arg(short, long, value_enum, default_value_t = CompositeMode::Idle)]
    pub mode: CompositeMode,

    /// Keep opaque black backgrounds instead of transparency
    #[arg(long, default_value_t = false)]
    pub no_alpha: bool,

    /// Manual X,Y offset onto the source sheets (e.g. "0,-2")
    #[arg(long, default_value = "0,0")]
    pub offset: String,

    /// Write a JSON metadata sidecar next to each output sheet
    #[arg(long, default_value_t = false)]
    pub sidecar: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Batch mode: composite the head against every registered body class
    #[arg(long, default_value_t = false)]
    pub batch: bool,

    /// Regenerate head.json/body.json from the sheet directories first
    #[arg(long, default_value_t = false)]
    pub scan: bool,

    /// Generate intermediate sheets from raw_head/ and raw_body/ rips first
    #[arg(long, default_value_t = false)]
    pub prepare: bool,
}
