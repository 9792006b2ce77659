use std::path::PathBuf;

use clap::Parser;

mod runtime;

/// Play audio files back to back with crossfades and silence skipping.
#[derive(Debug, Parser)]
#[command(name = "segue", version, about)]
pub struct Args {
    /// Audio files to queue, in order.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Queue index to start from (0-based).
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Crossfade length in seconds, overriding the config file.
    #[arg(long, value_name = "SECS")]
    crossfade: Option<f32>,

    /// Do not skip silent gaps.
    #[arg(long)]
    no_gap_killer: bool,

    /// No key handling or status line; exit when the queue ends.
    #[arg(long)]
    headless: bool,

    /// Print the effective settings as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    runtime::run(Args::parse())
}
