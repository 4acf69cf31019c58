// beatgif-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "beatgif: beatmap clip to GIF converter",
    long_about = "Converts a gameplay clip named <mapId>_<label>.<ext> into two annotated GIFs \
                  (a timestamped archive copy and a per-label collection copy) using ffmpeg."
)]
pub struct Cli {
    /// Gameplay clip to convert, named <mapId>_<label>.<ext>
    #[arg(value_name = "VIDEO")]
    pub input: Option<PathBuf>,
}
