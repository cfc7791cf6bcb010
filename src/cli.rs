use crate::board::Color;
use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "board-pilot", version, about = "Plays engine moves on an on-screen chess board")]
pub struct Cli {
    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to a UCI engine executable
    #[arg(short, long)]
    pub engine: Option<PathBuf>,

    /// Seconds to keep playing
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Side we play: white or black
    #[arg(long)]
    pub play_as: Option<Color>,

    /// Engine search depth
    #[arg(long)]
    pub depth: Option<u32>,

    /// Where each turn's capture is written
    #[arg(long)]
    pub screenshot: Option<PathBuf>,

    /// Log moves without clicking
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Flags given on the command line win over the config file.
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(engine) = &self.engine {
            cfg.engine.path = engine.clone();
        }
        if let Some(duration) = self.duration {
            cfg.duration_secs = duration;
        }
        if let Some(side) = self.play_as {
            cfg.board.play_as = side;
        }
        if let Some(depth) = self.depth {
            cfg.engine.depth = depth;
        }
        if let Some(screenshot) = &self.screenshot {
            cfg.screenshot = screenshot.clone();
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
    }
}
