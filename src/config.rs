use crate::board::Color;
use crate::geometry::{BoardRegion, Point};
use crate::uci::EngineOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub top_left: Point,
    pub bottom_right: Point,
    pub play_as: Color,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            top_left: Point::new(19.0, 182.0),
            bottom_right: Point::new(785.0, 948.0),
            play_as: Color::Black,
        }
    }
}

impl BoardConfig {
    pub fn region(&self) -> BoardRegion {
        BoardRegion {
            top_left: self.top_left,
            bottom_right: self.bottom_right,
            side: self.play_as,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineOptions,
    pub board: BoardConfig,
    /// Overwritten on every turn.
    pub screenshot: PathBuf,
    pub duration_secs: u64,
    /// Pause after each synthetic input event.
    pub input_settle_ms: u64,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineOptions::default(),
            board: BoardConfig::default(),
            screenshot: PathBuf::from("screenshot.png"),
            duration_secs: 90,
            input_settle_ms: 0,
            dry_run: false,
        }
    }
}

impl Config {
    /// Reads a YAML config, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let content = fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config {}", p.display()))?;
                Self::from_yaml(&content)
                    .with_context(|| format!("Failed to parse config {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn input_settle(&self) -> Duration {
        Duration::from_millis(self.input_settle_ms)
    }
}
