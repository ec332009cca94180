//! Loading of the optional TOML settings file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use handlords_core::GameConfig;
use serde::Deserialize;

/// Contents of a settings file: the game configuration plus an optional seed.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Settings {
    /// Seed for the shift register; the built-in seed is used when absent.
    #[serde(default)]
    pub(crate) seed: Option<u16>,
    /// Simulation parameters.
    #[serde(flatten)]
    pub(crate) game: GameConfig,
}

/// Reads and parses the settings file at `path`.
pub(crate) fn load(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid settings file {}", path.display()))
}

fn parse(contents: &str) -> Result<Settings> {
    toml::from_str(contents).context("failed to parse settings toml contents")
}
