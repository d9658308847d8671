/// Configuration for the history manager.
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default maximum number of operations kept on the undo stack.
const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Environment variable overriding `max_depth`.
///
/// An integer sets the limit (`0` is raised to `1` like any other source);
/// `none` removes it.
pub const MAX_DEPTH_ENV: &str = "REVERT_MAX_DEPTH";

/// Configuration for the history manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Max operations on the undo stack. `None` = unbounded.
    ///
    /// When exceeded, the oldest operations are evicted from the bottom.
    pub max_depth: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl HistoryConfig {
    /// A configuration with no capacity limit.
    pub fn unbounded() -> Self {
        Self { max_depth: None }
    }

    /// A configuration keeping at most `max_depth` operations.
    pub fn with_max_depth(max_depth: usize) -> Self {
        let mut config = Self {
            max_depth: Some(max_depth),
        };
        config.sanitize();
        config
    }

    /// Loads config from a JSON file.
    ///
    /// Missing fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read history config: {}", path.display()))?;
        let mut config: HistoryConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history config: {}", path.display()))?;
        config.sanitize();
        Ok(config)
    }

    /// Loads config from `path`, returning defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No history config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("{e:#}; using default history config");
                Self::default()
            }
        }
    }

    /// Writes the config as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize history config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write history config: {}", path.display()))?;
        Ok(())
    }

    /// Applies the `REVERT_MAX_DEPTH` override, if set and valid.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(MAX_DEPTH_ENV) {
            match parse_depth(&raw) {
                Some(depth) => self.max_depth = depth,
                None => tracing::debug!("Ignoring invalid {MAX_DEPTH_ENV}={raw:?}"),
            }
        }
        self.sanitize();
        self
    }

    /// Clamps values into their valid ranges.
    ///
    /// A depth of zero would discard every operation as soon as it runs, so
    /// it is raised to one.
    pub fn sanitize(&mut self) {
        if self.max_depth == Some(0) {
            self.max_depth = Some(1);
        }
    }
}

/// Parses a depth override: an integer, or `none` for unbounded.
fn parse_depth(raw: &str) -> Option<Option<usize>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        return Some(None);
    }
    raw.parse::<usize>().ok().map(Some)
}
