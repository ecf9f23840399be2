use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::nl43;

/// Default left edge of the landscape plot window (NL4-3 5' LTR end).
pub const DEFAULT_START_POS: u32 = 638;

/// Default number of landscape rows inspected during validation.
pub const DEFAULT_MAX_INSPECT_ROWS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct PlotConfig {
    /// Coordinate substituted for the `end` keyword in fragments.
    pub genome_end: u32,
    pub landscape: LandscapeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LandscapeConfig {
    pub start_pos: u32,
    pub end_pos: u32,
    pub max_inspect_rows: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            genome_end: nl43::GENOME_END,
            landscape: LandscapeConfig::default(),
        }
    }
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            start_pos: DEFAULT_START_POS,
            end_pos: nl43::GENOME_END,
            max_inspect_rows: DEFAULT_MAX_INSPECT_ROWS,
        }
    }
}

impl PlotConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Config from `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.genome_end == 0 {
            bail!("genomeEnd must be at least 1");
        }

        let landscape = &self.landscape;
        if landscape.start_pos >= landscape.end_pos {
            bail!(
                "landscape.startPos ({}) must be less than landscape.endPos ({})",
                landscape.start_pos,
                landscape.end_pos
            );
        }
        if landscape.max_inspect_rows == 0 {
            bail!("landscape.maxInspectRows must be at least 1");
        }

        Ok(())
    }
}
