//! Planner configuration, loaded from YAML.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{GridFrame, ReplanMode, SearchConfig, WalkConfig, WeightConfig};

/// Commented defaults written by `hazard init`.
pub const DEFAULT_CONFIG_YAML: &str = r#"# hazard-nav configuration

weights:
  # cells taller than this (m) are impassable
  height_threshold: 0.3
  # cells with an object id above this are impassable
  object_threshold: 0.5
  free_cost: 1.0

search:
  connectivity: eight
  # false: diagonal moves need both side cells passable
  allow_corner_cutting: true
  max_expansions: null

walk:
  max_steps: 100
  arrived_at: 1.0
  step_arrived_at: 0.5
  reset_arms: false
  replan:
    mode: every_step

frame:
  cell_size: 0.25
  offset_row: 0.0
  offset_col: 0.0
"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub weights: WeightConfig,
    pub search: SearchConfig,
    pub walk: WalkConfig,
    pub frame: GridFrame,
}

impl NavConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Defaults when `path` does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        for (name, value) in [
            ("weights.height_threshold", w.height_threshold),
            ("weights.object_threshold", w.object_threshold),
            ("weights.free_cost", w.free_cost),
            ("walk.arrived_at", self.walk.arrived_at),
            ("walk.step_arrived_at", self.walk.step_arrived_at),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                bail!("{name} must be finite and non-negative, got {value}");
            }
        }
        if !(self.frame.cell_size.is_finite() && self.frame.cell_size > 0.0) {
            bail!("frame.cell_size must be positive, got {}", self.frame.cell_size);
        }
        if !(self.frame.offset_row.is_finite() && self.frame.offset_col.is_finite()) {
            bail!("frame offsets must be finite");
        }
        if let ReplanMode::Commit { steps: 0 } = self.walk.replan {
            bail!("walk.replan.steps must be at least 1");
        }
        Ok(())
    }
}
