use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::network::{GraphThresholds, LabelDensity, SimulationParams};

/// `min_edge_weight` is picked in steps of 1 / EDGE_WEIGHT_STEPS.
pub const EDGE_WEIGHT_STEPS: f64 = 100.0;

/// Largest `min_edge_weight` the controls offer.
pub const MAX_EDGE_WEIGHT: f64 = 0.99;

/// Entry counts at which the automatic minimum tag frequency steps up by one.
const FREQUENCY_STEPS: [usize; 4] = [20, 50, 200, 1000];

/// Minimum tag frequency for a collection of `entry_count` entries.
pub fn auto_min_tag_frequency(entry_count: usize) -> usize {
    1 + FREQUENCY_STEPS
        .iter()
        .take_while(|&&step| step <= entry_count)
        .count()
}

/// Tunables of the tag clouds and the keyword network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Keywords below this frequency are not drawn. `None` derives it from
    /// the number of entries.
    pub min_keyword_frequency: Option<usize>,

    /// Links need a normalized co-occurrence strictly above this.
    pub min_edge_weight: f64,

    /// Scales every link's pull in the layout.
    pub edge_strength: f32,

    /// Many-body strength; negative values repel.
    pub charge_strength: f32,

    pub link_distance: f32,

    pub hidden: bool,

    pub label_count: usize,

    pub min_label_ratio: f64,

    /// Tags below this frequency are left out of the clouds. `None` derives
    /// it from the number of entries.
    pub min_tag_frequency: Option<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            min_keyword_frequency: None,
            min_edge_weight: 0.7,
            edge_strength: 1.0,
            charge_strength: -100.0,
            link_distance: 30.0,
            hidden: false,
            label_count: 15,
            min_label_ratio: 0.2,
            min_tag_frequency: None,
        }
    }
}

impl NetworkConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config JSON in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..1.0).contains(&self.min_edge_weight),
            "min_edge_weight must be in [0, 1), got {}",
            self.min_edge_weight
        );
        ensure!(
            self.edge_strength >= 0.0 && self.edge_strength.is_finite(),
            "edge_strength must be a non-negative number, got {}",
            self.edge_strength
        );
        ensure!(
            (0.0..=1.0).contains(&self.min_label_ratio),
            "min_label_ratio must be in [0, 1], got {}",
            self.min_label_ratio
        );
        ensure!(
            self.link_distance.is_finite() && self.link_distance > 0.0,
            "link_distance must be positive, got {}",
            self.link_distance
        );
        Ok(())
    }

    /// Stores a link threshold picked on a control, snapped to the nearest
    /// step so a weight equal to the shown value is not let through.
    pub fn set_min_edge_weight(&mut self, value: f64) {
        let snapped = (value * EDGE_WEIGHT_STEPS).round() / EDGE_WEIGHT_STEPS;
        self.min_edge_weight = if snapped.is_finite() {
            snapped.clamp(0.0, MAX_EDGE_WEIGHT)
        } else {
            0.0
        };
    }

    pub fn effective_min_tag_frequency(&self, entry_count: usize) -> usize {
        self.min_tag_frequency
            .unwrap_or_else(|| auto_min_tag_frequency(entry_count))
            .max(1)
    }

    pub fn thresholds(&self, entry_count: usize) -> GraphThresholds {
        GraphThresholds {
            min_keyword_frequency: self
                .min_keyword_frequency
                .unwrap_or_else(|| self.effective_min_tag_frequency(entry_count)),
            min_edge_weight: self.min_edge_weight,
        }
    }

    pub fn label_density(&self) -> LabelDensity {
        LabelDensity {
            base_labels: self.label_count,
            min_ratio: self.min_label_ratio,
        }
    }

    pub fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            edge_strength: self.edge_strength,
            charge_strength: self.charge_strength,
            link_distance: self.link_distance,
            ..SimulationParams::default()
        }
    }
}
