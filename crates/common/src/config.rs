//! Model configuration for the circles classifier.
//!
//! Serialised as JSON so a run's architecture can be bootstrapped from a
//! config file. A minimal `{}` JSON produces the canonical two-layer model.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Architecture of the feed-forward classifier.
///
/// Each entry is one linear layer as `(input_dim, output_dim)`. ReLU is
/// applied between layers; the final layer emits raw logits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpConfig {
    /// Ordered linear layer shapes. Consecutive layers must chain:
    /// layer `i+1`'s input dim equals layer `i`'s output dim.
    #[serde(default = "default_layer_dims")]
    pub layer_dims: Vec<(usize, usize)>,
}

fn default_layer_dims() -> Vec<(usize, usize)> {
    vec![(2, 5), (5, 2)]
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            layer_dims: default_layer_dims(),
        }
    }
}

impl MlpConfig {
    /// Feature dimension the first layer consumes.
    pub fn input_dim(&self) -> usize {
        self.layer_dims.first().map_or(0, |&(i, _)| i)
    }

    /// Number of classes the final layer scores.
    pub fn num_classes(&self) -> usize {
        self.layer_dims.last().map_or(0, |&(_, o)| o)
    }

    /// Check the layer list before any tensor is built.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.layer_dims.is_empty() {
            anyhow::bail!("layer_dims must contain at least one layer");
        }
        for (i, &(in_dim, out_dim)) in self.layer_dims.iter().enumerate() {
            if in_dim == 0 || out_dim == 0 {
                anyhow::bail!("layer {i} has a zero dimension ({in_dim}, {out_dim})");
            }
        }
        for (i, pair) in self.layer_dims.windows(2).enumerate() {
            let (_, out_dim) = pair[0];
            let (in_dim, _) = pair[1];
            if in_dim != out_dim {
                anyhow::bail!(
                    "layer {} expects {} inputs but layer {} produces {}",
                    i + 1,
                    in_dim,
                    i,
                    out_dim,
                );
            }
        }
        if self.num_classes() < 2 {
            anyhow::bail!(
                "final layer must score at least 2 classes, got {}",
                self.num_classes()
            );
        }
        Ok(())
    }

    /// Save config to a JSON file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load config from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_json_round_trip() {
        let config = MlpConfig {
            layer_dims: vec![(2, 16), (16, 16), (16, 2)],
        };
        let json = serde_json::to_string(&config).unwrap();
        let loaded: MlpConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.layer_dims, loaded.layer_dims);
    }

    #[test]
    fn empty_json_yields_default_architecture() {
        let loaded: MlpConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(loaded.layer_dims, vec![(2, 5), (5, 2)]);
        assert_eq!(loaded.input_dim(), 2);
        assert_eq!(loaded.num_classes(), 2);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn validate_rejects_broken_chain() {
        let config = MlpConfig {
            layer_dims: vec![(2, 5), (7, 2)],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_and_degenerate() {
        let empty = MlpConfig { layer_dims: vec![] };
        assert!(empty.validate().is_err());

        let zero_dim = MlpConfig {
            layer_dims: vec![(2, 0)],
        };
        assert!(zero_dim.validate().is_err());

        let one_class = MlpConfig {
            layer_dims: vec![(2, 1)],
        };
        assert!(one_class.validate().is_err());
    }
}
