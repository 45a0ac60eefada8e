//! Feed-forward classifier over 2-D features.
//!
//! A plain stack of `candle_nn::Linear` layers built from the ordered
//! `(in, out)` pairs in [`MlpConfig`], with ReLU between layers and raw
//! logits out of the last. Parameters live in the caller's `VarMap`; the
//! optimiser mutates them in place between forward passes.

use candle_core::{Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};

use circlenet_common::MlpConfig;

/// Multi-layer perceptron scoring `num_classes` logits per input row.
///
/// Deterministic given fixed parameters; forward is side-effect free.
pub struct MlpClassifier {
    layers: Vec<Linear>,
    config: MlpConfig,
}

impl MlpClassifier {
    /// Build one linear layer per `(in, out)` pair under var paths `fc{i}`.
    pub fn new(vb: VarBuilder, config: &MlpConfig) -> Result<Self> {
        if config.layer_dims.is_empty() {
            candle_core::bail!("model config has no layers");
        }
        let mut layers = Vec::with_capacity(config.layer_dims.len());
        for (i, &(in_dim, out_dim)) in config.layer_dims.iter().enumerate() {
            layers.push(candle_nn::linear(in_dim, out_dim, vb.pp(format!("fc{i}")))?);
        }
        Ok(Self {
            layers,
            config: config.clone(),
        })
    }

    /// Forward pass: `(batch, input_dim)` features → `(batch, num_classes)` logits.
    pub fn forward(&self, features: &Tensor) -> Result<Tensor> {
        let last = self.layers.len() - 1;
        let mut x = features.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(&x)?;
            if i < last {
                x = x.relu()?;
            }
        }
        Ok(x)
    }

    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    pub fn input_dim(&self) -> usize {
        self.config.input_dim()
    }

    pub fn num_classes(&self) -> usize {
        self.config.num_classes()
    }

    /// Total parameter count (weights + biases), from config arithmetic alone.
    pub fn param_count(&self) -> usize {
        self.config
            .layer_dims
            .iter()
            .map(|&(i, o)| i * o + o)
            .sum()
    }

    /// Multi-line architecture description, written to the run log at
    /// train begin.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "MlpClassifier: {} -> {}, {} layers, {} params\n",
            self.input_dim(),
            self.num_classes(),
            self.layers.len(),
            self.param_count(),
        );
        let last = self.config.layer_dims.len() - 1;
        for (i, &(in_dim, out_dim)) in self.config.layer_dims.iter().enumerate() {
            let act = if i < last { " + relu" } else { "" };
            out.push_str(&format!("  fc{i}: Linear({in_dim} -> {out_dim}){act}\n"));
        }
        out
    }
}

impl Module for MlpClassifier {
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        self.forward(x)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    fn build(dims: Vec<(usize, usize)>) -> MlpClassifier {
        let config = MlpConfig { layer_dims: dims };
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        MlpClassifier::new(vb, &config).unwrap()
    }

    #[test]
    fn forward_produces_logits_per_row() {
        let model = build(vec![(2, 5), (5, 2)]);
        let x = Tensor::zeros((7, 2), DType::F32, &Device::Cpu).unwrap();
        let logits = model.forward(&x).unwrap();
        assert_eq!(logits.dims(), &[7, 2]);
    }

    #[test]
    fn forward_is_deterministic_for_fixed_params() {
        let model = build(vec![(2, 8), (8, 2)]);
        let x = Tensor::from_vec(vec![0.3f32, -1.2, 0.9, 0.1], (2, 2), &Device::Cpu).unwrap();
        let a = model.forward(&x).unwrap().to_vec2::<f32>().unwrap();
        let b = model.forward(&x).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn param_count_matches_arithmetic() {
        let model = build(vec![(2, 5), (5, 2)]);
        // 2*5 + 5 weights+biases, then 5*2 + 2.
        assert_eq!(model.param_count(), 27);
    }

    #[test]
    fn summary_lists_every_layer() {
        let model = build(vec![(2, 5), (5, 2)]);
        let s = model.summary();
        assert!(s.contains("fc0: Linear(2 -> 5) + relu"));
        assert!(s.contains("fc1: Linear(5 -> 2)"));
        assert!(s.contains("27 params"));
    }
}
