//! Synthetic dataset: two noisy concentric circles.
//!
//! The outer circle (radius 1.0) is class 0, the inner circle (radius
//! `factor`) is class 1. Angles are evenly spaced per circle, Gaussian
//! noise is added per coordinate, and rows are shuffled with the seeded
//! RNG. Immutable once generated.
//!
//! * **[`CirclesDataset`]** — generate once, then batch with
//!   [`CirclesDataset::batches`].
//! * **[`batch_to_tensors`]** — raw batch → candle tensors.

use std::f32::consts::TAU;

use anyhow::Result as AnyhowResult;
use candle_core::{Device, Result, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Labeled 2-D point cloud over two concentric circles.
pub struct CirclesDataset {
    features: Vec<[f32; 2]>,
    labels: Vec<u32>,
}

impl CirclesDataset {
    /// Generate `n_samples` points, split evenly between the circles.
    ///
    /// Identical parameters and seed produce identical arrays.
    pub fn generate(n_samples: usize, noise: f64, factor: f64, seed: u64) -> AnyhowResult<Self> {
        if n_samples == 0 {
            anyhow::bail!("n_samples must be positive");
        }
        if !(factor > 0.0 && factor < 1.0) {
            anyhow::bail!("factor must be in (0, 1), got {factor}");
        }
        if noise < 0.0 {
            anyhow::bail!("noise must be non-negative, got {noise}");
        }

        let n_outer = n_samples - n_samples / 2;
        let n_inner = n_samples - n_outer;
        let mut rng = StdRng::seed_from_u64(seed);
        let perturb = Normal::new(0.0f32, noise as f32)
            .map_err(|e| anyhow::anyhow!("noise distribution: {e}"))?;

        let mut features = Vec::with_capacity(n_samples);
        let mut labels = Vec::with_capacity(n_samples);
        for i in 0..n_outer {
            let theta = TAU * i as f32 / n_outer as f32;
            features.push([
                theta.cos() + perturb.sample(&mut rng),
                theta.sin() + perturb.sample(&mut rng),
            ]);
            labels.push(0);
        }
        let r = factor as f32;
        for i in 0..n_inner {
            let theta = TAU * i as f32 / n_inner.max(1) as f32;
            features.push([
                r * theta.cos() + perturb.sample(&mut rng),
                r * theta.sin() + perturb.sample(&mut rng),
            ]);
            labels.push(1);
        }

        // Fisher-Yates over features and labels in lockstep.
        for i in (1..n_samples).rev() {
            let j = rng.gen_range(0..=i);
            features.swap(i, j);
            labels.swap(i, j);
        }

        Ok(Self { features, labels })
    }

    pub fn features(&self) -> &[[f32; 2]] {
        &self.features
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn num_samples(&self) -> usize {
        self.features.len()
    }

    /// Yield `(features, labels, rows)` batches in generation order.
    ///
    /// Features are flat row-major `[x0, y0, x1, y1, ...]`. The final
    /// partial batch is yielded, so every sample appears exactly once.
    pub fn batches(
        &self,
        batch_size: usize,
    ) -> impl Iterator<Item = (Vec<f32>, Vec<u32>, usize)> + '_ {
        let total = self.features.len();
        let mut start = 0usize;
        std::iter::from_fn(move || {
            if batch_size == 0 || start >= total {
                return None;
            }
            let end = (start + batch_size).min(total);
            let rows = end - start;
            let mut xs = Vec::with_capacity(rows * 2);
            for p in &self.features[start..end] {
                xs.extend_from_slice(p);
            }
            let ys = self.labels[start..end].to_vec();
            start = end;
            Some((xs, ys, rows))
        })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Convert a raw `(features, labels)` batch to candle tensors.
///
/// Returns `(Tensor(rows, 2), Tensor(rows))`.
pub fn batch_to_tensors(
    features: &[f32],
    labels: &[u32],
    rows: usize,
    device: &Device,
) -> Result<(Tensor, Tensor)> {
    let x = Tensor::from_vec(features.to_vec(), (rows, 2), device)?;
    let y = Tensor::from_vec(labels.to_vec(), rows, device)?;
    Ok((x, y))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_seed_is_deterministic() {
        let a = CirclesDataset::generate(200, 0.3, 0.5, 7).unwrap();
        let b = CirclesDataset::generate(200, 0.3, 0.5, 7).unwrap();
        assert_eq!(a.features(), b.features());
        assert_eq!(a.labels(), b.labels());
    }

    #[test]
    fn different_seeds_differ() {
        let a = CirclesDataset::generate(200, 0.3, 0.5, 0).unwrap();
        let b = CirclesDataset::generate(200, 0.3, 0.5, 1).unwrap();
        assert_ne!(a.features(), b.features());
    }

    #[test]
    fn labels_are_binary_and_balanced() {
        let ds = CirclesDataset::generate(101, 0.1, 0.5, 3).unwrap();
        assert_eq!(ds.num_samples(), 101);
        let inner = ds.labels().iter().filter(|&&l| l == 1).count();
        let outer = ds.labels().iter().filter(|&&l| l == 0).count();
        assert_eq!(inner + outer, 101);
        assert_eq!(outer, 51);
        assert_eq!(inner, 50);
        assert!(ds.labels().iter().all(|&l| l < 2));
    }

    #[test]
    fn zero_samples_is_an_error() {
        assert!(CirclesDataset::generate(0, 0.3, 0.5, 0).is_err());
        assert!(CirclesDataset::generate(10, -0.1, 0.5, 0).is_err());
        assert!(CirclesDataset::generate(10, 0.3, 1.5, 0).is_err());
    }

    #[test]
    fn noiseless_points_sit_on_their_circles() {
        let ds = CirclesDataset::generate(40, 0.0, 0.5, 0).unwrap();
        for (p, &label) in ds.features().iter().zip(ds.labels()) {
            let radius = (p[0] * p[0] + p[1] * p[1]).sqrt();
            let expected = if label == 0 { 1.0 } else { 0.5 };
            assert!((radius - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn batches_cover_all_samples_and_keep_dims_in_step() {
        let ds = CirclesDataset::generate(10, 0.2, 0.5, 1).unwrap();
        let batches: Vec<_> = ds.batches(4).collect();
        assert_eq!(batches.len(), 3);
        let rows: Vec<usize> = batches.iter().map(|(_, _, r)| *r).collect();
        assert_eq!(rows, vec![4, 4, 2]);
        for (xs, ys, rows) in &batches {
            assert_eq!(xs.len(), rows * 2);
            assert_eq!(ys.len(), *rows);
        }
    }

    #[test]
    fn batch_tensors_have_matching_leading_dim() {
        let ds = CirclesDataset::generate(6, 0.2, 0.5, 1).unwrap();
        let device = Device::Cpu;
        for (xs, ys, rows) in ds.batches(4) {
            let (x, y) = batch_to_tensors(&xs, &ys, rows, &device).unwrap();
            assert_eq!(x.dims(), &[rows, 2]);
            assert_eq!(y.dims(), &[rows]);
        }
    }
}
