//! Evaluation grid over the feature plane.
//!
//! The decision boundary is visualised by scoring the model over a dense
//! rectangular grid spanning the data's bounding box plus a margin, then
//! rendering the class-1 probability per cell.

use anyhow::Result;
use candle_core::{Device, Tensor};

use circlenet_train::Trainer;

/// Rectangular grid of evaluation coordinates.
///
/// `xs` and `ys` hold the grid-line coordinates per axis; cells are their
/// cross product, row-major with `ys` outer.
#[derive(Debug, Clone)]
pub struct Meshgrid {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl Meshgrid {
    /// Span the bounding box of `train` and `test` features, expanded by
    /// `margin` on every side, with `steps` coordinates per axis.
    pub fn from_features(
        train: &[[f32; 2]],
        test: &[[f32; 2]],
        steps: usize,
        margin: f32,
    ) -> Result<Self> {
        if steps < 2 {
            anyhow::bail!("mesh needs at least 2 steps per axis, got {steps}");
        }
        let mut x = (f32::INFINITY, f32::NEG_INFINITY);
        let mut y = (f32::INFINITY, f32::NEG_INFINITY);
        for p in train.iter().chain(test) {
            x = (x.0.min(p[0]), x.1.max(p[0]));
            y = (y.0.min(p[1]), y.1.max(p[1]));
        }
        if !x.0.is_finite() || !y.0.is_finite() {
            anyhow::bail!("no feature points to span");
        }
        Ok(Self {
            xs: linspace(x.0 - margin, x.1 + margin, steps),
            ys: linspace(y.0 - margin, y.1 + margin, steps),
        })
    }

    pub fn num_x(&self) -> usize {
        self.xs.len()
    }

    pub fn num_y(&self) -> usize {
        self.ys.len()
    }

    pub fn x_bounds(&self) -> (f32, f32) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    pub fn y_bounds(&self) -> (f32, f32) {
        (self.ys[0], self.ys[self.ys.len() - 1])
    }

    /// Flatten every cell into one `(num_y * num_x, 2)` feature batch,
    /// row-major with `ys` outer.
    pub fn to_tensor(&self, device: &Device) -> candle_core::Result<Tensor> {
        let mut flat = Vec::with_capacity(self.xs.len() * self.ys.len() * 2);
        for &y in &self.ys {
            for &x in &self.xs {
                flat.push(x);
                flat.push(y);
            }
        }
        Tensor::from_vec(flat, (self.xs.len() * self.ys.len(), 2), device)
    }
}

fn linspace(start: f32, end: f32, steps: usize) -> Vec<f32> {
    let dx = (end - start) / (steps - 1) as f32;
    (0..steps).map(|i| start + dx * i as f32).collect()
}

// ── Scoring ─────────────────────────────────────────────────────────────────

/// Class-1 probability per grid cell, in the mesh's row-major layout.
#[derive(Debug, Clone)]
pub struct MeshScores {
    pub values: Vec<f32>,
    pub num_x: usize,
    pub num_y: usize,
}

/// Score the mesh through the trainer: flatten the grid into a batch,
/// take the class-1 probability column, reshape back to grid shape.
pub fn score_on_mesh(trainer: &Trainer, mesh: &Meshgrid) -> Result<MeshScores> {
    let grid = mesh.to_tensor(trainer.device())?;
    let proba = trainer.predict_proba_tensor(&grid)?;
    let values = proba.narrow(1, 1, 1)?.squeeze(1)?.to_vec1::<f32>()?;
    Ok(MeshScores {
        values,
        num_x: mesh.num_x(),
        num_y: mesh.num_y(),
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_strictly_contain_all_points_plus_margin() {
        let train = [[0.0f32, -1.0], [2.0, 3.0]];
        let test = [[-0.5f32, 4.0]];
        let mesh = Meshgrid::from_features(&train, &test, 50, 0.5).unwrap();
        let (x0, x1) = mesh.x_bounds();
        let (y0, y1) = mesh.y_bounds();
        assert!((x0 - (-1.0)).abs() < 1e-5);
        assert!((x1 - 2.5).abs() < 1e-5);
        assert!((y0 - (-1.5)).abs() < 1e-5);
        assert!((y1 - 4.5).abs() < 1e-5);
        for p in train.iter().chain(&test) {
            assert!(x0 < p[0] && p[0] < x1);
            assert!(y0 < p[1] && p[1] < y1);
        }
    }

    #[test]
    fn tensor_covers_every_cell() {
        let train = [[0.0f32, 0.0], [1.0, 1.0]];
        let mesh = Meshgrid::from_features(&train, &[], 10, 0.1).unwrap();
        let t = mesh.to_tensor(&Device::Cpu).unwrap();
        assert_eq!(t.dims(), &[100, 2]);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        assert!(Meshgrid::from_features(&[], &[], 10, 0.5).is_err());
        assert!(Meshgrid::from_features(&[[0.0, 0.0]], &[], 1, 0.5).is_err());
    }

    #[test]
    fn linspace_hits_both_endpoints() {
        let v = linspace(-1.0, 1.0, 5);
        assert_eq!(v.len(), 5);
        assert!((v[0] + 1.0).abs() < 1e-6);
        assert!((v[4] - 1.0).abs() < 1e-6);
    }
}
