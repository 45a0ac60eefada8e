//! Early-training decision-boundary snapshots.
//!
//! The first few optimiser steps reshape the boundary the most, so the
//! observer renders one image per batch for the first `max_batches`
//! batches of epoch 0 and nothing afterwards.

use std::path::PathBuf;

use anyhow::Result;

use circlenet_train::{BatchMetrics, TrainObserver, Trainer};

use crate::mesh::{score_on_mesh, Meshgrid};
use crate::plot::render_boundary;

/// Observer that renders `boundary_b{batch:02}.png` into `out_dir`
/// during the first epoch.
pub struct BoundarySnapshots {
    mesh: Meshgrid,
    train_features: Vec<[f32; 2]>,
    train_labels: Vec<u32>,
    test_features: Vec<[f32; 2]>,
    test_labels: Vec<u32>,
    out_dir: PathBuf,
    max_batches: usize,
}

impl BoundarySnapshots {
    pub fn new(
        mesh: Meshgrid,
        train: (&[[f32; 2]], &[u32]),
        test: (&[[f32; 2]], &[u32]),
        out_dir: PathBuf,
        max_batches: usize,
    ) -> Self {
        Self {
            mesh,
            train_features: train.0.to_vec(),
            train_labels: train.1.to_vec(),
            test_features: test.0.to_vec(),
            test_labels: test.1.to_vec(),
            out_dir,
            max_batches,
        }
    }
}

impl TrainObserver for BoundarySnapshots {
    fn on_batch_end(&mut self, trainer: &Trainer, metrics: &BatchMetrics) -> Result<()> {
        if metrics.epoch != 0 || metrics.batch >= self.max_batches {
            return Ok(());
        }
        let scores = score_on_mesh(trainer, &self.mesh)?;
        let path = self.out_dir.join(format!("boundary_b{:02}.png", metrics.batch));
        render_boundary(
            &self.mesh,
            &scores,
            (&self.train_features, &self.train_labels),
            (&self.test_features, &self.test_labels),
            &path,
        )?;
        tracing::debug!(path = %path.display(), "boundary snapshot");
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
