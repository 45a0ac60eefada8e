//! Timestamped run directory: scalar CSV plus a model snapshot.
//!
//! Each training run gets `<runs_root>/<YYYYmmdd-HHMMSS>/` containing
//! `scalars.csv` (one row per epoch) and `model.txt` (the architecture
//! summary, written once at train begin). Losing the directory does not
//! affect training — the log is an observer, detachable by construction.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::observer::TrainObserver;
use crate::trainer::{EpochMetrics, Trainer};

/// Scalar/summary log for one training run.
pub struct RunLog {
    dir: PathBuf,
    scalars_path: PathBuf,
}

impl RunLog {
    /// Create the run directory and the CSV header.
    pub fn create(runs_root: &Path) -> Result<Self> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        let dir = runs_root.join(stamp);
        fs::create_dir_all(&dir).context("create run directory")?;

        let scalars_path = dir.join("scalars.csv");
        let mut f = File::create(&scalars_path).context("create scalars.csv")?;
        writeln!(f, "epoch,avg_loss")?;

        tracing::info!(dir = %dir.display(), "run log created");
        Ok(Self { dir, scalars_path })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn append_scalar(&self, epoch: usize, avg_loss: f32) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.scalars_path)
            .context("open scalars.csv")?;
        writeln!(f, "{epoch},{avg_loss:.6}")?;
        Ok(())
    }
}

impl TrainObserver for RunLog {
    fn on_train_begin(&mut self, trainer: &Trainer) -> Result<()> {
        fs::write(self.dir.join("model.txt"), trainer.model().summary())
            .context("write model summary")
    }

    fn on_epoch_end(&mut self, _trainer: &Trainer, metrics: &EpochMetrics) -> Result<()> {
        self.append_scalar(metrics.epoch, metrics.avg_loss)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("circlenet-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        root
    }

    #[test]
    fn creates_directory_and_appends_rows() {
        let root = temp_root("runlog");
        let log = RunLog::create(&root).unwrap();
        assert!(log.dir().is_dir());

        log.append_scalar(0, 0.693).unwrap();
        log.append_scalar(1, 0.512).unwrap();

        let contents = fs::read_to_string(log.dir().join("scalars.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "epoch,avg_loss");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0,0.693"));
        assert!(lines[2].starts_with("1,0.512"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn train_begin_snapshots_the_model() {
        use circlenet_common::{CirclesDataset, MlpConfig};

        let root = temp_root("runlog-model");
        let log = RunLog::create(&root).unwrap();
        let dir = log.dir().to_path_buf();

        let data = CirclesDataset::generate(20, 0.3, 0.5, 0).unwrap();
        let mut trainer = Trainer::new(
            &MlpConfig::default(),
            crate::trainer::TrainerConfig {
                lr: 0.1,
                batch_size: 10,
                epochs: 1,
            },
            candle_core::Device::Cpu,
        )
        .unwrap();
        let mut observers: Vec<Box<dyn TrainObserver>> = vec![Box::new(log)];
        trainer.fit(&data, &mut observers).unwrap();

        let summary = fs::read_to_string(dir.join("model.txt")).unwrap();
        assert!(summary.contains("MlpClassifier"));
        let scalars = fs::read_to_string(dir.join("scalars.csv")).unwrap();
        assert_eq!(scalars.lines().count(), 2);

        fs::remove_dir_all(&root).unwrap();
    }
}
