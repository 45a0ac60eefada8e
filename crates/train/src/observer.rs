//! Training lifecycle observers.
//!
//! The training loop does only numerical work; logging and plotting hang
//! off [`TrainObserver`] hooks instead of living inline in the loop body. Observers are passed to
//! [`Trainer::fit`](crate::Trainer::fit) and notified at train begin,
//! after every batch, and after every epoch.

use anyhow::Result;

use crate::trainer::{BatchMetrics, EpochMetrics, Trainer};

/// Hooks invoked by [`Trainer::fit`](crate::Trainer::fit).
///
/// All hooks default to no-ops. A returned error aborts the run — an
/// observer is a collaborator, not a best-effort side channel.
pub trait TrainObserver {
    /// Once, before the first batch of the first epoch.
    fn on_train_begin(&mut self, _trainer: &Trainer) -> Result<()> {
        Ok(())
    }

    /// After every optimiser step.
    fn on_batch_end(&mut self, _trainer: &Trainer, _metrics: &BatchMetrics) -> Result<()> {
        Ok(())
    }

    /// After the last batch of every epoch.
    fn on_epoch_end(&mut self, _trainer: &Trainer, _metrics: &EpochMetrics) -> Result<()> {
        Ok(())
    }
}
