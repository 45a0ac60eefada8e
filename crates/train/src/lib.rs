//! # circlenet-train — Training Orchestration
//!
//! The epoch/batch loop and everything that hangs off it:
//!
//! * **[`Trainer`]** — owns model + optimiser + device. One call to
//!   [`Trainer::fit`] runs all epochs: forward, cross-entropy, backward,
//!   AdamW step, metric accumulation. Inference via
//!   [`Trainer::predict`] / [`Trainer::predict_proba`].
//! * **[`TrainObserver`]** — lifecycle hooks so logging and plotting are
//!   pluggable collaborators rather than inline statements.
//! * **[`RunLog`]** — timestamped run directory: scalar CSV + model
//!   snapshot.

pub mod observer;
pub mod run_log;
pub mod trainer;

pub use observer::TrainObserver;
pub use run_log::RunLog;
pub use trainer::{BatchMetrics, EpochMetrics, Trainer, TrainerConfig};
