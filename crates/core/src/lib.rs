//! # circlenet-core — The Model
//!
//! The feed-forward classifier, built entirely on `candle-nn`:
//!
//! * **[`MlpClassifier`]** — `Linear` stack from `(in, out)` pairs, ReLU
//!   between layers, raw logits out. Also provides the parameter count
//!   and the textual architecture summary the run log snapshots.
//!
//! Autodiff, the optimiser update, and tensor placement are candle's
//! concern; nothing numerical is hand-rolled here.

pub mod model;

pub use model::MlpClassifier;
