//! Trainer: epoch/batch orchestration around candle's optimiser and loss.
//!
//! The numerical work — autodiff, the AdamW update rule, tensor placement
//! — is candle's. The trainer owns the loop: batch tensors, forward,
//! cross-entropy, backward, optimiser step, metric accumulation, and the
//! [`TrainObserver`] notifications that keep logging and plotting out of
//! the loop body.

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{loss, ops, AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};

use circlenet_common::{batch_to_tensors, CirclesDataset, MlpConfig};
use circlenet_core::MlpClassifier;

use crate::observer::TrainObserver;

// ── Config ──────────────────────────────────────────────────────────────────

/// Training hyper-parameters (CLI-level knobs).
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub lr: f64,
    pub batch_size: usize,
    pub epochs: usize,
}

/// Metrics for one completed batch.
#[derive(Debug, Clone)]
pub struct BatchMetrics {
    pub epoch: usize,
    pub batch: usize,
    pub batches_per_epoch: usize,
    pub loss: f32,
}

/// Metrics for one completed epoch. `avg_loss` is the accumulated batch
/// loss divided by the batch count; this same average goes to the console,
/// the CSV log, and every observer.
#[derive(Debug, Clone)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub avg_loss: f32,
    pub num_batches: usize,
}

// ── Trainer ─────────────────────────────────────────────────────────────────

/// Owns the model, optimiser, and device for one training run.
///
/// Lifecycle: constructed → [`fit`](Self::fit) → inference via
/// [`predict`](Self::predict) / [`predict_proba`](Self::predict_proba).
pub struct Trainer {
    model: MlpClassifier,
    optimizer: AdamW,
    device: Device,
    pub config: TrainerConfig,
}

impl Trainer {
    /// Construct a new Trainer. Builds the model from config.
    pub fn new(
        model_config: &MlpConfig,
        config: TrainerConfig,
        device: Device,
    ) -> anyhow::Result<Self> {
        model_config.validate()?;
        if config.batch_size == 0 {
            anyhow::bail!("batch_size must be positive");
        }

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = MlpClassifier::new(vb, model_config)?;

        // Weight decay 0 makes AdamW the plain Adam update.
        let optimizer = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: config.lr,
                weight_decay: 0.0,
                ..Default::default()
            },
        )?;

        tracing::info!(
            layers = model_config.layer_dims.len(),
            params = model.param_count(),
            lr = config.lr,
            "model ready"
        );

        Ok(Self {
            model,
            optimizer,
            device,
            config,
        })
    }

    /// Run `config.epochs` full passes over `data`, notifying observers at
    /// train begin, after every batch, and after every epoch.
    ///
    /// Returns per-epoch metrics. Any batch or observer error propagates
    /// and aborts the run.
    pub fn fit(
        &mut self,
        data: &CirclesDataset,
        observers: &mut [Box<dyn TrainObserver>],
    ) -> anyhow::Result<Vec<EpochMetrics>> {
        let batch_size = self.config.batch_size;
        let batches_per_epoch = data.num_samples().div_ceil(batch_size);

        for obs in observers.iter_mut() {
            obs.on_train_begin(self)?;
        }

        let mut history = Vec::with_capacity(self.config.epochs);
        for epoch in 0..self.config.epochs {
            let mut epoch_loss = 0.0f32;
            let mut num_batches = 0usize;

            for (batch, (xs, ys, rows)) in data.batches(batch_size).enumerate() {
                let (features, labels) = batch_to_tensors(&xs, &ys, rows, &self.device)?;
                let logits = self.model.forward(&features)?;
                let loss = loss::cross_entropy(&logits, &labels)?;
                // backward() builds a fresh GradStore each call; there is no
                // accumulated gradient state to reset between steps.
                let grads = loss.backward()?;
                self.optimizer.step(&grads)?;

                let loss_val = loss.to_scalar::<f32>()?;
                epoch_loss += loss_val;
                num_batches += 1;

                let metrics = BatchMetrics {
                    epoch,
                    batch,
                    batches_per_epoch,
                    loss: loss_val,
                };
                for obs in observers.iter_mut() {
                    obs.on_batch_end(self, &metrics)?;
                }
            }

            let avg_loss = if num_batches > 0 {
                epoch_loss / num_batches as f32
            } else {
                f32::NAN
            };
            tracing::info!(epoch, avg_loss, "epoch complete");

            let metrics = EpochMetrics {
                epoch,
                avg_loss,
                num_batches,
            };
            for obs in observers.iter_mut() {
                obs.on_epoch_end(self, &metrics)?;
            }
            history.push(metrics);
        }
        Ok(history)
    }

    /// Arg-max class index per sample, concatenated in input order.
    ///
    /// Output length equals the dataset's sample count.
    pub fn predict(&self, data: &CirclesDataset) -> anyhow::Result<Vec<u32>> {
        let mut all = Vec::with_capacity(data.num_samples());
        for (xs, ys, rows) in data.batches(self.config.batch_size) {
            let (features, _labels) = batch_to_tensors(&xs, &ys, rows, &self.device)?;
            let logits = self.model.forward(&features)?;
            let predicted = logits.argmax(D::Minus1)?;
            all.extend(predicted.to_vec1::<u32>()?);
        }
        Ok(all)
    }

    /// Soft-maxed class probabilities, one row per sample, in input order.
    pub fn predict_proba(&self, data: &CirclesDataset) -> anyhow::Result<Tensor> {
        let mut chunks = Vec::new();
        for (xs, ys, rows) in data.batches(self.config.batch_size) {
            let (features, _labels) = batch_to_tensors(&xs, &ys, rows, &self.device)?;
            chunks.push(self.predict_proba_tensor(&features)?);
        }
        if chunks.is_empty() {
            anyhow::bail!("dataset yielded no batches");
        }
        Ok(Tensor::cat(&chunks, 0)?)
    }

    /// Same inference contract for a single already-assembled feature batch
    /// (the mesh scoring path). Inference never calls `backward`, so no
    /// gradient graph is consumed.
    pub fn predict_proba_tensor(&self, features: &Tensor) -> candle_core::Result<Tensor> {
        let logits = self.model.forward(features)?;
        ops::softmax(&logits, D::Minus1)
    }

    /// Average cross-entropy loss over the dataset, without updating
    /// parameters.
    pub fn evaluate(&self, data: &CirclesDataset) -> anyhow::Result<f32> {
        let mut total = 0.0f32;
        let mut num_batches = 0usize;
        for (xs, ys, rows) in data.batches(self.config.batch_size) {
            let (features, labels) = batch_to_tensors(&xs, &ys, rows, &self.device)?;
            let logits = self.model.forward(&features)?;
            let loss = loss::cross_entropy(&logits, &labels)?;
            total += loss.to_scalar::<f32>()?;
            num_batches += 1;
        }
        if num_batches == 0 {
            anyhow::bail!("dataset yielded no batches");
        }
        Ok(total / num_batches as f32)
    }

    pub fn model(&self) -> &MlpClassifier {
        &self.model
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
