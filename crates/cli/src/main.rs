//! CLI for one end-to-end circles experiment.
//!
//! Defaults reproduce the canonical run: 5000/250 samples, noise 0.3,
//! factor 0.5, batch 50, lr 0.1, 100 epochs, `[(2,5),(5,2)]` model.

use std::path::PathBuf;

use anyhow::Result;
use candle_core::Device;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use circlenet_common::{CirclesDataset, MlpConfig};
use circlenet_train::{EpochMetrics, RunLog, TrainObserver, Trainer, TrainerConfig};
use circlenet_viz::{render_boundary, score_on_mesh, BoundarySnapshots, Meshgrid};

#[derive(Parser, Debug)]
#[command(name = "circlenet", about = "Train an MLP on noisy concentric circles")]
struct Args {
    #[arg(long, default_value = "mlp.json")]
    config: PathBuf,
    #[arg(long, default_value = "5000")]
    train_samples: usize,
    #[arg(long, default_value = "250")]
    test_samples: usize,
    #[arg(long, default_value = "0.3")]
    noise: f64,
    /// Inner circle radius relative to the outer circle.
    #[arg(long, default_value = "0.5")]
    factor: f64,
    #[arg(long, default_value = "0")]
    seed: u64,
    #[arg(long, default_value = "50")]
    batch_size: usize,
    #[arg(long, default_value = "0.1")]
    lr: f64,
    #[arg(long, default_value = "100")]
    epochs: usize,
    #[arg(long, default_value = "runs")]
    runs_root: PathBuf,
    #[arg(long, default_value = "250")]
    mesh_steps: usize,
    #[arg(long, default_value = "0.5")]
    mesh_margin: f32,
    /// How many epoch-0 batches get a decision-boundary snapshot.
    #[arg(long, default_value = "10")]
    snapshot_batches: usize,
}

/// Epoch progress bar, driven through the observer seam.
struct EpochProgress {
    bar: ProgressBar,
}

impl EpochProgress {
    fn new(epochs: usize) -> Self {
        let bar = ProgressBar::new(epochs as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} epochs {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Self { bar }
    }
}

impl TrainObserver for EpochProgress {
    fn on_epoch_end(&mut self, trainer: &Trainer, metrics: &EpochMetrics) -> Result<()> {
        self.bar.set_message(format!("loss {:.4}", metrics.avg_loss));
        self.bar.inc(1);
        if metrics.epoch + 1 == trainer.config.epochs {
            self.bar.finish();
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let model_config = if args.config.exists() {
        MlpConfig::load(&args.config)?
    } else {
        let default = MlpConfig::default();
        default.save(&args.config)?;
        eprintln!("Created default config at {}", args.config.display());
        default
    };
    model_config.validate()?;

    let device = Device::cuda_if_available(0)?;

    // Train and test sets generated independently from the same seed.
    let train_set =
        CirclesDataset::generate(args.train_samples, args.noise, args.factor, args.seed)?;
    let test_set =
        CirclesDataset::generate(args.test_samples, args.noise, args.factor, args.seed)?;
    eprintln!(
        "Train: {} samples, test: {} samples",
        train_set.num_samples(),
        test_set.num_samples()
    );

    let trainer_config = TrainerConfig {
        lr: args.lr,
        batch_size: args.batch_size,
        epochs: args.epochs,
    };
    let mut trainer = Trainer::new(&model_config, trainer_config, device)?;

    let run_log = RunLog::create(&args.runs_root)?;
    let run_dir = run_log.dir().to_path_buf();
    eprintln!("Logging to {}", run_dir.display());

    let mesh = Meshgrid::from_features(
        train_set.features(),
        test_set.features(),
        args.mesh_steps,
        args.mesh_margin,
    )?;
    let snapshots = BoundarySnapshots::new(
        mesh.clone(),
        (train_set.features(), train_set.labels()),
        (test_set.features(), test_set.labels()),
        run_dir.clone(),
        args.snapshot_batches,
    );

    let mut observers: Vec<Box<dyn TrainObserver>> = vec![
        Box::new(run_log),
        Box::new(snapshots),
        Box::new(EpochProgress::new(args.epochs)),
    ];
    trainer.fit(&train_set, &mut observers)?;
    drop(observers);

    let test_loss = trainer.evaluate(&test_set)?;
    let predictions = trainer.predict(&test_set)?;
    let correct = predictions
        .iter()
        .zip(test_set.labels())
        .filter(|(p, l)| p == l)
        .count();
    let accuracy = correct as f64 / test_set.num_samples() as f64;
    eprintln!("Test loss {test_loss:.4}, accuracy {:.1}%", accuracy * 100.0);

    let proba = trainer.predict_proba(&test_set)?;
    tracing::info!(rows = proba.dim(0)?, "test probabilities computed");

    let scores = score_on_mesh(&trainer, &mesh)?;
    let out = run_dir.join("decision_boundary.png");
    render_boundary(
        &mesh,
        &scores,
        (train_set.features(), train_set.labels()),
        (test_set.features(), test_set.labels()),
        &out,
    )?;
    eprintln!("Decision boundary written to {}", out.display());

    Ok(())
}
