//! # circlenet-viz — Decision-Boundary Visualisation
//!
//! * **[`Meshgrid`]** — evaluation grid over the feature bounding box
//!   (plus margin), flattened into one candle batch.
//! * **[`score_on_mesh`]** — class-1 probability per cell via the
//!   trainer, reshaped to grid shape.
//! * **[`render_boundary`]** — PNG: diverging colour ramp + labelled
//!   scatter overlay.
//! * **[`BoundarySnapshots`]** — observer rendering the first batches of
//!   epoch 0 into the run directory.

pub mod mesh;
pub mod plot;
pub mod snapshot;

pub use mesh::{score_on_mesh, MeshScores, Meshgrid};
pub use plot::render_boundary;
pub use snapshot::BoundarySnapshots;
