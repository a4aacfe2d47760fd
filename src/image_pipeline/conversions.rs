//! Pipeline conversions module
//!
//! Orchestrates decode, normalization, detection, crop planning, resizing,
//! and bitmap encoding for each photo.

mod photo_to_bmp;
mod timing;
mod types;

#[cfg(test)]
mod tests;

pub use photo_to_bmp::PhotoToBmpPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::{BatchEntry, BmpArtifact, PhotoOutcome};
