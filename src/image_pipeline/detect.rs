//! Eye detection module
//!
//! Detection itself is an external capability. This module defines the
//! detector seam, the one-shot readiness gate in front of it, and an optional
//! SeetaFace-backed implementation.

mod detector;
mod gate;
#[cfg(feature = "rustface")]
mod rustface_detector;

pub use detector::{DetectorLoader, EyeDetector};
pub use gate::DetectorGate;
#[cfg(feature = "rustface")]
pub use rustface_detector::{RustfaceEyeDetector, RustfaceModelLoader};
