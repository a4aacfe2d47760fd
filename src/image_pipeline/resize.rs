//! Resampling module
//!
//! Crop extraction and resizing used by the normalization and output steps.

mod resizer;
mod image_resizer;

pub use resizer::Resizer;
pub use image_resizer::ImageResizer;
