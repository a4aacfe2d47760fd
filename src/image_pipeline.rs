//! Image processing pipeline module
//!
//! This module turns portrait photos into eye-centred 24-bit bitmaps, with
//! separate modules for crop geometry, detection, resampling, BMP writing,
//! and conversion orchestration.

pub mod bmp;
pub mod common;
pub mod config;
pub mod conversions;
pub mod detect;
pub mod geometry;
pub mod resize;

pub use common::{
    PipelineError,
    Result,
};

pub use geometry::{
    CropPlan,
    CropPlanner,
    EyeSet,
    ImageMetrics,
    MarginProfile,
    Rect,
};

pub use bmp::{
    BitmapFile,
    BitmapWriter,
    ChannelLayout,
    PixelBuffer,
    StandardBmpWriter,
};

pub use config::{
    OutputSize,
    PipelineConfig,
    PipelineConfigBuilder,
    ResizeFilter,
    output_file_name,
    unique_output_names,
};

pub use detect::{
    DetectorGate,
    DetectorLoader,
    EyeDetector,
};
#[cfg(feature = "rustface")]
pub use detect::{
    RustfaceEyeDetector,
    RustfaceModelLoader,
};

pub use resize::{
    ImageResizer,
    Resizer,
};

pub use conversions::{
    BatchEntry,
    BmpArtifact,
    PhotoOutcome,
    PhotoToBmpPipeline,
    PipelineTimings,
};
