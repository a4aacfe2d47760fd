//! Pipeline configuration module
//!
//! Output size handling, resampling options, and output file naming.

mod naming;
pub mod types;

pub use naming::{output_file_name, unique_output_names};
pub use types::{
    DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, OutputSize, PipelineConfig, PipelineConfigBuilder,
    ResizeFilter,
};
