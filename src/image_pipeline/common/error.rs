use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode photo: {0}")]
    DecodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(u32, u32),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Crop region has zero area: {width}x{height}")]
    ZeroAreaCrop { width: u32, height: u32 },

    #[error("Eye detector failed to initialize: {0}")]
    DetectorInitFailure(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether this error stops every image in a batch rather than just one.
    pub fn is_fatal_to_batch(&self) -> bool {
        matches!(self, PipelineError::DetectorInitFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
