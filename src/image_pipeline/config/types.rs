//! Photo-to-BMP pipeline configuration types

pub const DEFAULT_OUTPUT_WIDTH: u32 = 400;
pub const DEFAULT_OUTPUT_HEIGHT: u32 = 500;

/// Final bitmap size requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl Default for OutputSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_OUTPUT_WIDTH,
            height: DEFAULT_OUTPUT_HEIGHT,
        }
    }
}

impl OutputSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Builds a size from two free-text form fields.
    ///
    /// Each field falls back to its default (400 wide, 500 high) when it is
    /// blank, does not start with a number, or parses to zero. Trailing text
    /// after the leading digits is ignored, so `"640px"` reads as 640.
    pub fn from_fields(width: &str, height: &str) -> Self {
        Self {
            width: parse_dimension(width).unwrap_or(DEFAULT_OUTPUT_WIDTH),
            height: parse_dimension(height).unwrap_or(DEFAULT_OUTPUT_HEIGHT),
        }
    }
}

fn parse_dimension(field: &str) -> Option<u32> {
    let field = field.trim();
    let field = field.strip_prefix('+').unwrap_or(field);
    let digits_end = field
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(field.len());

    field[..digits_end].parse::<u32>().ok().filter(|&value| value > 0)
}

/// Resampling filter used for both the normalization and the output resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    /// Nearest neighbour (fastest, blocky)
    Nearest,
    /// Bilinear (default)
    Triangle,
    /// Cubic
    CatmullRom,
    /// Gaussian blur kernel
    Gaussian,
    /// Lanczos with window 3 (slowest, sharpest)
    Lanczos3,
}

/// Configuration for photo to BMP conversion
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Size of every produced bitmap
    pub output_size: OutputSize,
    /// Filter used whenever pixels are resampled
    pub resize_filter: ResizeFilter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_size: OutputSize::default(),
            resize_filter: ResizeFilter::Triangle,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    output_size: Option<OutputSize>,
    resize_filter: Option<ResizeFilter>,
}

impl PipelineConfigBuilder {
    pub fn output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = Some(output_size);
        self
    }

    pub fn resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = Some(filter);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            output_size: self.output_size.unwrap_or(default.output_size),
            resize_filter: self.resize_filter.unwrap_or(default.resize_filter),
        }
    }
}
