use image::RgbaImage;
use image::imageops::FilterType;
use tracing::debug;
use crate::image_pipeline::common::error::{Result, PipelineError};
use crate::image_pipeline::config::ResizeFilter;
use crate::image_pipeline::resize::resizer::Resizer;

/// Resizer backed by `image::imageops::resize`.
pub struct ImageResizer {
    filter: ResizeFilter,
}

impl ImageResizer {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }
}

impl Default for ImageResizer {
    fn default() -> Self {
        Self::new(ResizeFilter::Triangle)
    }
}

impl Resizer for ImageResizer {
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
        let (src_width, src_height) = image.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(PipelineError::ZeroAreaCrop {
                width: src_width,
                height: src_height,
            });
        }
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        debug!(
            "Resizing {}x{} -> {}x{} ({:?})",
            src_width, src_height, width, height, self.filter
        );

        let filter = match self.filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        };

        Ok(image::imageops::resize(image, width, height, filter))
    }
}
