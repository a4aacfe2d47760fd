use image::GrayImage;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::geometry::EyeSet;

/// Pluggable eye detection backend.
///
/// Results carry no guarantee of accuracy, order, or count; the crop planner
/// only looks at the first two.
pub trait EyeDetector: Send + Sync {
    /// Detect eyes in an 8-bit grayscale working image.
    fn detect(&self, gray: &GrayImage) -> EyeSet;
}

/// One-time setup step that produces a ready detector, typically by loading
/// model data.
pub trait DetectorLoader {
    type Detector: EyeDetector;

    fn load(&self) -> Result<Self::Detector>;
}

impl<F, D> DetectorLoader for F
where
    F: Fn() -> Result<D>,
    D: EyeDetector,
{
    type Detector = D;

    fn load(&self) -> Result<D> {
        self()
    }
}
