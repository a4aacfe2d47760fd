use image::RgbaImage;
use crate::image_pipeline::common::error::{Result, PipelineError};
use crate::image_pipeline::geometry::CropPlan;

pub trait Resizer {
    /// Resamples `image` to exactly `width` x `height`.
    ///
    /// Fails with [`PipelineError::ZeroAreaCrop`] when the source has no pixels.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage>;

    /// Cuts the planned region out of the working image and resizes it to the
    /// plan's target size.
    fn crop_and_resize(&self, image: &RgbaImage, plan: &CropPlan) -> Result<RgbaImage> {
        if plan.is_degenerate() {
            return Err(PipelineError::ZeroAreaCrop {
                width: plan.width(),
                height: plan.height(),
            });
        }
        let region =
            image::imageops::crop_imm(image, plan.left, plan.top, plan.width(), plan.height()).to_image();
        self.resize(&region, plan.target_width, plan.target_height)
    }
}
