use tracing::debug;

use crate::image_pipeline::config::OutputSize;
use crate::image_pipeline::geometry::types::{CropPlan, EyeSet, ImageMetrics};

/// Only the first two detections are treated as eyes.
const MAX_EYES: usize = 2;

/// Turns detected eyes into a crop window centred on their midpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct CropPlanner;

impl CropPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plans the crop for one working image.
    ///
    /// Returns `None` when no eyes were detected; the image is then skipped.
    /// The margin profile follows the working width, and every bound is
    /// clamped into the image. A zero-area plan is returned as-is and reported
    /// through [`CropPlan::is_degenerate`].
    pub fn plan(&self, metrics: ImageMetrics, eyes: &EyeSet, output: OutputSize) -> Option<CropPlan> {
        let (mid_x, mid_y) = eye_midpoint(eyes)?;
        let margins = metrics.margin_profile();
        let width = metrics.width as i64;
        let height = metrics.height as i64;

        let right = (mid_x + margins.horizontal as i64).min(width);
        let bottom = (mid_y + margins.bottom as i64).min(height);
        // A midpoint far outside the image must not push left/top past right/bottom.
        let left = (mid_x - margins.horizontal as i64).max(0).min(right.max(0));
        let top = (mid_y - margins.top as i64).max(0).min(bottom.max(0));

        let plan = CropPlan {
            left: left as u32,
            top: top as u32,
            right: right.max(0) as u32,
            bottom: bottom.max(0) as u32,
            target_width: output.width,
            target_height: output.height,
        };

        debug!(
            mid_x,
            mid_y,
            left = plan.left,
            top = plan.top,
            right = plan.right,
            bottom = plan.bottom,
            degenerate = plan.is_degenerate(),
            "Planned crop"
        );
        Some(plan)
    }
}

/// Floor of the summed eye centres divided by two.
///
/// The divisor is always two, even when a single eye was found, so a lone
/// detection pulls the midpoint halfway toward the origin.
pub fn eye_midpoint(eyes: &EyeSet) -> Option<(i64, i64)> {
    if eyes.is_empty() {
        return None;
    }

    let (sum_x, sum_y) = eyes
        .iter()
        .take(MAX_EYES)
        .map(|rect| rect.doubled_center())
        .fold((0i64, 0i64), |(sx, sy), (cx, cy)| (sx + cx, sy + cy));

    // Centres were doubled, so halve twice.
    Some((sum_x.div_euclid(4), sum_y.div_euclid(4)))
}
