//! Crop geometry module
//!
//! Eye rectangles, working-image metrics, margin profiles, and the planner
//! that turns detections into a crop window.

mod planner;
pub mod types;

pub use planner::{CropPlanner, eye_midpoint};
pub use types::{
    CropPlan, EyeSet, ImageMetrics, MarginProfile, Rect, NORMALIZED_HEIGHT, NORMALIZED_WIDTH,
    WIDE_PROFILE_MIN_WIDTH,
};
