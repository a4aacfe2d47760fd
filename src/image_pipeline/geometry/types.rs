//! Geometry types shared by detection and crop planning

/// Axis-aligned rectangle reported by an eye detector, in working-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Twice the rectangle centre, so odd widths and heights stay exact.
    pub(crate) fn doubled_center(&self) -> (i64, i64) {
        (
            2 * self.x as i64 + self.width as i64,
            2 * self.y as i64 + self.height as i64,
        )
    }
}

/// Eye rectangles in detector order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EyeSet {
    rects: Vec<Rect>,
}

impl EyeSet {
    pub fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.rects.iter()
    }

    pub fn as_slice(&self) -> &[Rect] {
        &self.rects
    }
}

impl From<Vec<Rect>> for EyeSet {
    fn from(rects: Vec<Rect>) -> Self {
        Self::new(rects)
    }
}

impl FromIterator<Rect> for EyeSet {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Width at or above which a photo is normalized and framed with the wide profile.
pub const WIDE_PROFILE_MIN_WIDTH: u32 = 900;

/// Size every wide photo is resized to before detection.
pub const NORMALIZED_WIDTH: u32 = 900;
pub const NORMALIZED_HEIGHT: u32 = 1600;

/// Dimensions of the working image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetrics {
    pub width: u32,
    pub height: u32,
}

impl ImageMetrics {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Working-image size for a photo of the given original size.
    ///
    /// Photos at least [`WIDE_PROFILE_MIN_WIDTH`] wide are stretched to exactly
    /// 900x1600 regardless of aspect ratio; narrower photos keep their size.
    pub fn normalized(original_width: u32, original_height: u32) -> Self {
        if original_width >= WIDE_PROFILE_MIN_WIDTH {
            Self::new(NORMALIZED_WIDTH, NORMALIZED_HEIGHT)
        } else {
            Self::new(original_width, original_height)
        }
    }

    pub fn margin_profile(&self) -> MarginProfile {
        MarginProfile::for_width(self.width)
    }
}

/// Pixel margins kept around the eye midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarginProfile {
    pub horizontal: u32,
    pub top: u32,
    pub bottom: u32,
}

impl MarginProfile {
    pub const WIDE: MarginProfile = MarginProfile {
        horizontal: 400,
        top: 450,
        bottom: 550,
    };

    pub const NARROW: MarginProfile = MarginProfile {
        horizontal: 200,
        top: 225,
        bottom: 275,
    };

    pub fn for_width(working_width: u32) -> Self {
        if working_width >= WIDE_PROFILE_MIN_WIDTH {
            Self::WIDE
        } else {
            Self::NARROW
        }
    }
}

/// Crop bounds into the working image plus the final output size.
///
/// `left..right` and `top..bottom` are half-open pixel ranges. Bounds never
/// leave the working image, but the area may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub target_width: u32,
    pub target_height: u32,
}

impl CropPlan {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
