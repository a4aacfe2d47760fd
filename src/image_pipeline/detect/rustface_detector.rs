//! Eye detector backed by the `rustface` crate (SeetaFace engine).
//!
//! SeetaFace finds whole faces, so eye regions are placed at fixed
//! proportions of each face box. Faces are reported best score first, left eye
//! before right eye, which makes the first two rectangles the eyes of the most
//! confident face.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::GrayImage;
use tracing::{debug, info};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::detect::detector::{DetectorLoader, EyeDetector};
use crate::image_pipeline::geometry::{EyeSet, Rect};

/// Horizontal eye centres as a fraction of face width.
const LEFT_EYE_CENTER_X: f64 = 0.3;
const RIGHT_EYE_CENTER_X: f64 = 0.7;
/// Vertical eye centre as a fraction of face height.
const EYE_CENTER_Y: f64 = 0.38;
const EYE_WIDTH: f64 = 0.25;
const EYE_HEIGHT: f64 = 0.18;

pub struct RustfaceEyeDetector {
    model: rustface::Model,
}

impl RustfaceEyeDetector {
    pub fn new(model: rustface::Model) -> Self {
        Self { model }
    }

    /// Reads a SeetaFace model file such as `seeta_fd_frontal_v1.0.bin`.
    pub fn from_model_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(model = %path.display(), "Loading face model");

        let file = File::open(path).map_err(|e| {
            PipelineError::DetectorInitFailure(format!("{}: {}", path.display(), e))
        })?;
        let model = rustface::read_model(BufReader::new(file)).map_err(|e| {
            PipelineError::DetectorInitFailure(format!("{}: {}", path.display(), e))
        })?;

        Ok(Self::new(model))
    }
}

impl EyeDetector for RustfaceEyeDetector {
    fn detect(&self, gray: &GrayImage) -> EyeSet {
        let (width, height) = gray.dimensions();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let mut faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));
        faces.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        debug!("Detected {} face(s)", faces.len());

        faces
            .iter()
            .flat_map(|face| {
                let bbox = face.bbox();
                let face_box = (
                    bbox.x() as f64,
                    bbox.y() as f64,
                    bbox.width() as f64,
                    bbox.height() as f64,
                );
                [LEFT_EYE_CENTER_X, RIGHT_EYE_CENTER_X]
                    .into_iter()
                    .filter_map(move |center_x| eye_region(face_box, center_x, width, height))
            })
            .collect()
    }
}

/// Eye rectangle inside a face box, clipped to the image. `None` if nothing
/// of it remains inside.
fn eye_region(
    (face_x, face_y, face_w, face_h): (f64, f64, f64, f64),
    center_x: f64,
    image_width: u32,
    image_height: u32,
) -> Option<Rect> {
    let eye_w = face_w * EYE_WIDTH;
    let eye_h = face_h * EYE_HEIGHT;
    let x0 = face_x + face_w * center_x - eye_w / 2.0;
    let y0 = face_y + face_h * EYE_CENTER_Y - eye_h / 2.0;

    let left = x0.round().clamp(0.0, image_width as f64) as u32;
    let top = y0.round().clamp(0.0, image_height as f64) as u32;
    let right = (x0 + eye_w).round().clamp(0.0, image_width as f64) as u32;
    let bottom = (y0 + eye_h).round().clamp(0.0, image_height as f64) as u32;

    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(left, top, right - left, bottom - top))
}

/// Loads a [`RustfaceEyeDetector`] from a model file on first use.
#[derive(Debug, Clone)]
pub struct RustfaceModelLoader {
    model_path: PathBuf,
}

impl RustfaceModelLoader {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: model_path.into(),
        }
    }
}

impl DetectorLoader for RustfaceModelLoader {
    type Detector = RustfaceEyeDetector;

    fn load(&self) -> Result<RustfaceEyeDetector> {
        RustfaceEyeDetector::from_model_file(&self.model_path)
    }
}
