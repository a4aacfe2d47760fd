use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{GrayImage, ImageFormat, Rgba, RgbaImage};

use crate::image_pipeline::bmp::{BitmapFile, BitmapWriter, PixelBuffer, StandardBmpWriter};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::config::{OutputSize, PipelineConfig, ResizeFilter};
use crate::image_pipeline::conversions::{PhotoOutcome, PhotoToBmpPipeline};
use crate::image_pipeline::detect::{DetectorLoader, EyeDetector};
use crate::image_pipeline::geometry::{EyeSet, Rect};
use crate::image_pipeline::resize::ImageResizer;

const SKIN: Rgba<u8> = Rgba([120, 80, 40, 255]);

#[derive(Clone, Default)]
struct MockDetector {
    eyes: EyeSet,
    empty_for_width: Option<u32>,
    seen: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl EyeDetector for MockDetector {
    fn detect(&self, gray: &GrayImage) -> EyeSet {
        self.seen.lock().unwrap().push(gray.dimensions());
        if Some(gray.width()) == self.empty_for_width {
            return EyeSet::empty();
        }
        self.eyes.clone()
    }
}

struct MockLoader {
    detector: Option<MockDetector>,
    loads: Arc<AtomicUsize>,
}

impl DetectorLoader for MockLoader {
    type Detector = MockDetector;

    fn load(&self) -> Result<MockDetector> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.detector
            .clone()
            .ok_or_else(|| PipelineError::DetectorInitFailure("Mock model missing".to_string()))
    }
}

struct MockWriter {
    should_fail: bool,
    written_data: Arc<Mutex<Vec<PixelBuffer>>>,
}

impl BitmapWriter for MockWriter {
    fn encode(&self, image: &PixelBuffer) -> Result<BitmapFile> {
        if self.should_fail {
            return Err(PipelineError::InvalidDimensions(image.width, image.height));
        }
        self.written_data.lock().unwrap().push(image.clone());
        StandardBmpWriter.encode(image)
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, SKIN);
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn two_eyes(y: u32) -> EyeSet {
    EyeSet::new(vec![Rect::new(100, y, 20, 20), Rect::new(180, y, 20, 20)])
}

fn loader(detector: MockDetector) -> (MockLoader, Arc<AtomicUsize>) {
    let loads = Arc::new(AtomicUsize::new(0));
    (
        MockLoader {
            detector: Some(detector),
            loads: loads.clone(),
        },
        loads,
    )
}

fn failing_loader() -> MockLoader {
    MockLoader {
        detector: None,
        loads: Arc::new(AtomicUsize::new(0)),
    }
}

fn writer() -> (MockWriter, Arc<Mutex<Vec<PixelBuffer>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    (
        MockWriter {
            should_fail: false,
            written_data: written.clone(),
        },
        written,
    )
}

fn small_output() -> PipelineConfig {
    PipelineConfig::builder().output_size(OutputSize::new(40, 50)).build()
}

#[test]
fn test_successful_conversion() {
    let detector = MockDetector {
        eyes: two_eyes(150),
        ..Default::default()
    };
    let (loader, _) = loader(detector);
    let (writer, written) = writer();
    let pipeline = PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), writer, small_output());

    let outcome = pipeline.process(&png_bytes(300, 400), "portrait.jpg").unwrap();

    let artifact = outcome.artifact().expect("bitmap expected");
    assert_eq!(artifact.file_name, "portrait.bmp");
    assert_eq!((artifact.bitmap.width(), artifact.bitmap.height()), (40, 50));
    assert_eq!(artifact.bitmap.len(), 54 + 120 * 50);

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!((written[0].width, written[0].height), (40, 50));
}

#[test]
fn test_output_pixels_survive_round_trip() {
    let detector = MockDetector {
        eyes: two_eyes(150),
        ..Default::default()
    };
    let (loader, _) = loader(detector);
    let pipeline = PhotoToBmpPipeline::with_custom(
        loader,
        ImageResizer::new(ResizeFilter::Nearest),
        StandardBmpWriter,
        small_output(),
    );

    let outcome = pipeline.process(&png_bytes(300, 400), "portrait.png").unwrap();
    let bitmap = &outcome.artifact().unwrap().bitmap;

    let decoded = image::load_from_memory_with_format(bitmap.as_bytes(), ImageFormat::Bmp)
        .unwrap()
        .to_rgb8();
    assert_eq!(decoded.dimensions(), (40, 50));
    assert!(decoded.pixels().all(|p| p.0 == [120, 80, 40]));
}

#[test]
fn test_wide_photo_is_normalized_before_detection() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let detector = MockDetector {
        eyes: EyeSet::new(vec![Rect::new(400, 700, 40, 40), Rect::new(400, 700, 40, 40)]),
        empty_for_width: None,
        seen: seen.clone(),
    };
    let (loader, _) = loader(detector);
    let (writer, _) = writer();
    let pipeline =
        PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), writer, PipelineConfig::default());

    let outcome = pipeline.process(&png_bytes(1000, 500), "wide.png").unwrap();

    assert_eq!(seen.lock().unwrap().as_slice(), &[(900, 1600)]);
    let bitmap = &outcome.artifact().unwrap().bitmap;
    assert_eq!((bitmap.width(), bitmap.height()), (400, 500));
}

#[test]
fn test_narrow_photo_keeps_its_size() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let detector = MockDetector {
        eyes: two_eyes(100),
        empty_for_width: None,
        seen: seen.clone(),
    };
    let (loader, _) = loader(detector);
    let (writer, _) = writer();
    let pipeline = PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), writer, small_output());

    pipeline.process(&png_bytes(899, 300), "narrow.png").unwrap();

    assert_eq!(seen.lock().unwrap().as_slice(), &[(899, 300)]);
}

#[test]
fn test_no_detection_is_a_noop() {
    let (loader, _) = loader(MockDetector::default());
    let (writer, written) = writer();
    let pipeline = PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), writer, small_output());

    let outcome = pipeline.process(&png_bytes(300, 400), "nobody.png").unwrap();

    assert!(outcome.is_no_detection());
    assert!(outcome.artifact().is_none());
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_degenerate_crop_fails_with_zero_area() {
    let detector = MockDetector {
        eyes: EyeSet::new(vec![Rect::new(5000, 5000, 10, 10), Rect::new(5000, 5000, 10, 10)]),
        ..Default::default()
    };
    let (loader, _) = loader(detector);
    let (writer, written) = writer();
    let pipeline = PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), writer, small_output());

    let result = pipeline.process(&png_bytes(300, 400), "bad_eyes.png");

    assert!(matches!(result.unwrap_err(), PipelineError::ZeroAreaCrop { .. }));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_detector_init_failure() {
    let (writer, _) = writer();
    let pipeline =
        PhotoToBmpPipeline::with_custom(failing_loader(), ImageResizer::default(), writer, small_output());

    let err = pipeline.process(&png_bytes(300, 400), "portrait.png").unwrap_err();

    assert!(matches!(err, PipelineError::DetectorInitFailure(_)));
    assert!(err.is_fatal_to_batch());
    assert!(!pipeline.is_ready());
}

#[test]
fn test_detector_loaded_once() {
    let detector = MockDetector {
        eyes: two_eyes(150),
        ..Default::default()
    };
    let (loader, loads) = loader(detector);
    let (writer, _) = writer();
    let pipeline = PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), writer, small_output());

    pipeline.initialize().unwrap();
    pipeline.process(&png_bytes(300, 400), "one.png").unwrap();
    pipeline.process(&png_bytes(300, 400), "two.png").unwrap();

    assert!(pipeline.is_ready());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_closure_loader() {
    let detector = MockDetector {
        eyes: two_eyes(150),
        ..Default::default()
    };
    let pipeline = PhotoToBmpPipeline::with_custom(
        move || -> Result<MockDetector> { Ok(detector.clone()) },
        ImageResizer::default(),
        StandardBmpWriter,
        small_output(),
    );

    let image = RgbaImage::from_pixel(300, 400, SKIN);
    let outcome = pipeline.process_image(image, "decoded").unwrap();
    assert_eq!(outcome.artifact().unwrap().file_name, "image.bmp");
}

#[test]
fn test_decode_failure() {
    let (loader, _) = loader(MockDetector::default());
    let (writer, _) = writer();
    let pipeline = PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), writer, small_output());

    let err = pipeline.process(b"definitely not a photo", "junk.jpg").unwrap_err();
    assert!(matches!(err, PipelineError::DecodeError(_)));
}

#[test]
fn test_writer_failure() {
    let detector = MockDetector {
        eyes: two_eyes(150),
        ..Default::default()
    };
    let (loader, _) = loader(detector);
    let writer = MockWriter {
        should_fail: true,
        written_data: Arc::new(Mutex::new(Vec::new())),
    };
    let pipeline = PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), writer, small_output());

    let err = pipeline.process(&png_bytes(300, 400), "portrait.png").unwrap_err();
    assert!(matches!(err, PipelineError::InvalidDimensions(40, 50)));
}

#[test]
fn test_timings_cover_each_stage() {
    let detector = MockDetector {
        eyes: two_eyes(150),
        ..Default::default()
    };
    let (loader, _) = loader(detector);
    let pipeline =
        PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), StandardBmpWriter, small_output());

    let (outcome, timings) = pipeline
        .process_with_timings(&png_bytes(300, 400), "portrait.png")
        .unwrap();

    assert!(matches!(outcome, PhotoOutcome::Encoded(_)));
    let names: Vec<&str> = timings.steps().iter().map(|s| s.name).collect();
    assert_eq!(names, ["decode", "normalize", "detect", "crop_resize", "encode"]);
}

#[test]
fn test_batch_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let good = dir.path().join("alice.png");
    let faceless = dir.path().join("wall.png");
    let corrupt = dir.path().join("broken.png");
    let missing = dir.path().join("missing.png");
    std::fs::write(&good, png_bytes(300, 400)).unwrap();
    std::fs::write(&faceless, png_bytes(64, 64)).unwrap();
    std::fs::write(&corrupt, b"\x89PNG but not really").unwrap();

    let detector = MockDetector {
        eyes: two_eyes(150),
        empty_for_width: Some(64),
        ..Default::default()
    };
    let (loader, loads) = loader(detector);
    let pipeline =
        PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), StandardBmpWriter, small_output());

    let inputs = vec![good.clone(), faceless.clone(), corrupt.clone(), missing.clone()];
    let entries = pipeline.process_batch(&inputs, &out_dir).unwrap();

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].input, good);
    assert_eq!(entries[3].input, missing);

    let written = entries[0].result.as_ref().unwrap().clone().unwrap();
    assert_eq!(written, out_dir.join("alice.bmp"));
    assert_eq!(std::fs::read(&written).unwrap().len(), 54 + 120 * 50);

    assert!(matches!(entries[1].result, Ok(None)));
    assert!(!out_dir.join("wall.bmp").exists());
    assert!(matches!(entries[2].result, Err(PipelineError::DecodeError(_))));
    assert!(matches!(entries[3].result, Err(PipelineError::InputReadError(_))));

    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_batch_stops_on_detector_init_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("alice.png");
    std::fs::write(&input, png_bytes(300, 400)).unwrap();

    let pipeline = PhotoToBmpPipeline::with_custom(
        failing_loader(),
        ImageResizer::default(),
        StandardBmpWriter,
        small_output(),
    );

    let err = pipeline.process_batch(&[input], dir.path()).unwrap_err();

    assert!(matches!(err, PipelineError::DetectorInitFailure(_)));
    assert!(!dir.path().join("alice.bmp").exists());
}

#[test]
fn test_batch_keeps_outputs_sharing_a_base_name() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    std::fs::create_dir(dir.path().join("second")).unwrap();

    let png = dir.path().join("alice.png");
    let jpg = dir.path().join("alice.jpg");
    let nested = dir.path().join("second").join("alice.png");
    for input in [&png, &jpg, &nested] {
        std::fs::write(input, png_bytes(300, 400)).unwrap();
    }

    let detector = MockDetector {
        eyes: two_eyes(150),
        ..Default::default()
    };
    let (loader, _) = loader(detector);
    let pipeline =
        PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), StandardBmpWriter, small_output());

    let entries = pipeline.process_batch(&[png, jpg, nested], &out_dir).unwrap();

    let written: Vec<_> = entries
        .iter()
        .map(|entry| entry.result.as_ref().unwrap().clone().unwrap())
        .collect();
    assert_eq!(
        written,
        [
            out_dir.join("alice.bmp"),
            out_dir.join("alice (1).bmp"),
            out_dir.join("alice (2).bmp"),
        ]
    );
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 3);
    for path in &written {
        assert_eq!(std::fs::read(path).unwrap().len(), 54 + 120 * 50);
    }
}

#[test]
fn test_process_file_uses_plain_output_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bob.webp.png");
    std::fs::write(&input, png_bytes(300, 400)).unwrap();

    let detector = MockDetector {
        eyes: two_eyes(150),
        ..Default::default()
    };
    let (loader, _) = loader(detector);
    let pipeline =
        PhotoToBmpPipeline::with_custom(loader, ImageResizer::default(), StandardBmpWriter, small_output());

    let written = pipeline.process_file(&input, dir.path()).unwrap();

    assert_eq!(written, Some(dir.path().join("bob.bmp")));
}
