use rayon::prelude::*;
use tracing::{error, info, instrument, warn};
use image::RgbaImage;
use std::path::{Path, PathBuf};

use crate::image_pipeline::{
    common::error::{PipelineError, Result},
    bmp::{BitmapWriter, PixelBuffer},
    config::{PipelineConfig, output_file_name, unique_output_names},
    conversions::timing::{PipelineTimings, Timer},
    conversions::types::{BatchEntry, BmpArtifact, PhotoOutcome},
    detect::{DetectorGate, DetectorLoader, EyeDetector},
    geometry::{CropPlanner, ImageMetrics},
    resize::Resizer,
};
#[cfg(feature = "rustface")]
use crate::image_pipeline::{
    bmp::StandardBmpWriter,
    detect::RustfaceModelLoader,
    resize::ImageResizer,
};

/// Photo in, eye-centred bitmap out.
///
/// The detector is loaded through the gate on first use; every entry point
/// passes that gate before touching any photo.
pub struct PhotoToBmpPipeline<L: DetectorLoader, Z: Resizer, W: BitmapWriter> {
    loader: L,
    gate: DetectorGate<L::Detector>,
    resizer: Z,
    writer: W,
    planner: CropPlanner,
    config: PipelineConfig,
}

#[cfg(feature = "rustface")]
impl PhotoToBmpPipeline<RustfaceModelLoader, ImageResizer, StandardBmpWriter> {
    pub fn new<P: Into<PathBuf>>(config: PipelineConfig, model_path: P) -> Self {
        let resizer = ImageResizer::new(config.resize_filter);
        Self::with_custom(RustfaceModelLoader::new(model_path), resizer, StandardBmpWriter, config)
    }
}

impl<L: DetectorLoader, Z: Resizer, W: BitmapWriter> PhotoToBmpPipeline<L, Z, W> {
    pub fn with_custom(loader: L, resizer: Z, writer: W, config: PipelineConfig) -> Self {
        Self {
            loader,
            gate: DetectorGate::new(),
            resizer,
            writer,
            planner: CropPlanner::new(),
            config,
        }
    }

    /// Loads the detector if that has not happened yet.
    pub fn initialize(&self) -> Result<()> {
        self.detector().map(|_| ())
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    fn detector(&self) -> Result<&L::Detector> {
        self.gate.get_or_try_init(|| self.loader.load())
    }

    /// Processes one encoded photo (JPEG, PNG, WebP, BMP).
    pub fn process(&self, input_data: &[u8], file_name: &str) -> Result<PhotoOutcome> {
        let mut timings = PipelineTimings::for_file(file_name);
        self.run(input_data, file_name, &mut timings)
    }

    pub fn process_with_timings(
        &self,
        input_data: &[u8],
        file_name: &str,
    ) -> Result<(PhotoOutcome, PipelineTimings)> {
        let mut timings = PipelineTimings::for_file(file_name);
        let outcome = self.run(input_data, file_name, &mut timings)?;
        Ok((outcome, timings))
    }

    /// Processes a photo that is already decoded.
    pub fn process_image(&self, image: RgbaImage, file_name: &str) -> Result<PhotoOutcome> {
        let detector = self.detector()?;
        let mut timings = PipelineTimings::for_file(file_name);
        self.run_decoded(detector, image, file_name, &mut timings)
    }

    #[instrument(skip(self, input_data, timings), fields(input_size = input_data.len()))]
    fn run(&self, input_data: &[u8], file_name: &str, timings: &mut PipelineTimings) -> Result<PhotoOutcome> {
        let detector = self.detector()?;

        let timer = Timer::start("decode");
        let image = {
            let _span = tracing::info_span!("decode").entered();
            image::load_from_memory(input_data)
                .map_err(|e| PipelineError::DecodeError(e.to_string()))?
                .to_rgba8()
        };
        timings.record(timer);

        self.run_decoded(detector, image, file_name, timings)
    }

    fn run_decoded(
        &self,
        detector: &L::Detector,
        image: RgbaImage,
        file_name: &str,
        timings: &mut PipelineTimings,
    ) -> Result<PhotoOutcome> {
        let (original_width, original_height) = image.dimensions();
        let metrics = ImageMetrics::normalized(original_width, original_height);

        let timer = Timer::start("normalize");
        let working = {
            let _span = tracing::info_span!("normalize",
                width = original_width,
                height = original_height
            ).entered();
            if (metrics.width, metrics.height) == (original_width, original_height) {
                image
            } else {
                self.resizer.resize(&image, metrics.width, metrics.height)?
            }
        };
        timings.record(timer);

        let timer = Timer::start("detect");
        let eyes = {
            let _span = tracing::info_span!("detect").entered();
            let gray = image::imageops::grayscale(&working);
            detector.detect(&gray)
        };
        timings.record(timer);

        let plan = {
            let _span = tracing::info_span!("plan", eyes = eyes.len()).entered();
            self.planner.plan(metrics, &eyes, self.config.output_size)
        };
        let Some(plan) = plan else {
            info!(file = file_name, outcome = "no_detection", "No eyes detected, skipping");
            return Ok(PhotoOutcome::NoDetection);
        };

        let timer = Timer::start("crop_resize");
        let cropped = {
            let _span = tracing::info_span!("crop_resize",
                width = plan.width(),
                height = plan.height()
            ).entered();
            self.resizer.crop_and_resize(&working, &plan)?
        };
        timings.record(timer);

        let timer = Timer::start("encode");
        let bitmap = {
            let _span = tracing::info_span!("encode").entered();
            self.writer.encode(&PixelBuffer::from(cropped))?
        };
        timings.record(timer);

        let artifact = BmpArtifact {
            file_name: output_file_name(file_name),
            bitmap,
        };
        info!(
            file = file_name,
            output = %artifact.file_name,
            width = artifact.bitmap.width(),
            height = artifact.bitmap.height(),
            outcome = "encoded",
            "Photo encoded in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(PhotoOutcome::Encoded(artifact))
    }

    /// Reads `input_path`, processes it, and writes the bitmap into `out_dir`.
    ///
    /// Returns the written path, or `None` when no eyes were found. An
    /// existing file of the same name in `out_dir` is replaced.
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        out_dir: Q,
    ) -> Result<Option<PathBuf>> {
        let input_path = input_path.as_ref();
        let output_name = output_file_name(&input_file_name(input_path));
        self.convert_file(input_path, out_dir.as_ref(), &output_name)
    }

    #[instrument(skip(self, input_path, out_dir))]
    fn convert_file(&self, input_path: &Path, out_dir: &Path, output_name: &str) -> Result<Option<PathBuf>> {
        let file_name = input_file_name(input_path);

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let (outcome, timings) = self.process_with_timings(&input_data, &file_name)?;
        timings.log_summary();

        match outcome {
            PhotoOutcome::Encoded(mut artifact) => {
                let _span = tracing::info_span!("write_output_file").entered();
                artifact.file_name = output_name.to_string();
                artifact.write_to_dir(out_dir).map(Some)
            }
            PhotoOutcome::NoDetection => Ok(None),
        }
    }

    /// Processes every input in parallel.
    ///
    /// Detector setup happens first; if it fails nothing is processed and
    /// the error is returned. Afterwards each file succeeds or fails on its
    /// own, and entries come back in input order. Inputs sharing a base name
    /// are written to distinct files, see [`unique_output_names`].
    pub fn process_batch<P, Q>(&self, inputs: &[P], out_dir: Q) -> Result<Vec<BatchEntry>>
    where
        P: AsRef<Path> + Sync,
        Q: AsRef<Path>,
        L: Sync,
        Z: Sync,
        W: Sync,
    {
        self.initialize()?;
        info!("Processing {} photo(s)", inputs.len());

        let file_names: Vec<String> = inputs
            .iter()
            .map(|input| input_file_name(input.as_ref()))
            .collect();
        let output_names = unique_output_names(file_names.iter().map(String::as_str));
        for (file_name, output_name) in file_names.iter().zip(&output_names) {
            if *output_name != output_file_name(file_name) {
                warn!(file = %file_name, output = %output_name, "Output name already used in this batch");
            }
        }

        let out_dir = out_dir.as_ref();
        let entries = inputs
            .par_iter()
            .zip(output_names.par_iter())
            .map(|(input, output_name)| {
                let input = input.as_ref();
                let result = self.convert_file(input, out_dir, output_name);
                if let Err(e) = &result {
                    error!(input = %input.display(), outcome = "failed", "{}", e);
                }
                BatchEntry {
                    input: input.to_path_buf(),
                    result,
                }
            })
            .collect();

        Ok(entries)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }
}

fn input_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
