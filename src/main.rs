use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eyecrop_rs::image_pipeline::{OutputSize, PhotoToBmpPipeline, PipelineConfig};
use eyecrop_rs::logger;

use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Crop portraits around the eyes and save them as 24-bit BMP", long_about = None)]
struct Args {
    /// Photos to process (JPEG, PNG, WebP or BMP)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output width in pixels; blank or non-numeric means 400
    #[arg(long, default_value = "")]
    width: String,

    /// Output height in pixels; blank or non-numeric means 500
    #[arg(long, default_value = "")]
    height: String,

    /// SeetaFace model file (seeta_fd_frontal_v1.0.bin)
    #[arg(long)]
    model: PathBuf,

    /// Directory the .bmp files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init("info")?;

    info!("Starting eyecrop...");

    let output_size = OutputSize::from_fields(&args.width, &args.height);
    let config = PipelineConfig::builder()
        .output_size(output_size)
        .build();
    let pipeline = PhotoToBmpPipeline::new(config, args.model.clone());

    info!("Output size: {}x{}", output_size.width, output_size.height);
    info!("Resize filter: {:?}", pipeline.config().resize_filter);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;

    let entries = match pipeline.process_batch(&args.inputs, &args.out_dir) {
        Ok(entries) => entries,
        Err(e) if e.is_fatal_to_batch() => {
            return Err(anyhow::Error::new(e)
                .context("eye detector is not available, no photos were processed"));
        }
        Err(e) => return Err(e.into()),
    };

    let mut failed = 0;
    for entry in &entries {
        match &entry.result {
            Ok(Some(output)) => println!("{} -> {}", entry.input.display(), output.display()),
            Ok(None) => println!("{}: no eyes detected, skipped", entry.input.display()),
            Err(e) => {
                failed += 1;
                println!("{}: failed: {}", entry.input.display(), e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} photo(s) failed", failed, entries.len());
    }
    Ok(())
}
