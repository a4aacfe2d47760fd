use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::bmp::types::{BitmapFile, PixelBuffer};

pub trait BitmapWriter {
    fn encode(&self, image: &PixelBuffer) -> Result<BitmapFile>;

    fn write_bmp(&self, image: &PixelBuffer, output: &mut dyn Write) -> Result<()> {
        let bitmap = self.encode(image)?;
        output.write_all(bitmap.as_bytes())?;
        Ok(())
    }
}
