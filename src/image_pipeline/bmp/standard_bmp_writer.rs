use tracing::debug;
use crate::image_pipeline::common::error::{Result, PipelineError};
use crate::image_pipeline::bmp::types::{
    BITS_PER_PIXEL, BMP_HEADER_SIZE, BitmapFile, INFO_HEADER_SIZE, PixelBuffer, row_size,
};
use crate::image_pipeline::bmp::writer::BitmapWriter;

/// Encodes 24-bit, uncompressed, bottom-up bitmaps with no colour table.
pub struct StandardBmpWriter;

impl BitmapWriter for StandardBmpWriter {
    fn encode(&self, image: &PixelBuffer) -> Result<BitmapFile> {
        let (width, height) = (image.width, image.height);
        debug!("Encoding BMP image: {}x{}", width, height);

        // Width and height are stored as signed 32-bit fields.
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        let expected = image.stride() * height as usize;
        if image.data.len() != expected {
            return Err(PipelineError::BufferSizeMismatch {
                expected,
                actual: image.data.len(),
            });
        }

        let row_size = row_size(width);
        let image_size = row_size
            .checked_mul(height as usize)
            .ok_or(PipelineError::InvalidDimensions(width, height))?;
        let file_size = image_size
            .checked_add(BMP_HEADER_SIZE)
            .ok_or(PipelineError::InvalidDimensions(width, height))?;
        let file_size_field =
            u32::try_from(file_size).map_err(|_| PipelineError::InvalidDimensions(width, height))?;

        let mut buffer = Vec::with_capacity(file_size);

        // File header
        buffer.extend_from_slice(b"BM");
        buffer.extend_from_slice(&file_size_field.to_le_bytes());
        buffer.extend_from_slice(&0u32.to_le_bytes()); // reserved
        buffer.extend_from_slice(&(BMP_HEADER_SIZE as u32).to_le_bytes());

        // Info header
        buffer.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
        buffer.extend_from_slice(&(width as i32).to_le_bytes());
        buffer.extend_from_slice(&(height as i32).to_le_bytes()); // positive: bottom-up
        buffer.extend_from_slice(&1u16.to_le_bytes()); // planes
        buffer.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
        buffer.extend_from_slice(&0u32.to_le_bytes()); // no compression
        buffer.extend_from_slice(&(image_size as u32).to_le_bytes());
        // Resolution, palette size, important colours.
        buffer.extend_from_slice(&[0u8; 16]);

        let channels = image.layout.channels();
        let padding = row_size - width as usize * 3;
        for row in image.data.chunks_exact(image.stride()).rev() {
            for pixel in row.chunks_exact(channels) {
                buffer.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
            }
            buffer.extend(std::iter::repeat_n(0u8, padding));
        }

        debug_assert_eq!(buffer.len(), file_size);
        debug!("BMP encoding complete: {} bytes", buffer.len());
        Ok(BitmapFile::from_encoded(width, height, buffer))
    }
}
