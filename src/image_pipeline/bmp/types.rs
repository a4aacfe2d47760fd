//! Bitmap encoding types

use image::{RgbImage, RgbaImage};

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Size of the file header plus the 40-byte info header.
pub const BMP_HEADER_SIZE: usize = 54;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const BITS_PER_PIXEL: u16 = 24;
pub const BYTES_PER_PIXEL: usize = 3;

/// Bytes per encoded pixel row, padded to a multiple of four.
pub fn row_size(width: u32) -> usize {
    (width as usize * BYTES_PER_PIXEL).div_ceil(4) * 4
}

/// Channel order of a source pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// R, G, B
    Rgb,
    /// R, G, B, A (alpha is dropped on encode)
    Rgba,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}

/// Row-major 8-bit pixels, row 0 at the visual top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// Interleaved channel order of `data`
    pub layout: ChannelLayout,
    /// Pixel samples, `width * height * channels` bytes
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw samples, checking that their length matches the dimensions.
    pub fn new(width: u32, height: u32, layout: ChannelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(PipelineError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn stride(&self) -> usize {
        self.width as usize * self.layout.channels()
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            layout: ChannelLayout::Rgba,
            data: image.into_raw(),
        }
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            layout: ChannelLayout::Rgb,
            data: image.into_raw(),
        }
    }
}

/// A complete 24-bit uncompressed bitmap file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapFile {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl BitmapFile {
    pub(crate) fn from_encoded(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self { width, height, bytes }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_size(&self) -> usize {
        row_size(self.width)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
