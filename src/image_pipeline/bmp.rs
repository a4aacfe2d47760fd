//! BMP writing module
//!
//! This module serializes pixel buffers into 24-bit uncompressed bitmap files.

mod writer;
mod standard_bmp_writer;
pub mod types;

pub use writer::BitmapWriter;
pub use standard_bmp_writer::StandardBmpWriter;
pub use types::{BitmapFile, ChannelLayout, PixelBuffer, row_size};
