//! # Presentation Buffer
//!
//! The one pixel area the compositor redraws into and the presenter reads
//! out once a redraw completes.
//!
//! Every pixel is four bytes and the area is opaque: surfaces carry alpha,
//! the buffer never does. Translucent drawing reads the stored colour back
//! through [`PixelFormat::decode`] and blends over it.
//!
//! Rows may be padded (`stride_pixels > width`), which is how presenters
//! that hand out aligned scanlines are accommodated.

/// Storage size of every pixel in the buffer
pub const BYTES_PER_PIXEL: usize = 4;

/// Byte order of a stored pixel
///
/// The fourth byte is padding and always written as zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    /// Blue, green, red, pad (a little-endian `0x00RRGGBB` word)
    Rgb32,
    /// Red, green, blue, pad
    Bgr32,
}

impl PixelFormat {
    /// Packs an opaque colour
    pub fn encode(&self, r: u8, g: u8, b: u8) -> [u8; BYTES_PER_PIXEL] {
        match self {
            PixelFormat::Rgb32 => [b, g, r, 0],
            PixelFormat::Bgr32 => [r, g, b, 0],
        }
    }

    /// Unpacks a stored pixel to `(r, g, b)`
    pub fn decode(&self, bytes: [u8; BYTES_PER_PIXEL]) -> (u8, u8, u8) {
        match self {
            PixelFormat::Rgb32 => (bytes[2], bytes[1], bytes[0]),
            PixelFormat::Bgr32 => (bytes[0], bytes[1], bytes[2]),
        }
    }
}

/// Geometry and layout of a presentation buffer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FramebufferInfo {
    pub width: usize,
    pub height: usize,
    /// Pixels from the start of one row to the start of the next
    pub stride_pixels: usize,
    pub format: PixelFormat,
}

impl FramebufferInfo {
    /// Layout with no row padding
    pub const fn packed(width: usize, height: usize, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            stride_pixels: width,
            format,
        }
    }

    /// Index of the first byte of pixel `(x, y)`
    pub const fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.stride_pixels + x) * BYTES_PER_PIXEL
    }

    /// Bytes needed to hold every row, padding included
    pub const fn buffer_size(&self) -> usize {
        self.height * self.stride_pixels * BYTES_PER_PIXEL
    }
}

/// Pixel storage owned by the compositor
///
/// Drawing writes through [`buffer_mut`](Framebuffer::buffer_mut) while a
/// redraw is in progress; presenters and checksums read
/// [`buffer`](Framebuffer::buffer) between redraws.
pub trait Framebuffer {
    fn info(&self) -> FramebufferInfo;

    fn buffer(&self) -> &[u8];

    /// At least `info().buffer_size()` bytes; anything past that is ignored
    fn buffer_mut(&mut self) -> &mut [u8];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_byte_order() {
        assert_eq!(PixelFormat::Rgb32.encode(0x10, 0x20, 0x30), [0x30, 0x20, 0x10, 0]);
        assert_eq!(PixelFormat::Bgr32.encode(0x10, 0x20, 0x30), [0x10, 0x20, 0x30, 0]);
    }

    #[test]
    fn test_decode_ignores_padding_byte() {
        assert_eq!(PixelFormat::Rgb32.decode([0x30, 0x20, 0x10, 0xEE]), (0x10, 0x20, 0x30));
        for format in [PixelFormat::Rgb32, PixelFormat::Bgr32] {
            assert_eq!(format.decode(format.encode(200, 1, 99)), (200, 1, 99));
        }
    }

    #[test]
    fn test_packed_layout_for_broadcast_raster() {
        let info = FramebufferInfo::packed(720, 576, PixelFormat::Rgb32);
        assert_eq!(info.stride_pixels, 720);
        assert_eq!(info.offset(719, 0), 719 * 4);
        assert_eq!(info.offset(0, 575), 575 * 720 * 4);
        assert_eq!(info.buffer_size(), info.offset(0, 576));
    }

    #[test]
    fn test_padded_rows_skip_padding() {
        let info = FramebufferInfo {
            stride_pixels: 8,
            ..FramebufferInfo::packed(5, 3, PixelFormat::Bgr32)
        };
        assert_eq!(info.offset(4, 1), (8 + 4) * 4);
        assert_eq!(info.buffer_size(), 3 * 8 * 4);
    }
}
