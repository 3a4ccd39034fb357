// Core types shared by the compositor and the panel controller.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Integer extent. A zero on either axis means "use the screen extent" when
/// the size is a requested panel size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl std::ops::Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Premultiplied ARGB raster, one `u32` per pixel (0xAARRGGBB).
///
/// Rows may be padded: pixel (x, y) lives at byte offset
/// `y * stride_bytes + x * 4`. Accessors index without clamping; callers
/// keep `x < width` and `y < height`.
pub struct PixelBuffer {
    width: usize,
    height: usize,
    stride: usize, // in pixels, >= width
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Tightly packed buffer (`stride_bytes == width * 4`), cleared to zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_stride(width, height, width.saturating_mul(4))
    }

    /// Buffer whose rows are `stride_bytes` apart. The stride must be a
    /// multiple of 4 and hold at least `width` pixels.
    pub fn with_stride(width: usize, height: usize, stride_bytes: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidLayout(format!("empty raster {width}x{height}")));
        }
        if stride_bytes % 4 != 0 || stride_bytes / 4 < width {
            return Err(Error::InvalidLayout(format!(
                "stride {stride_bytes} bytes does not fit {width} pixels"
            )));
        }
        let stride = stride_bytes / 4;
        let pixels = alloc_pixels(stride, height, width)?;
        Ok(Self { width, height, stride, pixels })
    }

    /// Empty buffer with the same geometry as `self`.
    pub fn alloc_like(&self) -> Result<Self> {
        Self::with_stride(self.width, self.height, self.stride_bytes())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride_bytes(&self) -> usize {
        self.stride * 4
    }

    /// Row stride in pixel units.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.stride + x]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut u32 {
        debug_assert!(x < self.width && y < self.height);
        &mut self.pixels[y * self.stride + x]
    }

    /// Scanline `y`, `width` pixels long (padding excluded).
    #[inline]
    pub fn row(&self, y: usize) -> &[u32] {
        let start = y * self.stride;
        &self.pixels[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u32] {
        let start = y * self.stride;
        &mut self.pixels[start..start + self.width]
    }

    /// Whole storage including row padding.
    #[inline]
    pub fn raw(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn raw_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Byte view of the storage, `stride_bytes * height` long.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn fill(&mut self, color: u32) {
        for y in 0..self.height {
            self.row_mut(y).fill(color);
        }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride_bytes", &self.stride_bytes())
            .finish()
    }
}

fn alloc_pixels(stride: usize, height: usize, width: usize) -> Result<Vec<u32>> {
    let len = stride
        .checked_mul(height)
        .ok_or(Error::Allocation { width, height })?;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation { width, height })?;
    pixels.resize(len, 0);
    Ok(pixels)
}

/// Split a pixel into its four 8-bit channels, high byte first.
#[inline]
pub fn unpack(p: u32) -> [u32; 4] {
    [(p >> 24) & 0xFF, (p >> 16) & 0xFF, (p >> 8) & 0xFF, p & 0xFF]
}

#[inline]
pub fn pack(c: [u32; 4]) -> u32 {
    (c[0] << 24) | (c[1] << 16) | (c[2] << 8) | c[3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_rows_do_not_overlap() {
        let mut buf = PixelBuffer::with_stride(3, 2, 32).unwrap();
        assert_eq!(buf.stride(), 8);
        assert_eq!(buf.raw().len(), 16);

        buf.row_mut(1).fill(0xFF00_00FF);
        assert_eq!(buf.row(0), &[0, 0, 0]);
        assert_eq!(buf.pixel(2, 1), 0xFF00_00FF);
        // padding untouched
        assert_eq!(buf.raw()[8 + 3], 0);
        assert_eq!(buf.as_bytes().len(), 2 * 32);
    }

    #[test]
    fn rejects_bad_layouts() {
        assert!(matches!(PixelBuffer::new(0, 4), Err(Error::InvalidLayout(_))));
        assert!(matches!(PixelBuffer::with_stride(4, 4, 8), Err(Error::InvalidLayout(_))));
        assert!(matches!(PixelBuffer::with_stride(4, 4, 18), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn huge_buffer_reports_allocation_error() {
        let err = PixelBuffer::new(usize::MAX / 8, usize::MAX / 8).unwrap_err();
        assert!(matches!(err, Error::Allocation { .. }));
    }

    #[test]
    fn channel_pack_round_trip() {
        let p = 0x80_40_20_10;
        assert_eq!(unpack(p), [0x80, 0x40, 0x20, 0x10]);
        assert_eq!(pack(unpack(p)), p);
    }
}
