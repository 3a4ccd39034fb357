// Blur engine: the two algorithms used to frost a captured screen.
// Both are separable (horizontal sweep into a scratch buffer, vertical sweep
// back into the caller's buffer) and work on all four 8-bit channels.
//
// Out-of-range taps contribute nothing and the divisor never shrinks, so
// pixels near the border come out darker than their neighbourhood average.
// That darkening is part of the look and is kept bit-for-bit.

use crate::error::{Error, Result};
use crate::types::{pack, unpack, PixelBuffer};

/// Precomputed 17-tap Gaussian, symmetric around index 8.
pub const GAUSSIAN_KERNEL: [u8; 17] = [9, 15, 24, 34, 46, 59, 70, 77, 80, 77, 70, 59, 46, 34, 24, 15, 9];

/// Taps on each side of the centre tap.
pub const GAUSSIAN_HALF: usize = GAUSSIAN_KERNEL.len() / 2;

/// Fixed normalisation divisor: the sum of all kernel weights.
pub const GAUSSIAN_DIVISOR: u32 = kernel_sum(&GAUSSIAN_KERNEL);

const _: () = assert!(GAUSSIAN_DIVISOR == 0x2EC);

/// Box width of one box-blur sweep (radius 1).
pub const BOX_SIZE: u32 = 3;

/// Number of horizontal+vertical sweep pairs in `box_blur`.
pub const BOX_ITERATIONS: usize = 3;

const fn kernel_sum(kernel: &[u8]) -> u32 {
    let mut sum = 0;
    let mut i = 0;
    while i < kernel.len() {
        sum += kernel[i] as u32;
        i += 1;
    }
    sum
}

/// Never cancels; used by the plain entry points.
fn not_cancelled() -> bool {
    false
}

/// Separable 17-tap Gaussian. The result is written back into `buf`'s
/// storage, which is returned.
pub fn gaussian_blur(buf: PixelBuffer) -> Result<PixelBuffer> {
    gaussian_blur_cancellable(buf, &not_cancelled)
}

/// Same as [`gaussian_blur`], polling `cancelled` once per scanline.
pub fn gaussian_blur_cancellable(mut buf: PixelBuffer, cancelled: &dyn Fn() -> bool) -> Result<PixelBuffer> {
    let mut tmp = buf.alloc_like()?;
    let (w, h) = (buf.width(), buf.height());

    // Horizontally blur buf -> tmp
    for y in 0..h {
        if cancelled() {
            return Err(Error::Cancelled);
        }
        let src = buf.row(y);
        let dst = tmp.row_mut(y);
        for (x, out) in dst.iter_mut().enumerate() {
            let mut acc = [0u32; 4];
            for (k, &weight) in GAUSSIAN_KERNEL.iter().enumerate() {
                let Some(sx) = (x + k).checked_sub(GAUSSIAN_HALF) else { continue };
                if sx >= w {
                    continue;
                }
                accumulate(&mut acc, src[sx], weight as u32);
            }
            *out = normalize(acc, GAUSSIAN_DIVISOR);
        }
    }

    // Then vertically blur tmp -> buf
    let stride = tmp.stride();
    for y in 0..h {
        if cancelled() {
            return Err(Error::Cancelled);
        }
        let src = tmp.raw();
        let dst = buf.row_mut(y);
        for (x, out) in dst.iter_mut().enumerate() {
            let mut acc = [0u32; 4];
            for (k, &weight) in GAUSSIAN_KERNEL.iter().enumerate() {
                let Some(sy) = (y + k).checked_sub(GAUSSIAN_HALF) else { continue };
                if sy >= h {
                    continue;
                }
                accumulate(&mut acc, src[sy * stride + x], weight as u32);
            }
            *out = normalize(acc, GAUSSIAN_DIVISOR);
        }
    }

    Ok(buf)
}

/// Three rounds of a radius-1 box blur built on running sums.
pub fn box_blur(buf: PixelBuffer) -> Result<PixelBuffer> {
    box_blur_cancellable(buf, &not_cancelled)
}

pub fn box_blur_cancellable(buf: PixelBuffer, cancelled: &dyn Fn() -> bool) -> Result<PixelBuffer> {
    box_blur_rounds(buf, BOX_ITERATIONS, cancelled)
}

pub(crate) fn box_blur_rounds(
    mut buf: PixelBuffer,
    rounds: usize,
    cancelled: &dyn Fn() -> bool,
) -> Result<PixelBuffer> {
    let mut tmp = buf.alloc_like()?;
    for _ in 0..rounds {
        box_sweep_rows(&buf, &mut tmp, cancelled)?;
        box_sweep_columns(&tmp, &mut buf, cancelled)?;
    }
    Ok(buf)
}

/// Horizontal sweep: slide a 3-wide window along every row of `src`.
fn box_sweep_rows(src: &PixelBuffer, dst: &mut PixelBuffer, cancelled: &dyn Fn() -> bool) -> Result<()> {
    let w = src.width();
    for y in 0..src.height() {
        if cancelled() {
            return Err(Error::Cancelled);
        }
        let row = src.row(y);
        let out = dst.row_mut(y);

        // Window [-1, 0, 1] at x = 0; the missing left neighbour counts as zero.
        let mut sum = [0u32; 4];
        accumulate(&mut sum, row[0], 1);
        if w > 1 {
            accumulate(&mut sum, row[1], 1);
        }

        for x in 0..w {
            out[x] = normalize(sum, BOX_SIZE);
            // Slide: drop x-1, take x+2
            if x >= 1 {
                retire(&mut sum, row[x - 1]);
            }
            if x + 2 < w {
                accumulate(&mut sum, row[x + 2], 1);
            }
        }
    }
    Ok(())
}

/// Vertical sweep: the same window walked down every column, stepping by the
/// row stride in pixel units.
fn box_sweep_columns(src: &PixelBuffer, dst: &mut PixelBuffer, cancelled: &dyn Fn() -> bool) -> Result<()> {
    let (w, h) = (src.width(), src.height());
    let stride = src.stride();
    let pixels = src.raw();

    // One running sum per column lets us walk rows in order.
    let mut sums = vec![[0u32; 4]; w];
    for (x, sum) in sums.iter_mut().enumerate() {
        accumulate(sum, pixels[x], 1);
        if h > 1 {
            accumulate(sum, pixels[stride + x], 1);
        }
    }

    for y in 0..h {
        if cancelled() {
            return Err(Error::Cancelled);
        }
        let out = dst.row_mut(y);
        for (x, sum) in sums.iter_mut().enumerate() {
            out[x] = normalize(*sum, BOX_SIZE);
            if y >= 1 {
                retire(sum, pixels[(y - 1) * stride + x]);
            }
            if y + 2 < h {
                accumulate(sum, pixels[(y + 2) * stride + x], 1);
            }
        }
    }
    Ok(())
}

#[inline]
fn accumulate(acc: &mut [u32; 4], p: u32, weight: u32) {
    let c = unpack(p);
    for i in 0..4 {
        acc[i] += c[i] * weight;
    }
}

#[inline]
fn retire(acc: &mut [u32; 4], p: u32) {
    let c = unpack(p);
    for i in 0..4 {
        acc[i] -= c[i];
    }
}

#[inline]
fn normalize(acc: [u32; 4], divisor: u32) -> u32 {
    pack(acc.map(|c| c / divisor))
}
