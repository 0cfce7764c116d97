//! Binary morphological operations
//!
//! Brick dilation and erosion are separable: a horizontal pass of width
//! `width` followed by a vertical pass of height `height`. Each 1-D pass
//! slides a window over a running count of ON pixels, so its cost does not
//! depend on the element size.
//!
//! The element origin is at `size / 2` along each axis.

use crate::{MorphError, MorphResult};
use glyphrec_core::{Pix, PixMut, PixelDepth};

pub(crate) fn check_binary(pix: &Pix) -> MorphResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(MorphError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

fn check_size(width: u32, height: u32) -> MorphResult<()> {
    if width == 0 || height == 0 {
        return Err(MorphError::InvalidParameters(format!(
            "brick size must be positive: {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// One 1-D brick pass over a line of `len` pixels read through `get`.
///
/// `prefix` is scratch space of length `len + 1`; `put` receives each ON
/// output position.
fn pass_1d(
    len: usize,
    size: usize,
    erode: bool,
    prefix: &mut [u32],
    get: impl Fn(usize) -> bool,
    mut put: impl FnMut(usize),
) {
    prefix[0] = 0;
    for i in 0..len {
        prefix[i + 1] = prefix[i] + u32::from(get(i));
    }
    let c = size / 2;
    for x in 0..len {
        if erode {
            // Window [x - c, x - c + size) must lie inside and be all ON.
            if x < c || x - c + size > len {
                continue;
            }
            let lo = x - c;
            if (prefix[lo + size] - prefix[lo]) as usize == size {
                put(x);
            }
        } else {
            let lo = x.saturating_sub(size - 1 - c);
            let hi = (x + c + 1).min(len);
            if prefix[hi] > prefix[lo] {
                put(x);
            }
        }
    }
}

fn brick_horizontal(pix: &Pix, size: u32, erode: bool) -> MorphResult<Pix> {
    if size == 1 {
        return Ok(pix.clone());
    }
    let (w, h) = (pix.width() as usize, pix.height());
    let mut out = PixMut::new(pix.width(), h, PixelDepth::Bit1)?;
    let mut prefix = vec![0u32; w + 1];
    for y in 0..h {
        pass_1d(
            w,
            size as usize,
            erode,
            &mut prefix,
            |x| pix.get_pixel_unchecked(x as u32, y) != 0,
            |x| out.set_pixel_unchecked(x as u32, y, 1),
        );
    }
    Ok(out.into())
}

fn brick_vertical(pix: &Pix, size: u32, erode: bool) -> MorphResult<Pix> {
    if size == 1 {
        return Ok(pix.clone());
    }
    let (w, h) = (pix.width(), pix.height() as usize);
    let mut out = PixMut::new(w, pix.height(), PixelDepth::Bit1)?;
    let mut prefix = vec![0u32; h + 1];
    for x in 0..w {
        pass_1d(
            h,
            size as usize,
            erode,
            &mut prefix,
            |y| pix.get_pixel_unchecked(x, y as u32) != 0,
            |y| out.set_pixel_unchecked(x, y as u32, 1),
        );
    }
    Ok(out.into())
}

/// Dilate with a brick (rectangular) structuring element
///
/// # Arguments
///
/// * `pix` - 1 bpp image
/// * `width`, `height` - brick size, both >= 1
///
/// # Errors
///
/// Returns [`MorphError::UnsupportedDepth`] for non-binary input and
/// [`MorphError::InvalidParameters`] for a zero-sized brick.
pub fn dilate_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    check_binary(pix)?;
    check_size(width, height)?;
    let tmp = brick_horizontal(pix, width, false)?;
    brick_vertical(&tmp, height, false)
}

/// Erode with a brick (rectangular) structuring element
///
/// Pixels whose element extends past the image edge are removed.
pub fn erode_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    check_binary(pix)?;
    check_size(width, height)?;
    let tmp = brick_horizontal(pix, width, true)?;
    brick_vertical(&tmp, height, true)
}
