//! Connectivity-preserving thinning
//!
//! Each iteration runs four passes, one per orthogonal rotation of the
//! element set. A pass removes, in parallel, every foreground pixel matched
//! by any element of that rotation. Iteration stops when a full round
//! removes nothing, which leaves a skeleton one pixel wide that keeps the
//! connectivity and the holes of the input.
//!
//! Thinning followed by a brick dilation gives every stroke the same width
//! whatever its width in the input (see [`set_stroke_width`]).

use glyphrec_core::{Pix, PixMut, PixelDepth};

use crate::binary::{check_binary, dilate_brick};
use crate::thin_sels::{Connectivity, ThinSel, thin_sels};
use crate::{MorphError, MorphResult};

/// Union of the hit-miss matches of `sels` over `pix`.
///
/// `pix` must have a background border of at least one pixel.
fn hit_miss_union(pix: &Pix, sels: &[ThinSel]) -> MorphResult<Pix> {
    let background = pix.invert()?;
    let (w, h) = (pix.width(), pix.height());
    let mut out = PixMut::new(w, h, PixelDepth::Bit1)?;
    let fg = |x: i32, y: i32| pix.get_pixel_unchecked(x as u32, y as u32) != 0;
    let bg = |x: i32, y: i32| background.get_pixel_unchecked(x as u32, y as u32) != 0;
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            if pix.get_pixel_unchecked(x, y) == 0 {
                continue;
            }
            if sels.iter().any(|s| s.matches(x as i32, y as i32, fg, bg)) {
                out.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    Ok(out.into())
}

/// Thin with an explicit element set
///
/// `max_iters` bounds the number of rounds; 0 runs to convergence.
///
/// # Errors
///
/// Returns [`MorphError::UnsupportedDepth`] for non-binary input and
/// [`MorphError::InvalidParameters`] for an empty element set.
pub fn thin_connected_by_set(pix: &Pix, sels: &[ThinSel], max_iters: u32) -> MorphResult<Pix> {
    check_binary(pix)?;
    if sels.is_empty() {
        return Err(MorphError::InvalidParameters(
            "thinning needs at least one element".into(),
        ));
    }
    let rotations: Vec<Vec<ThinSel>> = (0..4)
        .map(|quads| sels.iter().map(|s| s.rotate_orth(quads)).collect())
        .collect();

    let mut cur = pix.add_border(1)?;
    let mut rounds = 0;
    loop {
        let before = cur.clone();
        for set in &rotations {
            let removable = hit_miss_union(&cur, set)?;
            cur = cur.subtract(&removable)?;
        }
        rounds += 1;
        if cur.equals(&before) || (max_iters > 0 && rounds >= max_iters) {
            break;
        }
    }
    Ok(cur.remove_border(1)?)
}

/// Thin the foreground to a skeleton
///
/// # Arguments
///
/// * `pix` - 1 bpp image
/// * `connectivity` - connectivity the skeleton keeps
/// * `max_iters` - bound on the rounds, 0 to run to convergence
pub fn thin_connected(pix: &Pix, connectivity: Connectivity, max_iters: u32) -> MorphResult<Pix> {
    thin_connected_by_set(pix, &thin_sels(connectivity)?, max_iters)
}

/// Redraw every stroke with a width of `width` pixels
///
/// The image is thinned to an 8-connected skeleton, which is then dilated
/// with a `width x width` brick. A width of 1 returns the skeleton.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] for a width of 0.
pub fn set_stroke_width(pix: &Pix, width: u32) -> MorphResult<Pix> {
    if width == 0 {
        return Err(MorphError::InvalidParameters(
            "stroke width must be positive".into(),
        ));
    }
    let skeleton = thin_connected(pix, Connectivity::Eight, 0)?;
    if width == 1 {
        return Ok(skeleton);
    }
    dilate_brick(&skeleton, width, width)
}
