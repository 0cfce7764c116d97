//! Image scaling operations
//!
//! Nearest-neighbor sampling only. Binary glyphs stay binary, so there is
//! no interpolation or area mapping to gray.
//!
//! Each destination pixel `(x, y)` takes the source pixel containing the
//! center of its footprint: `sx = floor((x + 0.5) * ws / wd)`.

use crate::{TransformError, TransformResult};
use glyphrec_core::{Pix, PixMut};

/// Resolve a requested size where either axis may be 0.
///
/// An axis given as 0 is derived from the other to preserve the aspect
/// ratio of a `ws x hs` source, rounded and never below 1.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if both axes are 0.
pub fn target_size(ws: u32, hs: u32, width: u32, height: u32) -> TransformResult<(u32, u32)> {
    match (width, height) {
        (0, 0) => Err(TransformError::InvalidParameters(
            "target width and height cannot both be 0".into(),
        )),
        (0, h) => {
            let w = (ws as f64 * h as f64 / hs as f64).round() as u32;
            Ok((w.max(1), h))
        }
        (w, 0) => {
            let h = (hs as f64 * w as f64 / ws as f64).round() as u32;
            Ok((w, h.max(1)))
        }
        (w, h) => Ok((w, h)),
    }
}

fn sample_to(pix: &Pix, wd: u32, hd: u32) -> TransformResult<Pix> {
    let (ws, hs) = (pix.width(), pix.height());
    if wd == ws && hd == hs {
        return Ok(pix.clone());
    }
    let mut out = PixMut::new(wd, hd, pix.depth())?;
    out.set_text(pix.text().map(str::to_owned));
    let xmap: Vec<u32> = (0..wd)
        .map(|x| ((((x as f64 + 0.5) * ws as f64) / wd as f64) as u32).min(ws - 1))
        .collect();
    for y in 0..hd {
        let sy = ((((y as f64 + 0.5) * hs as f64) / hd as f64) as u32).min(hs - 1);
        for (x, &sx) in xmap.iter().enumerate() {
            let v = pix.get_pixel_unchecked(sx, sy);
            if v != 0 {
                out.set_pixel_unchecked(x as u32, y, v);
            }
        }
    }
    Ok(out.into())
}

/// Scale an image to a specific size
///
/// # Arguments
///
/// * `pix` - Input image (1 or 8 bpp)
/// * `width` - Target width (0 to maintain aspect ratio)
/// * `height` - Target height (0 to maintain aspect ratio)
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if both are 0.
pub fn scale_to_size(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    let (wd, hd) = target_size(pix.width(), pix.height(), width, height)?;
    sample_to(pix, wd, hd)
}
