//! Synthetic glyphs
//!
//! Digits drawn from a 5x7 cell font, rendered at any height by
//! nearest-cell lookup. Every generator is deterministic, so test
//! expectations never depend on a random seed.

use crate::{TestError, TestResult};
use glyphrec_core::{Box, Pix, PixMut, PixelDepth, Pixa};
use glyphrec_morph::dilate_brick;

/// Characters with a synthetic pattern
pub const DIGITS: &str = "0123456789";

const CELL_W: u32 = 5;
const CELL_H: u32 = 7;

fn pattern(ch: char) -> Option<[&'static str; 7]> {
    let rows = match ch {
        '0' => [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        '1' => ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
        '2' => [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
        '3' => ["####.", "....#", "....#", ".###.", "....#", "....#", "####."],
        '4' => ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
        '5' => ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
        '6' => ["..##.", ".#...", "#....", "####.", "#...#", "#...#", ".###."],
        '7' => ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
        '8' => [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
        '9' => [".###.", "#...#", "#...#", ".####", "....#", "...#.", ".##.."],
        _ => return None,
    };
    Some(rows)
}

/// Render a digit `height` pixels tall, clipped to its foreground.
///
/// The returned image carries the character as its text label.
///
/// # Errors
///
/// Returns [`TestError::UnknownGlyph`] for characters outside [`DIGITS`]
/// and [`TestError::InvalidParameters`] for heights below 7.
pub fn glyph(ch: char, height: u32) -> TestResult<Pix> {
    let rows = pattern(ch).ok_or(TestError::UnknownGlyph(ch))?;
    if height < CELL_H {
        return Err(TestError::InvalidParameters(format!(
            "glyph height {} below {}",
            height, CELL_H
        )));
    }
    let width = ((height * CELL_W) as f32 / CELL_H as f32).round() as u32;
    let mut pm = PixMut::new(width, height, PixelDepth::Bit1)?;
    for y in 0..height {
        let row = rows[(y * CELL_H / height) as usize].as_bytes();
        for x in 0..width {
            if row[(x * CELL_W / width) as usize] == b'#' {
                pm.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    let pix: Pix = pm.into();
    let (clipped, _) = pix
        .clip_to_foreground()?
        .ok_or_else(|| TestError::InvalidParameters(format!("empty glyph {:?}", ch)))?;
    Ok(clipped.with_text(ch.to_string()))
}

/// A deterministic variation of a digit.
///
/// Variants cycle through: plain, two pixels taller, bold (one extra
/// column of stroke), two pixels shorter.
pub fn glyph_variant(ch: char, height: u32, variant: usize) -> TestResult<Pix> {
    match variant % 4 {
        0 => glyph(ch, height),
        1 => glyph(ch, height + 2),
        2 => {
            let bold = dilate_brick(&glyph(ch, height)?, 2, 1)?;
            Ok(bold.with_text(ch.to_string()))
        }
        _ => glyph(ch, height.saturating_sub(2).max(CELL_H)),
    }
}

/// A labeled training set: `per_class` variants of every character.
pub fn labeled_set(chars: &str, per_class: usize, height: u32) -> TestResult<Pixa> {
    let mut pixa = Pixa::new();
    for ch in chars.chars() {
        for v in 0..per_class {
            pixa.push(glyph_variant(ch, height, v)?);
        }
    }
    Ok(pixa)
}

/// Lay out plain glyphs left to right on a strip of height `height`.
///
/// Glyphs are separated by `gap` background columns; a space advances by
/// half the height. Returns the strip and the box of every glyph.
pub fn line_strip(text: &str, height: u32, gap: u32) -> TestResult<(Pix, Vec<Box>)> {
    let mut placed = Vec::new();
    let mut x = 0u32;
    for ch in text.chars() {
        if ch == ' ' {
            x += height / 2;
            continue;
        }
        if !placed.is_empty() {
            x += gap;
        }
        let g = glyph(ch, height)?;
        let top = height.saturating_sub(g.height());
        placed.push((g.clone(), Box::new_unchecked(x as i32, top as i32, g.width() as i32, g.height() as i32)));
        x += g.width();
    }
    if placed.is_empty() {
        return Err(TestError::InvalidParameters("strip has no glyphs".into()));
    }
    let mut strip = PixMut::new(x, height, PixelDepth::Bit1)?;
    for (g, b) in &placed {
        strip.or_at(g, b.x, b.y)?;
    }
    strip.set_text(Some(text.to_string()));
    Ok((strip.into(), placed.into_iter().map(|(_, b)| b).collect()))
}

/// Place `pix` on a larger canvas with `margin` background pixels on each
/// side and a single isolated noise pixel in the top-left corner.
pub fn with_speck(pix: &Pix, margin: u32) -> TestResult<Pix> {
    if margin < 2 {
        return Err(TestError::InvalidParameters(
            "margin must be at least 2 to isolate the speck".into(),
        ));
    }
    let mut canvas = PixMut::new(pix.width() + 2 * margin, pix.height() + 2 * margin, PixelDepth::Bit1)?;
    canvas.or_at(pix, margin as i32, margin as i32)?;
    canvas.set_pixel(0, 0, 1)?;
    canvas.set_text(pix.text().map(str::to_owned));
    Ok(canvas.into())
}

/// Render a binary image as 8 bpp: ink black (0) on white (255).
pub fn to_gray(pix: &Pix) -> TestResult<Pix> {
    Ok(pix.convert_1_to_8(255, 0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_is_clipped_and_labeled() {
        let g = glyph('0', 40).unwrap();
        assert_eq!(g.height(), 40);
        assert_eq!(g.width(), 29);
        assert_eq!(g.text(), Some("0"));
        assert!(g.foreground_bounds().unwrap().is_some());
    }

    #[test]
    fn test_all_digits_span_full_height() {
        for ch in DIGITS.chars() {
            let g = glyph(ch, 35).unwrap();
            assert_eq!(g.height(), 35, "digit {}", ch);
        }
    }

    #[test]
    fn test_unknown_glyph() {
        assert!(matches!(glyph('x', 40), Err(TestError::UnknownGlyph('x'))));
        assert!(glyph('1', 3).is_err());
    }

    #[test]
    fn test_glyph_deterministic() {
        assert!(glyph('7', 30).unwrap().equals(&glyph('7', 30).unwrap()));
    }

    #[test]
    fn test_line_strip_boxes() {
        let (strip, boxes) = line_strip("01", 40, 4).unwrap();
        assert_eq!(strip.height(), 40);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].x, 0);
        assert_eq!(boxes[1].x, boxes[0].right() + 4);
        assert_eq!(strip.width() as i32, boxes[1].right());
    }

    #[test]
    fn test_with_speck() {
        let g = glyph('1', 20).unwrap();
        let noisy = with_speck(&g, 3).unwrap();
        assert_eq!(
            noisy.count_pixels().unwrap(),
            g.count_pixels().unwrap() + 1
        );
        assert_eq!(noisy.text(), Some("1"));
    }
}
