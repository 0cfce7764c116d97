//! Hit-miss elements for connectivity-preserving thinning
//!
//! Every element is a 3x3 pattern centered on the pixel under test:
//!
//! - `x` must be foreground
//! - `o` must be background
//! - blank is ignored
//! - `C` is the center and counts as `x`
//!
//! An element matches pixels that can be removed without breaking the
//! connectivity of the foreground. Thinning applies a set of elements in
//! all four orthogonal rotations.

use crate::{MorphError, MorphResult};

// Sets after Bloomberg, "Connectivity-preserving morphological image
// transformations" (1991). These two give the smoothest skeletons.

const SEL_4_1: &str = "  x\noCx\n  x";
const SEL_4_2: &str = "  x\noCx\n o ";
const SEL_4_3: &str = " o \noCx\n  x";

const SEL_8_2: &str = " x \noCx\no  ";
const SEL_8_3: &str = "o  \noCx\n x ";
const SEL_8_5: &str = "o x\noCx\no  ";
const SEL_8_6: &str = "o  \noCx\no x";

/// Connectivity kept by thinning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 4-connected foreground stays 4-connected
    Four,
    /// 8-connected foreground stays 8-connected
    #[default]
    Eight,
}

/// A 3x3 hit-miss element with its origin at the center
///
/// Offsets are `(dx, dy)` from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinSel {
    hits: Vec<(i32, i32)>,
    misses: Vec<(i32, i32)>,
}

impl ThinSel {
    /// Parses a pattern of up to three rows of up to three characters.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidParameters`] if the pattern is larger
    /// than 3x3, has an unknown character, or its `C` is not at the center.
    pub fn from_pattern(pattern: &str) -> MorphResult<Self> {
        let rows: Vec<&str> = pattern.lines().collect();
        if rows.len() > 3 || rows.iter().any(|r| r.chars().count() > 3) {
            return Err(MorphError::InvalidParameters(format!(
                "thinning element larger than 3x3: {:?}",
                pattern
            )));
        }
        let mut hits = Vec::new();
        let mut misses = Vec::new();
        let mut centered = false;
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let offset = (col as i32 - 1, row as i32 - 1);
                match ch {
                    'C' | 'c' => {
                        if offset != (0, 0) {
                            return Err(MorphError::InvalidParameters(format!(
                                "thinning element origin off center: {:?}",
                                pattern
                            )));
                        }
                        centered = true;
                        hits.push(offset);
                    }
                    'x' | 'X' => hits.push(offset),
                    'o' | 'O' => misses.push(offset),
                    ' ' => {}
                    other => {
                        return Err(MorphError::InvalidParameters(format!(
                            "unknown thinning element character {:?}",
                            other
                        )));
                    }
                }
            }
        }
        if !centered {
            return Err(MorphError::InvalidParameters(format!(
                "thinning element has no origin: {:?}",
                pattern
            )));
        }
        Ok(Self { hits, misses })
    }

    /// Offsets that must be foreground, origin included
    pub fn hits(&self) -> &[(i32, i32)] {
        &self.hits
    }

    /// Offsets that must be background
    pub fn misses(&self) -> &[(i32, i32)] {
        &self.misses
    }

    /// Rotated clockwise by `quads` quarter turns
    pub fn rotate_orth(&self, quads: u32) -> Self {
        let turn = |&(dx, dy): &(i32, i32)| -> (i32, i32) {
            let mut p = (dx, dy);
            for _ in 0..quads % 4 {
                p = (-p.1, p.0);
            }
            p
        };
        Self {
            hits: self.hits.iter().map(turn).collect(),
            misses: self.misses.iter().map(turn).collect(),
        }
    }

    /// Whether the element matches at `(x, y)`.
    ///
    /// `fg` and `bg` answer for in-range neighbors; the caller keeps every
    /// tested position inside the image.
    pub(crate) fn matches(
        &self,
        x: i32,
        y: i32,
        fg: impl Fn(i32, i32) -> bool,
        bg: impl Fn(i32, i32) -> bool,
    ) -> bool {
        self.hits.iter().all(|&(dx, dy)| fg(x + dx, y + dy))
            && self.misses.iter().all(|&(dx, dy)| bg(x + dx, y + dy))
    }
}

/// The thinning set for `connectivity`, unrotated
pub fn thin_sels(connectivity: Connectivity) -> MorphResult<Vec<ThinSel>> {
    let patterns: &[&str] = match connectivity {
        Connectivity::Four => &[SEL_4_1, SEL_4_2, SEL_4_3],
        Connectivity::Eight => &[SEL_8_2, SEL_8_3, SEL_8_5, SEL_8_6],
    };
    patterns.iter().map(|p| ThinSel::from_pattern(p)).collect()
}
