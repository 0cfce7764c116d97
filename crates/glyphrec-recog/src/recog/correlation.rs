//! Correlation matching between a query bitmap and a template
//!
//! The score at one placement is
//!
//! ```text
//! score = overlap / sqrt(area_query * area_template)
//! ```
//!
//! where `overlap` counts foreground pixels shared by the query and the
//! translated template. Since `overlap <= min(a, b) <= sqrt(a * b)` the
//! score lies in `[0, 1]`, and a bitmap placed exactly over itself scores
//! 1.0. An empty query or template scores 0.
//!
//! Horizontal placement is fixed by the caller (centroid registration or
//! a decoder column). Vertical placement is searched over every shift in
//! `[-max_y_shift, max_y_shift]`, visiting shifts as `0, -1, 1, -2, 2` and
//! keeping a later shift only if it scores strictly higher. Ties therefore
//! go to the smallest `|shift|`, then to the most negative shift.

use glyphrec_core::Pix;

use crate::error::RecogResult;

use super::types::Template;

/// Best placement found by the correlation search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationMatch {
    /// Normalized correlation in `[0, 1]`
    pub score: f32,
    /// Horizontal offset of the template in query coordinates
    pub delx: i32,
    /// Vertical offset of the template in query coordinates, shift included
    pub dely: i32,
}

fn shift_order(max_y_shift: i32) -> impl Iterator<Item = i32> {
    std::iter::once(0).chain((1..=max_y_shift.max(0)).flat_map(|s| [-s, s]))
}

fn normalized(overlap: u32, area_query: u32, area_template: u32) -> f32 {
    if area_query == 0 || area_template == 0 {
        return 0.0;
    }
    let denom = (area_query as f64 * area_template as f64).sqrt();
    (overlap as f64 / denom).min(1.0) as f32
}

/// Score a template against a query with centroid registration.
///
/// The template is placed so that the two centroids coincide (rounded to
/// whole pixels), then shifted vertically by up to `max_y_shift`.
///
/// # Errors
///
/// Returns an error if either bitmap is not 1 bpp.
pub fn score(
    query: &Template,
    template: &Template,
    max_y_shift: i32,
) -> RecogResult<CorrelationMatch> {
    let delx = (query.centroid.0 - template.centroid.0).round() as i32;
    let dely = (query.centroid.1 - template.centroid.1).round() as i32;
    score_at(&query.pix, query.area, template, delx, dely, max_y_shift)
}

/// Score a template placed at `(delx, dely)` in `query`.
///
/// `query_area` is the foreground count the score is normalized by; the
/// line decoder passes the count of the columns the template covers
/// rather than of the whole strip.
pub fn score_at(
    query: &Pix,
    query_area: u32,
    template: &Template,
    delx: i32,
    dely: i32,
    max_y_shift: i32,
) -> RecogResult<CorrelationMatch> {
    let mut best = CorrelationMatch {
        score: 0.0,
        delx,
        dely,
    };
    let mut first = true;
    for shift in shift_order(max_y_shift) {
        let overlap = query.count_and_at(&template.pix, delx, dely + shift)?;
        let s = normalized(overlap, query_area, template.area);
        if first || s > best.score {
            best.score = s;
            best.dely = dely + shift;
            first = false;
        }
    }
    Ok(best)
}
