//! Correlation matcher regression test
//!
//! Scores synthetic digits against each other: self-match, bounds,
//! determinism, and the vertical shift search.

use glyphrec_core::{Pix, PixMut, PixelDepth};
use glyphrec_recog::recog::{Template, score, score_at};
use glyphrec_test::RegParams;
use glyphrec_test::synth::{DIGITS, glyph};

fn template(ch: char) -> Template {
    Template::new(glyph(ch, 40).expect("glyph")).expect("template")
}

/// `pix` placed `dy` rows below the top of a canvas `extra` rows taller
fn lowered(pix: &Pix, dy: u32, extra: u32) -> Pix {
    let mut pm = PixMut::new(pix.width(), pix.height() + extra, PixelDepth::Bit1).expect("canvas");
    pm.or_at(pix, 0, dy as i32).expect("or_at");
    pm.into()
}

#[test]
fn correlation_reg() {
    let mut rp = RegParams::new("correlation");
    let templates: Vec<Template> = DIGITS.chars().map(template).collect();

    // --- Test 1: self-score ---
    eprintln!("=== Self-score ===");
    for t in &templates {
        let m = score(t, t, 1).expect("score");
        rp.compare_values(1.0, m.score as f64, 1e-6);
        rp.compare_values(0.0, m.delx as f64, 0.0);
        rp.compare_values(0.0, m.dely as f64, 0.0);
    }

    // --- Test 2: bounds and determinism over all pairs ---
    eprintln!("=== Pairwise bounds ===");
    for (i, a) in templates.iter().enumerate() {
        for (j, b) in templates.iter().enumerate() {
            let m1 = score(a, b, 2).expect("score");
            let m2 = score(a, b, 2).expect("score");
            let in_bounds = (0.0..=1.0).contains(&m1.score);
            rp.compare_values(1.0, if in_bounds { 1.0 } else { 0.0 }, 0.0);
            rp.compare_values(m1.score as f64, m2.score as f64, 0.0);
            rp.compare_values(m1.dely as f64, m2.dely as f64, 0.0);
            if i != j && rp.display() {
                eprintln!("  {} vs {}: {:.3}", i, j, m1.score);
            }
        }
    }

    // --- Test 3: shift search recovers a vertical offset ---
    eprintln!("=== Shift search ===");
    let t = &templates[8];
    let query = lowered(&t.pix, 2, 4);
    let mut prev = -1.0f32;
    for max_y_shift in 0..=2 {
        let m = score_at(&query, t.area, t, 0, 0, max_y_shift).expect("score_at");
        eprintln!("  max_y_shift {}: score {:.3} at dely {}", max_y_shift, m.score, m.dely);
        rp.compare_values(1.0, if m.score >= prev { 1.0 } else { 0.0 }, 0.0);
        rp.compare_values(1.0, if m.dely.abs() <= max_y_shift { 1.0 } else { 0.0 }, 0.0);
        if max_y_shift < 2 {
            // The true offset lies outside the window and is never reported.
            rp.compare_values(1.0, if m.dely != 2 { 1.0 } else { 0.0 }, 0.0);
            rp.compare_values(1.0, if m.score < 1.0 { 1.0 } else { 0.0 }, 0.0);
        }
        prev = m.score;
    }
    rp.compare_values(1.0, prev as f64, 1e-6);
    let m = score_at(&query, t.area, t, 0, 0, 2).expect("score_at");
    rp.compare_values(2.0, m.dely as f64, 0.0);

    // --- Test 4: centroid registration makes scoring offset-free ---
    let shifted = Template::new(lowered(&t.pix, 3, 3)).expect("template");
    let m = score(&shifted, t, 0).expect("score");
    rp.compare_values(1.0, m.score as f64, 1e-6);
    rp.compare_values(3.0, m.dely as f64, 0.0);

    assert!(rp.cleanup(), "correlation regression test failed");
}
