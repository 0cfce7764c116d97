//! Scaling regression test
//!
//! Scales synthetic glyphs to template sizes.

use glyphrec_test::RegParams;
use glyphrec_test::synth::{DIGITS, glyph};
use glyphrec_transform::{scale_to_size, target_size};

#[test]
fn scale_reg() {
    let mut rp = RegParams::new("scale");

    // --- Test 1: fixed height, aspect preserved ---
    for ch in DIGITS.chars() {
        let g = glyph(ch, 30).expect("glyph");
        let s = scale_to_size(&g, 0, 40).expect("scale");
        let expected_w = (g.width() as f64 * 40.0 / g.height() as f64).round();
        rp.compare_values(40.0, s.height() as f64, 0.0);
        rp.compare_values(expected_w, s.width() as f64, 0.0);
        rp.compare_values(1.0, if s.count_pixels().expect("count") > 0 { 1.0 } else { 0.0 }, 0.0);
        rp.compare_strings(g.text().unwrap_or_default().as_bytes(), s.text().unwrap_or_default().as_bytes());
    }

    // --- Test 2: identity and exact doubling ---
    let g = glyph('6', 40).expect("glyph");
    rp.compare_pix(&g, &scale_to_size(&g, g.width(), g.height()).expect("identity"));
    let up = scale_to_size(&g, 2 * g.width(), 2 * g.height()).expect("up");
    rp.compare_values(
        4.0 * g.count_pixels().expect("count") as f64,
        up.count_pixels().expect("count") as f64,
        0.0,
    );
    let down = scale_to_size(&up, g.width(), g.height()).expect("down");
    rp.compare_pix(&g, &down);

    // --- Test 3: size resolution ---
    rp.compare_values(1.0, if target_size(10, 10, 0, 0).is_err() { 1.0 } else { 0.0 }, 0.0);
    let (w, h) = target_size(29, 40, 20, 0).expect("size");
    eprintln!("  29x40 -> {}x{}", w, h);
    rp.compare_values(28.0, h as f64, 0.0);

    assert!(rp.cleanup(), "scale regression test failed");
}
