//! Connected component regression test
//!
//! Splits strips of synthetic digits into their glyphs.

use glyphrec_core::PixMut;
use glyphrec_region::{
    ConnectivityType, extract_components, find_connected_components, label_components,
    remove_small_components,
};
use glyphrec_test::RegParams;
use glyphrec_test::synth::line_strip;

#[test]
fn conncomp_reg() {
    let mut rp = RegParams::new("conncomp");

    // --- Test 1: one component per separated glyph ---
    let (strip, boxes) = line_strip("20357", 40, 5).expect("strip");
    let comps = extract_components(&strip, ConnectivityType::EightWay).expect("extract");
    eprintln!("Strip {}x{}: {} components", strip.width(), strip.height(), comps.len());
    rp.compare_values(boxes.len() as f64, comps.len() as f64, 0.0);
    let mut found: Vec<_> = comps.boxes().to_vec();
    found.sort_by_key(|b| b.x);
    for (expected, got) in boxes.iter().zip(&found) {
        rp.compare_values(expected.x as f64, got.x as f64, 0.0);
        rp.compare_values(expected.w as f64, got.w as f64, 0.0);
        rp.compare_values(expected.h as f64, got.h as f64, 0.0);
    }
    let total: u32 = comps.iter().map(|p| p.count_pixels().expect("count")).sum();
    rp.compare_values(strip.count_pixels().expect("count") as f64, total as f64, 0.0);

    // --- Test 2: touching glyphs merge ---
    let (pair, _) = line_strip("01", 40, 0).expect("strip");
    let n = find_connected_components(&pair, ConnectivityType::EightWay).expect("find").len();
    rp.compare_values(1.0, n as f64, 0.0);

    // --- Test 3: four- vs eight-connectivity ---
    let mut pm = PixMut::new(4, 4, glyphrec_core::PixelDepth::Bit1).expect("pix");
    pm.set_pixel(0, 0, 1).expect("set");
    pm.set_pixel(1, 1, 1).expect("set");
    let diag: glyphrec_core::Pix = pm.into();
    let four = label_components(&diag, ConnectivityType::FourWay).expect("label");
    let eight = label_components(&diag, ConnectivityType::EightWay).expect("label");
    rp.compare_values(2.0, four.components().len() as f64, 0.0);
    rp.compare_values(1.0, eight.components().len() as f64, 0.0);

    // --- Test 4: noise removal ---
    let mut noisy = strip.to_mut();
    // A lone pixel in the gap after the first glyph
    noisy.set_pixel(boxes[0].right() as u32 + 2, 20, 1).expect("set");
    let noisy: glyphrec_core::Pix = noisy.into();
    rp.compare_values(
        (strip.count_pixels().expect("count") + 1) as f64,
        noisy.count_pixels().expect("count") as f64,
        0.0,
    );
    let cleaned = remove_small_components(&noisy, 2, ConnectivityType::EightWay).expect("remove");
    rp.compare_pix(&strip, &cleaned);

    assert!(rp.cleanup(), "conncomp regression test failed");
}
