//! Line decoding regression test
//!
//! Decodes strips of synthetic digits laid out on one baseline.

use glyphrec_core::{Pix, PixelDepth};
use glyphrec_recog::recog::OverlayCollector;
use glyphrec_recog::{Decoding, Recog, RecogConfig, RecogError};
use glyphrec_test::RegParams;
use glyphrec_test::synth::{labeled_set, line_strip};

fn flag(ok: bool) -> f64 {
    if ok { 1.0 } else { 0.0 }
}

fn show(name: &str, d: &Decoding) {
    eprintln!(
        "  {}: initial {:?} rescored {:?} xlocs {:?} widths {:?} total {:.2}",
        name, d.initial.texts, d.rescored.texts, d.rescored.xlocs, d.rescored.widths, d.total
    );
}

fn boundaries_frozen(d: &Decoding) -> bool {
    d.initial.xlocs == d.rescored.xlocs && d.initial.widths == d.rescored.widths
}

#[test]
fn decode_reg() {
    let mut rp = RegParams::new("decode");
    let training = labeled_set("0123", 5, 40).expect("labeled set");
    let recog = Recog::from_pixa(&training, RecogConfig::default()).expect("recog");

    // --- Test 1: "01" ---
    eprintln!("=== Two digits ===");
    let (strip, boxes) = line_strip("01", 40, 4).expect("strip");
    let d = recog.decode_detailed(&strip).expect("decode");
    show("01", &d);
    rp.compare_values(2.0, d.rescored.len() as f64, 0.0);
    rp.compare_strings(b"01", d.rescored.to_string().as_bytes());
    rp.compare_values(1.0, flag(d.rescored.mean_score() > 0.8), 0.0);
    rp.compare_values(1.0, flag(boundaries_frozen(&d)), 0.0);
    for (b, &x) in boxes.iter().zip(&d.rescored.xlocs) {
        rp.compare_values(b.x as f64, x as f64, 2.0);
    }

    // --- Test 2: determinism ---
    let again = recog.decode_detailed(&strip).expect("decode");
    rp.compare_values(1.0, flag(again == d), 0.0);

    // --- Test 3: longer strip, boundaries never move ---
    eprintln!("=== Four digits ===");
    let (strip4, _) = line_strip("3201", 40, 3).expect("strip");
    let d4 = recog.decode_detailed(&strip4).expect("decode");
    show("3201", &d4);
    rp.compare_values(1.0, flag(boundaries_frozen(&d4)), 0.0);
    rp.compare_values(1.0, flag(!d4.rescored.is_empty()), 0.0);

    // --- Test 4: empty strip ---
    eprintln!("=== Empty strip ===");
    let blank = Pix::new(60, 40, PixelDepth::Bit1).expect("blank");
    let de = recog.decode_detailed(&blank).expect("decode blank");
    rp.compare_values(0.0, de.rescored.len() as f64, 0.0);
    rp.compare_values(0.0, de.initial.len() as f64, 0.0);

    // --- Test 5: strip height ---
    eprintln!("=== Strip scaling ===");
    let (tall, _) = line_strip("01", 60, 6).expect("strip");
    let dt = recog.decode_detailed(&tall).expect("decode tall");
    show("01 @60", &dt);
    rp.compare_strings(b"01", dt.rescored.to_string().as_bytes());
    rp.compare_values(1.5, recog.strip_scale_factor(60) as f64, 1e-6);

    let strict = Recog::from_pixa(
        &training,
        RecogConfig::default().with_strip_scaling(false),
    )
    .expect("recog");
    let r = strict.decode(&tall);
    rp.compare_values(1.0, flag(matches!(r, Err(RecogError::InvalidGeometry(_)))), 0.0);

    // --- Test 6: sink does not change results ---
    eprintln!("=== Sink ===");
    let mut sink = OverlayCollector::new();
    let with_sink = recog
        .decode_detailed_with_sink(&strip, Some(&mut sink))
        .expect("decode with sink");
    rp.compare_values(1.0, flag(with_sink == d), 0.0);
    rp.compare_values(1.0, sink.overlays().len() as f64, 0.0);
    let overlay = &sink.overlays()[0];
    rp.compare_strings(b"01", overlay.text().unwrap_or_default().as_bytes());
    rp.compare_values(strip.width() as f64, overlay.width() as f64, 0.0);

    // --- Test 7: training mode ---
    let mut unfinished = Recog::new(RecogConfig::default()).expect("recog");
    unfinished.train_labeled(&training[0], "0").expect("train");
    let r = unfinished.decode(&strip);
    rp.compare_values(1.0, flag(matches!(r, Err(RecogError::NotFinalized))), 0.0);

    assert!(rp.cleanup(), "decode regression test failed");
}
