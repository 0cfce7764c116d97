//! Bootstrap training regression test
//!
//! A boot recognizer built from every synthetic digit labels glyphs for a
//! recognizer that has almost no labeled data of its own.

use glyphrec_core::{Pix, Pixa};
use glyphrec_recog::recog::{
    BootSource, PixaBootSource, bootstrap_label, pad_samples, train_with_boot,
};
use glyphrec_recog::{Recog, RecogConfig};
use glyphrec_test::RegParams;
use glyphrec_test::synth::{DIGITS, glyph, glyph_variant, labeled_set};

fn unlabel(pix: &Pix) -> Pix {
    let mut pm = pix.to_mut();
    pm.set_text(None);
    pm.into()
}

#[test]
fn boot_reg() {
    let mut rp = RegParams::new("boot");
    let source = PixaBootSource::new(RecogConfig::default())
        .with_pixa(labeled_set(DIGITS, 4, 40).expect("labeled set"));
    let boot = source.boot_recog().expect("boot recog");
    rp.compare_values(10.0, boot.num_classes() as f64, 0.0);

    // --- Test 1: first-pass labeling ---
    eprintln!("=== Labeling ===");
    let truth = "0147";
    let mut unlabeled = Pixa::new();
    for ch in truth.chars() {
        unlabeled.push(unlabel(&glyph_variant(ch, 40, 1).expect("glyph")));
    }
    let labeled = bootstrap_label(&boot, &unlabeled, 0.6).expect("bootstrap");
    let texts: String = labeled.texts().into_iter().flatten().collect();
    eprintln!("  labeled {:?}", texts);
    rp.compare_strings(truth.as_bytes(), texts.as_bytes());

    // A high bar labels nothing that does not match perfectly
    let strict = bootstrap_label(&boot, &unlabeled, 1.01).expect("bootstrap");
    rp.compare_values(0.0, strict.len() as f64, 0.0);

    // --- Test 2: training with boot ---
    eprintln!("=== Train with boot ===");
    let mut few = Pixa::new();
    few.push(glyph('0', 40).expect("glyph"));
    let recog = train_with_boot(&few, &unlabeled, &source, RecogConfig::default(), 0.6)
        .expect("train_with_boot");
    eprintln!("  classes {:?}, counts {:?}", recog.classes().labels(), recog.sample_counts());
    rp.compare_values(4.0, recog.num_classes() as f64, 0.0);
    rp.compare_values(5.0, recog.num_samples() as f64, 0.0);
    let rch = recog.identify_pix(&glyph('7', 40).expect("glyph")).expect("identify");
    rp.compare_strings(b"7", rch.text.as_bytes());

    // Enough labeled samples: the boot source is not consulted
    let enough = labeled_set("01", 5, 40).expect("labeled set");
    let direct = train_with_boot(&enough, &unlabeled, &source, RecogConfig::default(), 0.6)
        .expect("train_with_boot");
    rp.compare_values(2.0, direct.num_classes() as f64, 0.0);

    // --- Test 3: padding sparse classes ---
    eprintln!("=== Padding ===");
    let mut sparse = Pixa::new();
    sparse.push(glyph('3', 30).expect("glyph"));
    sparse.push(glyph('5', 30).expect("glyph"));
    sparse.push(glyph('5', 30).expect("glyph"));
    let config = RecogConfig::default().with_padding(2, 4);
    let padded = pad_samples(&sparse, &boot, &config).expect("pad");
    let threes = padded.iter().filter(|p| p.text() == Some("3")).count();
    let fives = padded.iter().filter(|p| p.text() == Some("5")).count();
    rp.compare_values(4.0, threes as f64, 0.0);
    rp.compare_values(2.0, fives as f64, 0.0);
    for pix in padded.iter().skip(3) {
        rp.compare_values(30.0, pix.height() as f64, 0.0);
    }
    let padded_recog = Recog::from_pixa(&padded, RecogConfig::default()).expect("recog");
    rp.compare_values(4.0, padded_recog.sample_counts()[0] as f64, 0.0);

    assert!(rp.cleanup(), "boot regression test failed");
}
