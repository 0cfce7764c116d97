//! Training regression test
//!
//! Lifecycle gating, averaging, sample cleaning, and outlier detection on
//! synthetic digits.

use glyphrec_core::Pixa;
use glyphrec_recog::recog::remove_outliers;
use glyphrec_recog::{CharsetType, Recog, RecogConfig, RecogError};
use glyphrec_test::RegParams;
use glyphrec_test::synth::{glyph, labeled_set, to_gray, with_speck};

fn flag(ok: bool) -> f64 {
    if ok { 1.0 } else { 0.0 }
}

#[test]
fn training_reg() {
    let mut rp = RegParams::new("training");
    let set = labeled_set("0123", 4, 40).expect("labeled set");

    // --- Test 1: training a store ---
    eprintln!("=== Training ===");
    let mut recog = Recog::new(RecogConfig::default()).expect("recog");
    for pix in &set {
        let label = pix.text().expect("label").to_string();
        recog.train_labeled(pix, &label).expect("train");
    }
    rp.compare_values(4.0, recog.num_classes() as f64, 0.0);
    rp.compare_values(16.0, recog.num_samples() as f64, 0.0);
    rp.compare_values(1.0, flag(!recog.averages_current()), 0.0);

    // --- Test 2: averaging is idempotent ---
    eprintln!("=== Averages ===");
    recog.build_averages().expect("build averages");
    let first: Vec<_> = recog.averages().expect("averages").to_vec();
    recog.build_averages().expect("build averages again");
    for (a, b) in first.iter().zip(recog.averages().expect("averages")) {
        rp.compare_pix(&a.pix, &b.pix);
        eprintln!("  average {}x{}, area {}", a.width(), a.height(), a.area);
    }
    for ave in recog.averages().expect("averages") {
        rp.compare_values(40.0, ave.height() as f64, 1.0);
    }

    // --- Test 3: gating ---
    eprintln!("=== Gating ===");
    recog.finalize_training().expect("finalize");
    let zero = glyph('0', 40).expect("glyph");
    let r = recog.add_sample("0", &zero);
    rp.compare_values(1.0, flag(matches!(r, Err(RecogError::NotTraining))), 0.0);
    let r = recog.train_labeled(&zero, "0");
    rp.compare_values(1.0, flag(matches!(r, Err(RecogError::NotTraining))), 0.0);
    let training = Recog::new(RecogConfig::default()).expect("recog");
    let r = training.identify_pix(&zero);
    rp.compare_values(1.0, flag(matches!(r, Err(RecogError::NotFinalized))), 0.0);

    let mut empty = Recog::new(RecogConfig::default()).expect("recog");
    let r = empty.build_averages();
    rp.compare_values(1.0, flag(matches!(r, Err(RecogError::EmptyClass { .. }))), 0.0);

    // Part of a charset trains; the class count check flags the rest.
    let mut digits = Recog::new(RecogConfig::new().with_charset(CharsetType::ArabicNumerals))
        .expect("recog");
    digits.add_sample("0", &zero).expect("add");
    digits.add_sample("1", &glyph('1', 40).expect("glyph")).expect("add");
    rp.compare_values(1.0, flag(digits.build_averages().is_ok()), 0.0);
    rp.compare_values(1.0, flag(digits.finalize_training().is_ok()), 0.0);
    rp.compare_values(2.0, digits.num_classes() as f64, 0.0);
    rp.compare_values(0.0, flag(digits.check_charset()), 0.0);

    // --- Test 4: cleaning of labeled samples ---
    eprintln!("=== Sample cleaning ===");
    let mut cleaner = Recog::new(RecogConfig::default()).expect("recog");
    let two = glyph('2', 40).expect("glyph");
    cleaner
        .train_labeled(&with_speck(&two, 5).expect("speck"), "2")
        .expect("train speck");
    cleaner
        .train_labeled(&to_gray(&two).expect("gray"), "2")
        .expect("train gray");
    for t in cleaner.samples(0).expect("samples") {
        rp.compare_pix(&two, &t.pix);
    }

    // --- Test 5: identification of the training glyphs ---
    eprintln!("=== Identification ===");
    for ch in "0123".chars() {
        let rch = recog.identify_pix(&glyph(ch, 40).expect("glyph")).expect("identify");
        eprintln!("  {} -> {} ({:.3})", ch, rch.text, rch.score);
        rp.compare_strings(ch.to_string().as_bytes(), rch.text.as_bytes());
        rp.compare_values(1.0, rch.score as f64, 1e-6);
    }

    // --- Test 6: outliers end to end ---
    eprintln!("=== Outliers ===");
    let mut mislabeled = set.clone();
    mislabeled.push(glyph('1', 40).expect("glyph").with_text("0"));
    let config = RecogConfig::default();
    let (cleaned, removed) = remove_outliers(&mislabeled, &config, 0.5).expect("remove");
    for o in &removed {
        eprintln!("  outlier {:?}[{}] best {} score {:.3}", o.label, o.sample, o.best_class, o.score);
    }
    rp.compare_values(1.0, removed.len() as f64, 0.0);
    rp.compare_strings(b"0", removed[0].label.as_bytes());
    rp.compare_values(4.0, removed[0].sample as f64, 0.0);
    rp.compare_values(16.0, cleaned.len() as f64, 0.0);
    let rebuilt = Recog::from_pixa(&cleaned, config).expect("rebuild");
    rp.compare_values(4.0, rebuilt.sample_counts()[0] as f64, 0.0);

    // The generating collection rebuilds the same store
    let extracted: Pixa = rebuilt.extract_pixa();
    rp.compare_values(16.0, extracted.len() as f64, 0.0);

    assert!(rp.cleanup(), "training regression test failed");
}
