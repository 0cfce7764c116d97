//! Recognizer serialization regression test

use glyphrec_recog::{Recog, RecogConfig, RecogError, TemplateUse};
use glyphrec_test::RegParams;
use glyphrec_test::synth::{glyph, labeled_set};

#[test]
fn serial_reg() {
    let mut rp = RegParams::new("serial");
    let training = labeled_set("0123", 3, 40).expect("labeled set");
    let config = RecogConfig::default()
        .with_templ_use(TemplateUse::Average)
        .with_max_y_shift(2);
    let recog = Recog::from_pixa(&training, config).expect("recog");

    // --- Test 1: bytes round trip ---
    eprintln!("=== Round trip ===");
    let bytes = recog.to_bytes().expect("to_bytes");
    eprintln!("  {} bytes", bytes.len());
    let back = Recog::read_from_bytes(&bytes).expect("read_from_bytes");
    rp.compare_strings(&bytes, &back.to_bytes().expect("to_bytes"));
    rp.compare_values(1.0, if back.config() == recog.config() { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if back.is_finalized() { 1.0 } else { 0.0 }, 0.0);
    for class in 0..recog.num_classes() {
        rp.compare_strings(
            recog.class_label(class).expect("label").as_bytes(),
            back.class_label(class).expect("label").as_bytes(),
        );
        let (a, b) = (recog.samples(class).expect("samples"), back.samples(class).expect("samples"));
        rp.compare_values(a.len() as f64, b.len() as f64, 0.0);
        for (ta, tb) in a.iter().zip(b) {
            rp.compare_pix(&ta.pix, &tb.pix);
        }
    }
    let (aves, aves_back) = (recog.averages().expect("averages"), back.averages().expect("averages"));
    for (a, b) in aves.iter().zip(aves_back) {
        rp.compare_pix(&a.pix, &b.pix);
    }

    // --- Test 2: the copy recognizes the same way ---
    for ch in "0123".chars() {
        let pix = glyph(ch, 40).expect("glyph");
        let r1 = recog.identify_pix(&pix).expect("identify");
        let r2 = back.identify_pix(&pix).expect("identify");
        rp.compare_strings(r1.text.as_bytes(), r2.text.as_bytes());
        rp.compare_values(r1.score as f64, r2.score as f64, 0.0);
    }

    // --- Test 3: file round trip ---
    eprintln!("=== File ===");
    let path = std::env::temp_dir().join(format!("glyphrec_serial_reg_{}.recog", std::process::id()));
    recog.write_to_file(&path).expect("write_to_file");
    let from_file = Recog::read_from_file(&path).expect("read_from_file");
    let _ = std::fs::remove_file(&path);
    rp.compare_strings(&bytes, &from_file.to_bytes().expect("to_bytes"));

    // --- Test 4: malformed input ---
    eprintln!("=== Malformed ===");
    for cut in [0, 4, 9, 40, bytes.len() / 2, bytes.len() - 1] {
        let r = Recog::read_from_bytes(&bytes[..cut]);
        let ok = matches!(r, Err(RecogError::Serialization(_)));
        if !ok {
            eprintln!("  truncation at {} not rejected", cut);
        }
        rp.compare_values(1.0, if ok { 1.0 } else { 0.0 }, 0.0);
    }

    assert!(rp.cleanup(), "serial regression test failed");
}
