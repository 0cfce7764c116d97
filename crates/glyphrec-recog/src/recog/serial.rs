//! Serialization for Recog
//!
//! Binary format storing the configuration and the generating samples of
//! a recognizer. Everything derived from the samples (averages, scaled
//! samples, size statistics) is rebuilt on reading.
//!
//! # Format
//!
//! ```text
//! "recog"                      magic, 5 bytes
//! version                      u32 = 2
//! configuration                19 x u32, ratios as f32 bits
//! state                        u32: 0 = training, 1 = finalized
//! nclasses                     u32
//! nclasses x (len u32, utf-8)  class labels in index order
//! nclasses x (nsamples u32, nsamples x SPIX)
//! ```
//!
//! All integers are little-endian. Samples are stored unscaled, in SPIX
//! format (see [`glyphrec_core::Pix::write_spix`]).

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use glyphrec_core::Pix;
use tracing::debug;

use crate::error::{RecogError, RecogResult};

use super::types::{CharsetType, Recog, RecogConfig, RecogState, TemplateType, TemplateUse};

const RECOG_MAGIC: &[u8; 5] = b"recog";

/// Recog format version
const RECOG_VERSION: u32 = 2;

/// Maximum input size in bytes.
const MAX_INPUT_SIZE: u64 = 500_000_000;

const MAX_CLASSES: u32 = 1 << 16;
const MAX_LABEL_LEN: u32 = 256;

fn malformed(msg: impl Into<String>) -> RecogError {
    RecogError::Serialization(msg.into())
}

fn read_u32(reader: &mut impl Read) -> RecogResult<u32> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| malformed(format!("truncated recog data: {e}")))?;
    Ok(u32::from_le_bytes(buf))
}

fn write_u32(writer: &mut impl Write, v: u32) -> RecogResult<()> {
    writer.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn to_u32(v: usize, what: &str) -> RecogResult<u32> {
    u32::try_from(v).map_err(|_| malformed(format!("{what} {v} does not fit the format")))
}

fn write_config(writer: &mut impl Write, c: &RecogConfig) -> RecogResult<()> {
    let fields = [
        c.scale_w,
        c.scale_h,
        c.templ_type as u32,
        c.line_w,
        c.templ_use as u32,
        c.threshold,
        c.max_y_shift as u32,
        c.charset_type as u32,
        to_u32(c.charset_size, "charset size")?,
        to_u32(c.min_nopad, "min_nopad")?,
        to_u32(c.max_afterpad, "max_afterpad")?,
        to_u32(c.min_samples, "min_samples")?,
        c.boot_iters,
        c.max_wh_ratio.to_bits(),
        c.max_ht_ratio.to_bits(),
        c.min_split_w,
        c.min_split_h,
        c.max_split_h,
        c.allow_strip_scaling as u32,
    ];
    for v in fields {
        write_u32(writer, v)?;
    }
    Ok(())
}

fn read_config(reader: &mut impl Read) -> RecogResult<RecogConfig> {
    let mut f = [0u32; 19];
    for v in f.iter_mut() {
        *v = read_u32(reader)?;
    }
    let templ_type =
        TemplateType::from_code(f[2]).ok_or_else(|| malformed(format!("template type {}", f[2])))?;
    let templ_use =
        TemplateUse::from_code(f[4]).ok_or_else(|| malformed(format!("template use {}", f[4])))?;
    let charset_type =
        CharsetType::from_code(f[7]).ok_or_else(|| malformed(format!("charset type {}", f[7])))?;
    let allow_strip_scaling = match f[18] {
        0 => false,
        1 => true,
        v => return Err(malformed(format!("strip scaling flag {v}"))),
    };
    Ok(RecogConfig {
        scale_w: f[0],
        scale_h: f[1],
        templ_type,
        line_w: f[3],
        templ_use,
        threshold: f[5],
        max_y_shift: f[6] as i32,
        charset_type,
        charset_size: f[8] as usize,
        min_nopad: f[9] as usize,
        max_afterpad: f[10] as usize,
        min_samples: f[11] as usize,
        boot_iters: f[12],
        max_wh_ratio: f32::from_bits(f[13]),
        max_ht_ratio: f32::from_bits(f[14]),
        min_split_w: f[15],
        min_split_h: f[16],
        max_split_h: f[17],
        allow_strip_scaling,
    })
}

impl Recog {
    /// Write a Recog to a writer.
    pub fn write_to_writer(&self, writer: &mut impl Write) -> RecogResult<()> {
        writer.write_all(RECOG_MAGIC)?;
        write_u32(writer, RECOG_VERSION)?;
        write_config(writer, &self.config)?;
        let state = match self.state {
            RecogState::Training => 0,
            RecogState::Finalized => 1,
        };
        write_u32(writer, state)?;

        write_u32(writer, to_u32(self.num_classes(), "class count")?)?;
        for label in self.classes.labels() {
            write_u32(writer, to_u32(label.len(), "label length")?)?;
            writer.write_all(label.as_bytes())?;
        }
        for samples in &self.samples_u {
            write_u32(writer, to_u32(samples.len(), "sample count")?)?;
            for t in samples {
                t.pix.write_spix(writer)?;
            }
        }
        Ok(())
    }

    /// Serialize a Recog to bytes.
    pub fn to_bytes(&self) -> RecogResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to_writer(&mut out)?;
        Ok(out)
    }

    /// Write a Recog to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> RecogResult<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a Recog from a reader.
    ///
    /// The recognizer is rebuilt by adding every stored sample again; a
    /// recognizer stored finalized is finalized again.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::Serialization`] for malformed or truncated
    /// input, including stored data that no longer trains.
    pub fn read_from_reader(reader: &mut impl Read) -> RecogResult<Self> {
        let mut buf = Vec::new();
        reader.take(MAX_INPUT_SIZE + 1).read_to_end(&mut buf)?;
        if buf.len() as u64 > MAX_INPUT_SIZE {
            return Err(malformed(format!(
                "input too large: exceeds maximum allowed size of {MAX_INPUT_SIZE} bytes"
            )));
        }
        Self::read_from_bytes(&buf)
    }

    /// Read a Recog from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> RecogResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read_from_reader(&mut BufReader::new(file))
    }

    /// Read a Recog from a byte slice.
    pub fn read_from_bytes(data: &[u8]) -> RecogResult<Self> {
        let mut cursor = data;
        let reader = &mut cursor;

        let mut magic = [0u8; 5];
        reader
            .read_exact(&mut magic)
            .map_err(|_| malformed("missing recog magic"))?;
        if &magic != RECOG_MAGIC {
            return Err(malformed("missing recog magic"));
        }
        let version = read_u32(reader)?;
        if version != RECOG_VERSION {
            return Err(malformed(format!("unsupported recog version {version}")));
        }
        let config = read_config(reader)?;
        let finalized = match read_u32(reader)? {
            0 => false,
            1 => true,
            v => return Err(malformed(format!("recog state {v}"))),
        };

        let mut recog = Recog::new(config).map_err(|e| malformed(format!("bad config: {e}")))?;
        let nclasses = read_u32(reader)?;
        if nclasses > MAX_CLASSES {
            return Err(malformed(format!("{nclasses} classes")));
        }
        let mut labels = Vec::with_capacity(nclasses as usize);
        for i in 0..nclasses as usize {
            let len = read_u32(reader)?;
            if len == 0 || len > MAX_LABEL_LEN {
                return Err(malformed(format!("label length {len}")));
            }
            let mut bytes = vec![0u8; len as usize];
            reader
                .read_exact(&mut bytes)
                .map_err(|_| malformed("truncated class label"))?;
            let label = String::from_utf8(bytes).map_err(|_| malformed("label is not utf-8"))?;
            if recog.register_class(&label) != i {
                return Err(malformed(format!("class {label:?} out of order")));
            }
            labels.push(label);
        }
        for label in &labels {
            let nsamples = read_u32(reader)?;
            for _ in 0..nsamples {
                let pix = Pix::read_spix(reader)
                    .map_err(|e| malformed(format!("bad sample: {e}")))?;
                recog
                    .add_sample(label, &pix)
                    .map_err(|e| malformed(format!("bad sample: {e}")))?;
            }
        }
        if !reader.is_empty() {
            return Err(malformed(format!("{} trailing bytes", reader.len())));
        }

        if finalized {
            recog
                .build_averages()
                .and_then(|_| recog.finalize_training())
                .map_err(|e| malformed(format!("stored recognizer does not train: {e}")))?;
        }
        debug!(
            classes = recog.num_classes(),
            samples = recog.num_samples(),
            finalized,
            "recognizer read"
        );
        Ok(recog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphrec_core::{PixMut, PixelDepth, Pixa};

    fn rect(w: u32, h: u32) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit1).unwrap();
        for y in 0..h {
            for x in 0..w {
                if (x + y) % 3 != 0 {
                    pm.set_pixel(x, y, 1).unwrap();
                }
            }
        }
        pm.into()
    }

    fn finalized() -> Recog {
        let mut pixa = Pixa::new();
        pixa.push(rect(5, 20).with_text("a"));
        pixa.push(rect(12, 20).with_text("b"));
        pixa.push(rect(6, 21).with_text("a"));
        let config = RecogConfig::new()
            .with_scale(0, 20)
            .with_templ_use(TemplateUse::Average)
            .with_max_wh_ratio(2.0);
        Recog::from_pixa(&pixa, config).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let recog = finalized();
        let bytes = recog.to_bytes().unwrap();
        assert_eq!(&bytes[..5], b"recog");
        let back = Recog::read_from_bytes(&bytes).unwrap();
        assert_eq!(back.config(), recog.config());
        assert!(back.is_finalized());
        assert_eq!(back.classes(), recog.classes());
        assert_eq!(back.sample_counts(), vec![2, 1]);
        assert_eq!(back.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_training_state_kept() {
        let mut recog = Recog::new(RecogConfig::default()).unwrap();
        recog.add_sample("a", &rect(5, 20)).unwrap();
        let back = Recog::read_from_bytes(&recog.to_bytes().unwrap()).unwrap();
        assert!(!back.is_finalized());
        assert!(!back.averages_current());
        assert_eq!(back.num_samples(), 1);
    }

    #[test]
    fn test_reader_round_trip() {
        let recog = finalized();
        let mut buf = Vec::new();
        recog.write_to_writer(&mut buf).unwrap();
        let back = Recog::read_from_reader(&mut buf.as_slice()).unwrap();
        assert_eq!(back.num_samples(), 3);
    }

    #[test]
    fn test_malformed() {
        let bytes = finalized().to_bytes().unwrap();
        let is_serial = |r: RecogResult<Recog>| matches!(r, Err(RecogError::Serialization(_)));
        assert!(is_serial(Recog::read_from_bytes(b"recox")));
        assert!(is_serial(Recog::read_from_bytes(&bytes[..bytes.len() - 3])));
        let mut versioned = bytes.clone();
        versioned[5] = 9;
        assert!(is_serial(Recog::read_from_bytes(&versioned)));
        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(is_serial(Recog::read_from_bytes(&trailing)));
        let mut bad_type = bytes;
        // templ_type is the third config word, after magic and version.
        bad_type[5 + 4 + 8] = 7;
        assert!(is_serial(Recog::read_from_bytes(&bad_type)));
    }
}
