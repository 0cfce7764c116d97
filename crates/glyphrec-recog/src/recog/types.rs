//! Type definitions for character recognition
//!
//! Configuration, the class table, templates and the result containers
//! shared by training, identification and line decoding.

use std::collections::HashMap;

use glyphrec_core::{ColumnStats, Pix};

use crate::error::{RecogError, RecogResult};

/// Character set type for recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharsetType {
    /// Character set type is not specified
    #[default]
    Unknown = 0,
    /// Arabic numerals: 0-9 (10 characters)
    ArabicNumerals = 1,
    /// Lowercase Roman numerals: i, v, x, l, c, d, m (7 characters)
    LcRomanNumerals = 2,
    /// Uppercase Roman numerals: I, V, X, L, C, D, M (7 characters)
    UcRomanNumerals = 3,
    /// Lowercase letters: a-z (26 characters)
    LcAlpha = 4,
    /// Uppercase letters: A-Z (26 characters)
    UcAlpha = 5,
}

impl CharsetType {
    /// Returns the expected number of characters in this charset
    pub fn expected_size(&self) -> usize {
        self.characters().len()
    }

    /// Returns the characters in this charset, in class order
    pub fn characters(&self) -> &'static [char] {
        match self {
            CharsetType::Unknown => &[],
            CharsetType::ArabicNumerals => &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'],
            CharsetType::LcRomanNumerals => &['i', 'v', 'x', 'l', 'c', 'd', 'm'],
            CharsetType::UcRomanNumerals => &['I', 'V', 'X', 'L', 'C', 'D', 'M'],
            CharsetType::LcAlpha => &[
                'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p',
                'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
            ],
            CharsetType::UcAlpha => &[
                'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P',
                'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
            ],
        }
    }

    pub(crate) fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => CharsetType::Unknown,
            1 => CharsetType::ArabicNumerals,
            2 => CharsetType::LcRomanNumerals,
            3 => CharsetType::UcRomanNumerals,
            4 => CharsetType::LcAlpha,
            5 => CharsetType::UcAlpha,
            _ => return None,
        })
    }
}

/// Template representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateType {
    /// Match the glyph image itself (default)
    #[default]
    Image = 0,
    /// Match an inner outline of width `line_w`
    Outline = 1,
}

impl TemplateType {
    pub(crate) fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(TemplateType::Image),
            1 => Some(TemplateType::Outline),
            _ => None,
        }
    }
}

/// Template usage mode for identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateUse {
    /// Use all templates for matching (default)
    #[default]
    All = 0,
    /// Use averaged templates for matching
    Average = 1,
}

impl TemplateUse {
    pub(crate) fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(TemplateUse::All),
            1 => Some(TemplateUse::Average),
            _ => None,
        }
    }
}

/// Lifecycle of a recognizer
///
/// The transition from `Training` to `Finalized` happens once per
/// instance and is never undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecogState {
    /// Accepting samples
    #[default]
    Training,
    /// Templates are frozen and identification is allowed
    Finalized,
}

/// Default binarization threshold
pub const DEFAULT_THRESHOLD: u32 = 150;

/// Default maximum y-shift for correlation
pub const DEFAULT_MAX_Y_SHIFT: i32 = 1;

/// Default scaled template height
pub const DEFAULT_SCALE_H: u32 = 40;

/// Default maximum width/height ratio before a component is decoded as a line
pub const DEFAULT_MAX_WH_RATIO: f32 = 3.0;

/// Default maximum ratio between tallest and shortest averaged template
pub const DEFAULT_MAX_HT_RATIO: f32 = 2.5;

/// Default minimum split width
pub const DEFAULT_MIN_SPLIT_W: u32 = 2;

/// Default minimum split height
pub const DEFAULT_MIN_SPLIT_H: u32 = 5;

/// Default maximum split height
pub const DEFAULT_MAX_SPLIT_H: u32 = 120;

/// Recognizer configuration
///
/// A recognizer takes a private copy at construction; there is no way to
/// change the configuration of an existing recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecogConfig {
    /// Scale all templates to this width; 0 disables horizontal scaling
    /// (default: 0)
    pub scale_w: u32,

    /// Scale all templates to this height; 0 disables vertical scaling
    /// (default: 40)
    pub scale_h: u32,

    /// Image or outline templates (default: Image)
    pub templ_type: TemplateType,

    /// Outline stroke width, required for outline templates (default: 0)
    pub line_w: u32,

    /// Match against every sample or only class averages (default: All)
    pub templ_use: TemplateUse,

    /// Binarization threshold for 8 bpp input, 1..=255 (default: 150)
    pub threshold: u32,

    /// Vertical jiggle around the nominal alignment, 0..=2 (default: 1)
    pub max_y_shift: i32,

    /// Character set (default: Unknown)
    pub charset_type: CharsetType,

    /// Expected number of classes; 0 when unknown (default: 0)
    pub charset_size: usize,

    /// Classes with fewer samples are padded from a boot recognizer (default: 3)
    pub min_nopad: usize,

    /// Maximum samples per class after padding (default: 15)
    pub max_afterpad: usize,

    /// Minimum labeled samples before bootstrapping is skipped (default: 10)
    pub min_samples: usize,

    /// Number of 2x2 erosions applied to boot samples (default: 0)
    pub boot_iters: u32,

    /// Components wider than this times their height are decoded as a
    /// line of characters (default: 3.0)
    pub max_wh_ratio: f32,

    /// Maximum ratio of tallest to shortest averaged template (default: 2.5)
    pub max_ht_ratio: f32,

    /// Minimum component width kept when splitting (default: 2)
    pub min_split_w: u32,

    /// Minimum component height kept when splitting (default: 5)
    pub min_split_h: u32,

    /// Maximum component height kept when splitting (default: 120)
    pub max_split_h: u32,

    /// Rescale strips whose height differs from `scale_h` instead of
    /// rejecting them (default: true)
    pub allow_strip_scaling: bool,
}

impl Default for RecogConfig {
    fn default() -> Self {
        Self {
            scale_w: 0,
            scale_h: DEFAULT_SCALE_H,
            templ_type: TemplateType::Image,
            line_w: 0,
            templ_use: TemplateUse::All,
            threshold: DEFAULT_THRESHOLD,
            max_y_shift: DEFAULT_MAX_Y_SHIFT,
            charset_type: CharsetType::Unknown,
            charset_size: 0,
            min_nopad: 3,
            max_afterpad: 15,
            min_samples: 10,
            boot_iters: 0,
            max_wh_ratio: DEFAULT_MAX_WH_RATIO,
            max_ht_ratio: DEFAULT_MAX_HT_RATIO,
            min_split_w: DEFAULT_MIN_SPLIT_W,
            min_split_h: DEFAULT_MIN_SPLIT_H,
            max_split_h: DEFAULT_MAX_SPLIT_H,
            allow_strip_scaling: true,
        }
    }
}

impl RecogConfig {
    /// Create new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scaled template size (0 disables scaling on that axis)
    pub fn with_scale(mut self, scale_w: u32, scale_h: u32) -> Self {
        self.scale_w = scale_w;
        self.scale_h = scale_h;
        self
    }

    /// Use outline templates of the given stroke width
    pub fn with_outline(mut self, line_w: u32) -> Self {
        self.templ_type = TemplateType::Outline;
        self.line_w = line_w;
        self
    }

    /// Set the template usage mode
    pub fn with_templ_use(mut self, templ_use: TemplateUse) -> Self {
        self.templ_use = templ_use;
        self
    }

    /// Set the binarization threshold
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the maximum vertical shift
    pub fn with_max_y_shift(mut self, max_y_shift: i32) -> Self {
        self.max_y_shift = max_y_shift;
        self
    }

    /// Set the character set; the expected size follows from it
    ///
    /// No class is registered by this. Training on part of the charset is
    /// allowed, and [`Recog::check_charset`] then reports the shortfall.
    pub fn with_charset(mut self, charset_type: CharsetType) -> Self {
        self.charset_type = charset_type;
        self.charset_size = charset_type.expected_size();
        self
    }

    /// Set the expected number of classes
    pub fn with_charset_size(mut self, charset_size: usize) -> Self {
        self.charset_size = charset_size;
        self
    }

    /// Set padding limits
    pub fn with_padding(mut self, min_nopad: usize, max_afterpad: usize) -> Self {
        self.min_nopad = min_nopad;
        self.max_afterpad = max_afterpad;
        self
    }

    /// Set the sample count below which bootstrapping is used
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Set the number of erosions applied to boot samples
    pub fn with_boot_iters(mut self, boot_iters: u32) -> Self {
        self.boot_iters = boot_iters;
        self
    }

    /// Set the width/height ratio that sends components to the line decoder
    pub fn with_max_wh_ratio(mut self, ratio: f32) -> Self {
        self.max_wh_ratio = ratio;
        self
    }

    /// Set the maximum averaged template height ratio
    pub fn with_max_ht_ratio(mut self, ratio: f32) -> Self {
        self.max_ht_ratio = ratio;
        self
    }

    /// Set component size filters used when splitting a line image
    pub fn with_split_limits(mut self, min_w: u32, min_h: u32, max_h: u32) -> Self {
        self.min_split_w = min_w;
        self.min_split_h = min_h;
        self.max_split_h = max_h;
        self
    }

    /// Allow or forbid rescaling strips to `scale_h` before decoding
    pub fn with_strip_scaling(mut self, allow: bool) -> Self {
        self.allow_strip_scaling = allow;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> RecogResult<()> {
        if !(0..=2).contains(&self.max_y_shift) {
            return Err(RecogError::InvalidParameter(
                "max_y_shift must be 0, 1, or 2".to_string(),
            ));
        }
        if !(1..=255).contains(&self.threshold) {
            return Err(RecogError::InvalidParameter(format!(
                "threshold must be in 1..=255, got {}",
                self.threshold
            )));
        }
        if self.templ_type == TemplateType::Outline && self.line_w == 0 {
            return Err(RecogError::InvalidParameter(
                "outline templates need a positive line_w".to_string(),
            ));
        }
        if !(self.max_wh_ratio.is_finite() && self.max_wh_ratio > 0.0) {
            return Err(RecogError::InvalidParameter(
                "max_wh_ratio must be positive".to_string(),
            ));
        }
        if !(self.max_ht_ratio.is_finite() && self.max_ht_ratio >= 1.0) {
            return Err(RecogError::InvalidParameter(
                "max_ht_ratio must be at least 1".to_string(),
            ));
        }
        if self.min_split_h > self.max_split_h {
            return Err(RecogError::InvalidParameter(format!(
                "min_split_h {} exceeds max_split_h {}",
                self.min_split_h, self.max_split_h
            )));
        }
        if self.max_afterpad < self.min_nopad {
            return Err(RecogError::InvalidParameter(format!(
                "max_afterpad {} is below min_nopad {}",
                self.max_afterpad, self.min_nopad
            )));
        }
        Ok(())
    }
}

/// A bitmap with its foreground centroid and pixel count
#[derive(Debug, Clone)]
pub struct Template {
    /// 1 bpp bitmap
    pub pix: Pix,
    /// Foreground centroid `(x, y)`
    pub centroid: (f32, f32),
    /// Number of foreground pixels
    pub area: u32,
}

impl Template {
    /// Measure a binary bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::NoContent`] if the bitmap has no foreground.
    pub fn new(pix: Pix) -> RecogResult<Self> {
        let centroid = pix
            .centroid()?
            .ok_or_else(|| RecogError::NoContent("template has no foreground".to_string()))?;
        let area = pix.count_pixels()?;
        Ok(Self {
            pix,
            centroid,
            area,
        })
    }

    /// Template width
    pub fn width(&self) -> u32 {
        self.pix.width()
    }

    /// Template height
    pub fn height(&self) -> u32 {
        self.pix.height()
    }
}

/// Bidirectional mapping between class indices and labels
///
/// Indices are assigned in insertion order and never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTable {
    labels: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl ClassTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no class is registered
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of `label`, if registered
    pub fn index(&self, label: &str) -> Option<usize> {
        self.lookup.get(label).copied()
    }

    /// Label of class `index`, if registered
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// All labels in index order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of `label`, registering it if new
    pub(crate) fn insert(&mut self, label: &str) -> usize {
        if let Some(&index) = self.lookup.get(label) {
            return index;
        }
        let index = self.labels.len();
        self.labels.push(label.to_string());
        self.lookup.insert(label.to_string(), index);
        index
    }
}

/// Size range of the averaged templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateSizes {
    /// Minimum width of unscaled averages
    pub min_width_u: u32,
    /// Maximum width of unscaled averages
    pub max_width_u: u32,
    /// Minimum height of unscaled averages
    pub min_height_u: u32,
    /// Maximum height of unscaled averages
    pub max_height_u: u32,
    /// Minimum width of scaled averages
    pub min_width: u32,
    /// Maximum width of scaled averages
    pub max_width: u32,
}

/// Character recognizer
///
/// Holds the configuration, the class table and, per class, the unscaled
/// samples, the scaled samples (built when training is finalized) and the
/// unscaled and scaled averaged templates.
#[derive(Debug, Clone)]
pub struct Recog {
    pub(crate) config: RecogConfig,
    pub(crate) state: RecogState,
    pub(crate) classes: ClassTable,
    /// Unscaled samples per class
    pub(crate) samples_u: Vec<Vec<Template>>,
    /// Scaled (and possibly outlined) samples per class
    pub(crate) samples: Vec<Vec<Template>>,
    /// Unscaled averaged template per class
    pub(crate) averages_u: Vec<Template>,
    /// Scaled averaged template per class
    pub(crate) averages: Vec<Template>,
    /// Averages match the current samples
    pub(crate) ave_done: bool,
    pub(crate) sizes: TemplateSizes,
}

/// Recognition result for a single character
#[derive(Debug, Clone, PartialEq)]
pub struct Rch {
    /// Index of best matching class
    pub index: i32,
    /// Correlation score of best match
    pub score: f32,
    /// Label of best matching class
    pub text: String,
    /// Index of best sample within the class, -1 when matched to the average
    pub sample: i32,
    /// X-location of the matched template in the query
    pub xloc: i32,
    /// Y-location of the matched template in the query
    pub yloc: i32,
    /// Width of best template
    pub width: i32,
}

impl Default for Rch {
    fn default() -> Self {
        Self {
            index: -1,
            score: 0.0,
            text: String::new(),
            sample: -1,
            xloc: 0,
            yloc: 0,
            width: 0,
        }
    }
}

/// Recognition results for a sequence of characters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rcha {
    /// Indices of best classes
    pub indices: Vec<i32>,
    /// Correlation scores of best templates
    pub scores: Vec<f32>,
    /// Labels of best classes
    pub texts: Vec<String>,
    /// Indices of best samples
    pub samples: Vec<i32>,
    /// X-locations of templates
    pub xlocs: Vec<i32>,
    /// Y-locations of templates
    pub ylocs: Vec<i32>,
    /// Widths of best templates
    pub widths: Vec<i32>,
}

impl Rcha {
    /// Creates a new empty Rcha
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recognized characters
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no characters were recognized
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Adds a recognition result
    pub fn push(&mut self, rch: &Rch) {
        self.indices.push(rch.index);
        self.scores.push(rch.score);
        self.texts.push(rch.text.clone());
        self.samples.push(rch.sample);
        self.xlocs.push(rch.xloc);
        self.ylocs.push(rch.yloc);
        self.widths.push(rch.width);
    }

    /// Gets a single recognition result at the given index
    pub fn get(&self, i: usize) -> Option<Rch> {
        if i >= self.len() {
            return None;
        }
        Some(Rch {
            index: self.indices[i],
            score: self.scores[i],
            text: self.texts[i].clone(),
            sample: self.samples[i],
            xloc: self.xlocs[i],
            yloc: self.ylocs[i],
            width: self.widths[i],
        })
    }

    /// Mean score over all characters, 0 when empty
    pub fn mean_score(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f32>() / self.scores.len() as f32
    }
}

impl std::fmt::Display for Rcha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.texts.join(""))
    }
}

/// How the best path reached a trellis column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrellisStep {
    /// Column 0: nothing consumed
    Start,
    /// The previous column was background
    Skip,
    /// A template ends at this column
    Place {
        /// Class of the averaged template
        class: usize,
        /// Template width, so the segment starts at `column - width`
        width: u32,
        /// Vertical placement of the template top
        dely: i32,
        /// Correlation score of the placement
        score: f32,
    },
}

/// Decoding workspace for one line decode
///
/// `trellis[c]` is the best cumulative score after consuming columns
/// `0..c`, so both arrays have one more entry than the strip is wide.
#[derive(Debug)]
pub struct Rdid {
    /// Normalized strip being decoded
    pub pix: Pix,
    /// Per-column foreground counts and first moments of `pix`
    pub stats: ColumnStats,
    /// Best cumulative score per column
    pub trellis: Vec<f32>,
    /// Backpointer per column
    pub steps: Vec<TrellisStep>,
}

impl Rdid {
    /// Creates the workspace for `pix` (1 bpp)
    pub fn new(pix: Pix) -> RecogResult<Self> {
        let stats = pix.column_stats()?;
        let size = pix.width() as usize + 1;
        let mut trellis = vec![f32::NEG_INFINITY; size];
        let mut steps = vec![TrellisStep::Skip; size];
        trellis[0] = 0.0;
        steps[0] = TrellisStep::Start;
        Ok(Self {
            pix,
            stats,
            trellis,
            steps,
        })
    }

    /// Strip width
    pub fn width(&self) -> usize {
        self.stats.counts.len()
    }
}

/// Both passes of a line decode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoding {
    /// Best path from the trellis, scored against averaged templates
    pub initial: Rcha,
    /// The same segments identified under the full template policy
    pub rescored: Rcha,
    /// Best cumulative trellis score
    pub total: f32,
}
