//! Image collections
//!
//! A labeled `Pixa`, where every image carries its class label as
//! text, is the usual way to hand training samples to a recognizer.

use crate::box_::Box;
use crate::error::{Error, Result};
use crate::pix::Pix;

/// Ordered images with optional boxes
///
/// Boxes are kept in a parallel list that may be shorter than the image
/// list; `get_box` returns `None` for images pushed without one.
#[derive(Debug, Clone, Default)]
pub struct Pixa {
    pix: Vec<Pix>,
    boxes: Vec<Box>,
}

impl Pixa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pix: Vec::with_capacity(capacity),
            boxes: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pix.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pix.is_empty()
    }

    /// Image at `index`
    pub fn get(&self, index: usize) -> Option<&Pix> {
        self.pix.get(index)
    }

    /// Box stored for image `index`
    pub fn get_box(&self, index: usize) -> Option<&Box> {
        self.boxes.get(index)
    }

    /// Boxes in push order
    pub fn boxes(&self) -> &[Box] {
        &self.boxes
    }

    /// Appends an image without a box
    pub fn push(&mut self, pix: Pix) {
        self.pix.push(pix);
    }

    /// Appends an image with its bounding box
    ///
    /// Boxes only stay aligned with images when every image is pushed
    /// with a box.
    pub fn push_with_box(&mut self, pix: Pix, b: Box) {
        self.pix.push(pix);
        self.boxes.push(b);
    }

    /// Takes out image `index` together with its box
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<Pix> {
        if index >= self.pix.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.pix.len(),
            });
        }
        if index < self.boxes.len() {
            self.boxes.remove(index);
        }
        Ok(self.pix.remove(index))
    }

    /// Append every image of `other` (boxes are dropped)
    pub fn join(&mut self, other: &Pixa) {
        self.pix.extend(other.pix.iter().cloned());
    }

    /// Text of every image, in order
    pub fn texts(&self) -> Vec<Option<&str>> {
        self.pix.iter().map(Pix::text).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pix> {
        self.pix.iter()
    }
}

impl<'a> IntoIterator for &'a Pixa {
    type Item = &'a Pix;
    type IntoIter = std::slice::Iter<'a, Pix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Pixa {
    type Item = Pix;
    type IntoIter = std::vec::IntoIter<Pix>;

    fn into_iter(self) -> Self::IntoIter {
        self.pix.into_iter()
    }
}

impl FromIterator<Pix> for Pixa {
    fn from_iter<T: IntoIterator<Item = Pix>>(iter: T) -> Self {
        Pixa {
            pix: iter.into_iter().collect(),
            boxes: Vec::new(),
        }
    }
}

impl std::ops::Index<usize> for Pixa {
    type Output = Pix;

    fn index(&self, index: usize) -> &Self::Output {
        &self.pix[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix::PixelDepth;

    fn labeled(text: &str) -> Pix {
        Pix::new(2, 2, PixelDepth::Bit1).unwrap().with_text(text)
    }

    #[test]
    fn test_push_get_remove() {
        let mut pixa = Pixa::new();
        assert!(pixa.is_empty());
        pixa.push(labeled("a"));
        pixa.push_with_box(labeled("b"), Box::new_unchecked(0, 0, 2, 2));
        assert_eq!(pixa.len(), 2);
        assert_eq!(pixa[1].text(), Some("b"));
        let removed = pixa.remove(0).unwrap();
        assert_eq!(removed.text(), Some("a"));
        assert!(pixa.get_box(0).is_none());
        assert!(pixa.remove(5).is_err());
    }

    #[test]
    fn test_join_and_collect() {
        let a: Pixa = vec![labeled("1"), labeled("2")].into_iter().collect();
        let mut b = Pixa::new();
        b.push(labeled("3"));
        b.join(&a);
        assert_eq!(b.texts(), vec![Some("3"), Some("1"), Some("2")]);
    }
}
