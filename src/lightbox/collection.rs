use std::ops::Index;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One selectable image: where it lives and the text that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub source: PathBuf,
    pub label: String,
}

impl GalleryImage {
    pub fn new(source: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Ordered, fixed set of images a lightbox can show.
///
/// Built once and shared by value; clones point at the same storage, so the
/// controller, the decode cache and the page all agree on what index `i` is.
#[derive(Debug, Clone, Default)]
pub struct ImageCollection {
    images: Arc<[GalleryImage]>,
}

impl ImageCollection {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self {
            images: images.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GalleryImage> {
        self.images.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GalleryImage> {
        self.images.iter()
    }
}

impl Index<usize> for ImageCollection {
    type Output = GalleryImage;

    fn index(&self, index: usize) -> &GalleryImage {
        &self.images[index]
    }
}

impl FromIterator<GalleryImage> for ImageCollection {
    fn from_iter<I: IntoIterator<Item = GalleryImage>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ImageCollection {
    type Item = &'a GalleryImage;
    type IntoIter = std::slice::Iter<'a, GalleryImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let a: ImageCollection = ["a.png", "b.png"]
            .into_iter()
            .map(|p| GalleryImage::new(p, p))
            .collect();
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.images, &b.images));
        assert_eq!(b[1].source(), Path::new("b.png"));
    }

    #[test]
    fn get_out_of_range_is_none() {
        let c = ImageCollection::new(vec![GalleryImage::new("x.jpg", "x")]);
        assert!(c.get(1).is_none());
        assert_eq!(c.get(0).map(|i| i.label.as_str()), Some("x"));
    }
}
