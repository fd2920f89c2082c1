use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ImageBuffer;
use crate::error::{MockupError, Result};

/// Stable identity of a result set, kept across in-place edits.
pub type ResultSetId = Uuid;

/// The images produced by one generation submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    id: ResultSetId,
    created_at: DateTime<Utc>,
    images: Vec<ImageBuffer>,
}

impl ResultSet {
    pub fn new(images: Vec<ImageBuffer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            images,
        }
    }

    pub fn id(&self) -> ResultSetId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn images(&self) -> &[ImageBuffer] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&ImageBuffer> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Replaces one image after an inpaint edit. This is the only mutation a set allows.
    pub(crate) fn replace(&mut self, index: usize, image: ImageBuffer) -> Result<()> {
        let len = self.images.len();
        let slot = self.images.get_mut(index).ok_or_else(|| {
            MockupError::RequestRejected(format!(
                "Image index {} is out of range for a set of {}",
                index, len
            ))
        })?;
        *slot = image;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_identity() {
        let mut set = ResultSet::new(vec![
            ImageBuffer::new("image/png", vec![1]),
            ImageBuffer::new("image/png", vec![2]),
        ]);
        let id = set.id();
        set.replace(1, ImageBuffer::new("image/png", vec![3])).unwrap();
        assert_eq!(set.id(), id);
        assert_eq!(set.get(1).unwrap().bytes(), &[3]);
        assert!(set.replace(2, ImageBuffer::new("image/png", vec![4])).is_err());
    }

    #[test]
    fn test_sets_have_distinct_ids() {
        assert_ne!(ResultSet::new(Vec::new()).id(), ResultSet::new(Vec::new()).id());
    }
}
