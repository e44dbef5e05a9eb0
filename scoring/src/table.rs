use crate::{common::*, error::ScoringError, vocabulary::ClassVocabulary};

/// The per-folder table of detection counts filled by a detector adapter.
pub type DetectionCountTable = CountTable;

/// Integer counts indexed by image identifier and class label.
///
/// Rows keep their insertion order. Every row has one cell per vocabulary class,
/// in vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    vocabulary: Arc<ClassVocabulary>,
    rows: IndexMap<String, Vec<u64>>,
}

impl CountTable {
    /// Create a table with an all-zero row for each image.
    pub fn new<I, S>(vocabulary: Arc<ClassVocabulary>, images: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self {
            vocabulary,
            rows: IndexMap::new(),
        };
        for image in images {
            table.insert_row(image.into(), None)?;
        }
        Ok(table)
    }

    /// Append a row, zero-filled when `counts` is `None`.
    pub(crate) fn insert_row(
        &mut self,
        image: String,
        counts: Option<Vec<u64>>,
    ) -> Result<(), ScoringError> {
        if self.rows.contains_key(&image) {
            return Err(ScoringError::DuplicateImage { image });
        }

        let counts = match counts {
            Some(counts) => {
                if counts.len() != self.vocabulary.len() {
                    return Err(ScoringError::VocabularyMismatch);
                }
                counts
            }
            None => vec![0; self.vocabulary.len()],
        };
        self.rows.insert(image, counts);
        Ok(())
    }

    pub fn vocabulary(&self) -> &Arc<ClassVocabulary> {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, image: &str) -> bool {
        self.rows.contains_key(image)
    }

    pub fn images(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    /// The counts of an image aligned to the vocabulary.
    pub fn row(&self, image: &str) -> Option<&[u64]> {
        self.rows.get(image).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u64])> + '_ {
        self.rows
            .iter()
            .map(|(image, counts)| (image.as_str(), counts.as_slice()))
    }

    /// The counts of a class for every image, in row order.
    pub fn column(&self, class: &str) -> Result<Vec<u64>, ScoringError> {
        let index = self.vocabulary.try_index_of(class)?;
        Ok(self.rows.values().map(|counts| counts[index]).collect())
    }

    pub fn get(&self, image: &str, class: &str) -> Result<u64, ScoringError> {
        let index = self.vocabulary.try_index_of(class)?;
        let counts = self
            .rows
            .get(image)
            .ok_or_else(|| ScoringError::UnknownImage {
                image: image.to_owned(),
            })?;
        Ok(counts[index])
    }

    /// Count one more detection of `class` in `image`.
    pub fn increment(&mut self, image: &str, class: &str) -> Result<(), ScoringError> {
        let index = self.vocabulary.try_index_of(class)?;
        let counts = self
            .rows
            .get_mut(image)
            .ok_or_else(|| ScoringError::UnknownImage {
                image: image.to_owned(),
            })?;
        counts[index] += 1;
        Ok(())
    }

    /// Sum of the counts of every class over all images.
    pub fn class_totals(&self) -> Vec<u64> {
        let mut totals = vec![0; self.vocabulary.len()];
        self.rows.values().for_each(|counts| {
            totals
                .iter_mut()
                .zip(counts)
                .for_each(|(total, count)| *total += count);
        });
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Arc<ClassVocabulary> {
        Arc::new(ClassVocabulary::new(["person", "car"]).unwrap())
    }

    #[test]
    fn rows_start_at_zero_in_insertion_order() {
        let table = CountTable::new(vocabulary(), ["b.jpg", "a.jpg"]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.images().collect::<Vec<_>>(), vec!["b.jpg", "a.jpg"]);
        assert_eq!(table.row("a.jpg"), Some(&[0, 0][..]));
    }

    #[test]
    fn repeated_detections_accumulate() {
        let mut table = CountTable::new(vocabulary(), ["a.jpg", "b.jpg"]).unwrap();
        table.increment("a.jpg", "car").unwrap();
        table.increment("a.jpg", "car").unwrap();
        table.increment("b.jpg", "person").unwrap();

        assert_eq!(table.get("a.jpg", "car").unwrap(), 2);
        assert_eq!(table.get("a.jpg", "person").unwrap(), 0);
        assert_eq!(table.column("car").unwrap(), vec![2, 0]);
        assert_eq!(table.class_totals(), vec![1, 2]);
    }

    #[test]
    fn unknown_label_and_image_are_errors() {
        let mut table = CountTable::new(vocabulary(), ["a.jpg"]).unwrap();
        assert_eq!(
            table.increment("a.jpg", "zebra"),
            Err(ScoringError::UnknownClassLabel {
                label: "zebra".into()
            })
        );
        assert_eq!(
            table.increment("c.jpg", "car"),
            Err(ScoringError::UnknownImage {
                image: "c.jpg".into()
            })
        );
        assert_eq!(table.row("a.jpg"), Some(&[0, 0][..]));
    }

    #[test]
    fn duplicated_images_are_rejected() {
        let result = CountTable::new(vocabulary(), ["a.jpg", "a.jpg"]);
        assert_eq!(
            result,
            Err(ScoringError::DuplicateImage {
                image: "a.jpg".into()
            })
        );
    }
}
