use crate::{common::*, error::ScoringError};

/// The ordered set of class labels shared by every table of a run.
#[derive(Debug, Clone)]
pub struct ClassVocabulary {
    classes: IndexSet<String>,
}

/// Two vocabularies are equal only if they list the same classes in the same order.
impl PartialEq for ClassVocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.classes.iter().eq(other.classes.iter())
    }
}

impl Eq for ClassVocabulary {}

impl ClassVocabulary {
    pub fn new<I, S>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();

        for class in classes {
            let class = class.into();
            ensure!(!class.is_empty(), "empty class name is not allowed");
            ensure!(
                !set.contains(&class),
                "duplicated class name '{}' found",
                class
            );
            set.insert(class);
        }
        ensure!(!set.is_empty(), "the class vocabulary must be non-empty");

        Ok(Self { classes: set })
    }

    /// Load the vocabulary from a file with one class name per line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read classes file '{}'", path.display()))?;
        let classes = content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty());
        Self::new(classes).with_context(|| format!("invalid classes file '{}'", path.display()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.classes.get_index(index).map(String::as_str)
    }

    pub fn index_of(&self, class: &str) -> Option<usize> {
        self.classes.get_index_of(class)
    }

    pub fn try_index_of(&self, class: &str) -> Result<usize, ScoringError> {
        self.index_of(class)
            .ok_or_else(|| ScoringError::UnknownClassLabel {
                label: class.to_owned(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_keeps_file_order() {
        let vocabulary = ClassVocabulary::new(["person", "bicycle", "car"]).unwrap();
        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.index_of("car"), Some(2));
        assert_eq!(vocabulary.get(1), Some("bicycle"));
        assert_eq!(
            vocabulary.iter().collect::<Vec<_>>(),
            vec!["person", "bicycle", "car"]
        );
    }

    #[test]
    fn reject_duplicated_and_empty_vocabularies() {
        assert!(ClassVocabulary::new(["car", "car"]).is_err());
        assert!(ClassVocabulary::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn unknown_label_is_reported() {
        let vocabulary = ClassVocabulary::new(["car"]).unwrap();
        assert_eq!(
            vocabulary.try_index_of("zebra"),
            Err(ScoringError::UnknownClassLabel {
                label: "zebra".into()
            })
        );
    }

    #[test]
    fn equality_depends_on_class_order() {
        let lhs = ClassVocabulary::new(["person", "car"]).unwrap();
        let rhs = ClassVocabulary::new(["car", "person"]).unwrap();
        assert_ne!(lhs, rhs);
        assert_eq!(lhs, ClassVocabulary::new(["person", "car"]).unwrap());
    }

    #[test]
    fn load_classes_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join("classes.txt");
        let vocabulary = ClassVocabulary::load(path).unwrap();
        assert_eq!(vocabulary.len(), 4);
        assert_eq!(vocabulary.index_of("person"), Some(0));
    }
}
