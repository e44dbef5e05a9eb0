use crate::{common::*, error::ScoringError, table::CountTable, vocabulary::ClassVocabulary};

pub const DEFAULT_IMAGE_COLUMN: &str = "Image";

/// Expected per-image, per-class counts of one folder. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruthTable {
    table: CountTable,
}

impl GroundTruthTable {
    /// Build a table from rows of expected counts aligned to the vocabulary.
    pub fn from_rows<I, S>(vocabulary: Arc<ClassVocabulary>, rows: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = (S, Vec<u64>)>,
        S: Into<String>,
    {
        let mut table = CountTable::new(vocabulary, Vec::<String>::new())?;
        for (image, counts) in rows {
            table.insert_row(image.into(), Some(counts))?;
        }
        Ok(Self { table })
    }

    /// Load a CSV file with an image column and one column per class.
    pub fn load(
        path: impl AsRef<Path>,
        vocabulary: Arc<ClassVocabulary>,
        image_column: &str,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open ground truth file '{}'", path.display()))?;
        Self::from_reader(file, vocabulary, image_column)
            .with_context(|| format!("invalid ground truth file '{}'", path.display()))
    }

    /// Parse CSV ground truth.
    ///
    /// Empty cells, `NaN` cells and vocabulary classes without a column count as zero.
    /// Columns must be vocabulary classes, except unnamed columns which are ignored.
    pub fn from_reader<R>(
        reader: R,
        vocabulary: Arc<ClassVocabulary>,
        image_column: &str,
    ) -> Result<Self>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        // map csv columns to vocabulary indexes
        let headers = reader.headers()?.clone();
        let image_index = headers
            .iter()
            .position(|name| name == image_column)
            .ok_or_else(|| format_err!("the image column '{}' is missing", image_column))?;
        let class_columns: Vec<(usize, usize)> = headers
            .iter()
            .enumerate()
            .filter(|&(index, name)| index != image_index && !name.is_empty())
            .map(|(index, name)| -> Result<_> {
                let class_index = vocabulary.try_index_of(name)?;
                Ok((index, class_index))
            })
            .try_collect()?;

        let mut rows = vec![];

        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let image = record
                .get(image_index)
                .filter(|image| !image.is_empty())
                .ok_or_else(|| format_err!("record {} has no image identifier", line + 1))?;

            let mut counts = vec![0; vocabulary.len()];
            for &(column, class_index) in &class_columns {
                let cell = record.get(column).unwrap_or("");
                counts[class_index] = parse_count(cell).with_context(|| {
                    format!(
                        "invalid count for image '{}', class '{}'",
                        image,
                        &headers[column]
                    )
                })?;
            }

            rows.push((image.to_owned(), counts));
        }

        let table = Self::from_rows(vocabulary, rows)?;
        Ok(table)
    }

    pub fn vocabulary(&self) -> &Arc<ClassVocabulary> {
        self.table.vocabulary()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn row(&self, image: &str) -> Option<&[u64]> {
        self.table.row(image)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u64])> + '_ {
        self.table.rows()
    }

    pub fn get(&self, image: &str, class: &str) -> Result<u64, ScoringError> {
        self.table.get(image, class)
    }
}

fn parse_count(cell: &str) -> Result<u64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(0);
    }

    let value: f64 = cell
        .parse()
        .with_context(|| format!("'{}' is not a number", cell))?;
    ensure!(
        value.is_finite() && value >= 0.0 && value.fract() == 0.0,
        "'{}' is not a non-negative integer count",
        cell
    );
    Ok(value as u64)
}

/// The ground truth tables of every folder in a run, keyed by folder identifier.
#[derive(Debug, Clone, Default)]
pub struct GroundTruth {
    folders: IndexMap<String, GroundTruthTable>,
}

impl GroundTruth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, folder: impl Into<String>, table: GroundTruthTable) {
        self.folders.insert(folder.into(), table);
    }

    pub fn get(&self, folder: &str) -> Option<&GroundTruthTable> {
        self.folders.get(folder)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn folders(&self) -> impl Iterator<Item = &str> + '_ {
        self.folders.keys().map(String::as_str)
    }
}
