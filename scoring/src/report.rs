//! Collation of per-folder scores into a report table.

use crate::{
    common::*,
    confusion::ConfusionTotals,
    metrics::Metrics,
};
use prettytable::{cell, row, Table};

/// The name of the cumulative report row.
pub const TOTAL_ROW: &str = "Total";

const HEADER: [&str; 9] = [
    "folder",
    "accuracy",
    "precision",
    "recall",
    "f1",
    "TP",
    "TN",
    "FP",
    "FN",
];

/// Confusion totals of a folder with the metrics derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRecord {
    pub totals: ConfusionTotals,
    pub metrics: Metrics,
}

impl ScoreRecord {
    pub fn new(totals: ConfusionTotals) -> Self {
        Self {
            totals,
            metrics: Metrics::from_totals(&totals),
        }
    }

    fn columns(&self) -> [String; 8] {
        let Metrics {
            accuracy,
            precision,
            recall,
            f1,
        } = self.metrics.rounded();
        let ConfusionTotals {
            true_positive,
            true_negative,
            false_positive,
            false_negative,
        } = self.totals;

        [
            accuracy.to_string(),
            precision.to_string(),
            recall.to_string(),
            f1.to_string(),
            true_positive.to_string(),
            true_negative.to_string(),
            false_positive.to_string(),
            false_negative.to_string(),
        ]
    }
}

/// Scores of one detector over all folders, plus the cumulative total.
#[derive(Debug, Clone)]
pub struct Report {
    title: String,
    records: IndexMap<String, ScoreRecord>,
    total: ScoreRecord,
}

impl Report {
    /// Collate folder totals in the given order.
    ///
    /// Folder names are displayed relative to `dataset_root`. The total row is derived from
    /// the summed totals rather than averaged metrics.
    pub fn new<I, S>(title: impl Into<String>, dataset_root: impl AsRef<Path>, folders: I) -> Self
    where
        I: IntoIterator<Item = (S, ConfusionTotals)>,
        S: AsRef<str>,
    {
        let dataset_root = dataset_root.as_ref();
        let mut merged: IndexMap<String, ConfusionTotals> = IndexMap::new();

        for (folder, totals) in folders {
            let name = display_folder_name(folder.as_ref(), dataset_root);
            *merged.entry(name).or_default() += totals;
        }

        let total = ScoreRecord::new(merged.values().sum());
        let records = merged
            .into_iter()
            .map(|(name, totals)| (name, ScoreRecord::new(totals)))
            .collect();

        Self {
            title: title.into(),
            records,
            total,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn get(&self, folder: &str) -> Option<&ScoreRecord> {
        self.records.get(folder)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &ScoreRecord)> + '_ {
        self.records
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    pub fn total(&self) -> &ScoreRecord {
        &self.total
    }

    fn rows(&self) -> impl Iterator<Item = (&str, &ScoreRecord)> + '_ {
        self.records().chain(iter::once((TOTAL_ROW, &self.total)))
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(HEADER.iter().collect());

        self.rows().for_each(|(name, record)| {
            let [accuracy, precision, recall, f1, tp, tn, fp, fn_] = record.columns();
            table.add_row(row![name, accuracy, precision, recall, f1, tp, tn, fp, fn_]);
        });

        table
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("{}", self.title);
        self.to_table().printstd();
    }

    pub fn write_csv<W>(&self, writer: W) -> Result<()>
    where
        W: io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&HEADER)?;

        for (name, record) in self.rows() {
            writer.write_record(iter::once(name.to_owned()).chain(record.columns()))?;
        }
        writer.flush()?;

        Ok(())
    }

    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::create(path)
            .with_context(|| format!("failed to create report file '{}'", path.display()))?;
        self.write_csv(file)?;
        info!("saved {} report to '{}'", self.title, path.display());
        Ok(())
    }
}

/// Strip the dataset root prefix off a folder identifier for display.
pub fn display_folder_name(folder: &str, dataset_root: &Path) -> String {
    match Path::new(folder).strip_prefix(dataset_root) {
        Ok(relative) if relative.as_os_str().is_empty() => folder.to_owned(),
        Ok(relative) => relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .join("/"),
        Err(_) => folder.to_owned(),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        write!(f, "{}", self.to_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_names_are_relative_to_root() {
        let root = Path::new("../data");
        assert_eq!(
            display_folder_name("../data/On-road Scenario", root),
            "On-road Scenario"
        );
        assert_eq!(display_folder_name("../data/a/b", root), "a/b");
        assert_eq!(display_folder_name("/elsewhere/x", root), "/elsewhere/x");
    }

    #[test]
    fn total_row_is_computed_from_summed_totals() {
        let report = Report::new(
            "yolo",
            "data",
            vec![
                ("data/a", ConfusionTotals::new(9, 0, 1, 0)),
                ("data/b", ConfusionTotals::new(0, 0, 1, 0)),
            ],
        );

        let names: Vec<_> = report.records().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(report.total().totals, ConfusionTotals::new(9, 0, 2, 0));

        let precision = report.total().metrics.precision.value().unwrap();
        assert_eq!(precision, r64(9.0 / 11.0));

        // not the mean of the folder precisions
        let folder_precisions: Vec<_> = report
            .records()
            .map(|(_, record)| record.metrics.precision.value().unwrap())
            .collect();
        assert_eq!(folder_precisions, vec![r64(0.9), r64(0.0)]);
        assert_ne!(precision, r64(0.45));
    }

    #[test]
    fn csv_output_has_rounded_metrics() {
        let report = Report::new(
            "frcnn",
            "data",
            vec![
                ("data/street", ConfusionTotals::new(1, 1, 0, 1)),
                ("data/empty", ConfusionTotals::new(0, 0, 3, 0)),
            ],
        );

        let mut buf = vec![];
        report.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "folder,accuracy,precision,recall,f1,TP,TN,FP,FN");
        assert_eq!(lines[1], "street,0.67,1.00,0.50,0.67,1,1,0,1");
        assert_eq!(lines[2], "empty,0.00,0.00,NaN,NaN,0,0,3,0");
        assert_eq!(lines[3], "Total,0.33,0.25,0.50,0.33,1,1,3,1");
    }

    #[test]
    fn table_lists_folders_then_total() {
        let report = Report::new(
            "yolo",
            "data",
            vec![("data/a", ConfusionTotals::new(1, 0, 0, 0))],
        );
        let table = report.to_table();
        assert_eq!(table.len(), 2);

        let text = report.to_string();
        assert!(text.starts_with("yolo\n"));
        assert!(text.contains(TOTAL_ROW));
        assert!(text.contains("1.00"));
        report.print();
    }
}
