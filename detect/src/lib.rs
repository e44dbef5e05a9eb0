mod common;
pub mod backend;
pub mod config;
pub mod dataset;
pub mod output;

use crate::{
    backend::ReplayBackend,
    common::*,
    config::{Config, DetectorConfig},
    dataset::DatasetFolder,
};
use scoring::{score_folder, DetectorAdapter, DetectorFailure, FolderOutcome};

/// The scores of one detector with the per-image outcomes of every folder.
#[derive(Debug, Clone)]
pub struct DetectorRun {
    pub report: Report,
    pub outcomes: Vec<FolderOutcome>,
}

impl DetectorRun {
    /// Images the detector failed on, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &DetectorFailure> + '_ {
        self.outcomes.iter().flat_map(|outcome| outcome.failures())
    }

    pub fn num_failures(&self) -> usize {
        self.failures().count()
    }
}

/// Run every configured detector over the dataset and score it against the ground truth.
///
/// Returns one run per detector in configuration order.
pub fn start(config: &Config) -> Result<Vec<DetectorRun>> {
    let vocabulary = Arc::new(ClassVocabulary::load(&config.classes_file)?);
    info!("loaded {} classes", vocabulary.len());

    let folders = dataset::list_folders(&config.dataset)?;
    let ground_truth =
        dataset::load_ground_truth(&config.ground_truth, &folders, vocabulary.clone())?;

    let runs: Vec<_> = config
        .detectors
        .iter()
        .map(|detector| run_detector(config, detector, &folders, &vocabulary, &ground_truth))
        .try_collect()?;

    Ok(runs)
}

fn run_detector(
    config: &Config,
    detector: &DetectorConfig,
    folders: &[DatasetFolder],
    vocabulary: &Arc<ClassVocabulary>,
    ground_truth: &GroundTruth,
) -> Result<DetectorRun> {
    let DetectorConfig {
        ref name,
        kind,
        ref detections_file,
    } = *detector;
    let dataset_root = &config.dataset.root;
    let policy = config.scoring.zero_pair_policy;

    let backend = ReplayBackend::load(detections_file, dataset_root)?;
    let mut adapter = DetectorAdapter::new(kind, backend)?;
    info!("start {} detector '{}'", kind, name);

    let mut scores = vec![];
    let mut outcomes = vec![];

    for folder in folders {
        let outcome = adapter.process_folder(&folder.identifier, &folder.files, vocabulary.clone())?;

        if let Some(results_dir) = &config.output.results_dir {
            save_sidecars(results_dir, name, dataset_root, folder, &outcome);
        }

        let expected = ground_truth
            .get(&folder.identifier)
            .ok_or_else(|| format_err!("no ground truth for folder '{}'", folder.name))?;
        let totals = score_folder(&folder.identifier, &outcome.table, expected, policy)?;
        scores.push((folder.identifier.clone(), totals));
        outcomes.push(outcome);
    }

    let report = Report::new(name.as_str(), dataset_root, scores);
    report.print();

    if let Some(report_dir) = &config.output.report_dir {
        fs::create_dir_all(report_dir)
            .with_context(|| format!("failed to create directory '{}'", report_dir.display()))?;
        report.save_csv(output::report_path(report_dir, name))?;
    }

    Ok(DetectorRun { report, outcomes })
}

/// Save the accepted detections of each image. A failed save only skips that image.
fn save_sidecars(
    results_dir: &Path,
    detector: &str,
    dataset_root: &Path,
    folder: &DatasetFolder,
    outcome: &FolderOutcome,
) {
    for (file, image) in folder.files.iter().zip_eq(&outcome.images) {
        let detections = match &image.result {
            Ok(detections) => detections,
            Err(_) => continue,
        };

        let result = output::sidecar_path(results_dir, detector, dataset_root, file)
            .and_then(|path| output::save_detections(&path, detections));
        if let Err(err) = result {
            warn!(
                "failed to save detections of '{}': {:#}",
                file.display(),
                err
            );
        }
    }
}
