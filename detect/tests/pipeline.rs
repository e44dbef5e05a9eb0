use anyhow::Result;
use detect::{config::Config, output::SavedDetection};
use scoring::{ConfusionTotals, Report, ScoringError, ZeroPairPolicy};
use std::{
    fs,
    path::{Path, PathBuf},
};

fn manifest_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

/// Load the fixture config with its paths resolved against the crate directory.
fn load_config() -> Result<Config> {
    let mut config = Config::open(manifest_dir().join("tests/fixtures/detect.json5"))?;
    let resolve = |path: &mut PathBuf| *path = manifest_dir().join(&*path);

    resolve(&mut config.dataset.root);
    resolve(&mut config.classes_file);
    resolve(&mut config.ground_truth.dir);
    config
        .detectors
        .iter_mut()
        .for_each(|detector| resolve(&mut detector.detections_file));

    Ok(config)
}

fn folder_totals<'a>(report: &'a Report) -> Vec<(&'a str, ConfusionTotals)> {
    report
        .records()
        .map(|(name, record)| (name, record.totals))
        .collect()
}

#[test]
fn score_recorded_detections() -> Result<()> {
    let output_dir = tempfile::tempdir()?;
    let mut config = load_config()?;
    config.output.results_dir = Some(output_dir.path().join("results"));
    config.output.report_dir = Some(output_dir.path().join("reports"));

    let runs = detect::start(&config)?;
    assert_eq!(runs.len(), 2);

    // excluded folders are not scored
    let yolo = &runs[0].report;
    assert_eq!(yolo.title(), "yolo");
    assert_eq!(
        folder_totals(yolo),
        vec![
            ("Indoor", ConfusionTotals::new(2, 3, 1, 1)),
            ("On-road", ConfusionTotals::new(3, 2, 0, 2)),
        ]
    );
    assert_eq!(yolo.total().totals, ConfusionTotals::new(5, 5, 1, 3));

    let frcnn = &runs[1].report;
    assert_eq!(
        folder_totals(frcnn),
        vec![
            ("Indoor", ConfusionTotals::new(2, 2, 2, 1)),
            ("On-road", ConfusionTotals::new(3, 2, 0, 2)),
        ]
    );
    assert_eq!(frcnn.total().totals, ConfusionTotals::new(5, 4, 2, 3));

    // reports
    let text = fs::read_to_string(output_dir.path().join("reports/yolo.csv"))?;
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "folder,accuracy,precision,recall,f1,TP,TN,FP,FN");
    assert_eq!(lines[2], "On-road,0.71,1.00,0.60,0.75,3,2,0,2");
    assert_eq!(lines[3], "Total,0.71,0.83,0.63,0.71,5,5,1,3");
    assert!(output_dir.path().join("reports/frcnn.csv").is_file());

    // sidecars of successful images only
    let results_dir = output_dir.path().join("results/yolo");
    let saved: Vec<SavedDetection> = serde_json::from_str(&fs::read_to_string(
        results_dir.join("Indoor/IMG_0101.jpg.json"),
    )?)?;
    assert_eq!(saved.len(), 3);
    assert!(!results_dir.join("Indoor/IMG_0102.jpg.json").exists());
    assert!(!results_dir.join("Advanced Scenarios").exists());

    let saved: Vec<SavedDetection> = serde_json::from_str(&fs::read_to_string(
        results_dir.join("On-road/IMG_0002.jpg.json"),
    )?)?;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].class, "car");
    assert_eq!(saved[0].tlbr, [0.0, 0.0, 50.0, 50.0]);

    Ok(())
}

#[test]
fn dropped_zero_pairs_add_no_true_negatives() -> Result<()> {
    let mut config = load_config()?;
    config.scoring.zero_pair_policy = ZeroPairPolicy::Drop;
    config.detectors.truncate(1);

    let runs = detect::start(&config)?;
    assert_eq!(
        runs[0].report.total().totals,
        ConfusionTotals::new(5, 0, 1, 3)
    );
    Ok(())
}

#[test]
fn detector_failures_are_kept_per_image() -> Result<()> {
    let config = load_config()?;
    let runs = detect::start(&config)?;

    // the yolo recording has no entry for one indoor image
    let failures: Vec<_> = runs[0].failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].image.ends_with("IMG_0102.jpg"));
    assert_eq!(runs[0].outcomes.len(), 2);
    assert_eq!(runs[0].outcomes[0].images.len(), 2);

    assert_eq!(runs[1].num_failures(), 0);
    Ok(())
}

#[test]
fn unwritable_results_dir_keeps_the_scores() -> Result<()> {
    let output_dir = tempfile::tempdir()?;
    let blocker = output_dir.path().join("results");
    fs::write(&blocker, "not a directory")?;

    let mut config = load_config()?;
    config.output.results_dir = Some(blocker);
    config.output.report_dir = Some(output_dir.path().join("reports"));

    let runs = detect::start(&config)?;
    assert_eq!(
        runs[0].report.total().totals,
        ConfusionTotals::new(5, 5, 1, 3)
    );
    assert!(output_dir.path().join("reports/yolo.csv").is_file());
    assert!(output_dir.path().join("reports/frcnn.csv").is_file());
    Ok(())
}

#[test]
fn missing_ground_truth_row_halts_the_run() -> Result<()> {
    let ground_truth_dir = tempfile::tempdir()?;
    fs::copy(
        manifest_dir().join("tests/fixtures/ground_truth/Indoor.csv"),
        ground_truth_dir.path().join("Indoor.csv"),
    )?;
    fs::write(
        ground_truth_dir.path().join("On-road.csv"),
        "Image,person,car,dog\nIMG_0001.jpg,1,2,0\n",
    )?;

    let mut config = load_config()?;
    config.ground_truth.dir = ground_truth_dir.path().to_owned();

    let err = detect::start(&config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScoringError>(),
        Some(ScoringError::IdentifierMismatch { expected, .. }) if expected == "IMG_0002.jpg"
    ));
    Ok(())
}

#[test]
fn missing_ground_truth_file_is_an_error() -> Result<()> {
    let ground_truth_dir = tempfile::tempdir()?;
    fs::copy(
        manifest_dir().join("tests/fixtures/ground_truth/Indoor.csv"),
        ground_truth_dir.path().join("Indoor.csv"),
    )?;

    let mut config = load_config()?;
    config.ground_truth.dir = ground_truth_dir.path().to_owned();
    assert!(detect::start(&config).is_err());
    Ok(())
}
