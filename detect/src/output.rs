//! Detection sidecar files and report locations.

use crate::common::*;

/// An accepted detection as saved in a sidecar file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDetection {
    pub class: String,
    pub confidence: R64,
    pub tlbr: [f64; 4],
}

impl From<&RawDetection> for SavedDetection {
    fn from(det: &RawDetection) -> Self {
        Self {
            class: det.class().clone(),
            confidence: det.confidence,
            tlbr: det.rect().tlbr(),
        }
    }
}

/// The sidecar path `<results_dir>/<detector>/<image path relative to root>.json`.
pub fn sidecar_path(
    results_dir: &Path,
    detector: &str,
    dataset_root: &Path,
    image: &Path,
) -> Result<PathBuf> {
    let relative = image.strip_prefix(dataset_root).with_context(|| {
        format!(
            "image '{}' is not under the dataset root '{}'",
            image.display(),
            dataset_root.display()
        )
    })?;
    let mut path = results_dir.join(detector).join(relative).into_os_string();
    path.push(".json");
    Ok(PathBuf::from(path))
}

/// Write the accepted detections of an image as JSON, creating parent directories.
pub fn save_detections(path: &Path, detections: &[RawDetection]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
    }

    let saved: Vec<SavedDetection> = detections.iter().map(SavedDetection::from).collect();
    let text = serde_json::to_string_pretty(&saved)?;
    fs::write(path, text)
        .with_context(|| format!("failed to write detections file '{}'", path.display()))?;
    Ok(())
}

/// The CSV report path `<report_dir>/<detector>.csv`.
pub fn report_path(report_dir: &Path, detector: &str) -> PathBuf {
    report_dir.join(format!("{}.csv", detector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_mirrors_dataset_layout() {
        let path = sidecar_path(
            Path::new("results"),
            "yolo",
            Path::new("data"),
            Path::new("data/On-road/IMG_0001.jpg"),
        )
        .unwrap();
        assert_eq!(path, Path::new("results/yolo/On-road/IMG_0001.jpg.json"));

        assert!(sidecar_path(
            Path::new("results"),
            "yolo",
            Path::new("data"),
            Path::new("other/a.jpg"),
        )
        .is_err());
    }

    #[test]
    fn save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frcnn").join("street").join("a.jpg.json");
        let dets = vec![Detection::new(
            TLBR::try_from_tlbr([1.0, 2.0, 3.0, 4.0]).unwrap(),
            "car".to_owned(),
            r64(0.9),
        )];

        save_detections(&path, &dets).unwrap();

        let saved: Vec<SavedDetection> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            saved,
            vec![SavedDetection {
                class: "car".into(),
                confidence: r64(0.9),
                tlbr: [1.0, 2.0, 3.0, 4.0],
            }]
        );
    }
}
