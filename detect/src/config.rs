use crate::common::*;

pub use dataset::*;
pub use detector::*;
pub use ground_truth::*;
pub use output::*;
pub use score::*;

pub static CONFIG_VERSION: Lazy<VersionReq> = Lazy::new(|| VersionReq::parse("0.1.0").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_version")]
    pub version: Version,
    pub dataset: DatasetConfig,
    /// The file listing one class name per line.
    pub classes_file: PathBuf,
    pub ground_truth: GroundTruthConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    pub detectors: Vec<DetectorConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config: Self = json5::from_str(&text)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        ensure!(!self.detectors.is_empty(), "no detector is configured");

        let duplicated = self
            .detectors
            .iter()
            .map(|detector| detector.name.as_str())
            .duplicates()
            .next();
        if let Some(name) = duplicated {
            bail!("duplicated detector name '{}'", name);
        }

        for detector in &self.detectors {
            ensure!(
                !detector.name.is_empty() && !detector.name.contains(['/', '\\']),
                "invalid detector name '{}'",
                detector.name
            );
        }

        Ok(())
    }
}

mod dataset {
    use super::*;

    /// Image folder options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        /// The directory containing the image folders.
        pub root: PathBuf,
        /// Folders whose path relative to the root contains any of these strings are skipped.
        #[serde(default = "default_exclude")]
        pub exclude: Vec<String>,
    }

    fn default_exclude() -> Vec<String> {
        vec!["Advanced Scenarios".into(), "Semantic Segmentation".into()]
    }
}

mod ground_truth {
    use super::*;

    /// Ground truth table options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GroundTruthConfig {
        /// The directory containing one `<folder name>.csv` file per image folder.
        pub dir: PathBuf,
        /// The name of the column holding image file names.
        #[serde(default = "default_image_column")]
        pub image_column: String,
    }

    fn default_image_column() -> String {
        scoring::DEFAULT_IMAGE_COLUMN.into()
    }
}

mod score {
    use super::*;

    /// Confusion accumulation options.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct ScoringConfig {
        /// How classes absent from both the ground truth and the detections of an image count.
        #[serde(default)]
        pub zero_pair_policy: ZeroPairPolicy,
    }
}

mod detector {
    use super::*;

    /// A detector to be scored.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DetectorConfig {
        /// The name used in the report title and output paths.
        pub name: String,
        pub kind: DetectorKind,
        /// The recorded raw detector outputs to be replayed.
        pub detections_file: PathBuf,
    }
}

mod output {
    use super::*;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct OutputConfig {
        /// Save accepted detections of each image under this directory.
        pub results_dir: Option<PathBuf>,
        /// Save a CSV report per detector under this directory.
        pub report_dir: Option<PathBuf>,
    }
}

pub fn deserialize_version<'de, D>(deserializer: D) -> Result<Version, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let version = Version::parse(&text).map_err(|err| {
        D::Error::custom(format!(
            "failed to parse version number '{}': {:?}",
            text, err
        ))
    })?;

    if !CONFIG_VERSION.matches(&version) {
        return Err(D::Error::custom(format!(
            "incompatible version: get '{}', but it is incompatible with requirement '{}'",
            version, &*CONFIG_VERSION,
        )));
    }

    Ok(version)
}
