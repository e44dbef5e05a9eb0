//! The replay detector back end.

use crate::common::*;

/// A box in one of the supported coordinate formats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordedBox {
    /// Top, left, bottom and right edges in pixels.
    Tlbr([f64; 4]),
    /// Center y, center x, height and width in pixels.
    Cycxhw([f64; 4]),
    /// Center format in ratio units of the image height and width.
    NormalizedCycxhw {
        cycxhw: [f64; 4],
        image_hw: [f64; 2],
    },
}

/// A raw detector output recorded for an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedDetection {
    pub class: String,
    pub confidence: R64,
    #[serde(rename = "box")]
    pub rect: RecordedBox,
}

impl RecordedDetection {
    pub fn to_detection(&self) -> Result<RawDetection> {
        let Self {
            ref class,
            confidence,
            rect,
        } = *self;
        ensure!(
            (0.0..=1.0).contains(&confidence.raw()),
            "confidence {} of class '{}' is out of range",
            confidence,
            class
        );

        let class = class.clone();
        let detection: RawDetection = match rect {
            RecordedBox::Tlbr(tlbr) => {
                Detection::new(TLBR::try_from_tlbr(tlbr)?, class, confidence)
            }
            RecordedBox::Cycxhw(cycxhw) => {
                Detection::new(CyCxHW::try_from_cycxhw(cycxhw)?, class, confidence).into()
            }
            RecordedBox::NormalizedCycxhw {
                cycxhw,
                image_hw: [image_h, image_w],
            } => {
                let rect = CyCxHW::try_from_cycxhw(cycxhw)?.try_scale_hw(image_h, image_w)?;
                Detection::new(rect, class, confidence).into()
            }
        };
        Ok(detection)
    }
}

/// Replays recorded detector outputs.
///
/// Records are keyed by the image path relative to the dataset root, with `/` separators.
/// An image without a record, or an unreadable image file, fails detection.
#[derive(Debug, Clone)]
pub struct ReplayBackend {
    dataset_root: PathBuf,
    records: HashMap<String, Vec<RecordedDetection>>,
}

impl ReplayBackend {
    pub fn new(
        dataset_root: impl AsRef<Path>,
        records: HashMap<String, Vec<RecordedDetection>>,
    ) -> Self {
        Self {
            dataset_root: dataset_root.as_ref().to_owned(),
            records,
        }
    }

    /// Load recorded outputs from a JSON file.
    pub fn load(path: impl AsRef<Path>, dataset_root: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read detections file '{}'", path.display()))?;
        let records: HashMap<String, Vec<RecordedDetection>> = serde_json::from_str(&text)
            .with_context(|| format!("invalid detections file '{}'", path.display()))?;
        debug!(
            "loaded recorded detections of {} images from '{}'",
            records.len(),
            path.display()
        );
        Ok(Self::new(dataset_root, records))
    }

    fn record_key(&self, image: &Path) -> Result<String> {
        let relative = image.strip_prefix(&self.dataset_root).with_context(|| {
            format!(
                "image '{}' is not under the dataset root '{}'",
                image.display(),
                self.dataset_root.display()
            )
        })?;
        let key = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .join("/");
        Ok(key)
    }
}

impl DetectorBackend for ReplayBackend {
    fn detect(&mut self, image: &Path) -> Result<Vec<RawDetection>> {
        ensure!(
            image.is_file(),
            "image file '{}' cannot be read",
            image.display()
        );
        let key = self.record_key(image)?;
        let records = self
            .records
            .get(&key)
            .ok_or_else(|| format_err!("no recorded detections for '{}'", key))?;
        records
            .iter()
            .map(RecordedDetection::to_detection)
            .try_collect()
    }
}
