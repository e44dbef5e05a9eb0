//! Detector adapters turn raw detector outputs into detection counts.

use crate::{
    common::*,
    error::{DetectorFailure, ScoringError},
    identifier::image_identifier,
    table::DetectionCountTable,
    vocabulary::ClassVocabulary,
};

/// A detector candidate in pixel or normalized TLBR coordinates.
pub type RawDetection = Detection<TLBR<f64>, String>;

const SINGLE_PASS_CONFIDENCE_THRESHOLD: f64 = 0.7;
const SINGLE_PASS_NMS_SCORE_THRESHOLD: f64 = 0.8;
const SINGLE_PASS_NMS_IOU_THRESHOLD: f64 = 0.8;
const TWO_STAGE_CONFIDENCE_THRESHOLD: f64 = 0.7;
const TWO_STAGE_NMS_IOU_THRESHOLD: f64 = 0.6;

/// The runtime running a detection model on images.
pub trait DetectorBackend {
    fn detect(&mut self, image: &Path) -> Result<Vec<RawDetection>>;
}

impl<B> DetectorBackend for Box<B>
where
    B: DetectorBackend + ?Sized,
{
    fn detect(&mut self, image: &Path) -> Result<Vec<RawDetection>> {
        (**self).detect(image)
    }
}

/// Model families, each with fixed filtering thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Single-pass detector (YOLO family).
    SinglePass,
    /// Two-stage region proposal detector (Faster R-CNN family).
    TwoStage,
}

impl DetectorKind {
    /// Detections at or below this confidence are rejected.
    pub fn confidence_threshold(&self) -> R64 {
        match self {
            Self::SinglePass => r64(SINGLE_PASS_CONFIDENCE_THRESHOLD),
            Self::TwoStage => r64(TWO_STAGE_CONFIDENCE_THRESHOLD),
        }
    }

    pub fn nms_score_threshold(&self) -> Option<R64> {
        match self {
            Self::SinglePass => Some(r64(SINGLE_PASS_NMS_SCORE_THRESHOLD)),
            Self::TwoStage => None,
        }
    }

    pub fn nms_iou_threshold(&self) -> R64 {
        match self {
            Self::SinglePass => r64(SINGLE_PASS_NMS_IOU_THRESHOLD),
            Self::TwoStage => r64(TWO_STAGE_NMS_IOU_THRESHOLD),
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SinglePass => "single-pass",
            Self::TwoStage => "two-stage",
        };
        write!(f, "{}", text)
    }
}

/// The result of running the detector on one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOutcome {
    pub image: String,
    /// The detections counted for the image, or the reason nothing was counted.
    pub result: Result<Vec<RawDetection>, DetectorFailure>,
}

impl ImageOutcome {
    pub fn num_detections(&self) -> usize {
        self.result.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// The counts of a processed folder with the outcome of each image.
#[derive(Debug, Clone)]
pub struct FolderOutcome {
    pub folder: String,
    pub table: DetectionCountTable,
    pub images: Vec<ImageOutcome>,
}

impl FolderOutcome {
    pub fn failures(&self) -> impl Iterator<Item = &DetectorFailure> + '_ {
        self.images
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err())
    }

    pub fn num_failures(&self) -> usize {
        self.failures().count()
    }
}

#[derive(Debug)]
pub struct DetectorAdapter<B>
where
    B: DetectorBackend,
{
    kind: DetectorKind,
    nms: NonMaxSuppression,
    backend: B,
}

impl<B> DetectorAdapter<B>
where
    B: DetectorBackend,
{
    pub fn new(kind: DetectorKind, backend: B) -> Result<Self> {
        let nms = NonMaxSuppression::new(kind.nms_iou_threshold(), kind.nms_score_threshold())?;
        Ok(Self { kind, nms, backend })
    }

    pub fn kind(&self) -> DetectorKind {
        self.kind
    }

    /// Apply the confidence threshold and non-maximum suppression of this detector.
    pub fn filter(&self, detections: Vec<RawDetection>) -> Vec<RawDetection> {
        let confidence_threshold = self.kind.confidence_threshold();
        let candidates: Vec<_> = detections
            .into_iter()
            .filter(|det| det.confidence > confidence_threshold)
            .collect();
        self.nms.forward(candidates)
    }

    /// Detect objects in one image and count them in the image's row.
    ///
    /// A backend failure leaves the row untouched and is reported in the outcome. A label
    /// outside the vocabulary is an error and leaves the row untouched.
    pub fn process_image(
        &mut self,
        image: &Path,
        table: &mut DetectionCountTable,
    ) -> Result<ImageOutcome, ScoringError> {
        let image_id = image_identifier(image);
        if !table.contains(&image_id) {
            return Err(ScoringError::UnknownImage { image: image_id });
        }

        let detections = match self.backend.detect(image) {
            Ok(detections) => self.filter(detections),
            Err(err) => {
                let failure = DetectorFailure {
                    image: image_id.clone(),
                    reason: format!("{:#}", err),
                };
                warn!("{}", failure);
                return Ok(ImageOutcome {
                    image: image_id,
                    result: Err(failure),
                });
            }
        };

        let vocabulary = table.vocabulary().clone();
        for det in &detections {
            vocabulary.try_index_of(det.class())?;
        }
        for det in &detections {
            table.increment(&image_id, det.class())?;
        }

        Ok(ImageOutcome {
            image: image_id,
            result: Ok(detections),
        })
    }

    /// Count detections over all files of a folder in file order.
    pub fn process_folder<P>(
        &mut self,
        folder: &str,
        files: &[P],
        vocabulary: Arc<ClassVocabulary>,
    ) -> Result<FolderOutcome, ScoringError>
    where
        P: AsRef<Path>,
    {
        let mut table = DetectionCountTable::new(
            vocabulary,
            files.iter().map(|file| image_identifier(file.as_ref())),
        )?;

        let images: Vec<_> = files
            .iter()
            .map(|file| self.process_image(file.as_ref(), &mut table))
            .try_collect()?;

        let outcome = FolderOutcome {
            folder: folder.to_owned(),
            table,
            images,
        };
        info!(
            "{} detector processed {} images of '{}' with {} failures",
            self.kind,
            outcome.images.len(),
            folder,
            outcome.num_failures()
        );

        Ok(outcome)
    }
}
