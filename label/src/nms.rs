use crate::{common::*, Detection};

/// Class-agnostic greedy non-maximum suppression.
#[derive(Debug, Clone)]
pub struct NonMaxSuppression {
    iou_threshold: R64,
    score_threshold: Option<R64>,
}

impl NonMaxSuppression {
    pub fn new(iou_threshold: R64, score_threshold: Option<R64>) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&iou_threshold.raw()),
            "iou_threshold must be in range [0, 1], but get {}",
            iou_threshold
        );
        if let Some(score_threshold) = score_threshold {
            ensure!(
                score_threshold >= 0.0,
                "score_threshold must be non-negative, but get {}",
                score_threshold
            );
        }

        Ok(Self {
            iou_threshold,
            score_threshold,
        })
    }

    pub fn iou_threshold(&self) -> R64 {
        self.iou_threshold
    }

    pub fn score_threshold(&self) -> Option<R64> {
        self.score_threshold
    }

    /// Keep the detections that survive suppression, ordered by decreasing confidence.
    ///
    /// Candidates at or below the score threshold are discarded first. A candidate is
    /// suppressed when its IoU with an already kept box is strictly above the IoU threshold,
    /// regardless of class. Equal confidences keep their input order.
    pub fn forward<R, C>(&self, detections: Vec<Detection<R, C>>) -> Vec<Detection<R, C>>
    where
        R: Rect<Type = f64>,
    {
        let Self {
            iou_threshold,
            score_threshold,
        } = *self;
        let iou_threshold = iou_threshold.raw();

        let candidates = detections
            .into_iter()
            .filter(|det| match score_threshold {
                Some(thresh) => det.confidence > thresh,
                None => true,
            })
            .sorted_by(|lhs, rhs| rhs.confidence.cmp(&lhs.confidence));

        let mut kept: Vec<Detection<R, C>> = vec![];

        for candidate in candidates {
            let overlapped = kept
                .iter()
                .any(|other| candidate.rect().iou_with(other.rect()) > iou_threshold);

            if overlapped {
                trace!(
                    "suppress candidate with confidence {}",
                    candidate.confidence
                );
            } else {
                kept.push(candidate);
            }
        }

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(tlbr: [f64; 4], class: &'static str, confidence: f64) -> Detection<TLBR<f64>, &'static str> {
        Detection::new(TLBR::try_from_tlbr(tlbr).unwrap(), class, r64(confidence))
    }

    #[test]
    fn suppression_is_class_agnostic() {
        let nms = NonMaxSuppression::new(r64(0.5), None).unwrap();
        let kept = nms.forward(vec![
            det([0.0, 0.0, 10.0, 10.0], "car", 0.80),
            det([0.0, 0.0, 10.0, 9.0], "truck", 0.95),
            det([50.0, 50.0, 60.0, 60.0], "car", 0.75),
        ]);

        let classes: Vec<_> = kept.iter().map(|det| *det.class()).collect();
        assert_eq!(classes, vec!["truck", "car"]);
        assert_eq!(kept[1].confidence, r64(0.75));
    }

    #[test]
    fn overlap_equal_to_threshold_is_kept() {
        // IoU of these boxes is exactly 0.5
        let nms = NonMaxSuppression::new(r64(0.5), None).unwrap();
        let kept = nms.forward(vec![
            det([0.0, 0.0, 10.0, 10.0], "person", 0.9),
            det([0.0, 0.0, 10.0, 5.0], "person", 0.8),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn score_threshold_is_exclusive() {
        let nms = NonMaxSuppression::new(r64(0.8), Some(r64(0.8))).unwrap();
        let kept = nms.forward(vec![
            det([0.0, 0.0, 1.0, 1.0], "dog", 0.8),
            det([5.0, 5.0, 6.0, 6.0], "dog", 0.81),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].confidence, r64(0.81));
    }

    #[test]
    fn reject_invalid_thresholds() {
        assert!(NonMaxSuppression::new(r64(1.5), None).is_err());
        assert!(NonMaxSuppression::new(r64(0.5), Some(r64(-0.1))).is_err());
    }
}
