use crate::{common::*, confusion::ConfusionTotals};

/// A ratio metric that is undefined when its denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Defined(R64),
    Undefined,
}

impl Metric {
    pub fn ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            Self::Undefined
        } else {
            Self::Defined(r64(numerator as f64 / denominator as f64))
        }
    }

    pub fn value(&self) -> Option<R64> {
        match *self {
            Self::Defined(value) => Some(value),
            Self::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Round to two decimal places, half away from zero.
    pub fn rounded(&self) -> Self {
        match *self {
            Self::Defined(value) => Self::Defined((value * 100.0).round() / 100.0),
            Self::Undefined => Self::Undefined,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(value) => write!(f, "{:.2}", value.raw()),
            Self::Undefined => write!(f, "NaN"),
        }
    }
}

/// Accuracy, precision, recall and F1 score derived from confusion totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Metrics {
    pub accuracy: Metric,
    pub precision: Metric,
    pub recall: Metric,
    pub f1: Metric,
}

impl Metrics {
    pub fn from_totals(totals: &ConfusionTotals) -> Self {
        let ConfusionTotals {
            true_positive: tp,
            true_negative: tn,
            false_positive: fp,
            false_negative: fn_,
        } = *totals;

        let accuracy = Metric::ratio(tp + tn, tp + tn + fp + fn_);
        let precision = Metric::ratio(tp, tp + fp);
        let recall = Metric::ratio(tp, tp + fn_);

        let f1 = match (precision, recall) {
            (Metric::Defined(precision), Metric::Defined(recall)) if precision + recall > 0.0 => {
                Metric::Defined(precision * recall * 2.0 / (precision + recall))
            }
            _ => Metric::Undefined,
        };

        Self {
            accuracy,
            precision,
            recall,
            f1,
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            accuracy: self.accuracy.rounded(),
            precision: self.precision.rounded(),
            recall: self.recall.rounded(),
            f1: self.f1.rounded(),
        }
    }
}
