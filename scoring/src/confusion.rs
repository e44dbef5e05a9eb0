//! Count reconciliation between expected and predicted per-class counts.
//!
//! Each (image, class) pair contributes unit counts to TP, FP and FN, so one pair may add more
//! than one to these totals. TN grows by exactly one for a pair where both counts are zero.

use crate::{common::*, error::ScoringError};

/// How an (image, class) pair with zero expected and zero predicted objects is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPairPolicy {
    /// Count the pair as one true negative.
    CountTrueNegative,
    /// Remove the pair before scoring so it contributes nothing.
    Drop,
}

impl Default for ZeroPairPolicy {
    fn default() -> Self {
        Self::CountTrueNegative
    }
}

/// Running TP, TN, FP and FN totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfusionTotals {
    pub true_positive: u64,
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl ConfusionTotals {
    pub fn new(
        true_positive: u64,
        true_negative: u64,
        false_positive: u64,
        false_negative: u64,
    ) -> Self {
        Self {
            true_positive,
            true_negative,
            false_positive,
            false_negative,
        }
    }

    /// Score one image given its expected and predicted rows, aligned to the same vocabulary.
    pub fn accumulate(
        &mut self,
        expected: &[u64],
        predicted: &[u64],
        policy: ZeroPairPolicy,
    ) -> Result<(), ScoringError> {
        if expected.len() != predicted.len() {
            return Err(ScoringError::VocabularyMismatch);
        }

        expected
            .iter()
            .zip(predicted)
            .for_each(|(&expected, &predicted)| {
                self.accumulate_class(expected, predicted, policy);
            });
        Ok(())
    }

    /// Score the counts of a single class of one image.
    pub fn accumulate_class(&mut self, expected: u64, predicted: u64, policy: ZeroPairPolicy) {
        if expected == 0 && predicted == 0 {
            if policy == ZeroPairPolicy::CountTrueNegative {
                self.true_negative += 1;
            }
            return;
        }

        match predicted.cmp(&expected) {
            Ordering::Less => {
                // missed objects
                self.true_positive += predicted;
                self.false_negative += expected - predicted;
            }
            Ordering::Greater => {
                // spurious objects
                self.true_positive += expected;
                self.false_positive += predicted - expected;
            }
            Ordering::Equal => {
                self.true_positive += expected;
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }
}

impl Add for ConfusionTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            true_positive: self.true_positive + rhs.true_positive,
            true_negative: self.true_negative + rhs.true_negative,
            false_positive: self.false_positive + rhs.false_positive,
            false_negative: self.false_negative + rhs.false_negative,
        }
    }
}

impl AddAssign for ConfusionTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ConfusionTotals {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a ConfusionTotals> for ConfusionTotals {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a ConfusionTotals>,
    {
        iter.copied().sum()
    }
}
