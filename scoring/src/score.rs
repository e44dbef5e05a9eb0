use crate::{
    common::*,
    confusion::{ConfusionTotals, ZeroPairPolicy},
    error::ScoringError,
    ground_truth::GroundTruthTable,
    identifier::ground_truth_identifier,
    table::DetectionCountTable,
};

/// Score every row of a folder's detection counts against its ground truth.
///
/// Each predicted identifier is mapped to the ground truth identifier before lookup. A row
/// without ground truth aborts the scoring pass of the folder.
pub fn score_folder(
    folder: &str,
    predicted: &DetectionCountTable,
    expected: &GroundTruthTable,
    policy: ZeroPairPolicy,
) -> Result<ConfusionTotals, ScoringError> {
    if !Arc::ptr_eq(predicted.vocabulary(), expected.vocabulary())
        && predicted.vocabulary() != expected.vocabulary()
    {
        return Err(ScoringError::VocabularyMismatch);
    }

    let mut totals = ConfusionTotals::default();

    for (image, predicted_row) in predicted.rows() {
        let expected_id = ground_truth_identifier(image);
        let expected_row =
            expected
                .row(expected_id)
                .ok_or_else(|| ScoringError::IdentifierMismatch {
                    folder: folder.to_owned(),
                    predicted: image.to_owned(),
                    expected: expected_id.to_owned(),
                })?;
        totals.accumulate(expected_row, predicted_row, policy)?;
    }

    debug!(
        "scored {} images of folder '{}': {:?}",
        predicted.len(),
        folder,
        totals
    );

    Ok(totals)
}
