use crate::common::*;

/// The identifier a detector reports for an image, the full file path.
pub fn image_identifier(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Map a detector image identifier to the identifier used by the ground truth table.
///
/// The ground truth indexes images by bare file name, so the last `/`-separated segment is
/// taken. Backslashes are ordinary file name characters.
pub fn ground_truth_identifier(predicted: &str) -> &str {
    predicted.rsplit('/').next().unwrap_or(predicted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_last_path_segment() {
        assert_eq!(
            ground_truth_identifier("../data/On-road Scenario/IMG_0001.jpg"),
            "IMG_0001.jpg"
        );
        assert_eq!(
            ground_truth_identifier("data/night/back\\slash.png"),
            "back\\slash.png"
        );
        assert_eq!(ground_truth_identifier("bare.jpg"), "bare.jpg");
    }

    #[test]
    fn identifier_of_path() {
        let path = Path::new("../data").join("street").join("IMG_0001.jpg");
        let id = image_identifier(&path);
        assert_eq!(ground_truth_identifier(&id), "IMG_0001.jpg");
    }
}
