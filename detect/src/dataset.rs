//! Image folder enumeration and ground truth loading.

use crate::{
    common::*,
    config::{DatasetConfig, GroundTruthConfig},
};
use glob::Pattern;
use scoring::display_folder_name;

/// An image folder with its files in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFolder {
    /// The folder path as given by the enumeration, used to key tables.
    pub identifier: String,
    /// The folder path relative to the dataset root.
    pub name: String,
    pub files: Vec<PathBuf>,
}

/// List the image folders under the dataset root.
///
/// Every directory below the root is visited in sorted order. Folders whose name contains an
/// excluded pattern, and folders without files, are skipped.
pub fn list_folders(config: &DatasetConfig) -> Result<Vec<DatasetFolder>> {
    let DatasetConfig { root, exclude } = config;
    ensure!(
        root.is_dir(),
        "dataset root '{}' is not a directory",
        root.display()
    );

    let mut dirs: Vec<PathBuf> = glob::glob(&format!("{}/**/*", escape_path(root)))?
        .map(|result| -> Result<_> {
            let path = result?;
            Ok(path.is_dir().then(|| path))
        })
        .filter_map(|result| result.transpose())
        .try_collect()?;
    dirs.sort();

    let mut folders = vec![];

    for dir in dirs {
        let identifier = dir.to_string_lossy().into_owned();
        let name = display_folder_name(&identifier, root);

        if let Some(pattern) = exclude.iter().find(|pattern| name.contains(pattern.as_str())) {
            debug!("exclude folder '{}' matching '{}'", name, pattern);
            continue;
        }

        let files = list_files(&dir)?;
        if files.is_empty() {
            debug!("skip folder '{}' without files", name);
            continue;
        }

        folders.push(DatasetFolder {
            identifier,
            name,
            files,
        });
    }

    info!(
        "found {} image folders under '{}'",
        folders.len(),
        root.display()
    );

    Ok(folders)
}

/// List the `*.*` files of a directory in sorted order.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob::glob(&format!("{}/*.*", escape_path(dir)))?
        .map(|result| -> Result<_> {
            let path = result?;
            Ok(path.is_file().then(|| path))
        })
        .filter_map(|result| result.transpose())
        .try_collect()?;
    files.sort();
    Ok(files)
}

fn escape_path(path: &Path) -> String {
    Pattern::escape(&path.to_string_lossy())
}

/// Load the ground truth table of every folder.
///
/// The table of a folder is read from `<dir>/<folder name>.csv`. A folder without a ground
/// truth file is an error.
pub fn load_ground_truth(
    config: &GroundTruthConfig,
    folders: &[DatasetFolder],
    vocabulary: Arc<ClassVocabulary>,
) -> Result<GroundTruth> {
    let GroundTruthConfig { dir, image_column } = config;
    let mut ground_truth = GroundTruth::new();

    for folder in folders {
        let path = dir.join(format!("{}.csv", folder.name));
        ensure!(
            path.is_file(),
            "ground truth file '{}' of folder '{}' is missing",
            path.display(),
            folder.name
        );

        let table = GroundTruthTable::load(&path, vocabulary.clone(), image_column)?;
        debug!(
            "loaded {} ground truth rows of folder '{}'",
            table.len(),
            folder.name
        );
        ground_truth.insert(folder.identifier.clone(), table);
    }

    info!("loaded ground truth of {} folders", ground_truth.len());
    Ok(ground_truth)
}
