pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use bbox::{prelude::*, CyCxHW, TLBR};
pub use itertools::Itertools as _;
pub use label::Detection;
pub use log::{debug, info, warn};
pub use noisy_float::prelude::*;
pub use once_cell::sync::Lazy;
pub use scoring::{
    ClassVocabulary, DetectorBackend, DetectorKind, GroundTruth, GroundTruthTable, RawDetection,
    Report, ZeroPairPolicy,
};
pub use semver::{Version, VersionReq};
pub use serde::{de::Error as DeserializeError, Deserialize, Deserializer, Serialize};
pub use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
