pub use anyhow::{ensure, format_err, Context as _, Result};
pub use bbox::TLBR;
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools as _;
pub use label::{Detection, NonMaxSuppression};
pub use log::{debug, info, warn};
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    cmp::Ordering,
    fmt, fs, io,
    iter::{self, Sum},
    ops::{Add, AddAssign},
    path::{Path, PathBuf},
    sync::Arc,
};
