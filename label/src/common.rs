pub use anyhow::{ensure, Result};
pub use bbox::{prelude::*, TLBR};
pub use itertools::Itertools as _;
pub use log::trace;
pub use noisy_float::prelude::*;
