//! Per-class detection counting and count-based confusion matrix scoring.

mod common;
pub mod adapter;
pub mod confusion;
pub mod error;
pub mod ground_truth;
pub mod identifier;
pub mod metrics;
pub mod report;
pub mod score;
pub mod table;
pub mod vocabulary;

pub use adapter::*;
pub use confusion::*;
pub use error::*;
pub use ground_truth::*;
pub use identifier::*;
pub use metrics::*;
pub use report::*;
pub use score::*;
pub use table::*;
pub use vocabulary::*;
