//! Warping window search and nearest-neighbor classification over DTW.
//!
//! Provides a FastWWS-style search for the warping window that minimizes
//! leave-one-out nearest-neighbor error, a lower-bound cascade that defers
//! exact DTW until cheaper evidence is exhausted, and a 1-NN classifier for
//! held-out queries.

mod cache;
mod classify;
mod config;
mod error;
mod fastwws;
mod label;
mod lazy;
mod result;

pub use cache::SequenceStatsCache;
pub use classify::NnClassifier;
pub use config::{Refinement, SearchConfig};
pub use error::SearchError;
pub use fastwws::{NnEntry, NnStatus};
pub use label::ClassLabel;
pub use lazy::{LazyAssessment, Stage, Verdict};
pub use result::{ClassificationResult, Prediction, WindowSearchResult};
