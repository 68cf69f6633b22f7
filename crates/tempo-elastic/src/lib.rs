//! Elastic distance kernels for time series.
//!
//! Pure math library, zero I/O. Provides windowed Dynamic Time Warping with
//! early abandoning and cell pruning, warping path width extraction, Keogh
//! envelopes with the LB_Keogh lower bound, and locked-step Euclidean
//! distance.

mod distance;
mod dtw;
mod envelope;
mod error;
mod euclidean;
mod pruned;
mod series;
mod window;

pub use distance::Distance;
pub use dtw::{Dtw, DtwDetails};
pub use envelope::{Envelope, lb_keogh, lb_keogh_squared};
pub use error::ElasticError;
pub use euclidean::{euclidean, squared_euclidean, squared_euclidean_early_abandon};
pub use series::{Sequence, SequenceView};
pub use window::WarpingWindow;
