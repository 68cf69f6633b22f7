//! File I/O, validation, and serialization for the tempo pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{Dataset, ExperimentName};
pub use error::IoError;
pub use reader::DatasetReader;
pub use writer::{ResultWriter, write_dataset};
