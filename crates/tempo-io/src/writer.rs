//! Result writers for search and classification outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use tempo_search::{ClassLabel, ClassificationResult, WindowSearchResult};

use crate::IoError;
use crate::domain::{Dataset, ExperimentName};

/// Writes search and classification results to files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_search.json`,
/// `{experiment}_windows.csv`, and `{experiment}_classify.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write a window search report to `{experiment}_search.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_search(
        &self,
        dataset: &str,
        n_sequences: usize,
        result: &WindowSearchResult,
    ) -> Result<(), IoError> {
        let path = self
            .output_dir
            .join(format!("{}_search.json", self.experiment.as_str()));

        let artifact = SearchArtifact {
            experiment: self.experiment.as_str(),
            dataset,
            n_sequences,
            best_window: result.best_window,
            best_error: result.best_error,
            accuracy: result.accuracy(),
            dtw_count: result.dtw_count,
            errors: result.errors.as_slice(),
        };

        let json = serde_json::to_string_pretty(&artifact).expect("serialization cannot fail");
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "search result written");
        Ok(())
    }

    /// Write the per-window error curve to `{experiment}_windows.csv`.
    ///
    /// One row per window radius, columns `window,error`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_window_scores(&self, result: &WindowSearchResult) -> Result<(), IoError> {
        let path = self
            .output_dir
            .join(format!("{}_windows.csv", self.experiment.as_str()));

        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["window", "error"])
            .expect("in-memory CSV write cannot fail");
        for (window, error) in result.errors.iter().enumerate() {
            wtr.write_record([window.to_string(), error.to_string()])
                .expect("in-memory CSV write cannot fail");
        }
        let bytes = wtr.into_inner().expect("in-memory CSV flush cannot fail");

        fs::write(&path, bytes).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "window scores written");
        Ok(())
    }

    /// Write a classification report to `{experiment}_classify.json`.
    ///
    /// `truth` must be aligned with the predictions in `result`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_classification(
        &self,
        dataset: &str,
        window: usize,
        truth: &[ClassLabel],
        result: &ClassificationResult,
    ) -> Result<(), IoError> {
        let path = self
            .output_dir
            .join(format!("{}_classify.json", self.experiment.as_str()));

        let predictions: Vec<PredictionEntry> = result
            .predictions
            .iter()
            .zip(truth)
            .enumerate()
            .map(|(query, (p, &actual))| PredictionEntry {
                query,
                predicted: p.label.value(),
                actual: actual.value(),
                neighbor: p.neighbor,
                distance: p.distance.value(),
            })
            .collect();

        let artifact = ClassifyArtifact {
            experiment: self.experiment.as_str(),
            dataset,
            window,
            n_queries: result.predictions.len(),
            n_correct: result.n_correct,
            accuracy: result.accuracy(),
            predictions,
        };

        let json = serde_json::to_string_pretty(&artifact).expect("serialization cannot fail");
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "classification result written");
        Ok(())
    }
}

/// Write a dataset as tab-separated rows in the reader's format.
///
/// Each row is `label\tv0\tv1\t...`; no header. Values use the shortest
/// representation that round-trips, so a written dataset reads back exactly.
///
/// # Errors
///
/// Returns [`IoError::WriteFile`] if the file cannot be written.
#[instrument(skip(dataset), fields(path = %path.display(), n_sequences = dataset.len()))]
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), IoError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());
    for (label, series) in dataset.labels.iter().zip(&dataset.series) {
        let mut record = Vec::with_capacity(series.len() + 1);
        record.push(label.value().to_string());
        record.extend(series.as_ref().iter().map(ToString::to_string));
        wtr.write_record(&record)
            .expect("in-memory CSV write cannot fail");
    }
    let bytes = wtr.into_inner().expect("in-memory CSV flush cannot fail");

    fs::write(path, bytes).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("dataset written");
    Ok(())
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct SearchArtifact<'a> {
    experiment: &'a str,
    dataset: &'a str,
    n_sequences: usize,
    best_window: usize,
    best_error: f64,
    accuracy: f64,
    dtw_count: usize,
    errors: &'a [f64],
}

#[derive(Serialize)]
struct ClassifyArtifact<'a> {
    experiment: &'a str,
    dataset: &'a str,
    window: usize,
    n_queries: usize,
    n_correct: usize,
    accuracy: f64,
    predictions: Vec<PredictionEntry>,
}

#[derive(Serialize)]
struct PredictionEntry {
    query: usize,
    predicted: i64,
    actual: i64,
    neighbor: usize,
    distance: f64,
}
