//! End-to-end integration tests: dataset file -> search/classify -> JSON -> deserialize.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use tempo_io::{Dataset, DatasetReader, ExperimentName, IoError, ResultWriter, write_dataset};
use tempo_search::{NnClassifier, SearchConfig};

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Six sequences in two well-separated classes, 8 timesteps each.
fn two_class_rows(offset_b: f64) -> String {
    let rows = [
        (0, 0.0, 0.0),
        (0, 0.0, 0.1),
        (0, 0.1, 0.0),
        (1, offset_b, 0.0),
        (1, offset_b, 0.1),
        (1, offset_b + 0.1, 0.0),
    ];
    rows.iter()
        .map(|&(label, base, jitter)| {
            let values: Vec<String> = (0..8)
                .map(|t| (base + jitter + (t as f64 * 0.7).sin() * 0.3).to_string())
                .collect();
            format!("{label},{}", values.join(","))
        })
        .collect::<Vec<String>>()
        .join("\n")
}

#[test]
fn search_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "gait_train.csv", &two_class_rows(8.0));

    // 1. Read the dataset
    let dataset = DatasetReader::new(&path).read().expect("file should parse");
    assert_eq!(dataset.name, "gait_train");
    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset.n_classes(), 2);

    // 2. Search the warping window
    let result = SearchConfig::new()
        .fit(&dataset.series, &dataset.labels)
        .unwrap();
    assert_eq!(result.errors.len(), 8, "one error per window 0..=7");

    // 3. Write JSON and CSV artifacts
    let experiment = ExperimentName::new("search_rt".into()).unwrap();
    let writer = ResultWriter::new(dir.path(), experiment).unwrap();
    writer
        .write_search(&dataset.name, dataset.len(), &result)
        .unwrap();
    writer.write_window_scores(&result).unwrap();

    // 4. Deserialize the JSON back and verify
    let json_path = dir.path().join("search_rt_search.json");
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();

    assert_eq!(content["experiment"], "search_rt");
    assert_eq!(content["dataset"], "gait_train");
    assert_eq!(content["n_sequences"].as_u64().unwrap(), 6);
    assert_eq!(
        content["best_window"].as_u64().unwrap() as usize,
        result.best_window
    );

    let errors = content["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 8);
    for (window, error) in errors.iter().enumerate() {
        let e = error.as_f64().unwrap();
        assert!(
            (0.0..=1.0).contains(&e),
            "error at window {window} out of range: {e}"
        );
    }

    // best_error must be the minimum of the curve
    let best_error = content["best_error"].as_f64().unwrap();
    let min_error = errors.iter().map(|v| v.as_f64().unwrap()).fold(1.0, f64::min);
    assert!((best_error - min_error).abs() < 1e-12);

    // 5. Verify the CSV curve
    let csv_path = dir.path().join("search_rt_windows.csv");
    let csv_content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_content.lines().collect();
    assert_eq!(lines[0], "window,error");
    assert_eq!(lines.len(), 9, "header plus one row per window");
}

#[test]
fn classify_round_trip() {
    let dir = TempDir::new().unwrap();
    let train_path = write_file(&dir, "gait_train.csv", &two_class_rows(8.0));
    let test_path = write_file(&dir, "gait_test.csv", &two_class_rows(8.2));

    let train = DatasetReader::new(&train_path).read().unwrap();
    let test = DatasetReader::new(&test_path).read().unwrap();

    let classifier = NnClassifier::new(&train.series, &train.labels, 2).unwrap();
    let result = classifier.evaluate(&test.series, &test.labels).unwrap();
    assert_eq!(result.n_correct, 6, "classes are well separated");

    let experiment = ExperimentName::new("classify_rt".into()).unwrap();
    let writer = ResultWriter::new(dir.path(), experiment).unwrap();
    writer
        .write_classification(&test.name, 2, &test.labels, &result)
        .unwrap();

    let json_path = dir.path().join("classify_rt_classify.json");
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();

    assert_eq!(content["experiment"], "classify_rt");
    assert_eq!(content["dataset"], "gait_test");
    assert_eq!(content["window"].as_u64().unwrap(), 2);
    assert_eq!(content["n_queries"].as_u64().unwrap(), 6);
    assert_eq!(content["n_correct"].as_u64().unwrap(), 6);
    assert!((content["accuracy"].as_f64().unwrap() - 1.0).abs() < 1e-12);

    let predictions = content["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 6);
    for entry in predictions {
        assert_eq!(entry["predicted"], entry["actual"]);
        assert!(entry["distance"].as_f64().unwrap().is_finite());
        assert!(entry["neighbor"].as_u64().unwrap() < 6);
    }
}

#[test]
fn written_dataset_searches_identically() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "original.csv", &two_class_rows(8.0));
    let original = DatasetReader::new(&path).read().unwrap();

    // Write the parsed dataset back out and re-read it.
    let copy_path = dir.path().join("copy.tsv");
    write_dataset(
        &copy_path,
        &Dataset {
            name: original.name.clone(),
            labels: original.labels.clone(),
            series: original.series.clone(),
        },
    )
    .unwrap();
    let copy = DatasetReader::new(&copy_path).read().unwrap();

    for (a, b) in copy.series.iter().zip(&original.series) {
        assert_eq!(a.as_ref(), b.as_ref(), "values must survive the round trip");
    }

    let first = SearchConfig::new()
        .fit(&original.series, &original.labels)
        .unwrap();
    let second = SearchConfig::new().fit(&copy.series, &copy.labels).unwrap();

    assert_eq!(first.best_window, second.best_window);
    assert_eq!(first.errors, second.errors);
}

#[test]
fn reader_errors_carry_row_context() {
    let dir = TempDir::new().unwrap();

    let jagged = write_file(&dir, "jagged.csv", "0,1.0,2.0\n1,3.0,4.0\n0,5.0\n");
    let result = DatasetReader::new(&jagged).read();
    assert!(
        matches!(result, Err(IoError::RowLength { row_index: 2, .. })),
        "jagged file should report the offending row, got: {result:?}"
    );

    let nan = write_file(&dir, "nan.csv", "0,1.0,NaN\n");
    let result = DatasetReader::new(&nan).read();
    assert!(
        matches!(result, Err(IoError::NonFiniteValue { row_index: 0, .. })),
        "NaN cell should be rejected, got: {result:?}"
    );

    let bad_label = write_file(&dir, "bad_label.csv", "0,1.0,2.0\nx,3.0,4.0\n");
    let result = DatasetReader::new(&bad_label).read();
    assert!(
        matches!(result, Err(IoError::InvalidLabel { row_index: 1, .. })),
        "non-integer label should be rejected, got: {result:?}"
    );
}
