use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use tempo_elastic::Sequence;
use tempo_io::{Dataset, DatasetReader, ExperimentName, ResultWriter, write_dataset};
use tempo_search::{ClassLabel, NnClassifier, Refinement, SearchConfig};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Warping window search and 1-NN DTW classification for time series")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Find the warping window with the lowest leave-one-out error on a labeled dataset
    Search {
        /// Path to the input CSV/TSV file (label in the first column)
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Cap the searched radii at this fraction of the sequence length
        #[arg(long, default_value_t = 1.0)]
        max_window_fraction: f64,

        /// Exact-refinement kernel: "windowed", "pruned", or "pruned-seeded"
        #[arg(long, default_value = "windowed")]
        refinement: String,
    },

    /// Classify a test split with 1-NN DTW at a fixed warping window
    Classify {
        /// Path to the training CSV/TSV file (label in the first column)
        #[arg(long)]
        train: PathBuf,

        /// Path to the test CSV/TSV file (label in the first column)
        #[arg(long)]
        test: PathBuf,

        /// Warping window radius
        #[arg(long)]
        window: usize,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Generate a seeded synthetic dataset for demos and benchmarks
    Synth {
        /// Path of the tab-delimited file to write
        #[arg(long)]
        output: PathBuf,

        /// Number of classes
        #[arg(long, default_value_t = 2)]
        classes: usize,

        /// Sequences per class
        #[arg(long, default_value_t = 20)]
        per_class: usize,

        /// Sequence length
        #[arg(long, default_value_t = 64)]
        len: usize,

        /// Amplitude of the uniform noise added to each value
        #[arg(long, default_value_t = 0.3)]
        noise: f64,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct SearchOutput {
    experiment: String,
    dataset: String,
    n_sequences: usize,
    n_timesteps: usize,
    best_window: usize,
    best_error: f64,
    accuracy: f64,
    dtw_count: usize,
}

#[derive(Serialize)]
struct ClassifyOutput {
    experiment: String,
    train: String,
    test: String,
    window: usize,
    n_train: usize,
    n_queries: usize,
    n_correct: usize,
    accuracy: f64,
}

#[derive(Serialize)]
struct SynthOutput {
    path: String,
    classes: usize,
    n_sequences: usize,
    n_timesteps: usize,
    seed: u64,
}

fn parse_refinement(s: &str) -> Result<Refinement> {
    match s {
        "windowed" => Ok(Refinement::Windowed),
        "pruned" => Ok(Refinement::Pruned),
        "pruned-seeded" => Ok(Refinement::PrunedWithSeed),
        other => anyhow::bail!("unknown refinement: {other} (expected windowed, pruned, or pruned-seeded)"),
    }
}

/// Sine-wave classes separated by phase, with uniform noise on top.
fn synth_dataset(
    seed: u64,
    classes: usize,
    per_class: usize,
    len: usize,
    noise: f64,
) -> Result<Dataset> {
    if classes == 0 || per_class == 0 || len == 0 {
        anyhow::bail!("classes, per-class, and len must all be positive");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut labels = Vec::with_capacity(classes * per_class);
    let mut series = Vec::with_capacity(classes * per_class);
    for class in 0..classes {
        let phase = class as f64 * std::f64::consts::PI / classes as f64;
        for _ in 0..per_class {
            let values: Vec<f64> = (0..len)
                .map(|t| {
                    let jitter = if noise > 0.0 { rng.gen_range(-noise..noise) } else { 0.0 };
                    (t as f64 * 0.25 + phase).sin() + jitter
                })
                .collect();
            series.push(Sequence::new(values).context("generated a non-finite value")?);
            labels.push(ClassLabel::new(class as i64));
        }
    }

    Ok(Dataset {
        name: "synth".to_string(),
        labels,
        series,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Search {
            data,
            experiment,
            output_dir,
            max_window_fraction,
            refinement,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let refinement = parse_refinement(&refinement)?;

            // 1. Read dataset
            let dataset = DatasetReader::new(&data)
                .read()
                .context("failed to read input file")?;
            let n_sequences = dataset.len();
            let n_timesteps = dataset.series.first().map_or(0, Sequence::len);

            // 2. Search the window
            let config = SearchConfig::new()
                .with_max_window_fraction(max_window_fraction)
                .with_refinement(refinement);
            let result = config
                .fit(&dataset.series, &dataset.labels)
                .context("window search failed")?;

            // 3. Write artifacts
            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            writer.write_search(&dataset.name, n_sequences, &result)?;
            writer.write_window_scores(&result)?;

            // 4. Print summary
            let output = SearchOutput {
                experiment,
                dataset: dataset.name,
                n_sequences,
                n_timesteps,
                best_window: result.best_window,
                best_error: result.best_error,
                accuracy: result.accuracy(),
                dtw_count: result.dtw_count,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Classify {
            train,
            test,
            window,
            experiment,
            output_dir,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;

            // 1. Read both splits
            let train_set = DatasetReader::new(&train)
                .read()
                .context("failed to read training file")?;
            let test_set = DatasetReader::new(&test)
                .read()
                .context("failed to read test file")?;

            let n_train = train_set.len();
            let n_queries = test_set.len();

            let expected = train_set.series.first().map_or(0, Sequence::len);
            if let Some(index) = test_set.series.iter().position(|s| s.len() != expected) {
                anyhow::bail!(
                    "test sequence {index} has length {}, train length is {expected}",
                    test_set.series[index].len()
                );
            }

            // 2. Build the classifier
            let classifier = NnClassifier::new(&train_set.series, &train_set.labels, window)
                .context("failed to build classifier")?;

            // 3. Evaluate the test split
            let result = classifier
                .evaluate(&test_set.series, &test_set.labels)
                .context("evaluation failed")?;

            // 4. Write predictions JSON
            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            writer.write_classification(&test_set.name, window, &test_set.labels, &result)?;

            // 5. Print summary
            let output = ClassifyOutput {
                experiment,
                train: train_set.name,
                test: test_set.name,
                window,
                n_train,
                n_queries,
                n_correct: result.n_correct,
                accuracy: result.accuracy(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Synth {
            output,
            classes,
            per_class,
            len,
            noise,
        } => {
            // 1. Generate
            let dataset = synth_dataset(cli.seed, classes, per_class, len, noise)?;
            info!(
                n_sequences = dataset.len(),
                classes,
                len,
                "synthetic dataset generated"
            );

            // 2. Write
            write_dataset(&output, &dataset).context("failed to write dataset")?;

            // 3. Print summary
            let summary = SynthOutput {
                path: output.display().to_string(),
                classes,
                n_sequences: dataset.len(),
                n_timesteps: len,
                seed: cli.seed,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
