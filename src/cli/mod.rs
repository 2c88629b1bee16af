//! ppi-stratify CLI Module
//!
//! Command-line interface for splitting label files into stratified folds.

use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::Result;
use crate::labels::LabelIndex;
use crate::stratification::{
    label_balance_report, BalanceReport, CVSplit, IterativeStratifiedKFold,
    StratifiedKFoldConfig,
};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn warn(s: &str) -> ColoredString  { s.truecolor(230, 180, 80) }

fn section(title: &str) {
    eprintln!();
    eprintln!("  {}", title.white().bold());
    eprintln!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "ppi-stratify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-label iterative stratification for k-fold cross-validation")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign every sample of a label file to a fold
    Split {
        /// Label file: one sample per line, labels separated by the delimiter
        #[arg(short, long)]
        labels: PathBuf,

        /// Number of folds
        #[arg(short = 'k', long, default_value = "3")]
        n_splits: usize,

        /// Shuffle samples before stratifying
        #[arg(long)]
        shuffle: bool,

        /// Seed for shuffling and tie-breaking
        #[arg(long)]
        seed: Option<u64>,

        /// Label delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// JSON splitter config; overrides --n-splits, --shuffle and --seed
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file (JSON); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show per-label counts of a label file
    Inspect {
        /// Label file: one sample per line, labels separated by the delimiter
        #[arg(short, long)]
        labels: PathBuf,

        /// Label delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },
}

/// Read a label file.
///
/// Each line is one sample. Labels are split on `delimiter` and trimmed; empty
/// entries are dropped, so a blank line is a sample without labels.
pub fn load_labels(path: &Path, delimiter: char) -> Result<Vec<Vec<String>>> {
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let labels = line
            .split(delimiter)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        samples.push(labels);
    }
    Ok(samples)
}

/// JSON document written by `split`
#[derive(Debug, Serialize)]
pub struct SplitOutput {
    pub config: StratifiedKFoldConfig,
    pub n_samples: usize,
    pub assignment: Vec<usize>,
    pub folds: Vec<CVSplit>,
    pub warnings: Vec<String>,
    pub report: BalanceReport<String>,
}

/// Run the splitter over `samples`
pub fn run_split(samples: &[Vec<String>], config: StratifiedKFoldConfig) -> Result<SplitOutput> {
    let cv = IterativeStratifiedKFold::from_config(config.clone());
    let assignment = cv.assign(samples)?;

    let index = LabelIndex::from_label_sets(samples)?;
    let report = label_balance_report(&assignment.folds(), &index)?;

    Ok(SplitOutput {
        config,
        n_samples: assignment.n_samples(),
        assignment: assignment.test_folds().to_vec(),
        folds: assignment.splits().collect(),
        warnings: assignment.warnings().iter().map(|w| w.to_string()).collect(),
        report,
    })
}

// ─── Split ─────────────────────────────────────────────────────────────────────

pub fn cmd_split(
    labels_path: &Path,
    n_splits: usize,
    shuffle: bool,
    seed: Option<u64>,
    delimiter: char,
    config_path: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => StratifiedKFoldConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => StratifiedKFoldConfig {
            n_splits,
            shuffle,
            random_state: seed,
        },
    };

    let start = Instant::now();
    let samples = load_labels(labels_path, delimiter)?;
    let result = run_split(&samples, config)?;
    let elapsed = start.elapsed();

    section("Split");
    eprintln!("  {:<12} {}", muted("File"), labels_path.display());
    eprintln!("  {:<12} {}", muted("Samples"), result.n_samples);
    eprintln!("  {:<12} {}", muted("Labels"), result.report.labels.len());
    eprintln!("  {:<12} {}", muted("Folds"), result.config.n_splits);
    eprintln!("  {:<12} {:.3}", muted("Max dev."), result.report.max_deviation());
    eprintln!("  {:<12} {:.1?}", muted("Time"), elapsed);
    for w in &result.warnings {
        eprintln!("  {} {}", warn("!"), w);
    }
    eprintln!();

    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &result)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &result)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

// ─── Inspect ───────────────────────────────────────────────────────────────────

pub fn cmd_inspect(labels_path: &Path, delimiter: char) -> anyhow::Result<()> {
    section("Label Info");

    let samples = load_labels(labels_path, delimiter)?;
    let index = LabelIndex::from_label_sets(&samples)?;
    let n_unlabeled = index.unlabeled().count();

    eprintln!("  {:<14} {}", muted("File"), labels_path.display());
    eprintln!("  {:<14} {}", muted("Samples"), index.n_samples());
    eprintln!("  {:<14} {}", muted("Unlabeled"), n_unlabeled);
    eprintln!("  {:<14} {}", muted("Labels"), index.n_labels());
    eprintln!("  {:<14} {}", muted("Max n_splits"), index.min_count());
    eprintln!();

    println!("  {:<24} {:>8}", muted("Label"), muted("Count"));
    println!("  {}", dim(&"─".repeat(34)));
    for (label, &count) in index.labels().iter().zip(index.counts()) {
        println!("  {:<24} {:>8}", label, count);
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn label_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_labels() {
        let file = label_file("kegg, hprd\nkegg\n\n hprd ,\n");
        let samples = load_labels(file.path(), ',').unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], vec!["kegg", "hprd"]);
        assert!(samples[2].is_empty());
        assert_eq!(samples[3], vec!["hprd"]);
    }

    #[test]
    fn test_load_labels_custom_delimiter() {
        let file = label_file("a\tb\nb\n");
        let samples = load_labels(file.path(), '\t').unwrap();
        assert_eq!(samples, vec![vec!["a", "b"], vec!["b"]]);
    }

    #[test]
    fn test_load_labels_missing_file() {
        let err = load_labels(Path::new("/nonexistent/labels.txt"), ',').unwrap_err();
        assert!(matches!(err, crate::StratifyError::IoError(_)));
    }

    #[test]
    fn test_run_split() {
        let samples: Vec<Vec<String>> = (0..12)
            .map(|i| if i % 3 == 0 { vec!["b".to_string()] } else { vec!["a".to_string()] })
            .collect();
        let config = StratifiedKFoldConfig::new(2).with_random_state(42);
        let out = run_split(&samples, config).unwrap();

        assert_eq!(out.n_samples, 12);
        assert_eq!(out.assignment.len(), 12);
        assert_eq!(out.folds.len(), 2);
        assert!(out.warnings.is_empty());
        assert!(out.report.within(0.0));

        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("\"assignment\""));
    }

    #[test]
    fn test_cmd_split_writes_json() {
        let input = label_file("a\na\na\nb\nb\nb\n");
        let output = NamedTempFile::new().unwrap();
        cmd_split(input.path(), 3, true, Some(1), ',', None, Some(output.path())).unwrap();

        let written = std::fs::read_to_string(output.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["config"]["n_splits"], 3);
        assert_eq!(value["assignment"].as_array().map(|a| a.len()), Some(6));
    }
}
