//! Multi-version batch comparison.
//!
//! Every document is compared with every later document in configuration
//! order. Each successful comparison produces one report file; a failing pair
//! is logged and recorded, and the remaining pairs still run. Finally an index
//! page summarizes which pairs were compared.

use crate::classify::{classify, ChangeSet};
use crate::config::{BatchConfig, DocumentDescriptor};
use crate::error::{ControlDiffError, OutputError};
use crate::extract::load_document;
use crate::model::ControlIndex;
use crate::output::{OutputFormat, Renderer, ReportLabels};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the index page.
pub const INDEX_FILENAME: &str = "index.html";

/// All `(base, later)` index pairs for `count` documents, base first.
pub fn forward_pairs(count: usize) -> Vec<(usize, usize)> {
    (0..count)
        .flat_map(|i| (i + 1..count).map(move |j| (i, j)))
        .collect()
}

/// Report file name for one comparison, e.g. `NZISM-3.5-to-3.6.html`.
pub fn report_filename(prefix: &str, old: &str, new: &str, extension: &str) -> String {
    format!("{}-{}-to-{}.{}", prefix, old, new, extension)
}

/// Loads two documents and classifies their controls.
pub fn compare_documents(
    old: &DocumentDescriptor,
    new: &DocumentDescriptor,
) -> Result<ChangeSet, ControlDiffError> {
    let old_index = load_document(&old.filename, old.dialect)?;
    let new_index = load_document(&new.filename, new.dialect)?;
    Ok(classify(&old_index, &new_index)?)
}

/// Which version pairs were compared, and where their reports are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonMatrix {
    versions: Vec<String>,
    reports: BTreeMap<(String, String), String>,
}

impl ComparisonMatrix {
    pub fn new(versions: Vec<String>) -> Self {
        Self {
            versions,
            reports: BTreeMap::new(),
        }
    }

    /// Marks a pair as compared, with the report file linking to it.
    pub fn record(&mut self, old: &str, new: &str, report: impl Into<String>) {
        self.reports
            .insert((old.to_string(), new.to_string()), report.into());
    }

    /// Version labels in configuration order.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn is_compared(&self, old: &str, new: &str) -> bool {
        self.report_for(old, new).is_some()
    }

    pub fn report_for(&self, old: &str, new: &str) -> Option<&str> {
        self.reports
            .get(&(old.to_string(), new.to_string()))
            .map(String::as_str)
    }

    /// The latest configured version.
    pub fn reference(&self) -> Option<&str> {
        self.versions.last().map(String::as_str)
    }

    /// Compared pairs ending in the reference version, oldest base first.
    pub fn most_recent(&self) -> Vec<(&str, &str)> {
        let Some(reference) = self.reference() else {
            return Vec::new();
        };
        self.versions
            .iter()
            .map(String::as_str)
            .filter(|old| self.is_compared(old, reference))
            .map(|old| (old, reference))
            .collect()
    }
}

/// A version pair that could not be compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFailure {
    pub old: String,
    pub new: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub matrix: ComparisonMatrix,
    /// Report files written, in comparison order
    pub reports: Vec<PathBuf>,
    pub failures: Vec<PairFailure>,
    /// Index page, written for HTML runs only
    pub index: Option<PathBuf>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs every forward comparison of the configuration.
///
/// Each document is read once. Failures of individual pairs, including a
/// document that cannot be read, are collected in the outcome rather than
/// returned.
///
/// # Errors
///
/// Returns `OutputError::WriteError` if the output directory or the index
/// page cannot be written.
pub fn run_batch(
    config: &BatchConfig,
    renderer: &Renderer,
    format: OutputFormat,
) -> Result<BatchOutcome, OutputError> {
    fs::create_dir_all(&config.output_dir)
        .map_err(|e| OutputError::write_error(config.output_dir.to_string_lossy(), e))?;

    let indexes: Vec<Result<ControlIndex, String>> = config
        .documents
        .iter()
        .map(|document| {
            load_document(&document.filename, document.dialect)
                .map_err(|e| format!("{}: {}", document.filename.display(), e))
        })
        .collect();

    let versions = config.documents.iter().map(|d| d.version.clone()).collect();
    let mut outcome = BatchOutcome {
        matrix: ComparisonMatrix::new(versions),
        ..Default::default()
    };

    for (i, j) in forward_pairs(config.documents.len()) {
        let old = &config.documents[i];
        let new = &config.documents[j];
        info!(old = %old.version, new = %new.version, "comparing");

        match compare_pair(config, renderer, format, (old, &indexes[i]), (new, &indexes[j])) {
            Ok(path) => {
                let filename = report_name(config, format, old, new);
                outcome.matrix.record(&old.version, &new.version, filename);
                outcome.reports.push(path);
            }
            Err(error) => {
                warn!(old = %old.version, new = %new.version, %error, "comparison failed");
                outcome.failures.push(PairFailure {
                    old: old.version.clone(),
                    new: new.version.clone(),
                    error,
                });
            }
        }
    }

    if format == OutputFormat::Html {
        let path = config.output_dir.join(INDEX_FILENAME);
        write_file(&path, &renderer.render_index(&outcome.matrix))?;
        info!(path = %path.display(), "wrote index");
        outcome.index = Some(path);
    }

    Ok(outcome)
}

fn compare_pair(
    config: &BatchConfig,
    renderer: &Renderer,
    format: OutputFormat,
    (old, old_index): (&DocumentDescriptor, &Result<ControlIndex, String>),
    (new, new_index): (&DocumentDescriptor, &Result<ControlIndex, String>),
) -> Result<PathBuf, String> {
    let old_index = old_index.as_ref().map_err(Clone::clone)?;
    let new_index = new_index.as_ref().map_err(Clone::clone)?;

    let changes = classify(old_index, new_index).map_err(|e| e.to_string())?;
    debug!(
        added = changes.stats.added,
        removed = changes.stats.removed,
        changed = changes.stats.changed,
        "classified"
    );

    let labels = ReportLabels::new(&old.version, &new.version);
    let rendered = renderer
        .render_report(&labels, &changes, format)
        .map_err(|e| e.to_string())?;

    let path = config
        .output_dir
        .join(report_name(config, format, old, new));
    write_file(&path, &rendered).map_err(|e| e.to_string())?;
    info!(path = %path.display(), "wrote report");

    Ok(path)
}

fn report_name(
    config: &BatchConfig,
    format: OutputFormat,
    old: &DocumentDescriptor,
    new: &DocumentDescriptor,
) -> String {
    report_filename(
        &config.report_prefix,
        &old.version,
        &new.version,
        format.extension(),
    )
}

/// Writes a rendered artifact.
pub fn write_file(path: &Path, content: &str) -> Result<(), OutputError> {
    fs::write(path, content).map_err(|e| OutputError::write_error(path.to_string_lossy(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_pairs() {
        assert_eq!(forward_pairs(3), vec![(0, 1), (0, 2), (1, 2)]);
        assert!(forward_pairs(1).is_empty());
        assert!(forward_pairs(0).is_empty());
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(
            report_filename("NZISM", "3.5", "3.6", "html"),
            "NZISM-3.5-to-3.6.html"
        );
    }

    #[test]
    fn test_most_recent_pairs_end_in_reference() {
        let mut matrix = ComparisonMatrix::new(vec!["1".into(), "2".into(), "3".into()]);
        matrix.record("1", "2", "r12");
        matrix.record("1", "3", "r13");
        matrix.record("2", "3", "r23");
        assert_eq!(matrix.reference(), Some("3"));
        assert_eq!(matrix.most_recent(), vec![("1", "3"), ("2", "3")]);
    }

    #[test]
    fn test_matrix_is_directional() {
        let mut matrix = ComparisonMatrix::new(vec!["1".into(), "2".into()]);
        matrix.record("1", "2", "r12");
        assert!(matrix.is_compared("1", "2"));
        assert!(!matrix.is_compared("2", "1"));
        assert!(!matrix.is_compared("1", "1"));
    }
}
