use controldiff::batch::{forward_pairs, report_filename, INDEX_FILENAME};
use controldiff::config::DocumentDescriptor;
use controldiff::{
    compare_documents, load_config, run_batch, ControlDiffError, OutputFormat, Renderer,
    SchemaDialect,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn descriptor(version: &str, filename: &str, dialect: SchemaDialect) -> DocumentDescriptor {
    DocumentDescriptor {
        version: version.to_string(),
        filename: PathBuf::from(filename),
        dialect,
    }
}

#[test]
fn test_forward_pairs_count() {
    assert_eq!(forward_pairs(4).len(), 6);
    assert!(forward_pairs(4).iter().all(|(i, j)| i < j));
}

#[test]
fn test_compare_documents() {
    let changes = compare_documents(
        &descriptor("1.0", "tests/fixtures/v1_old.xml", SchemaDialect::V1),
        &descriptor("2.0", "tests/fixtures/v2_new.xml", SchemaDialect::V2),
    )
    .unwrap();
    assert_eq!(changes.stats.added, 1);
    assert_eq!(changes.stats.removed, 1);
    assert_eq!(changes.stats.changed, 1);
}

#[test]
fn test_compare_documents_missing_file() {
    let err = compare_documents(
        &descriptor("1.0", "tests/fixtures/v1_old.xml", SchemaDialect::V1),
        &descriptor("2.0", "tests/fixtures/nonexistent.xml", SchemaDialect::V1),
    )
    .unwrap_err();
    assert!(matches!(err, ControlDiffError::Parse(_)));
}

#[test]
fn test_compare_documents_malformed_title() {
    let err = compare_documents(
        &descriptor("1.0", "tests/fixtures/v1_old.xml", SchemaDialect::V1),
        &descriptor("2.0", "tests/fixtures/bad_title.xml", SchemaDialect::V1),
    )
    .unwrap_err();
    assert!(matches!(err, ControlDiffError::SortKey(_)));
}

#[test]
fn test_run_batch_writes_reports_and_index() {
    let out = TempDir::new().unwrap();
    let mut config = load_config(Path::new("tests/fixtures/config.json")).unwrap();
    config.output_dir = out.path().to_path_buf();

    let outcome = run_batch(&config, &Renderer::default(), OutputFormat::Html).unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.reports.len(), 3);

    for (old, new) in [("1.0", "1.1"), ("1.0", "2.0"), ("1.1", "2.0")] {
        let name = report_filename("NZISM", old, new, "html");
        assert!(out.path().join(&name).exists(), "missing {}", name);
        assert_eq!(outcome.matrix.report_for(old, new), Some(name.as_str()));
    }
    assert_eq!(outcome.matrix.most_recent(), vec![("1.0", "2.0"), ("1.1", "2.0")]);

    let index = outcome.index.unwrap();
    assert_eq!(index, out.path().join(INDEX_FILENAME));
    let html = fs::read_to_string(index).unwrap();
    assert!(html.contains("NZISM-1.0-to-2.0.html"));

    let report = fs::read_to_string(out.path().join("NZISM-1.0-to-1.1.html")).unwrap();
    assert!(report.contains("<span class=\"insert\">fully </span>"));
}

#[test]
fn test_run_batch_continues_after_failure() {
    let out = TempDir::new().unwrap();
    let mut config = load_config(Path::new("tests/fixtures/config_with_missing.json")).unwrap();
    config.output_dir = out.path().to_path_buf();

    let outcome = run_batch(&config, &Renderer::default(), OutputFormat::Html).unwrap();
    assert!(!outcome.is_success());
    assert_eq!(outcome.failures.len(), 2);
    assert!(outcome.failures.iter().all(|f| f.error.contains("missing.xml")));

    assert_eq!(outcome.reports.len(), 1);
    assert!(outcome.matrix.is_compared("1.0", "1.2"));
    assert!(!outcome.matrix.is_compared("1.0", "1.1"));
    assert!(out.path().join("NZISM-1.0-to-1.2.html").exists());
    assert!(out.path().join(INDEX_FILENAME).exists());
}

#[test]
fn test_run_batch_json_has_no_index() {
    let out = TempDir::new().unwrap();
    let mut config = load_config(Path::new("tests/fixtures/config.json")).unwrap();
    config.output_dir = out.path().to_path_buf();
    config.report_prefix = "ISM".to_string();

    let outcome = run_batch(&config, &Renderer::default(), OutputFormat::Json).unwrap();
    assert!(outcome.index.is_none());
    assert!(!out.path().join(INDEX_FILENAME).exists());

    let json = fs::read_to_string(out.path().join("ISM-1.1-to-2.0.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["stats"]["added"], 0);
    assert_eq!(value["stats"]["unchanged"], 4);
}

#[test]
fn test_run_batch_creates_output_dir() {
    let out = TempDir::new().unwrap();
    let nested = out.path().join("reports").join("nzism");
    let mut config = load_config(Path::new("tests/fixtures/config.json")).unwrap();
    config.output_dir = nested.clone();

    run_batch(&config, &Renderer::default(), OutputFormat::Html).unwrap();
    assert!(nested.join(INDEX_FILENAME).exists());
}
