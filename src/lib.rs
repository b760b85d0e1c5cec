//! controldiff - change reports between versions of a security control document.
//!
//! This library compares two versions of an XML control document whose
//! controls carry a stable numeric identifier. It reports which controls were
//! added, which were removed, and which had their text changed, with the
//! edits highlighted inline. Controls are presented in document order derived
//! from their dotted titles.
//!
//! # Example
//!
//! ```no_run
//! use controldiff::{classify, load_document, OutputFormat, Renderer, ReportLabels, SchemaDialect};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Parse two versions
//! let old = load_document(Path::new("nzism-3.5.xml"), SchemaDialect::V1)?;
//! let new = load_document(Path::new("nzism-3.6.xml"), SchemaDialect::V2)?;
//!
//! // Classify the controls
//! let changes = classify(&old, &new)?;
//!
//! // Render the report
//! let renderer = Renderer::default();
//! let html = renderer.render_report(&ReportLabels::new("3.5", "3.6"), &changes, OutputFormat::Html)?;
//! println!("{}", html);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod classify;
pub mod config;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod model;
pub mod output;
pub mod sortkey;

// Re-export commonly used types for convenience
pub use batch::{compare_documents, run_batch, BatchOutcome, ComparisonMatrix};
pub use classify::{classify, AnnotatedControl, ChangeSet, ChangeStats};
pub use config::{load_config, BatchConfig, DocumentDescriptor};
pub use dialect::SchemaDialect;
pub use diff::{diff_text, TextDiff};
pub use error::{ConfigError, ControlDiffError, OutputError, ParseError, SortKeyError};
pub use extract::{load_document, parse_document};
pub use model::{ControlIndex, ControlRecord};
pub use output::{OutputFormat, RenderOptions, Renderer, ReportLabels};
pub use sortkey::sortkey;
