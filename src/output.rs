//! Rendering of change sets and the comparison index.
//!
//! A [`Renderer`] is built once per run and handed to whatever produces
//! reports. It renders a change set as an HTML page, as JSON, or as a short
//! listing for the terminal (coloured or plain), and renders the HTML index
//! of all compared version pairs.
//!
//! # Examples
//!
//! ```
//! use controldiff::{ChangeSet, OutputFormat, Renderer, ReportLabels};
//!
//! let renderer = Renderer::default();
//! let labels = ReportLabels::new("3.5", "3.6");
//! let output = renderer
//!     .render_report(&labels, &ChangeSet::default(), OutputFormat::Plain)
//!     .unwrap();
//! assert_eq!(output, "No changes detected.");
//! ```

use crate::batch::ComparisonMatrix;
use crate::classify::{AnnotatedControl, ChangeSet, ChangeStats};
use crate::error::OutputError;
use colored::*;
use quick_xml::escape::escape;
use serde::Serialize;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standalone HTML page with highlighted diffs
    Html,
    /// JSON representation of the change set
    Json,
    /// Colored terminal listing with ANSI escape codes
    Terminal,
    /// Plain text listing, no colors (suitable for piping)
    Plain,
}

impl OutputFormat {
    /// File extension used for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Terminal | OutputFormat::Plain => "txt",
        }
    }
}

/// Version labels of the two compared documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub old: String,
    pub new: String,
}

impl ReportLabels {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Options for controlling rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Name of the document family, shown in page titles
    pub document_name: String,
    /// CSS embedded in every HTML page
    pub stylesheet: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            document_name: "NZISM".to_string(),
            stylesheet: DEFAULT_STYLESHEET.to_string(),
        }
    }
}

const DEFAULT_STYLESHEET: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; width: 100%; margin-bottom: 2em; }
th, td { border: 1px solid #ccc; padding: 0.4em; text-align: left; vertical-align: top; }
td.title, td.cid { white-space: nowrap; }
span.insert { background-color: #cfc; }
span.delete { background-color: #fcc; text-decoration: line-through; }
td.compared { text-align: center; }
";

#[derive(Serialize)]
struct JsonReport<'a> {
    old: &'a str,
    new: &'a str,
    #[serde(flatten)]
    changes: &'a ChangeSet,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Renders one comparison in the given format.
    ///
    /// Controls are listed in display order regardless of the order they
    /// have in `changes`.
    ///
    /// # Errors
    ///
    /// Returns `OutputError::JsonSerializationError` if JSON output fails.
    pub fn render_report(
        &self,
        labels: &ReportLabels,
        changes: &ChangeSet,
        format: OutputFormat,
    ) -> Result<String, OutputError> {
        let changes = changes.clone().into_display_order();
        match format {
            OutputFormat::Html => Ok(self.format_html(labels, &changes)),
            OutputFormat::Json => format_json(labels, &changes),
            OutputFormat::Terminal => Ok(format_listing(&changes, true)),
            OutputFormat::Plain => Ok(format_listing(&changes, false)),
        }
    }

    fn format_html(&self, labels: &ReportLabels, changes: &ChangeSet) -> String {
        let heading = format!(
            "{}: changes from {} to {}",
            self.options.document_name, labels.old, labels.new
        );

        let mut html = self.page_start(&heading);
        html.push_str(&format!(
            "<p class=\"summary\">{}</p>\n",
            escape(format_summary(&changes.stats).as_str())
        ));
        html.push_str(&format_section("Controls added", "added", &changes.added));
        html.push_str(&format_section("Controls removed", "removed", &changes.removed));
        html.push_str(&format_section("Controls changed", "changed", &changes.changed));
        html.push_str("</body>\n</html>\n");
        html
    }

    /// Renders the index page: the comparison matrix and the most recent
    /// comparisons, linking to each report.
    pub fn render_index(&self, matrix: &ComparisonMatrix) -> String {
        let heading = format!("{} version comparisons", self.options.document_name);
        let mut html = self.page_start(&heading);

        html.push_str("<h2>Most recent changes</h2>\n");
        let recent = matrix.most_recent();
        if recent.is_empty() {
            html.push_str("<p class=\"empty\">None.</p>\n");
        } else {
            html.push_str("<ul>\n");
            for (old, new) in recent {
                let link = matrix.report_for(old, new).unwrap_or_default();
                html.push_str(&format!(
                    "<li><a href=\"{}\">{} to {}</a></li>\n",
                    escape(link),
                    escape(old),
                    escape(new)
                ));
            }
            html.push_str("</ul>\n");
        }

        html.push_str("<h2>All comparisons</h2>\n<table>\n<tr><th>From \\ To</th>");
        for version in matrix.versions() {
            html.push_str(&format!("<th>{}</th>", escape(version.as_str())));
        }
        html.push_str("</tr>\n");

        for old in matrix.versions() {
            html.push_str(&format!("<tr><th>{}</th>", escape(old.as_str())));
            for new in matrix.versions() {
                match matrix.report_for(old, new) {
                    Some(link) => html.push_str(&format!(
                        "<td class=\"compared\"><a href=\"{}\">&#10003;</a></td>",
                        escape(link)
                    )),
                    None => html.push_str("<td></td>"),
                }
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n</body>\n</html>\n");

        html
    }

    fn page_start(&self, heading: &str) -> String {
        let heading = escape(heading);
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{heading}</title>\n<style>\n{css}</style>\n</head>\n<body>\n\
             <h1>{heading}</h1>\n",
            heading = heading,
            css = self.options.stylesheet
        )
    }
}

/// Formats one group of controls as an HTML section.
///
/// Control text is inserted as-is: it is markup taken from the source
/// document, or a highlighted fragment that is already escaped.
fn format_section(heading: &str, id: &str, controls: &[AnnotatedControl]) -> String {
    let mut html = format!("<h2 id=\"{}\">{} ({})</h2>\n", id, heading, controls.len());

    if controls.is_empty() {
        html.push_str("<p class=\"empty\">None.</p>\n");
        return html;
    }

    html.push_str(
        "<table>\n<tr><th>Title</th><th>CID</th><th>Classifications</th>\
         <th>Compliance</th><th>Text</th></tr>\n",
    );
    for control in controls {
        html.push_str(&format!(
            "<tr><td class=\"title\">{}</td><td class=\"cid\">{}</td><td>{}</td><td>{}</td>\
             <td class=\"text\">{}</td></tr>\n",
            escape(control.title.as_str()),
            control.id,
            escape(control.classifications.as_str()),
            escape(control.compliances.as_str()),
            control.text
        ));
    }
    html.push_str("</table>\n");

    html
}

fn format_json(labels: &ReportLabels, changes: &ChangeSet) -> Result<String, OutputError> {
    let report = JsonReport {
        old: &labels.old,
        new: &labels.new,
        changes,
    };

    serde_json::to_string_pretty(&report)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

/// Formats a change set as one line per control plus a summary.
///
/// Color scheme:
/// - Added: green
/// - Removed: red
/// - Changed: yellow
fn format_listing(changes: &ChangeSet, color: bool) -> String {
    if changes.is_empty() {
        let message = "No changes detected.";
        return if color {
            message.dimmed().to_string()
        } else {
            message.to_string()
        };
    }

    let mut output = String::new();
    let groups: [(&str, &[AnnotatedControl]); 3] = [
        ("+", &changes.added),
        ("-", &changes.removed),
        ("~", &changes.changed),
    ];

    for (symbol, controls) in groups {
        for control in controls {
            let line = format_control_line(control);
            if color {
                let styled = match symbol {
                    "+" => format!("{} {}", symbol.bright_green(), line.green()),
                    "-" => format!("{} {}", symbol.bright_red(), line.red()),
                    _ => format!("{} {}", symbol.bright_yellow(), line.yellow()),
                };
                output.push_str(&styled);
            } else {
                output.push_str(&format!("{} {}", symbol, line));
            }
            output.push('\n');
        }
    }

    output.push('\n');
    output.push_str(&format_summary(&changes.stats));

    output
}

fn format_control_line(control: &AnnotatedControl) -> String {
    if control.compliances.is_empty() {
        format!("{} [CID {}]", control.title, control.id)
    } else {
        format!(
            "{} [CID {}] ({})",
            control.title, control.id, control.compliances
        )
    }
}

/// Formats summary statistics.
pub fn format_summary(stats: &ChangeStats) -> String {
    if stats.is_empty() {
        return "Summary: No changes".to_string();
    }

    let mut parts = Vec::new();
    if stats.added > 0 {
        parts.push(format!("{} added", stats.added));
    }
    if stats.removed > 0 {
        parts.push(format!("{} removed", stats.removed));
    }
    if stats.changed > 0 {
        parts.push(format!("{} changed", stats.changed));
    }
    if stats.unchanged > 0 {
        parts.push(format!("{} unchanged", stats.unchanged));
    }

    format!("Summary: {}", parts.join(", "))
}
