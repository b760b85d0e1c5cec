//! Markup-aware text diff of control bodies.
//!
//! Control text may carry inline markup. Before diffing, both sides are
//! reduced to plain text. Tag-free text is entity-decoded first, so markup
//! escaped as entities counts as markup. When either side then has tags, all
//! text leaves are concatenated in document order and whitespace is collapsed. The plain texts are aligned character by character
//! and rendered as an HTML fragment with insertions and deletions wrapped in
//! highlight spans.
//!
//! A deletion that consists only of whitespace is dropped from the output and
//! does not count as a change. Insertions always count, whitespace or not.
//!
//! # Examples
//!
//! ```
//! use controldiff::diff::diff_text;
//!
//! let diff = diff_text("Agencies MUST comply.", "Agencies MUST fully comply.");
//! assert!(diff.changed);
//! assert_eq!(
//!     diff.highlighted,
//!     "Agencies MUST <span class=\"insert\">fully </span>comply."
//! );
//! ```

use crate::matcher::{SequenceMatcher, Tag};
use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use tracing::trace;

/// CSS class of inserted text.
pub const INSERT_CLASS: &str = "insert";

/// CSS class of deleted text.
pub const DELETE_CLASS: &str = "delete";

/// Result of diffing two control bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDiff {
    /// HTML fragment of the new text with highlighted edits
    pub highlighted: String,
    /// Whether anything besides whitespace-only deletions differs
    pub changed: bool,
}

/// Diffs two control bodies.
///
/// # Arguments
///
/// * `old` - Text of the old version, possibly with inline markup
/// * `new` - Text of the new version, possibly with inline markup
///
/// # Returns
///
/// The highlighted fragment and the change flag. For identical markup-free
/// input the fragment equals the input and `changed` is false.
pub fn diff_text(old: &str, new: &str) -> TextDiff {
    let old_source = markup_source(old);
    let new_source = markup_source(new);
    let markup = has_markup(&old_source) || has_markup(&new_source);
    let old_plain = plain_text(&old_source, markup);
    let new_plain = plain_text(&new_source, markup);

    let a: Vec<char> = old_plain.chars().collect();
    let b: Vec<char> = new_plain.chars().collect();
    let matcher = SequenceMatcher::new(&a, &b);

    let mut highlighted = String::with_capacity(new_plain.len());
    let mut changed = false;

    for op in matcher.opcodes() {
        let old_segment: String = a[op.a].iter().collect();
        let new_segment: String = b[op.b].iter().collect();

        match op.tag {
            Tag::Equal => highlighted.push_str(&partial_escape(&old_segment)),
            Tag::Insert => {
                push_span(&mut highlighted, INSERT_CLASS, &new_segment);
                changed = true;
            }
            Tag::Delete => {
                if old_segment.trim().is_empty() {
                    continue;
                }
                push_span(&mut highlighted, DELETE_CLASS, &old_segment);
                changed = true;
            }
            Tag::Replace => {
                push_span(&mut highlighted, DELETE_CLASS, &old_segment);
                push_span(&mut highlighted, INSERT_CLASS, &new_segment);
                changed = true;
            }
        }
    }

    trace!(similarity = matcher.ratio(), changed, "aligned control text");

    TextDiff {
        highlighted,
        changed,
    }
}

/// Text as the differ sees it before flattening.
///
/// Inline tags are kept as they are. Text without tags is entity-decoded, so
/// markup written as `&lt;p&gt;` is treated like real markup.
fn markup_source(raw: &str) -> Cow<'_, str> {
    if has_markup(raw) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(decode_entities(raw))
    }
}

/// In markup mode every side is whitespace-normalized; only sides with tags
/// go through the XML reader.
fn plain_text(source: &str, markup: bool) -> String {
    if !markup {
        source.to_string()
    } else if has_markup(source) {
        flatten_markup(source)
    } else {
        normalize_whitespace(source)
    }
}

fn push_span(out: &mut String, class: &str, text: &str) {
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\">");
    out.push_str(&partial_escape(text));
    out.push_str("</span>");
}

/// True if the text contains something that looks like a tag.
pub fn has_markup(text: &str) -> bool {
    text.as_bytes()
        .windows(2)
        .any(|w| w[0] == b'<' && (w[1].is_ascii_alphabetic() || matches!(w[1], b'/' | b'!' | b'?')))
}

/// Reduces a markup fragment to its whitespace-normalized text content.
pub fn flatten_markup(fragment: &str) -> String {
    let wrapped = format!("<fragment>{}</fragment>", fragment);
    let mut reader = Reader::from_str(&wrapped);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;

    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => match t.unescape() {
                Ok(s) => text.push_str(&s),
                Err(_) => return normalize_whitespace(&decode_entities(&strip_tags(fragment))),
            },
            Ok(Event::CData(c)) => text.push_str(&String::from_utf8_lossy(&c)),
            Ok(Event::Eof) => break,
            Err(_) => return normalize_whitespace(&decode_entities(&strip_tags(fragment))),
            _ => {}
        }
    }

    normalize_whitespace(&text)
}

fn decode_entities(text: &str) -> String {
    unescape(text)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| text.to_string())
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
