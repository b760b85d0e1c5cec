//! Extraction of control indexes from XML documents.
//!
//! The document is read as a stream of events. Every control element carrying
//! the dialect's identifier attribute becomes one [`ControlRecord`]; its inner
//! content is kept verbatim, inline markup included, so the differ and the
//! report can both work with it.
//!
//! # Examples
//!
//! ```
//! use controldiff::extract::parse_document;
//! use controldiff::SchemaDialect;
//!
//! let xml = r#"<xml>
//!   <paragraph title="1.1.65.C.01." classifications="All Classifications"
//!              compliances="Must" CID="131">Agencies MUST comply.</paragraph>
//! </xml>"#;
//!
//! let index = parse_document(xml, SchemaDialect::V1).unwrap();
//! assert_eq!(index.get(131).unwrap().text, "Agencies MUST comply.");
//! ```

use crate::dialect::{SchemaDialect, TITLE_ATTRIBUTE};
use crate::error::ParseError;
use crate::model::{ControlIndex, ControlRecord};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Attributes of a control element, before its content is read.
struct ControlAttributes {
    id: u32,
    title: String,
    classifications: String,
    compliances: String,
}

/// Reads and parses a document file.
///
/// # Errors
///
/// - `ParseError::FileNotFound` if the path does not exist
/// - `ParseError::ReadError` if the file cannot be read
/// - any error of [`parse_document`]
pub fn load_document(path: &Path, dialect: SchemaDialect) -> Result<ControlIndex, ParseError> {
    if !path.exists() {
        return Err(ParseError::file_not_found(
            path.to_string_lossy().to_string(),
        ));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ParseError::read_error(path.to_string_lossy().to_string(), e))?;

    let index = parse_document(&content, dialect)?;
    debug!(
        path = %path.display(),
        dialect = %dialect,
        controls = index.len(),
        "loaded document"
    );
    Ok(index)
}

/// Parses a document into an index of its controls.
///
/// # Errors
///
/// - `ParseError::Xml` if the document is not well-formed
/// - `ParseError::InvalidIdentifier` if an identifier is not an integer
/// - `ParseError::MissingAttribute` if a control has no title
/// - `ParseError::DuplicateIdentifier` if two controls share an identifier
pub fn parse_document(xml: &str, dialect: SchemaDialect) -> Result<ControlIndex, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let element = dialect.control_element().as_bytes();
    let mut controls = BTreeMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == element => {
                if let Some(attrs) = read_control_attributes(&e, dialect)? {
                    let text = reader.read_text(e.name()).map_err(ParseError::xml)?;
                    insert_control(&mut controls, attrs, text.into_owned())?;
                }
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == element => {
                if let Some(attrs) = read_control_attributes(&e, dialect)? {
                    insert_control(&mut controls, attrs, String::new())?;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::xml(e)),
            _ => {}
        }
    }

    Ok(ControlIndex::new(dialect, controls))
}

/// Returns `None` for control elements without the identifier attribute.
fn read_control_attributes(
    e: &BytesStart<'_>,
    dialect: SchemaDialect,
) -> Result<Option<ControlAttributes>, ParseError> {
    let mut id = None;
    let mut title = None;
    let mut classifications = String::new();
    let mut compliances = String::new();

    for attr in e.attributes() {
        let attr = attr.map_err(ParseError::xml)?;
        let key = attr.key.as_ref();
        let value = attr.unescape_value().map_err(ParseError::xml)?.into_owned();

        if key == dialect.id_attribute().as_bytes() {
            id = Some(value);
        } else if key == TITLE_ATTRIBUTE.as_bytes() {
            title = Some(value);
        } else if key == dialect.classification_attribute().as_bytes() {
            classifications = value;
        } else if key == dialect.compliance_attribute().as_bytes() {
            compliances = value;
        }
    }

    let Some(raw_id) = id else {
        return Ok(None);
    };

    let id: u32 = raw_id
        .trim()
        .parse()
        .map_err(|_| ParseError::invalid_identifier(dialect.id_attribute(), raw_id.clone()))?;

    let title = title.ok_or_else(|| ParseError::missing_attribute(id.to_string(), TITLE_ATTRIBUTE))?;

    Ok(Some(ControlAttributes {
        id,
        title,
        classifications,
        compliances,
    }))
}

fn insert_control(
    controls: &mut BTreeMap<u32, ControlRecord>,
    attrs: ControlAttributes,
    text: String,
) -> Result<(), ParseError> {
    if controls.contains_key(&attrs.id) {
        return Err(ParseError::DuplicateIdentifier { id: attrs.id });
    }

    controls.insert(
        attrs.id,
        ControlRecord {
            id: attrs.id,
            title: attrs.title,
            classifications: attrs.classifications,
            compliances: attrs.compliances,
            text,
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_without_identifier_is_skipped() {
        let xml = r#"<xml><paragraph title="1.1.1.C.01.">No id</paragraph></xml>"#;
        let index = parse_document(xml, SchemaDialect::V1).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_other_dialect_identifier_is_ignored() {
        let xml = r#"<xml><paragraph title="1.1.1.C.01." cid="7">Text</paragraph></xml>"#;
        let index = parse_document(xml, SchemaDialect::V1).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_identifier_whitespace_is_trimmed() {
        let xml = r#"<xml><paragraph title="1.1.1.C.01." CID=" 7 ">Text</paragraph></xml>"#;
        let index = parse_document(xml, SchemaDialect::V1).unwrap();
        assert!(index.contains(7));
    }
}
