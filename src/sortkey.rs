//! Display-order keys derived from control titles.
//!
//! Control identifiers carry no ordering, so reports sort controls by a key
//! built from the dotted title instead. Segments 0, 1 and 2 are chapter,
//! section and block; segment 3 is the category letter and is skipped;
//! segment 4 is the paragraph number.
//!
//! # Examples
//!
//! ```
//! use controldiff::sortkey::sortkey;
//!
//! assert_eq!(sortkey("1.1.65.C.01.").unwrap(), "001001065001");
//! assert_eq!(sortkey("1.1.65.C-01.").unwrap(), "001001065001");
//! ```

use crate::error::SortKeyError;

/// Title segments that make up the key, in key order.
const KEY_SEGMENTS: [usize; 4] = [0, 1, 2, 4];

/// Width each segment is zero-padded to.
const SEGMENT_WIDTH: usize = 3;

/// Builds the sortable key for a control title.
///
/// Titles in the hyphenated form (`1.1.65.C-01.`) are rewritten to the dotted
/// form first, so both schema dialects produce the same key for the same
/// control.
///
/// # Errors
///
/// Returns `SortKeyError::MalformedTitle` when the normalized title has fewer
/// than five segments or one of the key segments is not a non-negative
/// integer.
pub fn sortkey(title: &str) -> Result<String, SortKeyError> {
    let normalized = normalize_title(title);
    let segments: Vec<&str> = normalized.split('.').collect();

    if segments.len() < 5 {
        return Err(SortKeyError::malformed(
            title,
            format!("expected at least 5 segments, found {}", segments.len()),
        ));
    }

    let mut key = String::with_capacity(KEY_SEGMENTS.len() * SEGMENT_WIDTH);
    for index in KEY_SEGMENTS {
        let value = parse_segment(segments[index]).ok_or_else(|| {
            SortKeyError::malformed(
                title,
                format!("segment {} ('{}') is not an integer", index, segments[index]),
            )
        })?;
        key.push_str(&format!("{:0width$}", value, width = SEGMENT_WIDTH));
    }

    Ok(key)
}

/// Rewrites `<letter>-<digit>` to `<letter>.<digit>`.
pub fn normalize_title(title: &str) -> String {
    let chars: Vec<char> = title.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let after_letter = i > 0 && chars[i - 1].is_ascii_alphabetic();
            let before_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if c == '-' && after_letter && before_digit {
                '.'
            } else {
                c
            }
        })
        .collect()
}

/// Surrounding whitespace is ignored; signs are not accepted.
fn parse_segment(segment: &str) -> Option<u32> {
    let segment = segment.trim();
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
