use controldiff::{sortkey, SortKeyError};

#[test]
fn test_sortkey_dot_form() {
    assert_eq!(sortkey("1.1.65.C.01.").unwrap(), "001001065001");
}

#[test]
fn test_sortkey_hyphen_form_matches_dot_form() {
    assert_eq!(
        sortkey("1.1.65.C-01.").unwrap(),
        sortkey("1.1.65.C.01.").unwrap()
    );
}

#[test]
fn test_sortkey_pads_and_skips_category() {
    assert_eq!(sortkey("2.3.4.C.10.").unwrap(), "002003004010");
}

#[test]
fn test_sortkey_without_trailing_dot() {
    assert_eq!(sortkey("16.1.13.C.02").unwrap(), "016001013002");
}

#[test]
fn test_sortkey_is_twelve_digits() {
    let key = sortkey("22.4.100.C.7.").unwrap();
    assert_eq!(key.len(), 12);
    assert!(key.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_sortkey_orders_like_the_document() {
    // Identifier order and plain string order of titles both disagree with this.
    let mut titles = vec!["1.1.10.C.01.", "1.1.9.C.02.", "1.1.9.C.10.", "1.2.1.C.01."];
    titles.sort_by_key(|t| sortkey(t).unwrap());
    assert_eq!(
        titles,
        vec!["1.1.9.C.02.", "1.1.9.C.10.", "1.1.10.C.01.", "1.2.1.C.01."]
    );
}

#[test]
fn test_sortkey_ignores_whitespace_around_segments() {
    assert_eq!(sortkey(" 1.1.65.C.01.").unwrap(), "001001065001");
    assert_eq!(sortkey("1. 1.65.C. 01 .").unwrap(), "001001065001");
}

#[test]
fn test_sortkey_too_few_segments() {
    let err = sortkey("1.1.65.").unwrap_err();
    assert!(matches!(err, SortKeyError::MalformedTitle { .. }));
    assert!(err.to_string().contains("1.1.65."));
}

#[test]
fn test_sortkey_non_numeric_segment() {
    assert!(sortkey("1.A.65.C.01.").is_err());
    assert!(sortkey("1.1.65.C.x.").is_err());
}

#[test]
fn test_sortkey_empty_title() {
    assert!(sortkey("").is_err());
}
