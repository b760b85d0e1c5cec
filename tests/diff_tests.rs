use controldiff::diff::{diff_text, flatten_markup, TextDiff};

#[test]
fn test_identical_text_is_unchanged() {
    let text = "Agencies MUST comply.";
    assert_eq!(
        diff_text(text, text),
        TextDiff {
            highlighted: text.to_string(),
            changed: false
        }
    );
}

#[test]
fn test_inserted_word() {
    let diff = diff_text("Agencies MUST comply.", "Agencies MUST fully comply.");
    assert!(diff.changed);
    assert_eq!(
        diff.highlighted,
        "Agencies MUST <span class=\"insert\">fully </span>comply."
    );
}

#[test]
fn test_deleted_word() {
    let diff = diff_text("Agencies MUST fully comply.", "Agencies MUST comply.");
    assert!(diff.changed);
    assert_eq!(
        diff.highlighted,
        "Agencies MUST <span class=\"delete\">fully </span>comply."
    );
}

#[test]
fn test_replaced_text() {
    let diff = diff_text("Agencies MUST comply.", "Agencies SHOULD comply.");
    assert!(diff.changed);
    assert!(diff.highlighted.contains("<span class=\"delete\">"));
    assert!(diff.highlighted.contains("<span class=\"insert\">"));
    assert!(diff.highlighted.starts_with("Agencies "));
    assert!(diff.highlighted.ends_with(" comply."));
}

#[test]
fn test_replace_renders_delete_before_insert() {
    let diff = diff_text("abxd", "abyd");
    assert_eq!(
        diff.highlighted,
        "ab<span class=\"delete\">x</span><span class=\"insert\">y</span>d"
    );
}

#[test]
fn test_whitespace_only_delete_is_not_a_change() {
    let diff = diff_text("hello  world", "hello world");
    assert!(!diff.changed);
    assert_eq!(diff.highlighted, "hello world");
}

#[test]
fn test_whitespace_only_insert_is_a_change() {
    let diff = diff_text("hello world", "hello  world");
    assert!(diff.changed);
    assert_eq!(
        diff.highlighted,
        "hello <span class=\"insert\"> </span>world"
    );
}

#[test]
fn test_trailing_newline_removed_is_not_a_change() {
    let diff = diff_text("Agencies MUST comply.\n", "Agencies MUST comply.");
    assert!(!diff.changed);
}

#[test]
fn test_non_whitespace_delete_is_a_change() {
    let diff = diff_text("hello world", "world");
    assert!(diff.changed);
    assert_eq!(diff.highlighted, "<span class=\"delete\">hello </span>world");
}

#[test]
fn test_markup_is_stripped_before_diffing() {
    let diff = diff_text("<p>Hello</p>", "<p>Hello!</p>");
    assert!(diff.changed);
    assert_eq!(diff.highlighted, "Hello<span class=\"insert\">!</span>");
}

#[test]
fn test_markup_only_change_is_not_a_change() {
    let diff = diff_text(
        "Agencies MUST review annually.",
        "Agencies MUST review <b>annually</b>.",
    );
    assert!(!diff.changed);
    assert_eq!(diff.highlighted, "Agencies MUST review annually.");
}

#[test]
fn test_markup_whitespace_is_normalized() {
    let diff = diff_text("<p>One\n   two</p>", "<p>One two</p>");
    assert!(!diff.changed);
    assert_eq!(diff.highlighted, "One two");
}

#[test]
fn test_entities_are_escaped_in_output() {
    let diff = diff_text("A &amp; B", "A &amp; B &lt; C");
    assert!(diff.changed);
    assert_eq!(
        diff.highlighted,
        "A &amp; B<span class=\"insert\"> &lt; C</span>"
    );
}

#[test]
fn test_invalid_entity_falls_back_to_raw_text() {
    let diff = diff_text("R&D", "R&D");
    assert!(!diff.changed);
    assert_eq!(diff.highlighted, "R&amp;D");
}

#[test]
fn test_empty_to_text() {
    let diff = diff_text("", "New text.");
    assert!(diff.changed);
    assert_eq!(diff.highlighted, "<span class=\"insert\">New text.</span>");
}

#[test]
fn test_flatten_unbalanced_markup() {
    assert_eq!(flatten_markup("First<br>second"), "Firstsecond");
}

#[test]
fn test_flatten_nested_markup() {
    assert_eq!(
        flatten_markup("<ul><li>One</li> <li>Two</li></ul>"),
        "One Two"
    );
}

#[test]
fn test_entity_escaped_markup_is_flattened() {
    let diff = diff_text("&lt;p&gt;Hello&lt;/p&gt;", "&lt;p&gt;Hello!&lt;/p&gt;");
    assert!(diff.changed);
    assert_eq!(diff.highlighted, "Hello<span class=\"insert\">!</span>");
}

#[test]
fn test_entity_escaped_tag_rename_is_not_a_change() {
    let diff = diff_text(
        "&lt;p&gt;Agencies MUST comply.&lt;/p&gt;",
        "&lt;div&gt;Agencies MUST comply.&lt;/div&gt;",
    );
    assert!(!diff.changed);
    assert_eq!(diff.highlighted, "Agencies MUST comply.");
}

#[test]
fn test_escaped_and_inline_markup_compare_equal() {
    let diff = diff_text("&lt;b&gt;Agencies&lt;/b&gt; MUST comply.", "<b>Agencies</b> MUST comply.");
    assert!(!diff.changed);
}

#[test]
fn test_escaped_comparison_operator_is_not_markup() {
    let diff = diff_text("x &lt; y", "<p>x &lt; y</p>");
    assert!(!diff.changed);
    assert_eq!(diff.highlighted, "x &lt; y");
}
