//! Integration tests for line comments

use commentfmt::{format_line_comment, FormatConfig, FormatError};

fn format(text: &str, width: usize) -> String {
    format_line_comment(text, &FormatConfig::new(width, 4)).expect("Should format")
}

#[test]
fn test_short_comment_unchanged() {
    assert_eq!(format("// a short comment", 80), "// a short comment");
    assert_eq!(format("// a short comment\n", 80), "// a short comment\n");
}

#[test]
fn test_paragraphs_rewrap_independently() {
    let text = "// one two\n// three\n//\n// four five six seven\n";
    assert_eq!(
        format(text, 16),
        "// one two three\n//\n// four five six\n// seven\n"
    );
}

#[test]
fn test_hash_comments() {
    let text = "# alpha beta\n# gamma\n";
    assert_eq!(format(text, 80), "# alpha beta gamma\n");
}

#[test]
fn test_indented_prefix_reused() {
    let text = "\t// alpha beta gamma\n\t// delta\n";
    assert_eq!(format(text, 20), "\t// alpha beta\n\t// gamma delta\n");
}

#[test]
fn test_first_prefix_wins() {
    let text = "/// first\n// second\n";
    assert_eq!(format(text, 80), "/// first second\n");
}

#[test]
fn test_separator_runs_collapse() {
    let text = "// a\n//\n//\n// b\n";
    assert_eq!(format(text, 80), "// a\n//\n// b\n");
}

#[test]
fn test_long_word_overflows() {
    let text = "// https://example.com/a/very/long/path\n";
    assert_eq!(format(text, 10), text);
}

#[test]
fn test_code_line_fails() {
    let err = format_line_comment("// ok\nint x;\n", &FormatConfig::default()).unwrap_err();
    assert!(matches!(err, FormatError::Unmatched { .. }));
}

#[test]
fn test_idempotent() {
    let text = "  // The quick brown fox jumps over the lazy dog and keeps running far away.\n";
    let once = format(text, 30);
    assert_eq!(format(&once, 30), once);
}
