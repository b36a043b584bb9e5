//! Integration tests for formatting inside a document

use commentfmt::host::{with_rulers, Preferences, RulerOverride, RulerStore};
use commentfmt::scope::{block_comment_scope, detect_kind, format_at, scope_at};
use commentfmt::{FormatConfig, TextKind};

const DOCUMENT: &str = "#include <vector>

/**
 * @brief Sums the values in the vector and returns the total of all of them.
 * @param values input
 */
int sum(const std::vector<int>& values);

// Counts things. This comment is long enough that it has to be wrapped.
int count();
";

fn offset_of(needle: &str) -> usize {
    DOCUMENT.find(needle).expect("needle in document")
}

#[test]
fn test_detect_kinds() {
    assert_eq!(detect_kind(DOCUMENT, offset_of("@brief")), Some(TextKind::BlockComment));
    assert_eq!(detect_kind(DOCUMENT, offset_of("Counts")), Some(TextKind::LineComment));
    assert_eq!(detect_kind(DOCUMENT, offset_of("int count")), Some(TextKind::Paragraph));
    assert_eq!(detect_kind(DOCUMENT, offset_of("\n\n/**") + 1), None);
}

#[test]
fn test_include_line_is_a_line_comment() {
    // `#` starts a line comment for scripting languages
    assert_eq!(detect_kind(DOCUMENT, 0), Some(TextKind::LineComment));
}

#[test]
fn test_block_scope_covers_whole_lines() {
    let range = block_comment_scope(DOCUMENT, offset_of("values input")).unwrap();
    let text = &DOCUMENT[range];
    assert!(text.starts_with("/**\n"));
    assert!(text.ends_with(" */\n"));
}

#[test]
fn test_format_block_comment_in_document() {
    let config = FormatConfig::new(40, 4);
    let edit = format_at(DOCUMENT, offset_of("@brief"), &config)
        .unwrap()
        .expect("comment needs rewrapping");
    let updated = edit.apply(DOCUMENT);

    assert!(updated.starts_with("#include <vector>\n\n/**\n * @brief Sums the values in the vector\n"));
    assert!(updated.contains("int sum(const std::vector<int>& values);\n"));
    assert_eq!(format_at(&updated, offset_of("@brief"), &config), Ok(None));
}

#[test]
fn test_format_line_comment_in_document() {
    let config = FormatConfig::new(40, 4);
    let edit = format_at(DOCUMENT, offset_of("Counts"), &config)
        .unwrap()
        .expect("comment needs rewrapping");
    assert_eq!(
        edit.new_text,
        "// Counts things. This comment is long\n// enough that it has to be wrapped.\n"
    );
    assert_eq!(&DOCUMENT[edit.range.clone()], "// Counts things. This comment is long enough that it has to be wrapped.\n");
}

#[test]
fn test_scope_at_returns_range() {
    let (kind, range) = scope_at(DOCUMENT, offset_of("int count")).unwrap();
    assert_eq!(kind, TextKind::Paragraph);
    // Paragraphs only stop at empty lines
    assert_eq!(
        &DOCUMENT[range],
        "// Counts things. This comment is long enough that it has to be wrapped.\nint count();\n"
    );
}

#[test]
fn test_rulers_drive_width() {
    let mut preferences = Preferences::from_json(r#"{"rulers": [100], "tab_size": 8}"#).unwrap();
    let view_rulers = Some(vec![40]);

    let edit = with_rulers(&mut preferences, view_rulers, |prefs| {
        format_at(DOCUMENT, offset_of("Counts"), &prefs.format_config())
    })
    .unwrap();

    assert!(edit.is_some());
    assert_eq!(preferences.rulers(), Some(vec![100]));
    assert_eq!(preferences.format_config().tab_size, 8);
}

#[test]
fn test_missing_rulers_default_to_80() {
    let preferences = Preferences::from_json("{}").unwrap();
    assert_eq!(preferences.format_config().width, 80);

    let preferences = Preferences::from_json(r#"{"rulers": []}"#).unwrap();
    assert_eq!(preferences.format_config().width, 80);
}

#[test]
fn test_guard_reads_through() {
    let mut preferences = Preferences::default();
    let mut guard = RulerOverride::install(&mut preferences, Some(vec![72]));
    assert_eq!(guard.format_config().width, 72);
    guard.set_rulers(Some(vec![90]));
    assert_eq!(guard.rulers(), Some(vec![90]));
    drop(guard);
    assert_eq!(preferences.rulers(), None);
}
