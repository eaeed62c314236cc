//! Extended tests for the include scanner
//!
//! Covers the directive spellings found in real project headers.

use super::*;
use pretty_assertions::assert_eq;

/// Whitespace before the hash and between hash and keyword
#[test]
fn test_leading_whitespace_tolerated() {
    let scanner = IncludeScanner::new();
    assert_eq!(scanner.local_target("   #include \"a.h\"").as_deref(), Some("a.h"));
    assert_eq!(scanner.local_target("\t# include \"a.h\"").as_deref(), Some("a.h"));
    assert_eq!(scanner.local_target("#include\"a.h\"").as_deref(), Some("a.h"));
}

/// Only the first quoted token on the line counts
#[test]
fn test_trailing_content_ignored() {
    let scanner = IncludeScanner::new();
    assert_eq!(
        scanner.local_target("#include \"a.h\" // see \"b.h\"").as_deref(),
        Some("a.h")
    );
    assert_eq!(scanner.local_target("#include \"a.h\" /* c */").as_deref(), Some("a.h"));
}

/// Directive must open the line
#[test]
fn test_not_at_line_start() {
    let scanner = IncludeScanner::new();
    assert_eq!(scanner.local_target("// #include \"a.h\"").as_deref(), None);
    assert_eq!(scanner.local_target("int x; #include \"a.h\"").as_deref(), None);
}

/// Malformed directives yield nothing instead of failing
#[test]
fn test_malformed_lines() {
    let scanner = IncludeScanner::new();
    assert_eq!(scanner.local_target("#include").as_deref(), None);
    assert_eq!(scanner.local_target("#include \"\"").as_deref(), None);
    assert_eq!(scanner.local_target("#include \"unterminated.h").as_deref(), None);
    assert_eq!(scanner.local_target("#includes \"a.h\"").as_deref(), None);
    assert_eq!(scanner.local_target("#include MACRO_HEADER").as_deref(), None);
}

/// Scan keeps file order, skips system headers, handles CRLF and BOM
#[test]
fn test_scan_order() {
    let source = "\u{feff}#include \"first.h\"\r\n\
#include <vector>\r\n\
\r\n\
namespace core {\r\n\
#include \"second.h\"\r\n\
}\r\n\
#include \"first.h\"\r\n";
    let scanner = IncludeScanner::new();
    assert_eq!(
        scanner.scan_str(source),
        vec!["first.h".to_string(), "second.h".to_string(), "first.h".to_string()]
    );
}

/// Subdirectory targets are kept as written
#[test]
fn test_nested_target_kept_verbatim() {
    let scanner = IncludeScanner::new();
    assert_eq!(scanner.scan_str("#include \"detail/impl.h\"\n"), vec!["detail/impl.h".to_string()]);
}

#[test]
fn test_scan_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("a.h");
    std::fs::write(&path, "#pragma once\n#include \"b.h\"\nstruct A {};\n").unwrap();

    let scanner = IncludeScanner::new();
    assert_eq!(scanner.scan_file(&path).unwrap(), vec!["b.h".to_string()]);
}

/// Bytes outside UTF-8 (Latin-1, GBK comments) never stop a scan
#[test]
fn test_non_utf8_lines_scanned() {
    let scanner = IncludeScanner::new();
    let source: &[u8] = b"// \xa9 2020 Vendor\n#include \"b.h\"\n/* \xc4\xe3\xba\xc3 */\nint x;\n";
    assert_eq!(scanner.scan_bytes(source), vec!["b.h".to_string()]);
}

/// A target name that is not UTF-8 is decoded lossily
#[test]
fn test_non_utf8_target_name() {
    let scanner = IncludeScanner::new();
    assert_eq!(
        scanner.local_target(b"#include \"caf\xe9.h\"".as_slice()).as_deref(),
        Some("caf\u{fffd}.h")
    );
}

#[test]
fn test_scan_file_latin1() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("b.h");
    std::fs::write(&path, b"// \xa9 2020 Vendor\n#include \"c.h\"\nint b;\n").unwrap();

    let scanner = IncludeScanner::new();
    assert_eq!(scanner.scan_file(&path).unwrap(), vec!["c.h".to_string()]);
}
