//! Tests for the line protocol
//!
//! Verifies request parsing (verbs, arity, case handling) and the exact
//! response lines clients receive.

use blockfs::protocol::{Command, Response};
use blockfs::FsError;

// =============================================================================
// Command Parsing Tests
// =============================================================================

#[test]
fn test_parse_create() {
    assert_eq!(
        Command::parse("CREATE notes").unwrap(),
        Command::Create {
            name: "notes".to_string()
        }
    );
}

#[test]
fn test_parse_is_case_insensitive_on_the_verb() {
    assert_eq!(Command::parse("list").unwrap(), Command::List);
    assert_eq!(
        Command::parse("create Notes").unwrap(),
        Command::Create {
            name: "Notes".to_string()
        }
    );
}

#[test]
fn test_parse_write_joins_content_tokens() {
    assert_eq!(
        Command::parse("WRITE f hello block world").unwrap(),
        Command::Write {
            name: "f".to_string(),
            content: "hello block world".to_string()
        }
    );
}

#[test]
fn test_parse_write_collapses_extra_whitespace() {
    // Tokens are whitespace-separated; runs of spaces don't survive.
    assert_eq!(
        Command::parse("WRITE  f   a  b").unwrap(),
        Command::Write {
            name: "f".to_string(),
            content: "a b".to_string()
        }
    );
}

#[test]
fn test_parse_quit_and_list() {
    assert_eq!(Command::parse("QUIT").unwrap(), Command::Quit);
    assert_eq!(Command::parse("LIST").unwrap(), Command::List);
}

#[test]
fn test_parse_arity_errors() {
    let cases = [
        ("CREATE", "CREATE command requires exactly 1 argument."),
        ("CREATE a b", "CREATE command requires exactly 1 argument."),
        ("READ", "READ command requires exactly 1 argument."),
        ("WRITE f", "WRITE command requires at least 2 arguments."),
        ("LIST extra", "LIST command does not take any arguments."),
        ("DELETE", "DELETE command requires exactly 1 argument."),
    ];

    for (line, message) in cases {
        let err = Command::parse(line).unwrap_err();
        assert!(matches!(err, FsError::Protocol(_)), "line {:?}", line);
        assert_eq!(err.to_string(), message, "line {:?}", line);
    }
}

#[test]
fn test_parse_unknown_command() {
    for line in ["FROBNICATE x", "", "   "] {
        let err = Command::parse(line).unwrap_err();
        assert_eq!(err.to_string(), "Unknown command.", "line {:?}", line);
    }
}

// =============================================================================
// Response Rendering Tests
// =============================================================================

#[test]
fn test_success_lines_are_exact() {
    assert_eq!(
        Response::Created {
            name: "f".to_string()
        }
        .to_string(),
        "SUCCESS: File 'f' created."
    );
    assert_eq!(
        Response::Written {
            name: "f".to_string()
        }
        .to_string(),
        "SUCCESS: File 'f' written."
    );
    assert_eq!(
        Response::Deleted {
            name: "f".to_string()
        }
        .to_string(),
        "SUCCESS: File 'f' deleted."
    );
    assert_eq!(
        Response::Content(b"hello world".to_vec()).to_string(),
        "SUCCESS: hello world"
    );
    assert_eq!(Response::Disconnecting.to_string(), "SUCCESS: Disconnecting.");
}

#[test]
fn test_listing_is_comma_separated_in_slot_order() {
    let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    assert_eq!(Response::Listing(names).to_string(), "SUCCESS: a, b, c");
    assert_eq!(Response::Listing(Vec::new()).to_string(), "SUCCESS: ");
}

#[test]
fn test_error_line_carries_the_bare_message() {
    assert_eq!(
        Response::error(FsError::validation("File not found: f")).to_string(),
        "ERROR: File not found: f"
    );
    assert_eq!(
        Response::error(FsError::capacity("Not enough free blocks.")).to_string(),
        "ERROR: Not enough free blocks."
    );
}

#[test]
fn test_non_utf8_content_renders_lossily() {
    let rendered = Response::Content(vec![0x66, 0xFF, 0x66]).to_string();
    assert!(rendered.starts_with("SUCCESS: "));
    assert!(rendered.contains('\u{FFFD}'));
}
