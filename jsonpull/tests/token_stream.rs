// SPDX-License-Identifier: Apache-2.0

// Token-level walks of whole documents: ordering, classification,
// terminal states and error codes.

use jsonpull::{ErrorCode, JsonReader, Node, SliceSource, ValueKind};

fn reader<'buf>(
    capture: &'buf mut [u8],
    json: &'static str,
) -> JsonReader<'buf, SliceSource<'static>> {
    let mut reader = JsonReader::new(capture);
    reader.begin(SliceSource::new(json.as_bytes()));
    reader
}

/// Drains a document, collecting (node, raw text) pairs.
fn walk(json: &'static str) -> (Vec<(Node, String)>, Node, Option<ErrorCode>) {
    let mut capture = [0u8; 256];
    let mut reader = reader(&mut capture, json);
    let mut tokens = Vec::new();
    while reader.advance() {
        let raw = reader.raw_value().unwrap_or("").to_owned();
        tokens.push((reader.node(), raw));
    }
    (tokens, reader.node(), reader.last_error())
}

#[test]
fn object_with_nested_array_token_sequence() {
    let (tokens, end, error) = walk(r#"{"a":1,"b":[2,3]}"#);
    let expected = [
        (Node::StartObject, ""),
        (Node::Key, "\"a\""),
        (Node::Value, "1"),
        (Node::Key, "\"b\""),
        (Node::StartArray, ""),
        (Node::Value, "2"),
        (Node::Value, "3"),
        (Node::EndArray, ""),
        (Node::EndObject, ""),
    ];
    assert_eq!(tokens.len(), expected.len());
    for ((node, raw), (expected_node, expected_raw)) in tokens.iter().zip(expected) {
        assert_eq!(*node, expected_node);
        assert_eq!(raw, expected_raw);
    }
    assert_eq!(end, Node::EndDocument);
    assert_eq!(error, None);
}

#[test]
fn nesting_stays_balanced_and_non_negative() {
    let json = r#"{"a":[{"b":[1,[2]]},{}],"c":{"d":[[]]}}"#;
    let mut capture = [0u8; 64];
    let mut reader = reader(&mut capture, json);
    let mut array_depth = 0i32;
    let mut object_depth = 0i32;
    while reader.advance() {
        match reader.node() {
            Node::StartArray => array_depth += 1,
            Node::EndArray => array_depth -= 1,
            Node::StartObject => object_depth += 1,
            Node::EndObject => object_depth -= 1,
            _ => {}
        }
        assert!(array_depth >= 0, "more `]` than `[` seen");
        assert!(object_depth >= 0, "more `}}` than `{{` seen");
    }
    assert_eq!(reader.node(), Node::EndDocument);
    assert_eq!((array_depth, object_depth), (0, 0));
}

#[test]
fn whitespace_between_tokens() {
    let (tokens, end, error) = walk(" {\n\t\"a\" :  1 ,\r\n \"b\" : true } ");
    let nodes: Vec<Node> = tokens.iter().map(|(node, _)| *node).collect();
    assert_eq!(
        nodes,
        [
            Node::StartObject,
            Node::Key,
            Node::Value,
            Node::Key,
            Node::Value,
            Node::EndObject,
        ]
    );
    assert_eq!(end, Node::EndDocument);
    assert_eq!(error, None);
}

#[test]
fn root_string_is_a_value() {
    let mut capture = [0u8; 32];
    let mut reader = reader(&mut capture, "\"hi\"");
    assert!(reader.advance());
    assert_eq!(reader.node(), Node::Value);
    assert_eq!(reader.value_kind(), Some(ValueKind::String));
    reader.undecorate();
    assert_eq!(reader.raw_value(), Some("hi"));
    assert!(!reader.advance());
}

#[test]
fn number_forms() {
    let cases = [
        ("0", 0.0),
        ("-1", -1.0),
        ("3.5", 3.5),
        ("-2.5e3", -2500.0),
        ("1e-2", 0.01),
        ("1E+2", 100.0),
        (".5", 0.5),
    ];
    for (text, value) in cases {
        let mut capture = [0u8; 32];
        let mut reader = reader(&mut capture, text);
        assert!(reader.advance(), "failed to read {:?}", text);
        assert_eq!(reader.value_kind(), Some(ValueKind::Number));
        assert_eq!(reader.numeric_value(), Some(value), "for {:?}", text);
    }
}

#[test]
fn malformed_number_is_captured_but_does_not_parse() {
    let mut capture = [0u8; 32];
    let mut reader = reader(&mut capture, "[1.2.3]");
    assert!(reader.advance());
    assert!(reader.advance());
    assert_eq!(reader.node(), Node::Value);
    assert_eq!(reader.raw_value(), Some("1.2.3"));
    assert_eq!(reader.value_kind(), Some(ValueKind::Number));
    assert_eq!(reader.numeric_value(), None);
}

#[test]
fn truncated_true_literal_is_rejected() {
    let (_, end, error) = walk(r#"{"x": tru}"#);
    assert_eq!(end, Node::Error);
    assert_eq!(error, Some(ErrorCode::UnexpectedValue));
}

#[test]
fn overlong_literal_is_rejected() {
    let (_, end, error) = walk("[truee]");
    assert_eq!(end, Node::Error);
    assert_eq!(error, Some(ErrorCode::UnexpectedValue));
}

#[test]
fn misspelled_null_is_rejected() {
    let (_, end, error) = walk("[nul]");
    assert_eq!(end, Node::Error);
    assert_eq!(error, Some(ErrorCode::UnexpectedValue));
}

#[test]
fn bare_garbage_is_rejected() {
    let (_, end, error) = walk("@");
    assert_eq!(end, Node::Error);
    assert_eq!(error, Some(ErrorCode::UnexpectedValue));
}

#[test]
fn unterminated_string_is_detected() {
    let (_, end, error) = walk(r#"["abc"#);
    assert_eq!(end, Node::Error);
    assert_eq!(error, Some(ErrorCode::UnterminatedString));
}

#[test]
fn dangling_comma_at_end_of_input() {
    let (_, end, error) = walk("[1,");
    assert_eq!(end, Node::Error);
    assert_eq!(error, Some(ErrorCode::UnterminatedArray));
}

#[test]
fn key_with_no_value_is_detected() {
    let (_, end, error) = walk(r#"{"a":"#);
    assert_eq!(end, Node::Error);
    assert_eq!(error, Some(ErrorCode::KeyHasNoValue));
}

#[test]
fn error_state_is_terminal_and_sticky() {
    let mut capture = [0u8; 32];
    let mut reader = reader(&mut capture, "@@@");
    assert!(reader.advance());
    assert_eq!(reader.node(), Node::Error);
    let position = reader.position();
    assert!(!reader.advance());
    assert!(!reader.advance());
    assert_eq!(reader.node(), Node::Error);
    assert_eq!(reader.last_error(), Some(ErrorCode::UnexpectedValue));
    assert_eq!(reader.position(), position);
}

#[test]
fn line_and_column_track_the_source() {
    let mut capture = [0u8; 32];
    let mut reader = reader(&mut capture, "[\n1,\n2]");
    assert!(reader.advance());
    assert_eq!(reader.node(), Node::StartArray);
    assert_eq!(reader.line(), 2);
    assert!(reader.advance());
    assert_eq!(reader.line(), 2);
    assert!(reader.advance());
    assert_eq!(reader.line(), 3);
    assert_eq!(reader.position().offset, 7);
}

#[test]
fn undecorate_decodes_keys_and_string_values() {
    let mut capture = [0u8; 64];
    let mut reader = reader(&mut capture, "{\"na\\tme\": \"line\\nbreak\"}");
    assert!(reader.advance());
    assert!(reader.advance());
    assert_eq!(reader.node(), Node::Key);
    assert_eq!(reader.raw_value(), Some("\"na\\tme\""));
    reader.undecorate();
    assert_eq!(reader.raw_value(), Some("na\tme"));
    assert!(reader.advance());
    assert_eq!(reader.node(), Node::Value);
    reader.undecorate();
    assert_eq!(reader.raw_value(), Some("line\nbreak"));
}

#[test]
fn unicode_escapes_degrade_to_single_bytes() {
    let mut capture = [0u8; 64];
    let mut reader = reader(&mut capture, "[\"\\u0041\\u00e9\\u0129\"]");
    assert!(reader.advance());
    assert!(reader.advance());
    assert_eq!(reader.value_kind(), Some(ValueKind::String));
    reader.undecorate();
    assert_eq!(reader.raw_bytes(), Some(&[b'A', 0xe9, b'?'][..]));
    // a lone 0xe9 is not valid UTF-8, so the text accessor refuses
    assert_eq!(reader.raw_value(), None);
}

#[test]
fn undecorate_off_a_string_is_a_no_op() {
    let mut capture = [0u8; 32];
    let mut reader = reader(&mut capture, "[12.5]");
    assert!(reader.advance());
    assert!(reader.advance());
    reader.undecorate();
    assert_eq!(reader.raw_value(), Some("12.5"));
    assert_eq!(reader.numeric_value(), Some(12.5));
}
