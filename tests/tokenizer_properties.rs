//! Behavioral properties of the tokenizer and row assembler


use csvstream::{EscapePolicy, Field, RowReader, Terminator, TokenizerBuilder};
use test_data_gen::{generate_quoted_csv, generate_simple_csv, owned, parse, parse_with, to_crlf};

#[test]
fn test_simple_rows_equal_comma_split() {
    let input = generate_simple_csv(250, 6);
    let expected: Vec<Vec<String>> = input
        .lines()
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect();
    let rows = parse(input.as_bytes());
    assert_eq!(rows.len(), 250);
    assert_eq!(rows, expected);
}

#[test]
fn test_quotes_preserve_delimiters_and_terminators() {
    assert_eq!(parse(b"\"a,b\",\"c\nd\""), owned(&[&["a,b", "c\nd"]]));
}

#[test]
fn test_escaped_quote() {
    assert_eq!(parse(br#""ha ""ha"" ha""#), owned(&[&[r#"ha "ha" ha"#]]));
}

#[test]
fn test_crlf_parses_like_lf() {
    let lf = generate_quoted_csv(40);
    let crlf = to_crlf(&lf);
    let a = parse(lf.as_bytes());
    let b = parse(crlf.as_bytes());
    assert_eq!(a.len(), b.len());
    for (ra, rb) in a.iter().zip(&b) {
        assert_eq!(ra.len(), rb.len());
    }
    // Unquoted content is identical; quoted line breaks keep their bytes.
    let simple = generate_simple_csv(30, 3);
    assert_eq!(parse(simple.as_bytes()), parse(to_crlf(&simple).as_bytes()));
}

#[test]
fn test_lone_cr_terminates_rows() {
    assert_eq!(parse(b"a,b\rc,d\r"), owned(&[&["a", "b"], &["c", "d"]]));
}

#[test]
fn test_bom_prefix_is_invisible() {
    let body = generate_simple_csv(5, 3);
    let mut with_bom = vec![0xEF, 0xBB, 0xBF];
    with_bom.extend_from_slice(body.as_bytes());
    assert_eq!(parse(&with_bom), parse(body.as_bytes()));
    assert!(parse(&[0xEF, 0xBB, 0xBF]).is_empty());
}

#[test]
fn test_bom_bytes_mid_stream_are_data() {
    let rows = parse("a,\u{feff}b\n".as_bytes());
    assert_eq!(rows, owned(&[&["a", "\u{feff}b"]]));
}

#[test]
fn test_idempotent_exhaustion() {
    let mut tok = TokenizerBuilder::new().from_bytes(b"a,b\n").unwrap();
    while tok.next_field().unwrap() != Field::StreamEnd {}
    let pos = tok.byte_position();
    for _ in 0..5 {
        assert_eq!(tok.next_field().unwrap(), Field::StreamEnd);
        assert!(tok.is_exhausted());
        assert_eq!(tok.byte_position(), pos);
    }
}

#[test]
fn test_trailing_field_flush() {
    let mut tok = TokenizerBuilder::new().from_bytes(b"a,b,c").unwrap();
    let mut got = Vec::new();
    loop {
        match tok.next_field().unwrap() {
            Field::Data(d) => got.push(String::from_utf8(d).unwrap()),
            Field::RowEnd => panic!("no terminator in input"),
            Field::StreamEnd => break,
        }
    }
    assert_eq!(got, vec!["a", "b", "c"]);
    assert_eq!(parse(b"a,b,c"), owned(&[&["a", "b", "c"]]));
}

#[test]
fn test_custom_delimiter() {
    let rows = parse_with(b"a;b;c", TokenizerBuilder::new().delimiter(b';'));
    assert_eq!(rows, owned(&[&["a", "b", "c"]]));
}

#[test]
fn test_custom_terminator() {
    let builder = TokenizerBuilder::new().terminator(Terminator::Byte(b';'));
    assert_eq!(parse_with(b"a,b;", builder.clone()), owned(&[&["a", "b"]]));
    // Line breaks are ordinary bytes under an explicit terminator.
    assert_eq!(
        parse_with(b"a\r\n,b;c", builder),
        owned(&[&["a\r\n", "b"], &["c"]])
    );
}

#[test]
fn test_custom_quote() {
    let rows = parse_with(b"'x,y'", TokenizerBuilder::new().quote(b'\''));
    assert_eq!(rows, owned(&[&["x,y"]]));
    // The default quote is then just data.
    let rows = parse_with(b"\"x,y\"", TokenizerBuilder::new().quote(b'\''));
    assert_eq!(rows, owned(&[&["\"x", "y\""]]));
}

#[test]
fn test_tab_separated() {
    let rows = parse_with(b"a\tb c\t\n", TokenizerBuilder::new().delimiter(b'\t'));
    assert_eq!(rows, owned(&[&["a", "b c", ""]]));
}

#[test]
fn test_small_buffers_do_not_change_results() {
    let input = to_crlf(&generate_quoted_csv(60));
    let reference = parse(input.as_bytes());
    for cap in [4, 5, 7, 16, 63] {
        let rows = parse_with(input.as_bytes(), TokenizerBuilder::new().buffer_capacity(cap));
        assert_eq!(rows, reference, "buffer capacity {cap}");
    }
}

#[test]
fn test_lenient_policy_recovers() {
    let builder = TokenizerBuilder::new().escape_policy(EscapePolicy::Lenient);
    assert_eq!(parse_with(b"\"ab\"c,d", builder), owned(&[&["abc", "d"]]));
}

#[test]
fn test_non_utf8_bytes_pass_through() {
    let mut reader = RowReader::from_reader(&b"\xff\xfe,ok\n"[..]);
    let row = reader.next_row().unwrap().unwrap();
    assert_eq!(row.get(0), Some(&b"\xff\xfe"[..]));
    assert_eq!(row.get_str(0), None);
    assert_eq!(row.get_str(1), Some("ok"));
}

#[test]
fn test_long_field_spanning_many_refills() {
    let big = "x".repeat(10_000);
    let input = format!("\"{big}\",tail\n");
    let rows = parse_with(input.as_bytes(), TokenizerBuilder::new().buffer_capacity(64));
    assert_eq!(rows, vec![vec![big, "tail".to_string()]]);
}

#[test]
fn test_byte_position_reaches_input_length() {
    let input = generate_quoted_csv(20);
    let mut reader = RowReader::new(
        TokenizerBuilder::new()
            .buffer_capacity(8)
            .from_bytes(input.as_bytes())
            .unwrap(),
    );
    reader.read_all().unwrap();
    assert_eq!(reader.byte_position(), input.len() as u64);
}
