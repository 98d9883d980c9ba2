//! Agreement with the `csv` crate on well-formed input


use csvstream::TokenizerBuilder;
use test_data_gen::{
    generate_quoted_csv, generate_simple_csv, parse, parse_with, parse_with_csv_crate, to_crlf,
};

#[test]
fn test_simple_matches_csv_crate() {
    let input = generate_simple_csv(500, 8);
    assert_eq!(parse(input.as_bytes()), parse_with_csv_crate(input.as_bytes()));
}

#[test]
fn test_quoted_matches_csv_crate() {
    for input in [generate_quoted_csv(200), to_crlf(&generate_quoted_csv(200))] {
        assert_eq!(parse(input.as_bytes()), parse_with_csv_crate(input.as_bytes()));
    }
}

#[test]
fn test_blank_lines_match_csv_crate() {
    let input = b"a,b\n\n\nc,d\r\n\r\ne,f\n";
    assert_eq!(parse(input), parse_with_csv_crate(input));
}

#[test]
fn test_refill_boundaries_match_csv_crate() {
    let input = to_crlf(&generate_quoted_csv(75));
    let expected = parse_with_csv_crate(input.as_bytes());
    for cap in 4..24 {
        let rows = parse_with(input.as_bytes(), TokenizerBuilder::new().buffer_capacity(cap));
        assert_eq!(rows, expected, "buffer capacity {cap}");
    }
}
