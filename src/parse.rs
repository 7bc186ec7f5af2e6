//! Line-level parsers for HTTP message fragments
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_till, take_till1},
    combinator::{map, rest},
    sequence::separated_pair,
};

pub struct StatusLine<'a> {
    pub http_version: &'a str,
    pub status_code: &'a str,
    pub reason_phrase: &'a str,
}

/// Splits a status line into its three space-separated parts.
///
/// Only the shape is checked: the version and code are any run of non-space
/// bytes, so status lines from servers that do not speak HTTP (`ICY 200 OK`)
/// still split. A line with fewer than three parts does not parse.
pub fn status_line(input: &str) -> IResult<&str, StatusLine<'_>> {
    let parts = (token, tag(" "), token, tag(" "), rest);

    map(parts, |output: (&str, &str, &str, &str, &str)| StatusLine {
        http_version: output.0,
        status_code: output.2,
        reason_phrase: output.4,
    })
    .parse(input)
}

/// Splits a `Name: value` field line at the first colon.
///
/// The name is everything before the colon, untrimmed; the value is the
/// remainder of the line. Lines without a colon do not parse.
pub fn field_line(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_till(|c| c == ':'), tag(":"), rest).parse(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == ' ').parse(input)
}
