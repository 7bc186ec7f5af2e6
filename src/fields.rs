//! Case-insensitive lookup over raw `Name: value` field lines
//!
//! Header lines are stored exactly as they appeared on the wire. Lookups
//! never normalize the stored lines; the name comparison ignores ASCII case
//! and the returned value has surrounding whitespace trimmed.

use crate::parse;

/// Finds the value of the first field whose name matches `name`.
///
/// Lines without a `:` separator are skipped.
pub(crate) fn find_value<'a>(lines: &'a [String], name: &str) -> Option<&'a str> {
    lines.iter().find_map(|line| {
        let (_remain, (field_name, value)) = parse::field_line(line).ok()?;

        if field_name.eq_ignore_ascii_case(name) {
            Some(value.trim())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &[&str]) -> Vec<String> {
        input.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_find_value() {
        let headers = lines(&["Host: example.com", "Accept: text/plain"]);

        assert_eq!(find_value(&headers, "Accept"), Some("text/plain"));
        assert_eq!(find_value(&headers, "Host"), Some("example.com"));
        assert_eq!(find_value(&headers, "Cookie"), None);
    }

    #[test]
    fn test_find_value_ignores_case() {
        let headers = lines(&["Content-Type: text/html"]);

        assert_eq!(find_value(&headers, "content-type"), Some("text/html"));
        assert_eq!(find_value(&headers, "CONTENT-TYPE"), Some("text/html"));
    }

    #[test]
    fn test_find_value_first_match_wins() {
        let headers = lines(&["Set-Cookie: a=1", "Set-Cookie: b=2"]);

        assert_eq!(find_value(&headers, "Set-Cookie"), Some("a=1"));
    }

    #[test]
    fn test_find_value_trims_value_only() {
        let headers = lines(&["X-Padded:    spaced out   "]);

        assert_eq!(find_value(&headers, "X-Padded"), Some("spaced out"));
    }

    #[test]
    fn test_find_value_skips_separator_less_lines() {
        let headers = lines(&["not a header", "Real: yes"]);

        assert_eq!(find_value(&headers, "Real"), Some("yes"));
        assert_eq!(find_value(&headers, "not a header"), None);
    }
}
