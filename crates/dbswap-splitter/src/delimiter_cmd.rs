//! MySQL's dynamic `DELIMITER <seq>` dump command (spec.md §4.J).
//!
//! Only ever checked at the start of a statement — a `DELIMITER` appearing
//! mid-statement (e.g. inside a string) is just data.

use crate::keyword;

/// If a `DELIMITER <seq>` command starts at `pos`, returns the new
/// delimiter bytes and the offset just past the command line (including
/// its trailing newline, if any).
pub fn try_parse(bytes: &[u8], pos: usize) -> Option<(Vec<u8>, usize)> {
    let after_kw = keyword::match_ci(bytes, pos, "DELIMITER")?;
    let after_ws = keyword::skip_ws(bytes, after_kw);
    if after_ws == after_kw {
        return None;
    }
    let mut end = after_ws;
    while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
        end += 1;
    }
    if end == after_ws {
        return None;
    }
    let new_delimiter = bytes[after_ws..end].to_vec();

    let mut line_end = end;
    while line_end < bytes.len() && bytes[line_end] != b'\n' {
        line_end += 1;
    }
    if line_end < bytes.len() {
        line_end += 1;
    }
    Some((new_delimiter, line_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_the_delimiter_and_consumes_the_whole_line() {
        let (delim, end) = try_parse(b"DELIMITER $$\nCREATE", 0).unwrap();
        assert_eq!(delim, b"$$");
        assert_eq!(&b"DELIMITER $$\nCREATE"[end..], b"CREATE");
    }

    #[test]
    fn is_case_insensitive() {
        let (delim, _) = try_parse(b"delimiter //\n", 0).unwrap();
        assert_eq!(delim, b"//");
    }

    #[test]
    fn delimiter_as_a_substring_of_a_longer_identifier_does_not_match() {
        assert!(try_parse(b"DELIMITERX //\n", 0).is_none());
    }
}
