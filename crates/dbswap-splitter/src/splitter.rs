//! The core byte-level state machine (spec.md §4.J).

use dbswap_dialect::Dialect;

use crate::cast_safety;
use crate::comment;
use crate::delimiter_cmd;
use crate::dollar_quote;
use crate::error::{ParseError, Result};
use crate::keyword;
use crate::options::SplitOptions;
use crate::state::State;
use crate::statement::Statement;

/// The result of a successful split: the recovered statements plus any
/// non-fatal warnings about dangling quote/comment state at end of input —
/// the "validation helpers" spec.md §4.J asks for, folded into the one
/// real pass over the input rather than a second, separately-accurate scan.
#[derive(Debug, Clone, Default)]
pub struct SplitOutcome {
    pub statements: Vec<Statement>,
    pub warnings: Vec<String>,
}

pub fn split(input: &str, dialect: Dialect, options: &SplitOptions) -> Result<SplitOutcome> {
    let bytes = input.as_bytes();
    let mut out = SplitOutcome::default();

    let mut state = State::Normal;
    let mut open_marker_pos = 0usize;
    let mut pos = 0usize;
    let mut stmt_start = 0usize;
    let mut content_started = false;
    let mut delimiter: Vec<u8> = vec![b';'];
    let mut routine: Option<bool> = None;
    let mut begin_end_depth: u32 = 0;

    while pos < bytes.len() {
        match &state {
            State::Normal => {
                let b = bytes[pos];

                if b == b'-' && bytes.get(pos + 1) == Some(&b'-') {
                    state = State::LineComment;
                    open_marker_pos = pos;
                    pos += 2;
                    continue;
                }
                if b == b'/' && bytes.get(pos + 1) == Some(&b'*') {
                    state = State::BlockComment;
                    open_marker_pos = pos;
                    pos += 2;
                    continue;
                }
                if b == b'\'' {
                    state = State::SingleQuote;
                    open_marker_pos = pos;
                    pos += 1;
                    continue;
                }
                if b == b'"' {
                    state = State::DoubleQuote;
                    open_marker_pos = pos;
                    pos += 1;
                    continue;
                }
                if b == b'`' && dialect == Dialect::MySql {
                    state = State::Backtick;
                    open_marker_pos = pos;
                    pos += 1;
                    continue;
                }
                if b == b'$' && dialect == Dialect::PostgreSql {
                    if let Some((tag, end)) = dollar_quote::try_match_open(bytes, pos) {
                        open_marker_pos = pos;
                        state = State::DollarQuote(tag);
                        pos = end;
                        continue;
                    }
                }

                if dialect == Dialect::MySql && !content_started {
                    if let Some((new_delimiter, end)) = delimiter_cmd::try_parse(bytes, pos) {
                        delimiter = new_delimiter;
                        pos = end;
                        stmt_start = pos;
                        continue;
                    }
                }

                if !content_started && !b.is_ascii_whitespace() {
                    content_started = true;
                }

                if let Some(end) = keyword::match_ci(bytes, pos, "BEGIN") {
                    if routine.is_none() {
                        routine = Some(crate::routine::is_routine_start(&bytes[stmt_start..pos]));
                    }
                    if routine == Some(true) {
                        begin_end_depth += 1;
                    }
                    pos = end;
                    continue;
                }
                if let Some(end) = keyword::match_ci(bytes, pos, "END") {
                    if routine == Some(true)
                        && begin_end_depth > 0
                        && !crate::routine::end_closes_control_keyword(bytes, end)
                    {
                        begin_end_depth -= 1;
                    }
                    pos = end;
                    continue;
                }

                if begin_end_depth == 0 && bytes[pos..].starts_with(delimiter.as_slice()) {
                    let defer = dialect == Dialect::PostgreSql
                        && cast_safety::ends_with_type_cast(&bytes[stmt_start..pos]);
                    if !defer {
                        push_statement(&mut out.statements, input, stmt_start, pos);
                        pos += delimiter.len();
                        stmt_start = pos;
                        content_started = false;
                        routine = None;
                        begin_end_depth = 0;
                        continue;
                    }
                }

                pos += 1;
            }
            State::SingleQuote => {
                if bytes[pos] == b'\'' {
                    if bytes.get(pos + 1) == Some(&b'\'') {
                        pos += 2;
                        continue;
                    }
                    state = State::Normal;
                }
                pos += 1;
            }
            State::DoubleQuote => {
                if bytes[pos] == b'"' {
                    if bytes.get(pos + 1) == Some(&b'"') {
                        pos += 2;
                        continue;
                    }
                    state = State::Normal;
                }
                pos += 1;
            }
            State::Backtick => {
                if bytes[pos] == b'`' {
                    if bytes.get(pos + 1) == Some(&b'`') {
                        pos += 2;
                        continue;
                    }
                    state = State::Normal;
                }
                pos += 1;
            }
            State::LineComment => {
                if bytes[pos] == b'\n' {
                    state = State::Normal;
                }
                pos += 1;
            }
            State::BlockComment => {
                if bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/') {
                    state = State::Normal;
                    pos += 2;
                    continue;
                }
                pos += 1;
            }
            State::DollarQuote(tag) => {
                let close_len = tag.len() + 2;
                if bytes[pos..].len() >= close_len
                    && bytes[pos] == b'$'
                    && &bytes[pos + 1..pos + 1 + tag.len()] == tag.as_bytes()
                    && bytes[pos + 1 + tag.len()] == b'$'
                {
                    state = State::Normal;
                    pos += close_len;
                    continue;
                }
                pos += 1;
            }
        }

        if pos - stmt_start > options.max_statement_bytes {
            return Err(ParseError::too_large(stmt_start));
        }
    }

    if stmt_start < bytes.len() {
        push_statement(&mut out.statements, input, stmt_start, bytes.len());
    }

    if state != State::Normal {
        out.warnings.push(format!(
            "unterminated {} starting at byte offset {open_marker_pos}",
            state_label(&state)
        ));
    }

    Ok(out)
}

fn state_label(state: &State) -> String {
    match state {
        State::Normal => "normal".to_string(),
        State::SingleQuote => "single-quoted string".to_string(),
        State::DoubleQuote => "double-quoted identifier".to_string(),
        State::Backtick => "backtick-quoted identifier".to_string(),
        State::LineComment => "line comment".to_string(),
        State::BlockComment => "block comment".to_string(),
        State::DollarQuote(tag) => format!("dollar-quoted string (tag '{tag}')"),
    }
}

fn push_statement(out: &mut Vec<Statement>, input: &str, start: usize, end: usize) {
    let raw = &input[start..end];
    let trimmed_start = comment::strip_leading(raw);
    let trimmed = trimmed_start.trim_end();
    if trimmed.is_empty() {
        return;
    }
    let leading_skip = raw.len() - trimmed_start.len();
    out.push(Statement { sql: trimmed.to_string(), byte_offset: start + leading_skip });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(input: &str, dialect: Dialect) -> Vec<String> {
        split(input, dialect, &SplitOptions::default()).unwrap().statements.into_iter().map(|s| s.sql).collect()
    }

    #[test]
    fn splits_simple_statements_on_semicolon() {
        let stmts = sql("SELECT 1; SELECT 2;", Dialect::MySql);
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn semicolon_inside_a_single_quoted_string_does_not_split() {
        let stmts = sql("INSERT INTO t VALUES ('a;b');", Dialect::MySql);
        assert_eq!(stmts, vec!["INSERT INTO t VALUES ('a;b')"]);
    }

    #[test]
    fn doubled_quote_is_an_escaped_literal_quote() {
        let stmts = sql("INSERT INTO t VALUES ('it''s; fine');", Dialect::MySql);
        assert_eq!(stmts, vec!["INSERT INTO t VALUES ('it''s; fine')"]);
    }

    #[test]
    fn backtick_is_only_special_on_mysql() {
        let stmts = sql("SELECT `a;b` FROM t;", Dialect::MySql);
        assert_eq!(stmts, vec!["SELECT `a;b` FROM t"]);
        let stmts = sql("SELECT `a`;SELECT `b`;", Dialect::PostgreSql);
        assert_eq!(stmts, vec!["SELECT `a`", "SELECT `b`"]);
    }

    #[test]
    fn line_and_block_comments_do_not_split_on_an_embedded_semicolon() {
        let stmts = sql("SELECT 1; -- a;b\nSELECT 2; /* c;d */ SELECT 3;", Dialect::MySql);
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2", "SELECT 3"]);
    }

    #[test]
    fn leading_comments_and_whitespace_are_stripped_and_comment_only_segments_elided() {
        let stmts = sql("-- header\n\nSELECT 1;\n-- trailing comment only\n", Dialect::MySql);
        assert_eq!(stmts, vec!["SELECT 1"]);
    }

    #[test]
    fn dollar_quoted_body_is_not_split_on_semicolons_on_postgres() {
        let input = "CREATE FUNCTION f() RETURNS int AS $$ BEGIN RETURN 1; END; $$ LANGUAGE plpgsql;";
        let stmts = sql(input, Dialect::PostgreSql);
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].contains("RETURN 1; END;"));
    }

    #[test]
    fn dollar_quote_is_plain_text_on_non_postgres_dialects() {
        let stmts = sql("SELECT '$tag$';", Dialect::MySql);
        assert_eq!(stmts, vec!["SELECT '$tag$'"]);
    }

    #[test]
    fn dynamic_delimiter_changes_the_terminator_and_is_itself_not_emitted() {
        let input = "DELIMITER $$\nCREATE TRIGGER t BEFORE INSERT ON a BEGIN SELECT 1; END$$\nDELIMITER ;\nSELECT 2;";
        let stmts = sql(input, Dialect::MySql);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("CREATE TRIGGER"));
        assert!(stmts[0].contains("SELECT 1; END"));
        assert_eq!(stmts[1], "SELECT 2");
    }

    #[test]
    fn begin_end_depth_keeps_inner_semicolons_inside_one_trigger_statement() {
        let input = "DELIMITER //\nCREATE TRIGGER t BEFORE INSERT ON a BEGIN SET @x = 1; SET @y = 2; END//\nDELIMITER ;\n";
        let stmts = sql(input, Dialect::MySql);
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].contains("SET @x = 1; SET @y = 2; END"));
    }

    #[test]
    fn end_if_does_not_close_the_begin_block() {
        let input = "DELIMITER //\nCREATE TRIGGER t BEFORE INSERT ON a BEGIN IF NEW.x > 0 THEN SET @y = 1; END IF; END//\nDELIMITER ;\n";
        let stmts = sql(input, Dialect::MySql);
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].ends_with("END"));
    }

    #[test]
    fn a_bare_postgres_cast_terminates_normally() {
        let stmts = sql("SELECT x::int4;", Dialect::PostgreSql);
        assert_eq!(stmts, vec!["SELECT x::int4"]);
    }

    #[test]
    fn oversized_statement_raises_too_large() {
        let huge = format!("SELECT '{}';", "a".repeat(200));
        let options = SplitOptions { max_statement_bytes: 50 };
        let err = split(&huge, Dialect::MySql, &options).unwrap_err();
        assert_eq!(err.kind, crate::error::ParseErrorKind::TooLarge);
    }

    #[test]
    fn a_trailing_statement_without_a_terminator_is_still_recovered() {
        let stmts = sql("SELECT 1; SELECT 2", Dialect::MySql);
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
    }

    #[test]
    fn an_unterminated_string_produces_a_warning_not_an_error() {
        let outcome = split("SELECT 'unterminated", Dialect::MySql, &SplitOptions::default()).unwrap();
        assert!(outcome.warnings.iter().any(|w| w.contains("single-quoted string")));
    }
}
