//! PostgreSQL type-cast safety (spec.md §4.J): a trailing `::typename[`
//! right before what would otherwise be a statement terminator names an
//! array type (`int4[]`) whose closing bracket hasn't appeared yet, so
//! termination is deferred until it does. A bare `::typename` with no
//! open bracket is a complete cast — `x::int4;` ends the statement as
//! normal.
pub fn ends_with_type_cast(buf: &[u8]) -> bool {
    let mut end = buf.len();
    while end > 0 && buf[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    if end == 0 || buf[end - 1] != b'[' {
        return false;
    }
    end -= 1;
    let ident_end = end;
    let mut start = end;
    while start > 0 && (buf[start - 1].is_ascii_alphanumeric() || buf[start - 1] == b'_') {
        start -= 1;
    }
    if start == ident_end {
        return false;
    }
    start >= 2 && &buf[start - 2..start] == b"::"
}
