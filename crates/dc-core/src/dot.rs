//! DOT string conventions for the attributes the canvas reads and writes.
//!
//! Labels travel quoted (`"Start"`) and are displayed unquoted. Positions are
//! reported as the quoted DOT point `"x,y"`.

/// `true` if `text` is wrapped in double quotes.
pub fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

/// Display form of a raw DOT label: outer quotes stripped, `\"` unescaped.
/// Unquoted identifiers are returned as-is.
pub fn unquote_label(raw: &str) -> String {
    if is_quoted(raw) {
        raw[1..raw.len() - 1].replace("\\\"", "\"")
    } else {
        raw.to_string()
    }
}

/// DOT form of a display label.
pub fn quote_label(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

/// Format a scene position as a DOT `pos` value.
pub fn format_pos(x: f64, y: f64) -> String {
    format!("\"{x},{y}\"")
}

/// Parse a DOT `pos` value (`"x,y"`, optionally pinned with a trailing `!`).
pub fn parse_pos(raw: &str) -> Option<(f64, f64)> {
    let inner = if is_quoted(raw) {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    let inner = inner.trim().trim_end_matches('!');
    let (x, y) = inner.split_once(',')?;
    let y = y.split(',').next()?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_unquote_and_requote() {
        assert_eq!(unquote_label("\"Hello world\""), "Hello world");
        assert_eq!(unquote_label("plain"), "plain");
        assert_eq!(unquote_label("\""), "\"");
        assert_eq!(quote_label("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(unquote_label(&quote_label("say \"hi\"")), "say \"hi\"");
    }

    #[test]
    fn pos_formats_without_trailing_zeros() {
        assert_eq!(format_pos(100.0, -20.5), "\"100,-20.5\"");
    }

    #[test]
    fn pos_parses_dot_variants() {
        assert_eq!(parse_pos("\"100,-20.5\""), Some((100.0, -20.5)));
        assert_eq!(parse_pos("3,4!"), Some((3.0, 4.0)));
        assert_eq!(parse_pos("1,2,3"), Some((1.0, 2.0)));
        assert_eq!(parse_pos("\"oops\""), None);
        assert_eq!(parse_pos("1,x"), None);
    }
}
