//! String utilities for the domain layer.

/// Produce a single-line preview of `s` limited to `max_len` bytes.
///
/// Line breaks are collapsed into spaces so the result fits in one log line
/// or status bar. When truncation is needed the preview ends with `...` and
/// the cut always lands on a UTF-8 character boundary.
pub fn preview(s: &str, max_len: usize) -> String {
    let flat: String = s
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.len() <= max_len {
        return flat;
    }
    let mut end = max_len.saturating_sub(3).min(flat.len());
    while end > 0 && !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &flat[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_is_unchanged() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn test_preview_truncates_with_ellipsis() {
        assert_eq!(preview("hello world", 8), "hello...");
    }

    #[test]
    fn test_preview_collapses_line_breaks() {
        assert_eq!(preview("| a | b |\n|---|---|\n", 40), "| a | b | |---|---|");
    }

    #[test]
    fn test_preview_multibyte_boundary() {
        // 'é' is 2 bytes, so a 4-byte cut keeps two characters
        let s = "éééééé";
        let p = preview(s, 7);
        assert!(p.ends_with("..."));
        assert_eq!(p, "éé...");
    }
}
