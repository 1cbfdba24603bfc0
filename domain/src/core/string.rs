//! String utilities for the domain layer.

/// Single-line preview of `s` limited to `max_chars` characters.
///
/// Runs of whitespace (including newlines) collapse to one space so the
/// preview fits on a log line. Truncated previews end with `...`.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut out: String = flat.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short() {
        assert_eq!(preview("Will it rain?", 50), "Will it rain?");
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        assert_eq!(preview("hello world", 5), "hello...");
        assert_eq!(preview("ÄÖÜäöü", 3), "ÄÖÜ...");
    }

    #[test]
    fn test_preview_flattens_whitespace() {
        assert_eq!(preview("line one\n\n  line two", 50), "line one line two");
    }
}
