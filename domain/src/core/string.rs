//! String utilities for the domain layer.

/// Collapse whitespace runs to single spaces and cut to `max_chars`
/// characters, appending `...` when something was cut.
///
/// Used for one-line previews of record bodies.
pub fn one_line_preview(s: &str, max_chars: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let keep = max_chars.saturating_sub(3);
    let cut: String = collapsed.chars().take(keep).collect();
    format!("{}...", cut.trim_end())
}

/// Count whitespace-separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
