//! Answer extraction from free-text model responses.
//!
//! Models are instructed to finish with a line such as `[Answer] 0.5`.
//! Reasoning text may mention the marker earlier, so only the text after the
//! **last** marker counts.

/// Literal token preceding the final numeric answer
pub const ANSWER_MARKER: &str = "[Answer]";

/// Extract the numeric answer following the last [`ANSWER_MARKER`].
///
/// Returns `None` when the marker is missing or when the text after the last
/// marker is not a finite number. A malformed answer is not an error: the
/// sample is simply dropped from aggregation.
///
/// # Examples
///
/// ```
/// use probe_domain::extract_answer;
///
/// assert_eq!(extract_answer("Considering base rates...\n[Answer] 0.35"), Some(0.35));
/// assert_eq!(extract_answer("I think it is likely."), None);
/// ```
pub fn extract_answer(text: &str) -> Option<f64> {
    let (_, tail) = text.rsplit_once(ANSWER_MARKER)?;
    tail.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
