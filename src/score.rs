/// Classifies an AI feedback string by its leading marker.
///
/// | Feedback (trimmed, upper-cased) | Score |
/// |---------------------------------|-------|
/// | starts with `O`                 | 1     |
/// | anything else, empty, absent    | 0     |
///
/// The rest of the text is never inspected.
pub fn score_feedback(feedback: Option<&str>) -> u8 {
    match feedback {
        Some(text) if text.trim().to_uppercase().starts_with('O') => 1,
        _ => 0,
    }
}
