// Output rendering: terminal views and the markdown digest.

pub mod markdown;
pub mod terminal;

/// Caps `text` at `max_chars` characters, marking the cut with "...".
/// The slice lands on a char boundary, so multi-byte text cannot panic.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}
