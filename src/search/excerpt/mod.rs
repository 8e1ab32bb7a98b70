//! Boundary-aware trimming of document text for display.

#[cfg(test)]
mod tests;

/// Shown in place of an excerpt when a document has no stored text.
pub const NO_TEXT_PLACEHOLDER: &str = "_No text available_";

/// How far past `limit` the cut search may look for a natural boundary.
const WINDOW_SLACK: usize = 50;

/// Trim `full_text` to a readable excerpt of roughly `limit` characters.
///
/// Text at or under the limit is returned unchanged. Longer text is cut at
/// the last sentence terminator in the working window when one lands in the
/// back half, then at the last line break under the same rule, then at the
/// last space with an ellipsis appended. Text with no space at all in the
/// window is cut hard at the limit. Counting is by character, so the cut
/// never splits a multi-byte sequence.
#[inline]
pub fn select_excerpt(full_text: &str, limit: usize) -> String {
    if full_text.trim().is_empty() {
        return NO_TEXT_PLACEHOLDER.to_string();
    }

    let chars: Vec<char> = full_text.chars().collect();
    if chars.len() <= limit {
        return full_text.to_string();
    }

    let window_end = (limit + WINDOW_SLACK).min(chars.len());
    let window = &chars[..window_end];
    let back_half = limit / 2;

    if let Some(pos) = rfind_char(window, '.').filter(|&pos| pos > back_half) {
        return window[..=pos].iter().collect();
    }

    if let Some(pos) = rfind_char(window, '\n').filter(|&pos| pos > back_half) {
        return window[..pos].iter().collect();
    }

    if let Some(pos) = rfind_char(window, ' ') {
        let head: String = window[..pos].iter().collect();
        return format!("{head}...");
    }

    let head: String = chars[..limit].iter().collect();
    format!("{head}...")
}

fn rfind_char(window: &[char], needle: char) -> Option<usize> {
    window.iter().rposition(|&c| c == needle)
}
