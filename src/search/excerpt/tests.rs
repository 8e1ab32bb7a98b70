use super::*;
use crate::config::DEFAULT_EXCERPT_LIMIT;

const LIMIT: usize = DEFAULT_EXCERPT_LIMIT;

#[test]
fn short_text_returned_unchanged() {
    let text = "Brief summary of a candidate.";
    assert_eq!(select_excerpt(text, LIMIT), text);
}

#[test]
fn text_at_exact_limit_returned_unchanged() {
    let text = "a".repeat(LIMIT);
    assert_eq!(select_excerpt(&text, LIMIT), text);
}

#[test]
fn empty_text_yields_placeholder() {
    assert_eq!(select_excerpt("", LIMIT), NO_TEXT_PLACEHOLDER);
}

#[test]
fn whitespace_only_yields_placeholder() {
    assert_eq!(select_excerpt("   \n\t  ", LIMIT), NO_TEXT_PLACEHOLDER);
}

#[test]
fn cuts_after_last_period_in_back_half() {
    // Period at position 899, the far edge of the 900-char window
    let mut text = "a".repeat(899);
    text.push('.');
    text.push_str(&"b".repeat(1100));
    assert_eq!(text.chars().count(), 2000);

    let excerpt = select_excerpt(&text, LIMIT);
    assert_eq!(excerpt.chars().count(), 900);
    assert!(excerpt.ends_with('.'));
    let expected: String = text.chars().take(900).collect();
    assert_eq!(excerpt, expected);
}

#[test]
fn period_past_limit_but_inside_window_still_used() {
    let mut text = "a".repeat(880);
    text.push('.');
    text.push_str(&"b".repeat(1119));

    let excerpt = select_excerpt(&text, LIMIT);
    // The cut may run up to 50 characters past the limit to finish a sentence
    assert_eq!(excerpt.chars().count(), 881);
    assert!(excerpt.ends_with('.'));
}

#[test]
fn early_period_not_used_as_cut() {
    // Period at position 100 is in the front half; with no other boundary
    // the text is cut hard at the limit
    let mut text = "a".repeat(100);
    text.push('.');
    text.push_str(&"b".repeat(1899));

    let excerpt = select_excerpt(&text, LIMIT);
    assert_eq!(excerpt.chars().count(), LIMIT + 3);
    assert!(excerpt.ends_with("..."));
}

#[test]
fn back_half_threshold_is_strict() {
    let limit = 850;

    // Period exactly at limit / 2 does not qualify
    let mut at_threshold = "a".repeat(425);
    at_threshold.push('.');
    at_threshold.push_str(&"b".repeat(1574));
    let excerpt = select_excerpt(&at_threshold, limit);
    assert!(excerpt.ends_with("..."));

    // One position later it does
    let mut past_threshold = "a".repeat(426);
    past_threshold.push('.');
    past_threshold.push_str(&"b".repeat(1573));
    let excerpt = select_excerpt(&past_threshold, limit);
    assert_eq!(excerpt.chars().count(), 427);
    assert!(excerpt.ends_with('.'));
}

#[test]
fn cuts_before_last_newline_when_no_period_qualifies() {
    let mut text = "a".repeat(600);
    text.push('\n');
    text.push_str(&"b".repeat(1399));

    let excerpt = select_excerpt(&text, LIMIT);
    assert_eq!(excerpt, "a".repeat(600));
    assert!(!excerpt.ends_with("..."));
}

#[test]
fn space_fallback_appends_ellipsis() {
    // No period or newline anywhere in the window; space at position 859
    let mut text = "a".repeat(859);
    text.push(' ');
    text.push_str(&"b".repeat(1140));
    assert_eq!(text.chars().count(), 2000);

    let excerpt = select_excerpt(&text, LIMIT);
    assert_eq!(excerpt, format!("{}...", "a".repeat(859)));
}

#[test]
fn space_fallback_has_no_back_half_threshold() {
    let mut text = "aa ".to_string();
    text.push_str(&"b".repeat(1997));

    let excerpt = select_excerpt(&text, LIMIT);
    assert_eq!(excerpt, "aa...");
}

#[test]
fn no_boundary_at_all_cuts_hard_at_limit() {
    let text = "x".repeat(2000);
    let excerpt = select_excerpt(&text, LIMIT);
    assert_eq!(excerpt.chars().count(), LIMIT + 3);
    assert!(excerpt.ends_with("..."));
}

#[test]
fn counts_characters_not_bytes() {
    let text = "é".repeat(2000);
    let excerpt = select_excerpt(&text, LIMIT);
    assert_eq!(excerpt.chars().count(), LIMIT + 3);
    assert!(excerpt.ends_with("..."));
}

#[test]
fn respects_custom_limit() {
    let mut text = "a".repeat(60);
    text.push('.');
    text.push_str(&"b".repeat(239));

    let excerpt = select_excerpt(&text, 100);
    assert_eq!(excerpt.chars().count(), 61);
    assert!(excerpt.ends_with('.'));
}

#[test]
fn realistic_resume_cut_lands_on_sentence() {
    let sentence = "Led migration of the billing platform to an event-driven design. ";
    let text = sentence.repeat(40);
    assert!(text.chars().count() > LIMIT);

    let excerpt = select_excerpt(&text, LIMIT);
    assert!(excerpt.ends_with('.'));
    assert!(excerpt.chars().count() <= LIMIT + WINDOW_SLACK);
    assert!(text.starts_with(&excerpt));
}
