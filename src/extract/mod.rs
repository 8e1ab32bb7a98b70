//! Candidate identity extraction from raw resume text.


use chrono::Utc;
use fancy_regex::Regex;
use std::sync::LazyLock;

/// Sentinel stored when no phone number can be found in the document.
pub const FALLBACK_PHONE: &str = "0000000000";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]+").expect("valid regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{10,}\b").expect("valid regex"));

static BLANK_LINE_RUNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Identity fields pulled from a resume. Extraction is total: when a field
/// cannot be found, a deterministic placeholder takes its place so documents
/// without contact details still get a stable storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateIdentity {
    pub email: String,
    pub phone: String,
}

impl CandidateIdentity {
    /// Extract the first email address and first phone-like digit run from
    /// `text`. A phone number must be at least ten consecutive digits;
    /// formatted numbers with separators do not qualify.
    #[inline]
    pub fn extract(text: &str) -> Self {
        let email = EMAIL_RE
            .find(text)
            .ok()
            .flatten()
            .map_or_else(placeholder_email, |m| m.as_str().to_string());

        let phone = PHONE_RE
            .find(text)
            .ok()
            .flatten()
            .map_or_else(|| FALLBACK_PHONE.to_string(), |m| m.as_str().to_string());

        Self { email, phone }
    }
}

/// Synthetic email used when a document carries no address. The epoch-millis
/// component keeps concurrently ingested anonymous documents from colliding
/// on the unique email key.
#[inline]
pub fn placeholder_email() -> String {
    format!("unknown_{}@resume.com", Utc::now().timestamp_millis())
}

/// Clean up text extracted from a document before ingestion: squeeze runs of
/// blank lines down to a single blank line and trim surrounding whitespace.
#[inline]
pub fn normalize_text(text: &str) -> String {
    let squeezed = BLANK_LINE_RUNS_RE.replace_all(text, "\n\n");
    squeezed.trim().to_string()
}
