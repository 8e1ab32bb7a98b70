
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::extract::FALLBACK_PHONE;

/// Summary stored until an enrichment pass fills in something real.
pub const SUMMARY_PLACEHOLDER: &str = "Pending AI Analysis...";

/// The canonical stored record for one ingested resume, keyed by `id` and
/// unique on `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub raw_text: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub created_date: NaiveDateTime,
    pub updated_date: NaiveDateTime,
}

/// Fields supplied for an ingest. The store either creates a new record from
/// these or overwrites the text and display name of the record already
/// holding this email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeUpsert {
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub raw_text: String,
}

impl Resume {
    /// Whether the email came from the document rather than being
    /// synthesized at ingest time.
    #[inline]
    pub fn has_real_email(&self) -> bool {
        !(self.email.starts_with("unknown_") && self.email.ends_with("@resume.com"))
    }

    #[inline]
    pub fn has_real_phone(&self) -> bool {
        self.phone != FALLBACK_PHONE
    }
}
