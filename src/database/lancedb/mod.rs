
pub mod vector_store;

use serde::{Deserialize, Serialize};

/// Upper bound, in bytes, for the serialized metadata payload of one record
pub const METADATA_LIMIT_BYTES: usize = 40_000;

/// Byte length `raw_text` is cut down to when the payload is over the limit
pub const TRUNCATED_TEXT_BYTES: usize = 10_000;

/// A single embedding record stored in the vector database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique identifier, shared with the candidate's document row
    pub id: String,
    /// The embedding vector
    pub vector: Vec<f32>,
    /// Candidate details stored alongside the vector
    pub metadata: ResumeMetadata,
}

/// Candidate details carried next to each embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeMetadata {
    /// Candidate display name
    pub name: String,
    /// Contact email extracted from the resume
    pub email: String,
    /// Resume text, truncated when the payload would exceed the size limit
    pub raw_text: String,
    /// Source filename, when the resume was ingested from a file
    pub filename: Option<String>,
}

/// A nearest-neighbor match from a similarity query
#[derive(Debug, Clone)]
pub struct VectorHit {
    /// Identifier of the matching record
    pub id: String,
    /// Similarity derived from the stored distance, higher is closer
    pub similarity: f32,
    /// Stored metadata, present when the caller asked for it
    pub metadata: Option<ResumeMetadata>,
}

impl ResumeMetadata {
    /// Shrinks `raw_text` when the serialized payload would exceed
    /// [`METADATA_LIMIT_BYTES`]. Returns whether anything was cut.
    #[inline]
    pub fn clamp_to_limit(&mut self) -> bool {
        let serialized_len = serde_json::to_string(self).map_or(0, |json| json.len());
        if serialized_len <= METADATA_LIMIT_BYTES {
            return false;
        }

        self.raw_text = truncate_to_byte_limit(&self.raw_text, TRUNCATED_TEXT_BYTES);
        true
    }
}

/// Cuts `text` down to at most `max_bytes` bytes without splitting a character
fn truncate_to_byte_limit(text: &str, max_bytes: usize) -> String {
    let mut truncated = String::with_capacity(max_bytes.min(text.len()));
    for ch in text.chars() {
        if truncated.len() + ch.len_utf8() > max_bytes {
            break;
        }
        truncated.push(ch);
    }
    truncated
}
