//! Ingestion pipeline: identity extraction, embedding, then the dual-store
//! write. Steps run strictly in order so a failure early in the chain leaves
//! later stores untouched.

pub mod consistency;


use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::VaultError;
use crate::database::{DocumentStore, ResumeMetadata, ResumeUpsert, VectorIndex, VectorRecord};
use crate::embeddings::EmbeddingProvider;
use crate::extract::CandidateIdentity;

pub use consistency::{ConsistencyReport, validate_consistency};

/// Outcome of one ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Id of the document row the resume landed in
    pub document_id: String,
    /// Email the resume was keyed by, extracted or synthesized
    pub email: String,
    /// True when a new document was created rather than updated
    pub created: bool,
}

/// Runs the ingestion pipeline over the document store and the vector index
pub struct Ingestor {
    documents: Arc<dyn DocumentStore>,
    vectors: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Ingestor {
    #[inline]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        vectors: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            documents,
            vectors,
            embedder,
        }
    }

    /// Ingests one resume: extracts the candidate identity, embeds the text,
    /// upserts the document keyed by email, then overwrites the embedding
    /// keyed by document id.
    ///
    /// The embedding runs before any write, so an embedding failure leaves
    /// both stores untouched. A vector write failure after the document write
    /// is logged and returned, never repaired here.
    #[inline]
    pub async fn ingest(
        &self,
        text: &str,
        display_name: Option<&str>,
        filename: Option<&str>,
    ) -> crate::Result<IngestOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VaultError::EmptyInput);
        }

        let identity = CandidateIdentity::extract(text);
        debug!("Extracted candidate identity: {}", identity.email);

        let vector = self.embedder.embed(text)?;

        let display_name = display_name.unwrap_or_default();
        let candidate = ResumeUpsert {
            display_name: display_name.to_string(),
            email: identity.email,
            phone: identity.phone,
            raw_text: text.to_string(),
        };
        let (resume, created) = self.documents.upsert(candidate).await?;

        if created {
            info!("Created resume {} for {}", resume.id, resume.email);
        } else {
            info!("Updated resume {} for {}", resume.id, resume.email);
        }

        let record = VectorRecord {
            id: resume.id.clone(),
            vector,
            metadata: ResumeMetadata {
                name: display_name.to_string(),
                email: resume.email.clone(),
                raw_text: text.to_string(),
                filename: filename.map(str::to_string),
            },
        };

        if let Err(e) = self.vectors.upsert(record).await {
            warn!(
                "Resume {} was stored but its embedding write failed: {}",
                resume.id, e
            );
            return Err(e);
        }

        Ok(IngestOutcome {
            document_id: resume.id,
            email: resume.email,
            created,
        })
    }
}
