//! Dual storage layer: SQLite for candidate documents, LanceDB for embeddings.

pub mod lancedb;
pub mod sqlite;

pub use lancedb::{ResumeMetadata, VectorHit, VectorRecord, vector_store::VectorStore};
pub use sqlite::{
    Database,
    models::{Resume, ResumeUpsert},
};

use async_trait::async_trait;

/// Document side of the pipeline, keyed by candidate email
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a candidate or refreshes the row matching their email.
    /// Returns the stored row and whether it was newly created.
    async fn upsert(&self, candidate: ResumeUpsert) -> crate::Result<(Resume, bool)>;

    /// Looks up a candidate by their normalized email.
    async fn find_by_email(&self, email: &str) -> crate::Result<Option<Resume>>;
}

/// Vector side of the pipeline, keyed by the shared candidate id
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Writes an embedding record, replacing any previous record with the same id.
    async fn upsert(&self, record: VectorRecord) -> crate::Result<()>;

    /// Returns the `top_k` nearest records to `vector`, best match first.
    /// Metadata is populated only when `include_metadata` is set.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> crate::Result<Vec<VectorHit>>;
}
