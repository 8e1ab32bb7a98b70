use std::collections::HashSet;

use anyhow::Result;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::database::VectorStore;
use crate::database::sqlite::Database;

/// Consistency check results between the document store and the vector index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Number of resumes in SQLite
    pub document_count: usize,
    /// Number of embeddings in LanceDB
    pub vector_count: usize,
    /// Document ids with no embedding in LanceDB
    pub missing_in_vectors: Vec<String>,
    /// Embedding ids with no document row in SQLite
    pub orphaned_in_vectors: Vec<String>,
    /// Overall consistency status
    pub is_consistent: bool,
}

impl ConsistencyReport {
    /// One-line human-readable summary.
    #[inline]
    pub fn summary(&self) -> String {
        if self.is_consistent {
            format!(
                "Stores are consistent: {} resumes, {} embeddings",
                self.document_count, self.vector_count
            )
        } else {
            format!(
                "Store inconsistencies found: {} resumes without embeddings, {} orphaned embeddings",
                self.missing_in_vectors.len(),
                self.orphaned_in_vectors.len()
            )
        }
    }

    /// Total number of out-of-sync ids.
    #[inline]
    pub fn total_issues(&self) -> usize {
        self.missing_in_vectors.len() + self.orphaned_in_vectors.len()
    }
}

/// Compares ids across both stores. Reports only, never repairs.
#[inline]
pub async fn validate_consistency(
    database: &Database,
    vector_store: &VectorStore,
) -> Result<ConsistencyReport> {
    info!("Starting cross-store consistency validation");

    let document_ids = database.resume_ids().await?;
    debug!("Found {} resumes in SQLite", document_ids.len());

    let vector_ids = vector_store.ids().await?;
    debug!("Found {} embeddings in LanceDB", vector_ids.len());

    let report = build_report(&document_ids, &vector_ids);
    if report.is_consistent {
        info!("Store consistency validation passed");
    } else {
        warn!("{}", report.summary());
    }

    Ok(report)
}

fn build_report(document_ids: &[String], vector_ids: &[String]) -> ConsistencyReport {
    let documents: HashSet<&String> = document_ids.iter().collect();
    let vectors: HashSet<&String> = vector_ids.iter().collect();

    let missing_in_vectors: Vec<String> = documents
        .difference(&vectors)
        .map(|id| (*id).clone())
        .sorted()
        .collect();

    let orphaned_in_vectors: Vec<String> = vectors
        .difference(&documents)
        .map(|id| (*id).clone())
        .sorted()
        .collect();

    let is_consistent = missing_in_vectors.is_empty() && orphaned_in_vectors.is_empty();

    ConsistencyReport {
        document_count: document_ids.len(),
        vector_count: vector_ids.len(),
        missing_in_vectors,
        orphaned_in_vectors,
        is_consistent,
    }
}
