use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Error, Debug)]
pub enum VaultError {
    /// Document submitted for ingestion was empty after trimming.
    #[error("Cannot ingest an empty document")]
    EmptyInput,

    /// Search query was empty after trimming.
    #[error("Cannot search with an empty query")]
    EmptyQuery,

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod database;
pub mod embeddings;
pub mod extract;
pub mod ingest;
pub mod mcp;
pub mod search;
