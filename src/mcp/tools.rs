//! MCP tools implementation.
//!
//! Concrete tool handlers that expose resume retrieval and ingestion
//! to MCP clients.

use crate::database::Database;
use crate::extract::normalize_text;
use crate::ingest::Ingestor;
use crate::mcp::protocol::*;
use crate::mcp::server::ToolHandler;
use crate::search::{QueryResult, Searcher};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Semantic resume search tool handler
pub struct SearchResumesHandler {
    searcher: Arc<Searcher>,
}

/// Resume ingestion tool handler
pub struct IngestResumeHandler {
    ingestor: Arc<Ingestor>,
}

/// Candidate roster tool handler
pub struct ListCandidatesHandler {
    database: Arc<Database>,
}

impl SearchResumesHandler {
    /// Create a new search handler backed by the shared searcher
    #[inline]
    pub fn new(searcher: Arc<Searcher>) -> Self {
        Self { searcher }
    }

    /// Create the search_resumes tool definition
    #[inline]
    pub fn tool_definition() -> Tool {
        Tool {
            name: "search_resumes".to_string(),
            description: Some("Search stored resumes by semantic similarity".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query, e.g. a role or skill description"
                    },
                    "top_k": {
                        "type": "integer",
                        "description": "Maximum number of candidates to return (default: 3)"
                    }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
        }
    }
}

#[async_trait]
impl ToolHandler for SearchResumesHandler {
    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let args = params.arguments.unwrap_or_default();

        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing required parameter: query"))?;

        let top_k = args.get("top_k").and_then(|v| v.as_i64());

        debug!("Searching resumes: query='{}', top_k={:?}", query, top_k);

        let outcome = match top_k {
            Some(k) => self.searcher.search_top(query, k.max(1) as usize).await,
            None => self.searcher.search(query).await,
        };

        match outcome {
            Ok(results) => {
                let results: Vec<QueryResult> = results.collect();
                let response = json!({ "results": results });

                Ok(CallToolResult {
                    content: vec![ToolContent::Text {
                        text: serde_json::to_string_pretty(&response)?,
                    }],
                    is_error: Some(false),
                })
            }
            Err(e) => {
                error!("Error performing search: {}", e);
                Ok(CallToolResult {
                    content: vec![ToolContent::Text {
                        text: format!("Search error: {}", e),
                    }],
                    is_error: Some(true),
                })
            }
        }
    }
}

impl IngestResumeHandler {
    /// Create a new ingestion handler backed by the shared pipeline
    #[inline]
    pub fn new(ingestor: Arc<Ingestor>) -> Self {
        Self { ingestor }
    }

    /// Create the ingest_resume tool definition
    #[inline]
    pub fn tool_definition() -> Tool {
        Tool {
            name: "ingest_resume".to_string(),
            description: Some("Store a resume and index it for semantic search".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Full plain text of the resume"
                    },
                    "display_name": {
                        "type": "string",
                        "description": "Optional: Candidate name shown in listings"
                    },
                    "filename": {
                        "type": "string",
                        "description": "Optional: Source file name kept with the embedding"
                    }
                },
                "required": ["text"],
                "additionalProperties": false
            }),
        }
    }
}

#[async_trait]
impl ToolHandler for IngestResumeHandler {
    #[inline]
    async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
        let args = params.arguments.unwrap_or_default();

        let text = args
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Missing required parameter: text"))?;

        let display_name = args.get("display_name").and_then(|v| v.as_str());
        let filename = args.get("filename").and_then(|v| v.as_str());

        debug!(
            "Ingesting resume: display_name={:?}, filename={:?}, {} bytes",
            display_name,
            filename,
            text.len()
        );

        let text = normalize_text(text);
        match self.ingestor.ingest(&text, display_name, filename).await {
            Ok(outcome) => {
                let response = json!({
                    "id": outcome.document_id,
                    "email": outcome.email,
                    "created": outcome.created
                });

                Ok(CallToolResult {
                    content: vec![ToolContent::Text {
                        text: serde_json::to_string_pretty(&response)?,
                    }],
                    is_error: Some(false),
                })
            }
            Err(e) => {
                error!("Error ingesting resume: {}", e);
                Ok(CallToolResult {
                    content: vec![ToolContent::Text {
                        text: format!("Ingest error: {}", e),
                    }],
                    is_error: Some(true),
                })
            }
        }
    }
}

impl ListCandidatesHandler {
    /// Create a new roster handler backed by the document store
    #[inline]
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Create the list_candidates tool definition
    #[inline]
    pub fn tool_definition() -> Tool {
        Tool {
            name: "list_candidates".to_string(),
            description: Some("List every stored candidate".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }
}

#[async_trait]
impl ToolHandler for ListCandidatesHandler {
    #[inline]
    async fn handle(&self, _params: CallToolParams) -> Result<CallToolResult> {
        debug!("Listing stored candidates");

        match self.database.list_resumes().await {
            Ok(resumes) => {
                let mut candidates = Vec::new();

                for resume in resumes {
                    let name = if resume.display_name.is_empty() {
                        "Unknown".to_string()
                    } else {
                        resume.display_name
                    };

                    let candidate = json!({
                        "id": resume.id,
                        "name": name,
                        "email": resume.email,
                        "phone": resume.phone,
                        "summary": resume.summary,
                        "updated_date": resume.updated_date.format("%Y-%m-%dT%H:%M:%SZ").to_string()
                    });
                    candidates.push(candidate);
                }

                let response = json!({ "candidates": candidates });

                Ok(CallToolResult {
                    content: vec![ToolContent::Text {
                        text: serde_json::to_string_pretty(&response)?,
                    }],
                    is_error: Some(false),
                })
            }
            Err(e) => {
                error!("Error listing candidates: {}", e);
                Ok(CallToolResult {
                    content: vec![ToolContent::Text {
                        text: format!("Error listing candidates: {}", e),
                    }],
                    is_error: Some(true),
                })
            }
        }
    }
}
