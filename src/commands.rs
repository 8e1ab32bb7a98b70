use anyhow::{Context, Result};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::{Config, get_config_dir};
use crate::database::{Database, DocumentStore, VectorIndex, VectorStore};
use crate::embeddings::EmbeddingProvider;
use crate::embeddings::ollama::OllamaClient;
use crate::extract::normalize_text;
use crate::ingest::{IngestOutcome, Ingestor, validate_consistency};
use crate::mcp::server::McpServer;
use crate::mcp::tools::{IngestResumeHandler, ListCandidatesHandler, SearchResumesHandler};
use crate::search::{QueryResult, Searcher};

/// Ingest one or more plain-text resume files
#[inline]
pub async fn ingest_files(files: Vec<PathBuf>, name: Option<String>) -> Result<()> {
    info!("Ingesting {} resume file(s)", files.len());

    let config = Config::load().context("Failed to load configuration")?;

    let config_dir = get_config_dir()?;
    let database = Arc::new(
        Database::initialize_from_config_dir(&config_dir)
            .await
            .context("Failed to initialize database")?,
    );
    let vector_store = Arc::new(
        VectorStore::new(&config)
            .await
            .context("Failed to initialize vector store")?,
    );
    let ollama_client =
        Arc::new(OllamaClient::new(&config).context("Failed to create Ollama client")?);

    let ingestor = Ingestor::new(database, vector_store, ollama_client);

    let bar = if console::user_attended_stderr() {
        ProgressBar::new(files.len() as u64).with_style(
            ProgressStyle::with_template("{spinner} [{pos}/{len}] Ingesting {msg}")
                .expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    };

    let mut created = 0usize;
    let mut updated = 0usize;
    let mut failed = 0usize;

    for file in &files {
        bar.set_message(file.display().to_string());

        match ingest_one(&ingestor, file, name.as_deref()).await {
            Ok(outcome) => {
                if outcome.created {
                    created += 1;
                } else {
                    updated += 1;
                }
                println!(
                    "✅ {}: {} resume {} for {}",
                    file.display(),
                    if outcome.created { "created" } else { "updated" },
                    outcome.document_id,
                    outcome.email
                );
            }
            Err(e) => {
                failed += 1;
                error!("Failed to ingest {}: {}", file.display(), e);
                println!("❌ {}: {:#}", file.display(), e);
            }
        }
        bar.inc(1);
    }

    bar.finish_and_clear();

    println!();
    println!(
        "Ingest complete: {} created, {} updated, {} failed",
        created, updated, failed
    );

    if failed > 0 {
        anyhow::bail!("{} of {} files failed to ingest", failed, files.len());
    }

    Ok(())
}

/// Read a single resume file and push it through the pipeline.
async fn ingest_one(
    ingestor: &Ingestor,
    file: &Path,
    display_name: Option<&str>,
) -> Result<IngestOutcome> {
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if matches!(extension.as_deref(), Some("pdf" | "doc" | "docx")) {
        anyhow::bail!("Binary formats are not supported, convert the file to plain text first");
    }

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let text = normalize_text(&raw);

    let filename = file.file_name().and_then(|n| n.to_str());
    let outcome = ingestor.ingest(&text, display_name, filename).await?;
    Ok(outcome)
}

/// Search stored resumes and print the closest candidates
#[inline]
pub async fn search_resumes(query: String, top_k: Option<usize>) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let vector_store = Arc::new(
        VectorStore::new(&config)
            .await
            .context("Failed to initialize vector store")?,
    );
    let ollama_client =
        Arc::new(OllamaClient::new(&config).context("Failed to create Ollama client")?);

    let searcher = Searcher::new(vector_store, ollama_client, &config);

    let results: Vec<QueryResult> = match top_k {
        Some(k) => searcher.search_top(&query, k).await?,
        None => searcher.search(&query).await?,
    }
    .collect();

    if results.is_empty() {
        println!("No matching resumes found for '{}'.", query);
        println!("Use 'resume-vault ingest <file>' to add resumes first.");
        return Ok(());
    }

    println!("🎯 Found {} candidates:", results.len());
    println!();

    for (rank, result) in results.iter().enumerate() {
        println!("{}. {} ({})", rank + 1, result.name, result.email);
        println!("   Score: {:.2}", result.score);
        println!("   {}", result.excerpt);
        println!();
    }

    Ok(())
}

/// List all stored candidates
#[inline]
pub async fn list_resumes() -> Result<()> {
    let config_dir = get_config_dir()?;
    let database = Database::initialize_from_config_dir(&config_dir)
        .await
        .context("Failed to initialize database")?;

    let resumes = database
        .list_resumes()
        .await
        .context("Failed to list resumes")?;

    if resumes.is_empty() {
        println!("No resumes have been ingested yet.");
        println!("Use 'resume-vault ingest <file>' to add one.");
        return Ok(());
    }

    println!("Stored Candidates ({} total):", resumes.len());
    println!();

    for resume in &resumes {
        let name = if resume.display_name.is_empty() {
            "Unknown"
        } else {
            resume.display_name.as_str()
        };

        println!("📄 {} (ID: {})", name, resume.id);
        println!("   Email: {}", resume.email);
        println!("   Phone: {}", resume.phone);
        println!("   Summary: {}", resume.summary);
        println!(
            "   Updated: {}",
            resume.updated_date.format("%Y-%m-%d %H:%M:%S")
        );
        println!();
    }

    Ok(())
}

/// Show detailed status of the resume pipeline
#[inline]
pub async fn show_status() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("📊 Resume Vault Status Report");
    println!("{}", "=".repeat(50));
    println!();

    // Document store connectivity
    println!("🗄️  Document Store:");
    let config_dir = get_config_dir()?;
    let database = match Database::initialize_from_config_dir(&config_dir).await {
        Ok(db) => {
            println!("   ✅ SQLite: Connected");
            Some(db)
        }
        Err(e) => {
            println!("   ❌ SQLite: Failed to connect - {}", e);
            None
        }
    };

    if let Some(db) = &database {
        match db.count_resumes().await {
            Ok(count) => println!("   📄 Stored Resumes: {}", count),
            Err(e) => println!("   ⚠️  Could not count resumes - {}", e),
        }
    }

    // Ollama connectivity
    println!("🤖 Ollama Status:");
    match OllamaClient::new(&config) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!(
                    "   ✅ Ollama: Connected ({}:{})",
                    config.ollama.host, config.ollama.port
                );
                println!("   📋 Model: {}", config.ollama.model);
            }
            Err(e) => {
                println!("   ⚠️  Ollama: Connected but unhealthy - {}", e);
            }
        },
        Err(e) => {
            println!("   ❌ Ollama: Failed to connect - {}", e);
        }
    }

    // Vector store connectivity
    println!("🔍 Vector Store:");
    let vector_store = match VectorStore::new(&config).await {
        Ok(store) => {
            println!("   ✅ LanceDB: Connected");
            Some(store)
        }
        Err(e) => {
            println!("   ❌ LanceDB: Failed to connect - {}", e);
            None
        }
    };

    if let Some(store) = &vector_store {
        match store.count().await {
            Ok(count) => println!("   🧮 Stored Embeddings: {}", count),
            Err(e) => println!("   ⚠️  Could not count embeddings - {}", e),
        }
    }

    // Cross-store consistency
    if let (Some(db), Some(store)) = (&database, &vector_store) {
        println!();
        println!("🔁 Store Consistency:");
        match validate_consistency(db, store).await {
            Ok(report) => {
                if report.is_consistent {
                    println!("   ✅ Stores are consistent");
                    println!("   📊 Resumes: {}", report.document_count);
                    println!("   📊 Embeddings: {}", report.vector_count);
                } else {
                    println!("   ⚠️  Consistency issues found:");
                    println!("   📊 Resumes: {}", report.document_count);
                    println!("   📊 Embeddings: {}", report.vector_count);
                    if !report.missing_in_vectors.is_empty() {
                        println!(
                            "   🚫 Missing embeddings: {}",
                            report.missing_in_vectors.len()
                        );
                    }
                    if !report.orphaned_in_vectors.is_empty() {
                        println!(
                            "   👻 Orphaned embeddings: {}",
                            report.orphaned_in_vectors.len()
                        );
                    }
                }
            }
            Err(e) => {
                println!("   ❌ Failed to check consistency: {}", e);
            }
        }
    }

    println!();
    println!("💡 Next Steps:");
    println!("   • Use 'resume-vault ingest <file>' to add resumes");
    println!("   • Use 'resume-vault search <query>' to find candidates");
    println!("   • Use 'resume-vault serve' to start the MCP server for AI assistants");

    Ok(())
}

/// Delete every stored resume and embedding
#[inline]
pub async fn reset(yes: bool) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    if !yes {
        println!("This will delete every stored resume and embedding.");
        let confirmed = Confirm::new()
            .with_prompt("Wipe all resume data? This action cannot be undone")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;

        if !confirmed {
            println!("Aborted, nothing was deleted.");
            return Ok(());
        }
    }

    let config_dir = get_config_dir()?;
    let database = Database::initialize_from_config_dir(&config_dir)
        .await
        .context("Failed to initialize database")?;
    let vector_store = VectorStore::new(&config)
        .await
        .context("Failed to initialize vector store")?;

    let deleted = database
        .delete_all_resumes()
        .await
        .context("Failed to delete stored resumes")?;
    vector_store
        .wipe()
        .await
        .context("Failed to wipe vector store")?;
    database
        .optimize()
        .await
        .context("Failed to optimize database")?;

    info!("Reset removed {} resumes", deleted);
    println!("✅ Deleted {} resumes and all stored embeddings", deleted);

    Ok(())
}

/// Start MCP server on stdio
#[inline]
pub async fn serve_mcp() -> Result<()> {
    info!("Starting MCP server with stdio transport");

    let config = Config::load().context("Failed to load configuration")?;

    // Verify Ollama connectivity before starting
    match OllamaClient::new(&config) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                info!(
                    "✅ Ollama connected at {}:{} with model {}",
                    config.ollama.host, config.ollama.port, config.ollama.model
                );
            }
            Err(e) => {
                warn!("⚠️  Ollama is reachable but unhealthy: {}", e);
                println!("Warning: Ollama may not be ready. Search and ingest calls may fail.");
            }
        },
        Err(e) => {
            error!("❌ Failed to connect to Ollama: {}", e);
            println!(
                "Error: Cannot connect to Ollama at {}:{}",
                config.ollama.host, config.ollama.port
            );
            println!("Please ensure Ollama is running and accessible.");
            println!("Use 'resume-vault config' to update connection settings.");
            return Err(e);
        }
    }

    println!("🌐 Initializing MCP server...");

    let config_dir = get_config_dir()?;
    let database = Arc::new(
        Database::initialize_from_config_dir(&config_dir)
            .await
            .context("Failed to initialize SQLite database")?,
    );
    let vector_store = Arc::new(
        VectorStore::new(&config)
            .await
            .context("Failed to initialize vector store")?,
    );
    let ollama_client =
        Arc::new(OllamaClient::new(&config).context("Failed to create Ollama client")?);

    let searcher = Arc::new(Searcher::new(
        Arc::clone(&vector_store) as Arc<dyn VectorIndex>,
        Arc::clone(&ollama_client) as Arc<dyn EmbeddingProvider>,
        &config,
    ));
    let ingestor = Arc::new(Ingestor::new(
        Arc::clone(&database) as Arc<dyn DocumentStore>,
        vector_store,
        ollama_client,
    ));

    let server = Arc::new(McpServer::new(
        "resume-vault".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    ));

    server
        .register_tool(
            SearchResumesHandler::tool_definition(),
            SearchResumesHandler::new(searcher),
        )
        .await;
    server
        .register_tool(
            IngestResumeHandler::tool_definition(),
            IngestResumeHandler::new(ingestor),
        )
        .await;
    server
        .register_tool(
            ListCandidatesHandler::tool_definition(),
            ListCandidatesHandler::new(database),
        )
        .await;

    println!("✅ MCP server initialized with tools: search_resumes, ingest_resume, list_candidates");
    println!("🌐 Starting MCP server on stdio transport...");
    println!("📊 Use 'resume-vault status' to check store health");
    println!();
    println!("Note: This server uses stdio transport. Connect via MCP client.");
    println!("Press Ctrl+C to stop the server");

    tokio::select! {
        result = Arc::clone(&server).serve_stdio() => {
            match result {
                Ok(()) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n📴 Received interrupt signal, shutting down...");
        }
    }

    println!("✅ Shutdown complete");

    Ok(())
}
