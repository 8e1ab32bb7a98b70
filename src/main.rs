use clap::{Parser, Subcommand};
use resume_vault::Result;
use resume_vault::commands::{
    ingest_files, list_resumes, reset, search_resumes, serve_mcp, show_status,
};
use resume_vault::config::{run_interactive_config, show_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-vault")]
#[command(about = "Air-gapped semantic resume search with an MCP server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure Ollama connection and settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Ingest plain-text resume files
    Ingest {
        /// Resume files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Candidate name recorded with the ingested resumes
        #[arg(long)]
        name: Option<String>,
    },
    /// Search stored resumes by semantic similarity
    Search {
        /// Free-text query, e.g. a role or skill description
        query: String,
        /// Number of candidates to return
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// List all stored candidates
    List,
    /// Show detailed status of the resume pipeline
    Status,
    /// Delete every stored resume and embedding
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Start MCP server on stdio
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Ingest { files, name } => {
            ingest_files(files, name).await?;
        }
        Commands::Search { query, top_k } => {
            search_resumes(query, top_k).await?;
        }
        Commands::List => {
            list_resumes().await?;
        }
        Commands::Status => {
            show_status().await?;
        }
        Commands::Reset { yes } => {
            reset(yes).await?;
        }
        Commands::Serve => {
            serve_mcp().await?;
        }
    }

    Ok(())
}
