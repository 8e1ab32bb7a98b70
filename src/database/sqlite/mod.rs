use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{debug, info};

use crate::VaultError;
use crate::database::DocumentStore;
use crate::database::sqlite::models::{Resume, ResumeUpsert};
use crate::database::sqlite::queries::ResumeQueries;


pub mod models;
pub mod queries;

pub type DbPool = Pool<Sqlite>;

#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub async fn new<P: AsRef<Path>>(database_url: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_url)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("Failed to create database connection pool")?;

        let database = Self { pool };
        database.run_migrations().await?;

        Ok(database)
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::migrate!("src/database/sqlite/migrations")
            .run(&self.pool)
            .await
            .context("Failed to run schema migration")?;

        debug!("Database migrations completed successfully");
        Ok(())
    }

    pub async fn initialize_from_config_dir(config_dir: &Path) -> Result<Self> {
        let db_path = config_dir.join("resumes.db");
        let db_url = db_path.to_string_lossy();

        std::fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        Self::new(db_url.as_ref()).await
    }

    // Resume operations
    pub async fn upsert_resume(&self, candidate: ResumeUpsert) -> Result<(Resume, bool)> {
        ResumeQueries::upsert(&self.pool, candidate).await
    }

    pub async fn get_resume_by_email(&self, email: &str) -> Result<Option<Resume>> {
        ResumeQueries::find_by_email(&self.pool, email).await
    }

    pub async fn get_resume(&self, id: &str) -> Result<Option<Resume>> {
        ResumeQueries::get_by_id(&self.pool, id).await
    }

    pub async fn list_resumes(&self) -> Result<Vec<Resume>> {
        ResumeQueries::list_all(&self.pool).await
    }

    pub async fn resume_ids(&self) -> Result<Vec<String>> {
        ResumeQueries::all_ids(&self.pool).await
    }

    pub async fn count_resumes(&self) -> Result<i64> {
        ResumeQueries::count(&self.pool).await
    }

    pub async fn delete_all_resumes(&self) -> Result<u64> {
        ResumeQueries::delete_all(&self.pool).await
    }

    /// Optimize database performance by running VACUUM and ANALYZE
    pub async fn optimize(&self) -> Result<()> {
        info!("Optimizing database performance");

        // Run VACUUM to reclaim space and defragment
        sqlx::query("VACUUM")
            .execute(&self.pool)
            .await
            .context("Failed to vacuum database")?;

        // Run ANALYZE to update table statistics for better query planning
        sqlx::query("ANALYZE")
            .execute(&self.pool)
            .await
            .context("Failed to analyze database")?;

        debug!("Database optimization completed");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for Database {
    async fn upsert(&self, candidate: ResumeUpsert) -> crate::Result<(Resume, bool)> {
        self.upsert_resume(candidate)
            .await
            .map_err(|e| VaultError::Store(format!("{e:#}")))
    }

    async fn find_by_email(&self, email: &str) -> crate::Result<Option<Resume>> {
        self.get_resume_by_email(email)
            .await
            .map_err(|e| VaultError::Store(format!("{e:#}")))
    }
}
