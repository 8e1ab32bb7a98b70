#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::models::{Resume, ResumeUpsert, SUMMARY_PLACEHOLDER};

const RESUME_COLUMNS: &str = "id, display_name, email, phone, raw_text, summary, skills, \
                              created_date, updated_date";

pub struct ResumeQueries;

impl ResumeQueries {
    /// Create a resume for this email, or overwrite the text and display
    /// name of the record already holding it. A single statement, so two
    /// concurrent ingests of a brand-new email cannot both create a row.
    /// Returns the stored record and whether this call created it.
    #[inline]
    pub async fn upsert(pool: &SqlitePool, candidate: ResumeUpsert) -> Result<(Resume, bool)> {
        let candidate_id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let row = sqlx::query(
            r#"
            INSERT INTO resumes (id, display_name, email, phone, raw_text, summary, skills,
                                 created_date, updated_date)
            VALUES (?, ?, ?, ?, ?, ?, '[]', ?, ?)
            ON CONFLICT(email) DO UPDATE SET
                display_name = excluded.display_name,
                raw_text = excluded.raw_text,
                updated_date = excluded.updated_date
            RETURNING id, display_name, email, phone, raw_text, summary, skills,
                      created_date, updated_date
            "#,
        )
        .bind(&candidate_id)
        .bind(&candidate.display_name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.raw_text)
        .bind(SUMMARY_PLACEHOLDER)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .context("Failed to upsert resume")?;

        let resume = map_resume_row(&row)?;
        // The insert branch keeps our freshly generated id; the update
        // branch returns the existing row's id instead
        let created = resume.id == candidate_id;

        debug!(
            "Upserted resume {} for {} (created: {})",
            resume.id, resume.email, created
        );

        Ok((resume, created))
    }

    #[inline]
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Resume>> {
        let row = sqlx::query(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get resume by email")?;

        row.as_ref().map(map_resume_row).transpose()
    }

    #[inline]
    pub async fn get_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Resume>> {
        let row = sqlx::query(&format!("SELECT {RESUME_COLUMNS} FROM resumes WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("Failed to get resume by id")?;

        row.as_ref().map(map_resume_row).transpose()
    }

    /// All resumes, most recently updated first.
    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Resume>> {
        let rows = sqlx::query(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes ORDER BY updated_date DESC, email ASC"
        ))
        .fetch_all(pool)
        .await
        .context("Failed to list resumes")?;

        rows.iter().map(map_resume_row).collect()
    }

    #[inline]
    pub async fn all_ids(pool: &SqlitePool) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT id FROM resumes")
            .fetch_all(pool)
            .await
            .context("Failed to list resume ids")?;

        Ok(rows.iter().map(|row| row.get("id")).collect())
    }

    #[inline]
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM resumes")
            .fetch_one(pool)
            .await
            .context("Failed to count resumes")?;

        Ok(row.get("count"))
    }

    #[inline]
    pub async fn delete_all(pool: &SqlitePool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM resumes")
            .execute(pool)
            .await
            .context("Failed to delete resumes")?;

        Ok(result.rows_affected())
    }
}

fn map_resume_row(row: &SqliteRow) -> Result<Resume> {
    let skills_json: String = row.get("skills");
    let skills: Vec<String> = serde_json::from_str(&skills_json)
        .with_context(|| format!("Invalid skills payload: {skills_json}"))?;

    Ok(Resume {
        id: row.get("id"),
        display_name: row.get("display_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        raw_text: row.get("raw_text"),
        summary: row.get("summary"),
        skills,
        created_date: row.get("created_date"),
        updated_date: row.get("updated_date"),
    })
}
