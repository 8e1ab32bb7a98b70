use super::*;
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;

async fn create_test_pool() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            sqlx::sqlite::SqliteConnectOptions::new()
                .filename(&db_path)
                .create_if_missing(true)
                .foreign_keys(true),
        )
        .await
        .expect("Failed to create test pool");

    sqlx::query(include_str!("../migrations/20250301000000_create_resumes.sql"))
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    (temp_dir, pool)
}

fn candidate(email: &str, raw_text: &str) -> ResumeUpsert {
    ResumeUpsert {
        display_name: "Jane Doe".to_string(),
        email: email.to_string(),
        phone: "2065551234".to_string(),
        raw_text: raw_text.to_string(),
    }
}

#[tokio::test]
async fn upsert_creates_then_updates() {
    let (_temp_dir, pool) = create_test_pool().await;

    let (first, created) = ResumeQueries::upsert(&pool, candidate("jane@example.com", "v1"))
        .await
        .expect("first upsert succeeds");
    assert!(created);
    assert_eq!(first.email, "jane@example.com");
    assert_eq!(first.raw_text, "v1");
    assert_eq!(first.summary, SUMMARY_PLACEHOLDER);
    assert!(first.skills.is_empty());

    let (second, created) = ResumeQueries::upsert(&pool, candidate("jane@example.com", "v2"))
        .await
        .expect("second upsert succeeds");
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(second.raw_text, "v2");
    assert_eq!(second.created_date, first.created_date);
    assert!(second.updated_date >= first.updated_date);

    let count = ResumeQueries::count(&pool).await.expect("count succeeds");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn update_path_preserves_phone_and_summary() {
    let (_temp_dir, pool) = create_test_pool().await;

    ResumeQueries::upsert(&pool, candidate("jane@example.com", "v1"))
        .await
        .expect("first upsert succeeds");

    let mut replacement = candidate("jane@example.com", "v2");
    replacement.display_name = "Jane A. Doe".to_string();
    replacement.phone = "9995551234".to_string();

    let (updated, created) = ResumeQueries::upsert(&pool, replacement)
        .await
        .expect("second upsert succeeds");

    assert!(!created);
    assert_eq!(updated.display_name, "Jane A. Doe");
    assert_eq!(updated.raw_text, "v2");
    // Only text and display name are overwritten on re-ingest
    assert_eq!(updated.phone, "2065551234");
    assert_eq!(updated.summary, SUMMARY_PLACEHOLDER);
}

#[tokio::test]
async fn distinct_emails_create_distinct_rows() {
    let (_temp_dir, pool) = create_test_pool().await;

    let (first, created_a) = ResumeQueries::upsert(&pool, candidate("a@example.com", "text a"))
        .await
        .expect("upsert a succeeds");
    let (second, created_b) = ResumeQueries::upsert(&pool, candidate("b@example.com", "text b"))
        .await
        .expect("upsert b succeeds");

    assert!(created_a);
    assert!(created_b);
    assert_ne!(first.id, second.id);
    assert_eq!(
        ResumeQueries::count(&pool).await.expect("count succeeds"),
        2
    );
}

#[tokio::test]
async fn find_by_email_and_id() {
    let (_temp_dir, pool) = create_test_pool().await;

    let (stored, _) = ResumeQueries::upsert(&pool, candidate("jane@example.com", "text"))
        .await
        .expect("upsert succeeds");

    let by_email = ResumeQueries::find_by_email(&pool, "jane@example.com")
        .await
        .expect("find_by_email succeeds")
        .expect("resume exists");
    assert_eq!(by_email, stored);

    let by_id = ResumeQueries::get_by_id(&pool, &stored.id)
        .await
        .expect("get_by_id succeeds")
        .expect("resume exists");
    assert_eq!(by_id, stored);

    let missing = ResumeQueries::find_by_email(&pool, "nobody@example.com")
        .await
        .expect("find_by_email succeeds");
    assert!(missing.is_none());
}

#[tokio::test]
async fn list_orders_most_recently_updated_first() {
    let (_temp_dir, pool) = create_test_pool().await;

    ResumeQueries::upsert(&pool, candidate("a@example.com", "text a"))
        .await
        .expect("upsert a succeeds");
    ResumeQueries::upsert(&pool, candidate("b@example.com", "text b"))
        .await
        .expect("upsert b succeeds");
    // Re-ingest the first record so it becomes the most recent
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    ResumeQueries::upsert(&pool, candidate("a@example.com", "text a v2"))
        .await
        .expect("re-upsert a succeeds");

    let resumes = ResumeQueries::list_all(&pool).await.expect("list succeeds");
    assert_eq!(resumes.len(), 2);
    assert_eq!(resumes[0].email, "a@example.com");
    assert_eq!(resumes[1].email, "b@example.com");
}

#[tokio::test]
async fn all_ids_and_delete_all() {
    let (_temp_dir, pool) = create_test_pool().await;

    ResumeQueries::upsert(&pool, candidate("a@example.com", "text a"))
        .await
        .expect("upsert a succeeds");
    ResumeQueries::upsert(&pool, candidate("b@example.com", "text b"))
        .await
        .expect("upsert b succeeds");

    let ids = ResumeQueries::all_ids(&pool).await.expect("ids succeed");
    assert_eq!(ids.len(), 2);

    let deleted = ResumeQueries::delete_all(&pool)
        .await
        .expect("delete_all succeeds");
    assert_eq!(deleted, 2);
    assert_eq!(
        ResumeQueries::count(&pool).await.expect("count succeeds"),
        0
    );
}

#[tokio::test]
async fn skills_survive_round_trip() {
    let (_temp_dir, pool) = create_test_pool().await;

    let (stored, _) = ResumeQueries::upsert(&pool, candidate("jane@example.com", "text"))
        .await
        .expect("upsert succeeds");

    sqlx::query("UPDATE resumes SET skills = ? WHERE id = ?")
        .bind(r#"["rust","distributed systems"]"#)
        .bind(&stored.id)
        .execute(&pool)
        .await
        .expect("skills update succeeds");

    let reloaded = ResumeQueries::get_by_id(&pool, &stored.id)
        .await
        .expect("get_by_id succeeds")
        .expect("resume exists");
    assert_eq!(reloaded.skills, vec!["rust", "distributed systems"]);
}
