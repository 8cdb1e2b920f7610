use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS blogs (
        blog_id     TEXT PRIMARY KEY,
        title       TEXT NOT NULL,
        content     TEXT NOT NULL,
        slug        TEXT NOT NULL,
        tags        TEXT[] NOT NULL DEFAULT '{}',
        author_id   TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS blogs_author_id_idx ON blogs (author_id)",
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id        TEXT PRIMARY KEY,
        email          TEXT NOT NULL UNIQUE,
        name           TEXT NOT NULL,
        password_hash  TEXT NOT NULL,
        created_at     TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Create the `blogs` and `users` tables if they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("📐 Database schema ready");
    Ok(())
}
