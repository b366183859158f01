// Database schema initialization

use color_eyre::Result;

pub async fn create_schema(conn: &libsql::Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            restaurant_name TEXT NOT NULL,
            admin_password TEXT NOT NULL,
            logo_url TEXT NOT NULL DEFAULT '',
            background_url TEXT NOT NULL DEFAULT ''
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS admin_sessions (
            id TEXT PRIMARY KEY
        )
        "#,
        (),
    )
    .await?;

    // The questionnaire is one JSON document, replaced wholesale on edit.
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS survey_schema (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            document TEXT NOT NULL
        )
        "#,
        (),
    )
    .await?;

    // Append-only; rows are never updated after submission.
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS responses (
            id TEXT PRIMARY KEY,
            created_at INTEGER NOT NULL,
            language TEXT NOT NULL,
            answers TEXT NOT NULL
        )
        "#,
        (),
    )
    .await?;

    // In-progress surveys; one row per respondent cookie, deleted on submit
    // or on backing out of the first section.
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS survey_sessions (
            token TEXT PRIMARY KEY,
            language TEXT NOT NULL,
            section_idx INTEGER NOT NULL DEFAULT 0,
            answers TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#,
        (),
    )
    .await?;

    Ok(())
}
