use color_eyre::Result;
use libsql::params;

use super::Db;
use crate::models::{self, Question};
use crate::seed;

impl Db {
    /// The active questionnaire. Falls back to the built-in default schema
    /// before the first save, so the survey works on a fresh store.
    pub async fn questions(&self) -> Result<Vec<Question>> {
        match self.schema_document().await? {
            Some(document) => Ok(serde_json::from_str(&document)?),
            None => Ok(seed::default_questions()),
        }
    }

    /// Pretty-printed schema JSON for the admin editor textarea.
    pub async fn schema_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.questions().await?)?)
    }

    /// Replace the questionnaire as a unit. The document is validated first
    /// (unique ids, triggers resolve to earlier questions, choice questions
    /// carry options); any failure rejects the whole edit and the previous
    /// schema stays active. Existing responses keep their old answer keys.
    pub async fn replace_questions(&self, questions: &[Question]) -> Result<()> {
        models::validate_schema(questions)?;

        let document = serde_json::to_string(questions)?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO survey_schema (id, document) VALUES (1, ?)
             ON CONFLICT(id) DO UPDATE SET document = excluded.document",
            params![document],
        )
        .await?;

        tracing::info!("questionnaire replaced: {} questions", questions.len());
        Ok(())
    }

    async fn schema_document(&self) -> Result<Option<String>> {
        let conn = self.connect()?;
        match conn
            .query("SELECT document FROM survey_schema WHERE id = 1", ())
            .await?
            .next()
            .await?
        {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }
}
