use chrono::Utc;
use color_eyre::Result;
use libsql::params;
use ulid::Ulid;

use super::helpers::query_all;
use super::models::ResponseRow;
use super::Db;
use crate::models::{AnswerSet, Language, SurveyResponse};

impl Db {
    /// Append a submitted answer set. Assigns the id and timestamp, persists
    /// the record, and returns it. Responses are never mutated afterwards.
    pub async fn append_response(
        &self,
        answers: &AnswerSet,
        language: Language,
    ) -> Result<SurveyResponse> {
        let response = SurveyResponse {
            id: Ulid::new().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            answers: answers.clone(),
            language,
        };

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO responses (id, created_at, language, answers) VALUES (?, ?, ?, ?)",
            params![
                response.id.clone(),
                response.timestamp,
                language.as_str(),
                serde_json::to_string(&response.answers)?
            ],
        )
        .await?;

        tracing::info!(
            "response {} recorded ({} answers, {})",
            response.id,
            response.answers.len(),
            language.as_str()
        );
        Ok(response)
    }

    /// All responses in insertion order. Display paths sort by timestamp
    /// descending themselves.
    pub async fn responses(&self) -> Result<Vec<SurveyResponse>> {
        let conn = self.connect()?;
        let rows: Vec<ResponseRow> = query_all(
            &conn,
            "SELECT id, created_at, language, answers FROM responses ORDER BY rowid",
            (),
        )
        .await?;

        rows.into_iter().map(ResponseRow::into_response).collect()
    }
}
