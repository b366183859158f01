use chrono::Utc;
use color_eyre::Result;
use libsql::params;
use ulid::Ulid;

use super::helpers::query_optional;
use super::models::{SurveySession, SurveySessionRow};
use super::Db;
use crate::models::{AnswerSet, Language};

impl Db {
    /// Start an in-progress survey and return its cookie token.
    pub async fn create_survey_session(
        &self,
        language: Language,
        answers: &AnswerSet,
    ) -> Result<String> {
        let token = Ulid::new().to_string();

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO survey_sessions (token, language, section_idx, answers, created_at)
             VALUES (?, ?, 0, ?, ?)",
            params![
                token.clone(),
                language.as_str(),
                serde_json::to_string(answers)?,
                Utc::now().timestamp_millis()
            ],
        )
        .await?;

        tracing::info!("survey session started ({})", language.as_str());
        Ok(token)
    }

    pub async fn survey_session(&self, token: &str) -> Result<Option<SurveySession>> {
        let conn = self.connect()?;
        let row: Option<SurveySessionRow> = query_optional(
            &conn,
            "SELECT token, language, section_idx, answers FROM survey_sessions WHERE token = ?",
            params![token],
        )
        .await?;

        row.map(SurveySessionRow::into_session).transpose()
    }

    pub async fn update_survey_session(
        &self,
        token: &str,
        section_idx: usize,
        answers: &AnswerSet,
    ) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "UPDATE survey_sessions SET section_idx = ?, answers = ? WHERE token = ?",
            params![
                section_idx as i64,
                serde_json::to_string(answers)?,
                token
            ],
        )
        .await?;

        Ok(())
    }

    /// Submit and exit-to-home both end here; an in-progress survey is never
    /// kept as a draft.
    pub async fn delete_survey_session(&self, token: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM survey_sessions WHERE token = ?",
            params![token],
        )
        .await?;

        Ok(())
    }
}
