// Database row structs and their conversions into the domain model.

use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;

use crate::models::{AnswerSet, AppSettings, Language, SurveyResponse};

#[derive(Deserialize)]
pub struct SettingsRow {
    pub restaurant_name: String,
    pub admin_password: String,
    pub logo_url: String,
    pub background_url: String,
}

impl From<SettingsRow> for AppSettings {
    fn from(row: SettingsRow) -> Self {
        AppSettings {
            restaurant_name: row.restaurant_name,
            admin_password: row.admin_password,
            logo_url: row.logo_url,
            background_url: row.background_url,
        }
    }
}

fn parse_language(tag: &str) -> Result<Language> {
    Language::parse(tag).ok_or_else(|| eyre!("unknown language tag {tag:?}"))
}

#[derive(Deserialize)]
pub struct ResponseRow {
    pub id: String,
    pub created_at: i64,
    pub language: String,
    pub answers: String,
}

impl ResponseRow {
    pub fn into_response(self) -> Result<SurveyResponse> {
        Ok(SurveyResponse {
            id: self.id,
            timestamp: self.created_at,
            answers: serde_json::from_str(&self.answers)?,
            language: parse_language(&self.language)?,
        })
    }
}

/// An in-progress survey, reloaded on every flow request.
pub struct SurveySession {
    pub token: String,
    pub language: Language,
    pub section_idx: usize,
    pub answers: AnswerSet,
}

#[derive(Deserialize)]
pub struct SurveySessionRow {
    pub token: String,
    pub language: String,
    pub section_idx: i64,
    pub answers: String,
}

impl SurveySessionRow {
    pub fn into_session(self) -> Result<SurveySession> {
        Ok(SurveySession {
            token: self.token,
            language: parse_language(&self.language)?,
            section_idx: usize::try_from(self.section_idx).unwrap_or(0),
            answers: serde_json::from_str(&self.answers)?,
        })
    }
}
