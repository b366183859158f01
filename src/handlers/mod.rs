pub mod admin;
pub mod homepage;
pub mod survey;

use crate::models::{AppSettings, Question};
use crate::{seed, AppState};

/// Storage trouble degrades to the built-in defaults instead of failing the
/// page; the survey must stay usable without persistence.
pub(crate) async fn questions_or_default(state: &AppState) -> Vec<Question> {
    state.db.questions().await.unwrap_or_else(|e| {
        tracing::warn!("could not load questionnaire, using built-in default: {e}");
        seed::default_questions()
    })
}

pub(crate) async fn settings_or_default(state: &AppState) -> AppSettings {
    state.db.settings().await.unwrap_or_else(|e| {
        tracing::warn!("could not load settings, using defaults: {e}");
        seed::default_settings()
    })
}
