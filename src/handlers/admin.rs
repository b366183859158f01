use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::CookieJar;
use chrono::{Local, LocalResult, NaiveDate, TimeZone};
use maud::Markup;
use serde::Deserialize;

use crate::{
    analysis::AnalysisOutcome,
    extractors::{AdminGuard, Locale},
    models::{AnswerValue, AppSettings, Question, QuestionType, SurveyResponse},
    names,
    rejections::{AppError, ResultExt},
    report::{self, DateRange},
    utils,
    views::{
        self,
        admin::{AnalysisPanel, EditorNotice, ResponseRowView},
    },
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::ADMIN_LOGIN_URL, get(login_page))
        .route(names::ADMIN_DO_LOGIN_URL, post(do_login))
        .route(names::ADMIN_LOGOUT_URL, post(logout))
        .route(names::ADMIN_DASHBOARD_URL, get(dashboard))
        .route(names::ADMIN_ANALYZE_URL, post(analyze))
        .route(names::ADMIN_RESPONSES_URL, get(responses_page))
        .route(names::ADMIN_EXPORT_URL, get(export))
        .route(
            names::ADMIN_SETTINGS_URL,
            get(settings_page).post(save_settings),
        )
        .route(
            names::ADMIN_QUESTIONS_URL,
            get(questions_page).post(save_questions),
        )
}

#[derive(Deserialize)]
struct LoginForm {
    password: String,
}

async fn login_page(Locale(locale): Locale) -> Markup {
    views::admin::login(false, &locale)
}

/// The admin check is a shared-secret equality test against the settings
/// record, an explicit placeholder rather than a security boundary.
async fn do_login(
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let settings = super::settings_or_default(&state).await;

    if form.password != settings.admin_password {
        tracing::warn!("failed admin login attempt");
        return Ok(views::admin::login(true, &locale).into_response());
    }

    let session = state
        .db
        .create_admin_session()
        .await
        .reject("could not create admin session")?;

    let cookie = utils::cookie(names::ADMIN_SESSION_COOKIE_NAME, &session, state.secure_cookies);
    Ok(([(SET_COOKIE, cookie)], Redirect::to(names::ADMIN_DASHBOARD_URL)).into_response())
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(session) = jar.get(names::ADMIN_SESSION_COOKIE_NAME) {
        if let Err(e) = state.db.delete_admin_session(session.value()).await {
            tracing::warn!("could not delete admin session: {e}");
        }
    }

    let cookie = utils::clear_cookie(names::ADMIN_SESSION_COOKIE_NAME);
    ([(SET_COOKIE, cookie)], Redirect::to(names::ADMIN_LOGIN_URL)).into_response()
}

async fn dashboard(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let responses = state
        .db
        .responses()
        .await
        .reject("could not load responses")?;

    let stats = report::compute_stats(&responses, Local::now());
    Ok(views::admin::dashboard(&stats, AnalysisPanel::Empty, &locale))
}

async fn analyze(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let responses = state
        .db
        .responses()
        .await
        .reject("could not load responses")?;
    let schema = super::questions_or_default(&state).await;
    let stats = report::compute_stats(&responses, Local::now());

    match state.analysis.run(&responses, &schema).await {
        AnalysisOutcome::Report(report) => Ok(views::admin::dashboard(
            &stats,
            AnalysisPanel::Report(&report),
            &locale,
        )),
        AnalysisOutcome::Busy => Ok(views::admin::dashboard(
            &stats,
            AnalysisPanel::Busy,
            &locale,
        )),
    }
}

async fn responses_page(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let responses = state
        .db
        .responses()
        .await
        .reject("could not load responses")?;
    let schema = super::questions_or_default(&state).await;

    let rows = response_rows(&responses, &schema);
    Ok(views::admin::responses(&rows, false, &locale))
}

#[derive(Deserialize)]
struct ExportQuery {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
}

async fn export(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let responses = state
        .db
        .responses()
        .await
        .reject("could not load responses")?;
    let schema = super::questions_or_default(&state).await;
    let range = parse_range(&query);

    match report::export_csv(&responses, &schema, &range).reject("could not build csv export")? {
        Some(csv) => {
            let filename = report::export_filename(&range);
            Ok((
                [
                    (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                csv,
            )
                .into_response())
        }
        // Nothing in the selected range: a notice, not an error.
        None => {
            let rows = response_rows(&responses, &schema);
            Ok(views::admin::responses(&rows, true, &locale).into_response())
        }
    }
}

async fn settings_page(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Markup {
    let settings = super::settings_or_default(&state).await;
    views::admin::settings(&settings, false, &locale)
}

#[derive(Deserialize)]
struct SettingsForm {
    restaurant_name: String,
    admin_password: String,
    logo_url: String,
    background_url: String,
}

async fn save_settings(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(form): Form<SettingsForm>,
) -> Result<Markup, AppError> {
    let settings = AppSettings {
        restaurant_name: form.restaurant_name,
        admin_password: form.admin_password,
        logo_url: form.logo_url,
        background_url: form.background_url,
    };

    state
        .db
        .save_settings(&settings)
        .await
        .reject("could not save settings")?;

    Ok(views::admin::settings(&settings, true, &locale))
}

async fn questions_page(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
) -> Result<Markup, AppError> {
    let document = state
        .db
        .schema_json_pretty()
        .await
        .reject("could not load questionnaire")?;

    Ok(views::admin::questions(&document, &EditorNotice::None, &locale))
}

#[derive(Deserialize)]
struct QuestionsForm {
    document: String,
}

/// Atomic propose-new-schema: the submitted JSON must parse and pass full
/// validation before anything is written; otherwise the edit is rejected as
/// a unit and the active schema is untouched. The rejected text stays in the
/// editor for fixing.
async fn save_questions(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Locale(locale): Locale,
    Form(form): Form<QuestionsForm>,
) -> Result<Markup, AppError> {
    let questions: Vec<Question> = match serde_json::from_str(&form.document) {
        Ok(questions) => questions,
        Err(e) => {
            return Ok(views::admin::questions(
                &form.document,
                &EditorNotice::Rejected(e.to_string()),
                &locale,
            ));
        }
    };

    if let Err(e) = state.db.replace_questions(&questions).await {
        return Ok(views::admin::questions(
            &form.document,
            &EditorNotice::Rejected(e.to_string()),
            &locale,
        ));
    }

    let document = state
        .db
        .schema_json_pretty()
        .await
        .reject("could not reload questionnaire")?;
    Ok(views::admin::questions(&document, &EditorNotice::Saved, &locale))
}

// --- Helper functions: row shaping and range parsing ---

fn format_timestamp(timestamp: i64) -> String {
    match Local.timestamp_millis_opt(timestamp) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.format("%Y-%m-%d %H:%M").to_string()
        }
        LocalResult::None => timestamp.to_string(),
    }
}

/// Key columns for the listing: the first rating (kitchen quality), the last
/// rating (overall score), and the first single-choice (channel source).
fn response_rows(responses: &[SurveyResponse], schema: &[Question]) -> Vec<ResponseRowView> {
    let quality_id = schema
        .iter()
        .find(|q| q.kind == QuestionType::Rating)
        .map(|q| q.id.as_str());
    let overall_id = schema
        .iter()
        .rev()
        .find(|q| q.kind == QuestionType::Rating)
        .map(|q| q.id.as_str());
    let source_id = schema
        .iter()
        .find(|q| q.kind == QuestionType::SingleChoice)
        .map(|q| q.id.as_str());

    let mut ordered: Vec<&SurveyResponse> = responses.iter().collect();
    ordered.sort_by_key(|r| std::cmp::Reverse(r.timestamp));

    ordered
        .into_iter()
        .map(|response| {
            let cell = |id: Option<&str>| {
                id.and_then(|id| response.answers.get(id))
                    .and_then(AnswerValue::canonical)
                    .unwrap_or_else(|| "-".to_string())
            };
            ResponseRowView {
                time: format_timestamp(response.timestamp),
                language: response.language.as_str(),
                quality: cell(quality_id),
                overall: cell(overall_id),
                source: cell(source_id),
            }
        })
        .collect()
}

fn parse_range(query: &ExportQuery) -> DateRange {
    let parse = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    };

    DateRange {
        start: parse(&query.start),
        end: parse(&query.end),
    }
}
