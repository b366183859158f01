use axum::{
    extract::{Query, RawForm, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use maud::Markup;
use serde::Deserialize;

use crate::{
    flow::{Advance, Retreat, SurveyFlow},
    models::{AnswerValue, Language, QuestionType},
    names,
    rejections::{AppError, ResultExt},
    utils,
    views::{self, survey::SectionData},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::SURVEY_URL, get(start))
        .route(names::SURVEY_NEXT_URL, post(next))
        .route(names::SURVEY_BACK_URL, post(back))
        .route(names::THANK_YOU_URL, get(thank_you))
}

#[derive(Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

/// Entry point of the flow: a fresh session at section 0 with rating
/// defaults seeded. Revisiting always starts over; there is no draft resume
/// from the landing page.
async fn start(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Response, AppError> {
    let language = query
        .lang
        .as_deref()
        .and_then(Language::parse)
        .unwrap_or_default();

    let schema = super::questions_or_default(&state).await;
    let flow = SurveyFlow::start(schema, language);

    let token = state
        .db
        .create_survey_session(language, flow.answers())
        .await
        .reject("could not start survey session")?;

    let cookie = utils::cookie(names::SURVEY_SESSION_COOKIE_NAME, &token, state.secure_cookies);
    let page = render_section(&flow, Vec::new());
    Ok(([(SET_COOKIE, cookie)], page).into_response())
}

async fn next(
    State(state): State<AppState>,
    jar: CookieJar,
    RawForm(body): RawForm,
) -> Result<Response, AppError> {
    let Some((token, mut flow)) = load_flow(&state, &jar).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    merge_posted(&mut flow, &parse_form(&body));

    match flow.advance() {
        Advance::Blocked(missing) => {
            state
                .db
                .update_survey_session(&token, flow.section_idx(), flow.answers())
                .await
                .reject("could not save survey progress")?;
            Ok(render_section(&flow, missing).into_response())
        }
        Advance::Moved(section_idx) => {
            state
                .db
                .update_survey_session(&token, section_idx, flow.answers())
                .await
                .reject("could not save survey progress")?;
            Ok(render_section(&flow, Vec::new()).into_response())
        }
        Advance::Completed(answers) => {
            state
                .db
                .append_response(&answers, flow.language())
                .await
                .reject("could not record the response")?;
            if let Err(e) = state.db.delete_survey_session(&token).await {
                tracing::warn!("could not delete survey session {token}: {e}");
            }

            let cookie = utils::clear_cookie(names::SURVEY_SESSION_COOKIE_NAME);
            let target = format!("{}?lang={}", names::THANK_YOU_URL, flow.language().as_str());
            Ok(([(SET_COOKIE, cookie)], Redirect::to(&target)).into_response())
        }
    }
}

/// Backing up never validates. From the first section the whole in-progress
/// answer set is discarded; there is no draft to come back to.
async fn back(
    State(state): State<AppState>,
    jar: CookieJar,
    RawForm(body): RawForm,
) -> Result<Response, AppError> {
    let Some((token, mut flow)) = load_flow(&state, &jar).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    merge_posted(&mut flow, &parse_form(&body));

    match flow.retreat() {
        Retreat::Exited => {
            if let Err(e) = state.db.delete_survey_session(&token).await {
                tracing::warn!("could not delete survey session {token}: {e}");
            }
            let cookie = utils::clear_cookie(names::SURVEY_SESSION_COOKIE_NAME);
            Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
        }
        Retreat::Moved(section_idx) => {
            state
                .db
                .update_survey_session(&token, section_idx, flow.answers())
                .await
                .reject("could not save survey progress")?;
            Ok(render_section(&flow, Vec::new()).into_response())
        }
    }
}

async fn thank_you(Query(query): Query<LangQuery>) -> Markup {
    let language = query
        .lang
        .as_deref()
        .and_then(Language::parse)
        .unwrap_or_default();
    views::survey::thanks(language)
}

// --- Helper functions: session reload, form merging, rendering ---

async fn load_flow(
    state: &AppState,
    jar: &CookieJar,
) -> Result<Option<(String, SurveyFlow)>, AppError> {
    let Some(token) = jar
        .get(names::SURVEY_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    else {
        return Ok(None);
    };

    let Some(session) = state
        .db
        .survey_session(&token)
        .await
        .reject("could not load survey session")?
    else {
        return Ok(None);
    };

    let schema = super::questions_or_default(state).await;
    let flow = SurveyFlow::resume(schema, session.language, session.answers, session.section_idx);
    Ok(Some((token, flow)))
}

fn render_section(flow: &SurveyFlow, missing: Vec<String>) -> Markup {
    views::survey::section(SectionData {
        section: flow.current_section(),
        questions: flow.visible_questions(),
        answers: flow.answers(),
        language: flow.language(),
        missing,
        is_last: flow.is_last_section(),
        progress: flow.progress(),
    })
}

fn decode(raw: &str) -> String {
    // Form posts encode spaces as '+', which percent-decoding leaves alone.
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

fn parse_form(body: &[u8]) -> Vec<(String, String)> {
    let body = String::from_utf8_lossy(body);
    body.split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((decode(key), decode(value)))
        })
        .collect()
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Merge posted values into the answer set. Only questions that rendered on
/// the submitted page (visible under the answers it was built from) are
/// touched, so a hidden question never has its recorded answer cleared by an
/// absent form field.
fn merge_posted(flow: &mut SurveyFlow, pairs: &[(String, String)]) {
    let questions: Vec<(String, QuestionType, String, bool)> = flow
        .questions_in_current_section()
        .into_iter()
        .map(|q| (q.id.clone(), q.kind, q.other_key(), flow.question_visible(q)))
        .collect();

    for (id, kind, other_key, visible) in questions {
        if !visible {
            continue;
        }

        let field = format!("q_{id}");
        match kind {
            QuestionType::Rating => {
                if let Some(value) = first(pairs, &field).and_then(|v| v.parse::<i64>().ok()) {
                    flow.set_answer(
                        id,
                        AnswerValue::Integer(value.clamp(names::RATING_MIN, names::RATING_MAX)),
                    );
                }
            }
            QuestionType::SingleChoice | QuestionType::Text => {
                if let Some(value) = first(pairs, &field) {
                    flow.set_answer(id, AnswerValue::Text(value.to_string()));
                }
            }
            QuestionType::MultipleChoice => {
                let values: Vec<String> = pairs
                    .iter()
                    .filter(|(k, _)| k == &field)
                    .map(|(_, v)| v.clone())
                    .collect();
                flow.set_answer(id, AnswerValue::List(values));
            }
        }

        let other_field = format!("q_{other_key}");
        match first(pairs, &other_field) {
            Some(text) if !text.trim().is_empty() => {
                flow.set_answer(other_key, AnswerValue::Text(text.trim().to_string()));
            }
            _ => flow.clear_answer(&other_key),
        }
    }
}
