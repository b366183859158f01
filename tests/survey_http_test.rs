mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tableback::analysis::AnalysisService;
use tableback::{names, router, AppState};
use tower::ServiceExt;

async fn app_and_state() -> (Router, AppState) {
    let state = AppState {
        db: common::create_test_db().await,
        analysis: AnalysisService::gemini(String::new(), String::new()),
        secure_cookies: false,
    };
    (router(state.clone()), state)
}

fn session_cookie(resp: &axum::response::Response) -> String {
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("survey start must set the session cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn post_form(app: &Router, uri: &str, cookie: &str, body: &'static str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond")
}

#[tokio::test]
async fn starting_a_survey_creates_a_session_and_renders_the_first_section() {
    let (app, state) = app_and_state().await;

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("{}?lang=en", names::SURVEY_URL))
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);
    let token = cookie
        .strip_prefix(&format!("{}=", names::SURVEY_SESSION_COOKIE_NAME))
        .expect("cookie name");

    let session = state
        .db
        .survey_session(token)
        .await
        .unwrap()
        .expect("session row must exist");
    assert_eq!(session.section_idx, 0);
    // Rating defaults are seeded into the stored answer set.
    assert!(session.answers.contains_key("a1"));
}

#[tokio::test]
async fn a_full_pass_through_the_default_questionnaire_records_one_response() {
    let (app, state) = app_and_state().await;

    let start = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("{}?lang=zh", names::SURVEY_URL))
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");
    let cookie = session_cookie(&start);

    // Sections A, B, C: untouched sliders keep their defaults, nothing else
    // is required, so an empty post advances.
    for _ in 0..3 {
        let resp = post_form(&app, names::SURVEY_NEXT_URL, &cookie, "").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Section D: the channel question is required; an empty post is blocked.
    let blocked = post_form(&app, names::SURVEY_NEXT_URL, &cookie, "").await;
    assert_eq!(blocked.status(), StatusCode::OK);
    let body = axum::body::to_bytes(blocked.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("请完成以下必填项"));

    // Answer it and move on to section E.
    let resp = post_form(
        &app,
        names::SURVEY_NEXT_URL,
        &cookie,
        "q_channel_source=%E5%95%86%E5%9C%BA%E9%80%9B%E8%A1%97%E6%97%B6%E7%9C%8B%E5%88%B0",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Section E is optional; submitting finishes the survey.
    let done = post_form(&app, names::SURVEY_NEXT_URL, &cookie, "").await;
    assert_eq!(done.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        done.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(format!("{}?lang=zh", names::THANK_YOU_URL).as_str())
    );

    let responses = state.db.responses().await.unwrap();
    assert_eq!(responses.len(), 1);
    assert!(responses[0].answers.contains_key("channel_source"));
    assert!(responses[0].timestamp > 0);

    // The in-progress session is gone; a fresh survey needs a fresh start.
    let token = cookie
        .strip_prefix(&format!("{}=", names::SURVEY_SESSION_COOKIE_NAME))
        .unwrap();
    assert!(state.db.survey_session(token).await.unwrap().is_none());
}

#[tokio::test]
async fn backing_out_of_the_first_section_discards_the_session() {
    let (app, state) = app_and_state().await;

    let start = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("{}?lang=en", names::SURVEY_URL))
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");
    let cookie = session_cookie(&start);
    let token = cookie
        .strip_prefix(&format!("{}=", names::SURVEY_SESSION_COOKIE_NAME))
        .unwrap()
        .to_string();

    let resp = post_form(&app, names::SURVEY_BACK_URL, &cookie, "q_a1=3").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );

    // Hard discard: no response was recorded and the draft is gone.
    assert!(state.db.survey_session(&token).await.unwrap().is_none());
    assert!(state.db.responses().await.unwrap().is_empty());
}

#[tokio::test]
async fn lowering_a_score_reveals_the_required_follow_up_and_blocks() {
    let (app, _state) = app_and_state().await;

    let start = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("{}?lang=en", names::SURVEY_URL))
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");
    let cookie = session_cookie(&start);

    // Setting a1 low makes a_sub visible and required; it was not on the
    // submitted page, so validation blocks and the re-render includes it.
    let resp = post_form(&app, names::SURVEY_NEXT_URL, &cookie, "q_a1=5").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("A-1 Main reasons for dissatisfaction?"));
    assert!(html.contains("Please complete the following"));

    // Ticking a reason satisfies the section.
    let resp = post_form(
        &app,
        names::SURVEY_NEXT_URL,
        &cookie,
        "q_a1=5&q_a_sub=Slow+service",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8_lossy(&body);
    // Section B renders now.
    assert!(html.contains("4. Service Satisfaction"));
}

#[tokio::test]
async fn survey_posts_without_a_session_redirect_home() {
    let (app, _state) = app_and_state().await;

    let resp = post_form(&app, names::SURVEY_NEXT_URL, "", "").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
}
