mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use tableback::analysis::AnalysisService;
use tableback::{names, router, AppState};
use tower::ServiceExt;

async fn state() -> AppState {
    AppState {
        db: common::create_test_db().await,
        analysis: AnalysisService::gemini(String::new(), String::new()),
        secure_cookies: false,
    }
}

#[tokio::test]
async fn admin_routes_reject_requests_without_a_session_cookie() {
    let app = router(state().await);

    let cases = [
        (Method::GET, names::ADMIN_DASHBOARD_URL),
        (Method::GET, names::ADMIN_RESPONSES_URL),
        (Method::GET, names::ADMIN_EXPORT_URL),
        (Method::GET, names::ADMIN_SETTINGS_URL),
        (Method::GET, names::ADMIN_QUESTIONS_URL),
        (Method::POST, names::ADMIN_ANALYZE_URL),
    ];

    for (method, uri) in cases {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request build should succeed"),
            )
            .await
            .expect("router should respond");

        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "expected UNAUTHORIZED for {uri}",
        );
    }
}

#[tokio::test]
async fn admin_routes_accept_requests_with_a_valid_session_cookie() {
    let state = state().await;
    let session = state
        .db
        .create_admin_session()
        .await
        .expect("create admin session");
    let app = router(state);

    let cookie = format!("{}={}", names::ADMIN_SESSION_COOKIE_NAME, session);

    for uri in [
        names::ADMIN_DASHBOARD_URL,
        names::ADMIN_RESPONSES_URL,
        names::ADMIN_SETTINGS_URL,
        names::ADMIN_QUESTIONS_URL,
    ] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .expect("request build should succeed"),
            )
            .await
            .expect("router should respond");

        assert_eq!(resp.status(), StatusCode::OK, "expected OK for {uri}");
    }
}

#[tokio::test]
async fn a_stale_session_cookie_is_rejected() {
    let app = router(state().await);

    let resp = app
        .oneshot(
            Request::builder()
                .uri(names::ADMIN_DASHBOARD_URL)
                .header(
                    header::COOKIE,
                    format!("{}=expired-token", names::ADMIN_SESSION_COOKIE_NAME),
                )
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_the_configured_password_sets_a_session_cookie() {
    let app = router(state().await);

    // The default settings record carries the built-in password.
    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(names::ADMIN_DO_LOGIN_URL)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("password=568568"))
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the admin session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with(names::ADMIN_SESSION_COOKIE_NAME));
}

#[tokio::test]
async fn login_with_a_wrong_password_does_not_create_a_session() {
    let app = router(state().await);

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(names::ADMIN_DO_LOGIN_URL)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("password=wrong"))
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    // The login page renders again; no redirect, no cookie.
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
}
