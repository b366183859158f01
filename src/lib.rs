rust_i18n::i18n!("locales", fallback = "en");

pub mod analysis;
pub mod db;
pub mod extractors;
pub mod flow;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod names;
pub mod rejections;
pub mod report;
pub mod seed;
pub mod statics;
pub mod utils;
pub mod views;

use axum::Router;

use analysis::AnalysisService;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub analysis: AnalysisService,
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::homepage::routes())
        .merge(handlers::survey::routes())
        .merge(handlers::admin::routes())
        .nest("/static", statics::routes())
        .with_state(state)
}
