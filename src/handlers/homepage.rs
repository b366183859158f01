use axum::{extract::State, routing::get, Router};
use maud::Markup;

use crate::{views, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(landing))
}

async fn landing(State(state): State<AppState>) -> Markup {
    let settings = super::settings_or_default(&state).await;
    views::homepage::landing(&settings)
}
