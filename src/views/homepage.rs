use maud::{html, Markup};

use super::layout;
use crate::models::AppSettings;
use crate::names;

/// The bilingual entry screen; both start buttons are always shown in their
/// own language, so this page is not locale-switched.
pub fn landing(settings: &AppSettings) -> Markup {
    let background = if settings.background_url.is_empty() {
        "background: #111827;".to_string()
    } else {
        format!("background-image: url('{}');", settings.background_url)
    };

    layout::shell(
        "Satisfaction Survey",
        html! {
            div.landing style=(background) {
                div.panel {
                    @if !settings.logo_url.is_empty() {
                        img.logo src=(settings.logo_url) alt="Logo";
                    }
                    h1 { (settings.restaurant_name) }
                    p { span.section-badge { "Satisfaction Survey" } }
                    p { a.button href=(format!("{}?lang=zh", names::SURVEY_URL)) { "开始评价 (中文)" } }
                    p { a.button.secondary href=(format!("{}?lang=en", names::SURVEY_URL)) { "Start Survey (EN)" } }
                }
                a.admin-link href=(names::ADMIN_LOGIN_URL) { "Admin Access" }
            }
        },
    )
}
