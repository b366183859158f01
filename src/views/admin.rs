use maud::{html, Markup};
use rust_i18n::t;

use super::layout;
use crate::analysis::{FeedbackReport, Sentiment};
use crate::models::AppSettings;
use crate::names;
use crate::report::ResponseStats;
use crate::utils;

pub fn login(failed: bool, locale: &str) -> Markup {
    layout::page(
        &t!("admin.login_title", locale = locale),
        html! {
            article.card style="max-width: 22rem; margin: 4rem auto;" {
                h2 { (t!("admin.login_title", locale = locale)) }
                p { (t!("admin.login_hint", locale = locale)) }
                form method="post" action=(names::ADMIN_DO_LOGIN_URL) {
                    input.other-input type="password" name="password"
                          placeholder=(t!("admin.password_placeholder", locale = locale)) autofocus;
                    @if failed {
                        p style="color: #b91c1c;" { (t!("admin.invalid_password", locale = locale)) }
                    }
                    p { button type="submit" { (t!("admin.login", locale = locale)) } }
                }
                p { a href="/" { (t!("admin.back_to_survey", locale = locale)) } }
            }
        },
    )
}

fn nav(locale: &str) -> Markup {
    html! {
        nav.admin-nav {
            a.button.secondary href=(names::ADMIN_DASHBOARD_URL) { (t!("admin.nav_overview", locale = locale)) }
            a.button.secondary href=(names::ADMIN_RESPONSES_URL) { (t!("admin.nav_responses", locale = locale)) }
            a.button.secondary href=(names::ADMIN_SETTINGS_URL) { (t!("admin.nav_settings", locale = locale)) }
            a.button.secondary href=(names::ADMIN_QUESTIONS_URL) { (t!("admin.nav_editor", locale = locale)) }
            form method="post" action=(names::ADMIN_LOGOUT_URL) style="margin-left: auto;" {
                button.secondary type="submit" { (t!("admin.logout", locale = locale)) }
            }
        }
    }
}

pub enum AnalysisPanel<'a> {
    Empty,
    Busy,
    Report(&'a FeedbackReport),
}

fn sentiment_label(sentiment: Sentiment, locale: &str) -> Markup {
    let (key, color) = match sentiment {
        Sentiment::Positive => ("admin.sentiment_positive", "#16a34a"),
        Sentiment::Neutral => ("admin.sentiment_neutral", "#f59e0b"),
        Sentiment::Negative => ("admin.sentiment_negative", "#dc2626"),
    };
    html! {
        span style=(format!("color: {color}; font-weight: 800;")) { (t!(key, locale = locale)) }
    }
}

fn analysis_report(report: &FeedbackReport, locale: &str) -> Markup {
    html! {
        div.notice {
            strong { (t!("admin.summary", locale = locale)) }
            p { (report.summary) }
        }
        p {
            (t!("admin.sentiment", locale = locale)) ": "
            (sentiment_label(report.sentiment, locale))
        }
        @if !report.tags.is_empty() {
            h4 { (t!("admin.tags", locale = locale)) }
            div.tag-cloud {
                @for tag in &report.tags {
                    span style=(format!("font-size: {}px;", 12 + tag.value.min(100) / 4)) {
                        (tag.text)
                    }
                }
            }
        }
    }
}

pub fn dashboard(stats: &ResponseStats, panel: AnalysisPanel, locale: &str) -> Markup {
    layout::page(
        &t!("admin.nav_overview", locale = locale),
        html! {
            (nav(locale))
            div.stat-grid {
                div.stat-tile {
                    div.label { (t!("admin.stat_today", locale = locale)) }
                    div.value style="color: #4f46e5;" { (stats.today) }
                }
                div.stat-tile {
                    div.label { (t!("admin.stat_week", locale = locale)) }
                    div.value { (stats.week) }
                }
                div.stat-tile {
                    div.label { (t!("admin.stat_month", locale = locale)) }
                    div.value { (stats.month) }
                }
                div.stat-tile {
                    div.label { (t!("admin.stat_total", locale = locale)) }
                    div.value { (stats.total) }
                }
            }
            article.card {
                h3 { (t!("admin.analysis_title", locale = locale)) }
                form method="post" action=(names::ADMIN_ANALYZE_URL) {
                    button type="submit" { (t!("admin.analyze", locale = locale)) }
                }
                @match panel {
                    AnalysisPanel::Empty => { p { (t!("admin.analysis_hint", locale = locale)) } }
                    AnalysisPanel::Busy => { div.notice { (t!("admin.analysis_busy", locale = locale)) } }
                    AnalysisPanel::Report(report) => { (analysis_report(report, locale)) }
                }
            }
            p style="color: #9ca3af; font-size: 0.75rem;" { "Tableback " (utils::VERSION) }
        },
    )
}

/// One table row of the recent-responses listing, preformatted by the
/// handler.
pub struct ResponseRowView {
    pub time: String,
    pub language: &'static str,
    pub quality: String,
    pub overall: String,
    pub source: String,
}

pub fn responses(rows: &[ResponseRowView], export_empty: bool, locale: &str) -> Markup {
    layout::page(
        &t!("admin.nav_responses", locale = locale),
        html! {
            (nav(locale))
            @if export_empty {
                div.notice { (t!("admin.export_empty", locale = locale)) }
            }
            article.card {
                form method="get" action=(names::ADMIN_EXPORT_URL)
                     style="display: flex; gap: 1rem; align-items: end; flex-wrap: wrap;" {
                    div {
                        label { (t!("admin.start_date", locale = locale)) }
                        input.other-input type="date" name="start";
                    }
                    div {
                        label { (t!("admin.end_date", locale = locale)) }
                        input.other-input type="date" name="end";
                    }
                    button type="submit" { (t!("admin.export", locale = locale)) }
                }
            }
            article.card {
                @if rows.is_empty() {
                    p { (t!("admin.no_responses", locale = locale)) }
                } @else {
                    table {
                        thead {
                            tr {
                                th { (t!("admin.col_time", locale = locale)) }
                                th { (t!("admin.col_language", locale = locale)) }
                                th { (t!("admin.col_quality", locale = locale)) }
                                th { (t!("admin.col_overall", locale = locale)) }
                                th { (t!("admin.col_source", locale = locale)) }
                            }
                        }
                        tbody {
                            @for row in rows {
                                tr {
                                    td { (row.time) }
                                    td { (row.language) }
                                    td { (row.quality) }
                                    td { (row.overall) }
                                    td { (row.source) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn settings(settings: &AppSettings, saved: bool, locale: &str) -> Markup {
    layout::page(
        &t!("admin.nav_settings", locale = locale),
        html! {
            (nav(locale))
            @if saved {
                div.notice { (t!("admin.settings_saved", locale = locale)) }
            }
            article.card {
                form.settings method="post" action=(names::ADMIN_SETTINGS_URL) {
                    label { (t!("admin.restaurant_name", locale = locale)) }
                    input type="text" name="restaurant_name" value=(settings.restaurant_name);

                    label { (t!("admin.admin_password", locale = locale)) }
                    input type="text" name="admin_password" value=(settings.admin_password);

                    label { (t!("admin.logo_url", locale = locale)) }
                    input type="text" name="logo_url" value=(settings.logo_url);

                    label { (t!("admin.background_url", locale = locale)) }
                    input type="text" name="background_url" value=(settings.background_url);

                    p { button type="submit" { (t!("admin.save", locale = locale)) } }
                }
            }
        },
    )
}

pub enum EditorNotice {
    None,
    Saved,
    Rejected(String),
}

pub fn questions(document: &str, notice: &EditorNotice, locale: &str) -> Markup {
    layout::page(
        &t!("admin.nav_editor", locale = locale),
        html! {
            (nav(locale))
            @match notice {
                EditorNotice::None => {}
                EditorNotice::Saved => { div.notice { (t!("admin.schema_saved", locale = locale)) } }
                EditorNotice::Rejected(reason) => {
                    div.errors { (t!("admin.schema_rejected", locale = locale, reason = reason)) }
                }
            }
            p { (t!("admin.editor_hint", locale = locale)) }
            form method="post" action=(names::ADMIN_QUESTIONS_URL) {
                textarea.schema-editor name="document" { (document) }
                p { button type="submit" { (t!("admin.save_schema", locale = locale)) } }
            }
        },
    )
}
