use maud::{html, Markup};
use rust_i18n::t;

use super::layout;
use crate::models::{AnswerSet, AnswerValue, Language, Question, QuestionType};
use crate::names;

pub struct SectionData<'a> {
    pub section: &'a str,
    /// Only the questions that render under the current answers.
    pub questions: Vec<&'a Question>,
    pub answers: &'a AnswerSet,
    pub language: Language,
    /// Titles of unmet required questions; empty unless navigation was blocked.
    pub missing: Vec<String>,
    pub is_last: bool,
    pub progress: f64,
}

pub fn section(data: SectionData) -> Markup {
    let locale = data.language.as_str();

    layout::page(
        &t!("survey.title", locale = locale),
        html! {
            div.progress-track {
                div.progress-fill style=(format!("width: {:.0}%;", data.progress * 100.0)) {}
            }
            p {
                span.section-badge { (t!("survey.section_label", locale = locale, id = data.section)) }
                @if data.is_last {
                    " "
                    span.almost-done { (t!("survey.almost_done", locale = locale)) }
                }
            }

            @if !data.missing.is_empty() {
                div.errors {
                    (t!("survey.missing_intro", locale = locale))
                    ul {
                        @for title in &data.missing {
                            li { (title) }
                        }
                    }
                }
            }

            form method="post" action=(names::SURVEY_NEXT_URL) {
                @for question in &data.questions {
                    (question_block(question, data.answers, data.language))
                }

                div.nav-row {
                    button.secondary type="submit" formaction=(names::SURVEY_BACK_URL) formnovalidate {
                        (t!("survey.back", locale = locale))
                    }
                    button.grow type="submit" {
                        @if data.is_last {
                            (t!("survey.submit", locale = locale))
                        } @else {
                            (t!("survey.next", locale = locale))
                        }
                    }
                }
            }
        },
    )
}

pub fn thanks(language: Language) -> Markup {
    let locale = language.as_str();

    layout::page(
        &t!("thanks.title", locale = locale),
        html! {
            div style="text-align: center; padding: 3rem 0;" {
                h1 { (t!("thanks.title", locale = locale)) }
                p { (t!("thanks.body", locale = locale)) }
                p { a.button href="/" { (t!("thanks.home", locale = locale)) } }
            }
        },
    )
}

fn field_name(question: &Question) -> String {
    format!("q_{}", question.id)
}

fn other_field_name(question: &Question) -> String {
    format!("q_{}", question.other_key())
}

/// "Other" options carry an elaboration text input; they are recognized by
/// their label in either language, the same convention the schema uses.
pub fn is_other_option(text: &str) -> bool {
    text.contains("其他") || text.contains("Other")
}

fn question_block(question: &Question, answers: &AnswerSet, language: Language) -> Markup {
    let locale = language.as_str();

    html! {
        article.card {
            h3 {
                (question.title(language))
                @if !question.required {
                    " "
                    span style="color: #9ca3af; font-size: 0.8rem; font-weight: 400;" {
                        (t!("survey.optional", locale = locale))
                    }
                }
            }
            @match question.kind {
                QuestionType::Rating => { (rating_input(question, answers)) }
                QuestionType::MultipleChoice => { (choice_input(question, answers, language, true)) }
                QuestionType::SingleChoice => { (choice_input(question, answers, language, false)) }
                QuestionType::Text => { (text_input(question, answers, locale)) }
            }
        }
    }
}

fn rating_input(question: &Question, answers: &AnswerSet) -> Markup {
    let value = match answers.get(&question.id) {
        Some(AnswerValue::Integer(n)) => *n,
        _ => names::DEFAULT_RATING,
    };

    html! {
        p.rating-value {
            output { (value) }
            span style="color: #9ca3af; font-size: 1rem;" { " / " (names::RATING_MAX) }
        }
        input type="range"
              name=(field_name(question))
              min=(names::RATING_MIN)
              max=(names::RATING_MAX)
              step="1"
              value=(value)
              oninput="this.closest('article').querySelector('output').textContent = this.value";
    }
}

fn choice_input(
    question: &Question,
    answers: &AnswerSet,
    language: Language,
    multiple: bool,
) -> Markup {
    let locale = language.as_str();
    let selected: Vec<String> = match answers.get(&question.id) {
        Some(AnswerValue::List(items)) => items.clone(),
        Some(AnswerValue::Text(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    };
    let other_text = answers
        .get(&question.other_key())
        .and_then(AnswerValue::canonical)
        .unwrap_or_default();
    let has_other = question.options(language).iter().any(|o| is_other_option(o));

    html! {
        @if multiple {
            p style="color: #4f46e5; font-size: 0.8rem; font-weight: 600;" {
                (t!("survey.multi_hint", locale = locale))
            }
        }
        div.option-grid {
            @for option in question.options(language) {
                label.wide[is_other_option(option)] {
                    @if multiple {
                        @if selected.contains(option) {
                            input type="checkbox" name=(field_name(question)) value=(option) checked;
                        } @else {
                            input type="checkbox" name=(field_name(question)) value=(option);
                        }
                    } @else {
                        @if selected.contains(option) {
                            input type="radio" name=(field_name(question)) value=(option) checked;
                        } @else {
                            input type="radio" name=(field_name(question)) value=(option);
                        }
                    }
                    " " (option)
                }
            }
            @if has_other {
                input.other-input style="grid-column: span 2;"
                      type="text"
                      name=(other_field_name(question))
                      value=(other_text)
                      placeholder=(t!("survey.other_placeholder", locale = locale));
            }
        }
    }
}

fn text_input(question: &Question, answers: &AnswerSet, locale: &str) -> Markup {
    let value = answers
        .get(&question.id)
        .and_then(AnswerValue::canonical)
        .unwrap_or_default();

    html! {
        textarea.free-text name=(field_name(question))
                 placeholder=(t!("survey.text_placeholder", locale = locale)) {
            (value)
        }
    }
}
