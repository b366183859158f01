//! Visibility and required-answer validation over a questionnaire.
//!
//! Everything here is a pure function of `(schema, answers)` with no storage
//! access, so handlers can re-evaluate on every request without caching.

use crate::models::{AnswerSet, AnswerValue, LogicOp, Question, QuestionRule, QuestionType};
use crate::names;

/// The value a rule sees for an unanswered trigger question. Only ratings
/// have one; rules that inspect an unanswered question of any other type
/// evaluate to false.
pub fn nominal_default(kind: QuestionType) -> Option<AnswerValue> {
    match kind {
        QuestionType::Rating => Some(AnswerValue::Integer(names::DEFAULT_RATING)),
        QuestionType::MultipleChoice | QuestionType::SingleChoice | QuestionType::Text => None,
    }
}

fn trigger_value(schema: &[Question], rule: &QuestionRule, answers: &AnswerSet) -> Option<AnswerValue> {
    if let Some(value) = answers.get(&rule.trigger_question_id) {
        return Some(value.clone());
    }
    schema
        .iter()
        .find(|q| q.id == rule.trigger_question_id)
        .and_then(|q| nominal_default(q.kind))
}

/// Evaluate a single visibility rule.
///
/// Coercion is deliberate and uniform: `<=` and `>=` compare both operands
/// as numbers (string operands are parsed; anything non-numeric makes the
/// rule false), while `==` compares the canonical string forms of both
/// operands, so an integer answer `5` equals a configured value `"5"`.
/// Selection lists have no scalar form and never satisfy a rule.
pub fn rule_holds(schema: &[Question], rule: &QuestionRule, answers: &AnswerSet) -> bool {
    let Some(answer) = trigger_value(schema, rule, answers) else {
        return false;
    };

    match rule.operator {
        LogicOp::Le => match (answer.as_number(), rule.value.as_number()) {
            (Some(a), Some(b)) => a <= b,
            _ => false,
        },
        LogicOp::Ge => match (answer.as_number(), rule.value.as_number()) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        },
        LogicOp::Eq => answer
            .canonical()
            .is_some_and(|a| a == rule.value.canonical()),
    }
}

/// A question with no `visibleIf` is always visible; a rule list is an OR.
pub fn is_visible(schema: &[Question], question: &Question, answers: &AnswerSet) -> bool {
    match &question.visible_if {
        None => true,
        Some(visible_if) => visible_if
            .rules()
            .iter()
            .any(|rule| rule_holds(schema, rule, answers)),
    }
}

/// Unique section tags in first-occurrence order.
pub fn sections_in_order(schema: &[Question]) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    for question in schema {
        if !sections.iter().any(|s| s == &question.section) {
            sections.push(question.section.clone());
        }
    }
    sections
}

pub fn questions_in_section<'a>(schema: &'a [Question], section: &str) -> Vec<&'a Question> {
    schema.iter().filter(|q| q.section == section).collect()
}

/// All currently visible required questions in the section whose answer is
/// missing (absent, empty string, or empty selection list) — every one of
/// them, so the caller can surface a single message listing each.
pub fn missing_required<'a>(
    schema: &'a [Question],
    section: &str,
    answers: &AnswerSet,
) -> Vec<&'a Question> {
    questions_in_section(schema, section)
        .into_iter()
        .filter(|q| q.required && is_visible(schema, q, answers))
        .filter(|q| answers.get(&q.id).is_none_or(AnswerValue::is_empty))
        .collect()
}
