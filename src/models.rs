use std::collections::{BTreeMap, HashSet};

use color_eyre::{eyre::bail, Result};
use serde::{Deserialize, Serialize};

use crate::names;

/// The questionnaire is an ordered list; section and trigger ordering both
/// derive from list position.
pub type Schema = Vec<Question>;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Rating,
    MultipleChoice,
    SingleChoice,
    Text,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LogicOp {
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
}

/// A rule's comparison value as written in the schema document. Schema
/// authors mix numbers and strings freely, so both are accepted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RuleValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleValue::Integer(n) => Some(*n as f64),
            RuleValue::Float(f) => Some(*f),
            RuleValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Canonical string form used by the loose `==` operator.
    pub fn canonical(&self) -> String {
        match self {
            RuleValue::Integer(n) => n.to_string(),
            RuleValue::Float(f) => f.to_string(),
            RuleValue::Text(s) => s.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRule {
    pub trigger_question_id: String,
    pub operator: LogicOp,
    pub value: RuleValue,
}

/// `visibleIf` in the schema document is either a single rule or a list of
/// rules with OR semantics.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VisibleIf {
    One(QuestionRule),
    Any(Vec<QuestionRule>),
}

impl VisibleIf {
    pub fn rules(&self) -> &[QuestionRule] {
        match self {
            VisibleIf::One(rule) => std::slice::from_ref(rule),
            VisibleIf::Any(rules) => rules,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub section: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub title_zh: String,
    pub title_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_zh: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_en: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_if: Option<VisibleIf>,
    #[serde(default)]
    pub required: bool,
}

impl Question {
    pub fn title(&self, language: Language) -> &str {
        match language {
            Language::Zh => &self.title_zh,
            Language::En => &self.title_en,
        }
    }

    pub fn options(&self, language: Language) -> &[String] {
        let options = match language {
            Language::Zh => &self.options_zh,
            Language::En => &self.options_en,
        };
        options.as_deref().unwrap_or_default()
    }

    /// Answer key that carries the elaborated "Other" free text.
    pub fn other_key(&self) -> String {
        format!("{}{}", self.id, names::OTHER_SUFFIX)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    pub fn parse(s: &str) -> Option<Language> {
        match s {
            "zh" => Some(Language::Zh),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// A recorded answer: rating, free text, or a multi-choice selection list.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// Missing-for-validation: empty string or empty selection list.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Integer(_) => false,
            AnswerValue::Text(s) => s.is_empty(),
            AnswerValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Integer(n) => Some(*n as f64),
            AnswerValue::Text(s) => s.trim().parse().ok(),
            AnswerValue::List(_) => None,
        }
    }

    /// Canonical string form used by the loose `==` operator. Selection
    /// lists have no scalar form and never equal a rule value.
    pub fn canonical(&self) -> Option<String> {
        match self {
            AnswerValue::Integer(n) => Some(n.to_string()),
            AnswerValue::Text(s) => Some(s.clone()),
            AnswerValue::List(_) => None,
        }
    }
}

/// Question id (or `<id>_other`) to answer, in a stable key order.
pub type AnswerSet = BTreeMap<String, AnswerValue>;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: String,
    /// Submission wall-clock time, unix milliseconds.
    pub timestamp: i64,
    pub answers: AnswerSet,
    pub language: Language,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub restaurant_name: String,
    pub admin_password: String,
    pub logo_url: String,
    pub background_url: String,
}

/// Full-document schema validation. Runs on every load and save; a schema
/// that fails here is rejected as a unit and the previous one stays active.
pub fn validate_schema(questions: &[Question]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for question in questions {
        if question.id.is_empty() {
            bail!("a question has an empty id");
        }
        if !seen.insert(&question.id) {
            bail!("duplicate question id {:?}", question.id);
        }

        match question.kind {
            QuestionType::MultipleChoice | QuestionType::SingleChoice => {
                if question.options(Language::Zh).is_empty()
                    || question.options(Language::En).is_empty()
                {
                    bail!(
                        "choice question {:?} needs options for both languages",
                        question.id
                    );
                }
            }
            QuestionType::Rating | QuestionType::Text => {}
        }

        if let Some(visible_if) = &question.visible_if {
            for rule in visible_if.rules() {
                // Triggers must appear earlier in the document, which also
                // rules out circular references.
                if !seen.contains(rule.trigger_question_id.as_str())
                    || rule.trigger_question_id == question.id
                {
                    bail!(
                        "question {:?} has a trigger {:?} that does not exist before it",
                        question.id,
                        rule.trigger_question_id
                    );
                }
            }
        }
    }

    Ok(())
}
