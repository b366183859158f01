//! Section-by-section survey navigation.
//!
//! `SurveyFlow` owns the live answer set and the current section pointer;
//! the visibility engine decides what renders and what blocks `advance`.
//! Handlers rebuild a flow from the persisted session row on every request
//! and persist it back, so the struct itself stays storage-free.

use crate::logic;
use crate::models::{AnswerSet, AnswerValue, Language, Question};

pub struct SurveyFlow {
    schema: Vec<Question>,
    sections: Vec<String>,
    language: Language,
    answers: AnswerSet,
    section_idx: usize,
}

/// Outcome of a forward transition.
pub enum Advance {
    /// Required answers are missing; the flow stays put. Carries the titles
    /// of every failing question in the respondent's language.
    Blocked(Vec<String>),
    /// Moved to the given section index.
    Moved(usize),
    /// The last section validated; the finished answer set is handed back
    /// for persistence and the flow is done.
    Completed(AnswerSet),
}

/// Outcome of a backward transition. Never validates.
pub enum Retreat {
    /// Backed out of the first section; the in-progress answers are to be
    /// discarded, not saved as a draft.
    Exited,
    /// Moved to the given section index, answers intact.
    Moved(usize),
}

impl SurveyFlow {
    pub fn start(schema: Vec<Question>, language: Language) -> Self {
        Self::resume(schema, language, AnswerSet::new(), 0)
    }

    /// Rebuild a flow mid-fill. Rating defaults are merged beneath whatever
    /// answers are already set, so resuming never clobbers recorded input.
    pub fn resume(
        schema: Vec<Question>,
        language: Language,
        mut answers: AnswerSet,
        section_idx: usize,
    ) -> Self {
        for question in &schema {
            if let Some(default) = logic::nominal_default(question.kind) {
                answers.entry(question.id.clone()).or_insert(default);
            }
        }
        let sections = logic::sections_in_order(&schema);
        let section_idx = section_idx.min(sections.len().saturating_sub(1));
        Self {
            schema,
            sections,
            language,
            answers,
            section_idx,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn section_idx(&self) -> usize {
        self.section_idx
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn current_section(&self) -> &str {
        self.sections
            .get(self.section_idx)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_last_section(&self) -> bool {
        self.section_idx + 1 >= self.sections.len()
    }

    /// Display-only progress in `(0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.sections.is_empty() {
            return 0.0;
        }
        (self.section_idx + 1) as f64 / self.sections.len() as f64
    }

    /// The current section's questions that render under the present answers.
    pub fn visible_questions(&self) -> Vec<&Question> {
        logic::questions_in_section(&self.schema, self.current_section())
            .into_iter()
            .filter(|q| logic::is_visible(&self.schema, q, &self.answers))
            .collect()
    }

    pub fn set_answer(&mut self, key: String, value: AnswerValue) {
        self.answers.insert(key, value);
    }

    pub fn clear_answer(&mut self, key: &str) {
        self.answers.remove(key);
    }

    /// Whether the question renders under the current answers. Used by the
    /// form-merging layer to decide which posted keys belong to the page the
    /// respondent actually saw.
    pub fn question_visible(&self, question: &Question) -> bool {
        logic::is_visible(&self.schema, question, &self.answers)
    }

    pub fn questions_in_current_section(&self) -> Vec<&Question> {
        logic::questions_in_section(&self.schema, self.current_section())
    }

    pub fn advance(&mut self) -> Advance {
        let missing = logic::missing_required(&self.schema, self.current_section(), &self.answers);
        if !missing.is_empty() {
            return Advance::Blocked(
                missing
                    .iter()
                    .map(|q| q.title(self.language).to_string())
                    .collect(),
            );
        }

        if self.is_last_section() {
            Advance::Completed(self.answers.clone())
        } else {
            self.section_idx += 1;
            Advance::Moved(self.section_idx)
        }
    }

    pub fn retreat(&mut self) -> Retreat {
        if self.section_idx == 0 {
            Retreat::Exited
        } else {
            self.section_idx -= 1;
            Retreat::Moved(self.section_idx)
        }
    }
}
