use std::collections::BTreeMap;

use tableback::flow::{Advance, Retreat, SurveyFlow};
use tableback::models::{
    AnswerValue, Language, LogicOp, Question, QuestionRule, QuestionType, RuleValue, VisibleIf,
};

/// Two sections: A has a required rating `a1` (default 9) and a conditional
/// required multi-choice `a_sub` shown when `a1 <= 8`; B has one optional
/// text question.
fn two_section_schema() -> Vec<Question> {
    vec![
        Question {
            id: "a1".to_string(),
            section: "A".to_string(),
            kind: QuestionType::Rating,
            title_zh: "评分".to_string(),
            title_en: "Score".to_string(),
            options_zh: None,
            options_en: None,
            visible_if: None,
            required: true,
        },
        Question {
            id: "a_sub".to_string(),
            section: "A".to_string(),
            kind: QuestionType::MultipleChoice,
            title_zh: "原因".to_string(),
            title_en: "Reasons".to_string(),
            options_zh: Some(vec!["太慢".to_string(), "太贵".to_string()]),
            options_en: Some(vec!["Too slow".to_string(), "Too pricey".to_string()]),
            visible_if: Some(VisibleIf::One(QuestionRule {
                trigger_question_id: "a1".to_string(),
                operator: LogicOp::Le,
                value: RuleValue::Integer(8),
            })),
            required: true,
        },
        Question {
            id: "b1".to_string(),
            section: "B".to_string(),
            kind: QuestionType::Text,
            title_zh: "建议".to_string(),
            title_en: "Suggestions".to_string(),
            options_zh: None,
            options_en: None,
            visible_if: None,
            required: false,
        },
    ]
}

#[test]
fn starting_a_flow_seeds_rating_defaults() {
    let flow = SurveyFlow::start(two_section_schema(), Language::En);

    assert_eq!(flow.section_idx(), 0);
    assert_eq!(
        flow.answers().get("a1"),
        Some(&AnswerValue::Integer(9)),
        "rating questions start at the nominal default"
    );
}

#[test]
fn resuming_merges_defaults_beneath_recorded_answers() {
    let mut answers = BTreeMap::new();
    answers.insert("a1".to_string(), AnswerValue::Integer(3));

    let flow = SurveyFlow::resume(two_section_schema(), Language::En, answers, 1);

    assert_eq!(flow.answers().get("a1"), Some(&AnswerValue::Integer(3)));
    assert_eq!(flow.section_idx(), 1);
}

#[test]
fn advance_is_blocked_until_the_conditional_follow_up_is_answered() {
    let mut flow = SurveyFlow::start(two_section_schema(), Language::En);

    // Lowering the score reveals the required follow-up.
    flow.set_answer("a1".to_string(), AnswerValue::Integer(5));

    match flow.advance() {
        Advance::Blocked(missing) => {
            assert_eq!(missing, vec!["Reasons".to_string()]);
        }
        _ => panic!("expected the missing follow-up to block navigation"),
    }
    assert_eq!(flow.section_idx(), 0, "a blocked advance stays put");

    // Answering it unblocks; the flow moves to section B.
    flow.set_answer(
        "a_sub".to_string(),
        AnswerValue::List(vec!["Too slow".to_string()]),
    );
    match flow.advance() {
        Advance::Moved(idx) => assert_eq!(idx, 1),
        _ => panic!("expected the section to advance"),
    }

    // B has no required questions; the second advance completes the survey.
    match flow.advance() {
        Advance::Completed(answers) => {
            assert_eq!(answers.get("a1"), Some(&AnswerValue::Integer(5)));
            assert_eq!(
                answers.get("a_sub"),
                Some(&AnswerValue::List(vec!["Too slow".to_string()]))
            );
        }
        _ => panic!("expected the last section to complete the survey"),
    }
}

#[test]
fn blocked_titles_follow_the_respondent_language() {
    let mut flow = SurveyFlow::start(two_section_schema(), Language::Zh);
    flow.set_answer("a1".to_string(), AnswerValue::Integer(2));

    match flow.advance() {
        Advance::Blocked(missing) => assert_eq!(missing, vec!["原因".to_string()]),
        _ => panic!("expected a blocked advance"),
    }
}

#[test]
fn default_answers_satisfy_the_happy_path() {
    // Untouched sliders stay at 9, the follow-up stays hidden, and the flow
    // walks straight through.
    let mut flow = SurveyFlow::start(two_section_schema(), Language::En);

    assert!(matches!(flow.advance(), Advance::Moved(1)));
    assert!(matches!(flow.advance(), Advance::Completed(_)));
}

#[test]
fn retreat_from_the_first_section_exits_without_validation() {
    let mut flow = SurveyFlow::start(two_section_schema(), Language::En);
    // Leave the flow invalid on purpose: the follow-up is required and unmet.
    flow.set_answer("a1".to_string(), AnswerValue::Integer(1));

    assert!(matches!(flow.retreat(), Retreat::Exited));
}

#[test]
fn retreat_from_a_later_section_moves_back_and_keeps_answers() {
    let mut flow = SurveyFlow::start(two_section_schema(), Language::En);
    assert!(matches!(flow.advance(), Advance::Moved(1)));

    flow.set_answer("b1".to_string(), AnswerValue::Text("good".to_string()));

    match flow.retreat() {
        Retreat::Moved(idx) => assert_eq!(idx, 0),
        Retreat::Exited => panic!("expected to move back, not exit"),
    }
    assert_eq!(
        flow.answers().get("b1"),
        Some(&AnswerValue::Text("good".to_string())),
        "answers survive backwards navigation"
    );
}

#[test]
fn progress_is_the_fraction_of_sections_entered() {
    let mut flow = SurveyFlow::start(two_section_schema(), Language::En);

    assert!((flow.progress() - 0.5).abs() < f64::EPSILON);
    assert!(matches!(flow.advance(), Advance::Moved(_)));
    assert!((flow.progress() - 1.0).abs() < f64::EPSILON);

    // Back is the only way progress decreases.
    assert!(matches!(flow.retreat(), Retreat::Moved(_)));
    assert!((flow.progress() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn visible_questions_track_the_answer_set() {
    let mut flow = SurveyFlow::start(two_section_schema(), Language::En);

    let ids: Vec<&str> = flow.visible_questions().iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["a1"], "the follow-up is hidden at the default score");

    flow.set_answer("a1".to_string(), AnswerValue::Integer(4));
    let ids: Vec<&str> = flow.visible_questions().iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a_sub"]);
}
