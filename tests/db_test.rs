mod common;

use std::collections::BTreeMap;

use common::create_test_db;
use tableback::flow::{Advance, SurveyFlow};
use tableback::models::{
    AnswerValue, AppSettings, Language, LogicOp, QuestionRule, RuleValue, VisibleIf,
};
use tableback::seed;

#[tokio::test]
async fn settings_default_until_first_save_then_round_trip() {
    let db = create_test_db().await;

    let settings = db.settings().await.unwrap();
    assert_eq!(settings.admin_password, seed::default_settings().admin_password);

    let updated = AppSettings {
        restaurant_name: "测试餐厅".to_string(),
        admin_password: "new-secret".to_string(),
        logo_url: "/static/icon.svg".to_string(),
        background_url: String::new(),
    };
    db.save_settings(&updated).await.unwrap();

    let reloaded = db.settings().await.unwrap();
    assert_eq!(reloaded.restaurant_name, "测试餐厅");
    assert_eq!(reloaded.admin_password, "new-secret");
}

#[tokio::test]
async fn settings_save_overwrites_wholesale() {
    let db = create_test_db().await;

    let mut settings = seed::default_settings();
    settings.logo_url = "first".to_string();
    db.save_settings(&settings).await.unwrap();

    settings.logo_url = String::new();
    settings.admin_password = "second".to_string();
    db.save_settings(&settings).await.unwrap();

    let reloaded = db.settings().await.unwrap();
    assert_eq!(reloaded.logo_url, "");
    assert_eq!(reloaded.admin_password, "second");
}

#[tokio::test]
async fn questionnaire_defaults_until_replaced() {
    let db = create_test_db().await;

    let questions = db.questions().await.unwrap();
    assert_eq!(questions.len(), seed::default_questions().len());
    assert_eq!(questions[0].id, "a1");

    let mut replacement = seed::default_questions();
    replacement.truncate(4);
    db.replace_questions(&replacement).await.unwrap();

    let reloaded = db.questions().await.unwrap();
    assert_eq!(reloaded.len(), 4);
    assert_eq!(reloaded[3].id, "a_sub");
}

#[tokio::test]
async fn schema_with_duplicate_ids_is_rejected_as_a_unit() {
    let db = create_test_db().await;

    let mut broken = seed::default_questions();
    let clone_id = broken[0].id.clone();
    broken[1].id = clone_id;

    let result = db.replace_questions(&broken).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("duplicate question id"));

    // The previous (default) schema is still active.
    let questions = db.questions().await.unwrap();
    assert_eq!(questions.len(), seed::default_questions().len());
}

#[tokio::test]
async fn schema_with_forward_trigger_reference_is_rejected() {
    let db = create_test_db().await;

    let mut broken = seed::default_questions();
    // Point the first conditional question at one defined after it.
    broken[3].visible_if = Some(VisibleIf::One(QuestionRule {
        trigger_question_id: "d1".to_string(),
        operator: LogicOp::Le,
        value: RuleValue::Integer(8),
    }));

    let result = db.replace_questions(&broken).await;
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("does not exist before it"));
}

#[tokio::test]
async fn choice_question_without_options_is_rejected() {
    let db = create_test_db().await;

    let mut broken = seed::default_questions();
    broken[3].options_en = None;

    let result = db.replace_questions(&broken).await;
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("needs options for both languages"));
}

#[tokio::test]
async fn responses_get_ids_and_timestamps_and_list_in_insertion_order() {
    let db = create_test_db().await;

    let mut answers = BTreeMap::new();
    answers.insert("a1".to_string(), AnswerValue::Integer(9));

    let first = db.append_response(&answers, Language::Zh).await.unwrap();
    let second = db.append_response(&answers, Language::En).await.unwrap();

    assert!(!first.id.is_empty());
    assert_ne!(first.id, second.id);
    assert!(first.timestamp > 0);

    let listed = db.responses().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
    assert_eq!(listed[0].language, Language::Zh);
    assert_eq!(listed[1].language, Language::En);
    assert_eq!(listed[0].answers.get("a1"), Some(&AnswerValue::Integer(9)));
}

#[tokio::test]
async fn survey_session_lifecycle() {
    let db = create_test_db().await;

    let mut answers = BTreeMap::new();
    answers.insert("a1".to_string(), AnswerValue::Integer(9));

    let token = db
        .create_survey_session(Language::En, &answers)
        .await
        .unwrap();
    assert!(!token.is_empty());

    let session = db.survey_session(&token).await.unwrap().unwrap();
    assert_eq!(session.language, Language::En);
    assert_eq!(session.section_idx, 0);
    assert_eq!(session.answers.get("a1"), Some(&AnswerValue::Integer(9)));

    let mut updated = session.answers.clone();
    updated.insert("e1".to_string(), AnswerValue::Text("noodles".to_string()));
    db.update_survey_session(&token, 2, &updated).await.unwrap();

    let reloaded = db.survey_session(&token).await.unwrap().unwrap();
    assert_eq!(reloaded.section_idx, 2);
    assert_eq!(
        reloaded.answers.get("e1"),
        Some(&AnswerValue::Text("noodles".to_string()))
    );

    db.delete_survey_session(&token).await.unwrap();
    assert!(db.survey_session(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_survey_session_token_is_none() {
    let db = create_test_db().await;
    assert!(db.survey_session("no-such-token").await.unwrap().is_none());
}

#[tokio::test]
async fn admin_sessions_round_trip() {
    let db = create_test_db().await;

    let session = db.create_admin_session().await.unwrap();
    assert!(db.admin_session_exists(&session).await.unwrap());
    assert!(!db.admin_session_exists("bogus").await.unwrap());

    db.delete_admin_session(&session).await.unwrap();
    assert!(!db.admin_session_exists(&session).await.unwrap());
}

#[tokio::test]
async fn completed_flow_submits_every_visible_answer() {
    let db = create_test_db().await;

    // Walk the default questionnaire with all sliders untouched (9), so no
    // conditional follow-up appears, then answer the two required choices.
    let mut flow = SurveyFlow::start(seed::default_questions(), Language::Zh);

    loop {
        if flow.current_section() == "D" {
            flow.set_answer(
                "channel_source".to_string(),
                AnswerValue::Text("朋友推荐 / 口碑介绍".to_string()),
            );
        }
        match flow.advance() {
            Advance::Moved(_) => {}
            Advance::Completed(answers) => {
                let stored = db.append_response(&answers, flow.language()).await.unwrap();

                // Every rating answer and the single-choice made it in.
                for id in ["a1", "a2", "a3", "b1", "c1", "d1", "channel_source"] {
                    assert!(stored.answers.contains_key(id), "missing answer for {id}");
                }
                break;
            }
            Advance::Blocked(missing) => panic!("unexpected validation failure: {missing:?}"),
        }
    }

    assert_eq!(db.responses().await.unwrap().len(), 1);
}

#[tokio::test]
async fn replaced_schema_orphans_old_answer_keys_without_error() {
    let db = create_test_db().await;

    let mut answers = BTreeMap::new();
    answers.insert("a1".to_string(), AnswerValue::Integer(2));
    db.append_response(&answers, Language::Zh).await.unwrap();

    // Shrink the schema to something that no longer knows "a1".
    let replacement = vec![seed::default_questions().remove(10)];
    db.replace_questions(&replacement).await.unwrap();

    // The stored response still carries the orphaned key; nothing breaks.
    let responses = db.responses().await.unwrap();
    assert_eq!(responses[0].answers.get("a1"), Some(&AnswerValue::Integer(2)));
}
