//! Built-in questionnaire and settings used to seed an empty store and as
//! the in-memory fallback when persistence is unavailable.

use crate::models::{
    AppSettings, LogicOp, Question, QuestionRule, QuestionType, RuleValue, VisibleIf,
};

pub fn default_settings() -> AppSettings {
    AppSettings {
        restaurant_name: "无界餐饮".to_string(),
        admin_password: "568568".to_string(),
        logo_url: String::new(),
        background_url: String::new(),
    }
}

fn rating(id: &str, section: &str, title_zh: &str, title_en: &str) -> Question {
    Question {
        id: id.to_string(),
        section: section.to_string(),
        kind: QuestionType::Rating,
        title_zh: title_zh.to_string(),
        title_en: title_en.to_string(),
        options_zh: None,
        options_en: None,
        visible_if: None,
        required: true,
    }
}

fn below_threshold(trigger: &str) -> QuestionRule {
    QuestionRule {
        trigger_question_id: trigger.to_string(),
        operator: LogicOp::Le,
        value: RuleValue::Integer(8),
    }
}

fn options(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

pub fn default_questions() -> Vec<Question> {
    vec![
        // Section A: kitchen output
        rating("a1", "A", "1. 菜品品质与口味满意度", "1. Food Quality & Taste"),
        rating("a2", "A", "2. 菜品份量合理性", "2. Portion Size Suitability"),
        rating(
            "a3",
            "A",
            "3. 出餐效率满意度 (目标：15分钟内开始上餐)",
            "3. Service Speed (Target: within 15 mins)",
        ),
        Question {
            id: "a_sub".to_string(),
            section: "A".to_string(),
            kind: QuestionType::MultipleChoice,
            title_zh: "A-1 主要不满意原因？".to_string(),
            title_en: "A-1 Main reasons for dissatisfaction?".to_string(),
            options_zh: options(&[
                "口味偏淡 / 偏重",
                "分量过少",
                "定价与份量不匹配",
                "上菜速度慢",
                "种类不足",
                "其他（请说明）",
            ]),
            options_en: options(&[
                "Taste issues",
                "Small portion",
                "Price/Portion mismatch",
                "Slow service",
                "Not enough variety",
                "Other",
            ]),
            visible_if: Some(VisibleIf::Any(vec![
                below_threshold("a1"),
                below_threshold("a2"),
                below_threshold("a3"),
            ])),
            required: true,
        },
        // Section B: front-of-house service and environment
        rating(
            "b1",
            "B",
            "4. 服务满意度 (态度/主动性/微笑服务)",
            "4. Service Satisfaction (Attitude/Proactivity/Smile)",
        ),
        Question {
            id: "b_sub".to_string(),
            section: "B".to_string(),
            kind: QuestionType::MultipleChoice,
            title_zh: "B-1 主要原因？".to_string(),
            title_en: "B-1 Main reasons?".to_string(),
            options_zh: options(&[
                "主动服务不足",
                "微笑服务缺失",
                "沟通不畅",
                "上菜流程协调差",
                "其他（请说明）",
            ]),
            options_en: options(&[
                "Not proactive",
                "Lack of smile",
                "Poor communication",
                "Poor coordination",
                "Other",
            ]),
            visible_if: Some(VisibleIf::One(below_threshold("b1"))),
            required: true,
        },
        rating(
            "c1",
            "B",
            "5. 餐厅环境满意度 (卫生状况/舒适度)",
            "5. Environment Satisfaction (Cleanliness/Comfort)",
        ),
        Question {
            id: "c_sub".to_string(),
            section: "B".to_string(),
            kind: QuestionType::MultipleChoice,
            title_zh: "B-2 希望改善哪方面？".to_string(),
            title_en: "B-2 Areas for environment improvement?".to_string(),
            options_zh: options(&[
                "清洁卫生",
                "桌椅舒适度",
                "座位空间",
                "噪音",
                "灯光",
                "其他（请说明）",
            ]),
            options_en: options(&[
                "Cleanliness",
                "Comfort",
                "Space",
                "Noise",
                "Lighting",
                "Other",
            ]),
            visible_if: Some(VisibleIf::One(below_threshold("c1"))),
            required: true,
        },
        // Section C: overall experience
        rating("d1", "C", "6. 本次整体体验打分", "6. Overall Dining Experience Score"),
        Question {
            id: "d_sub".to_string(),
            section: "C".to_string(),
            kind: QuestionType::MultipleChoice,
            title_zh: "C-1 何种改善最能提升整体体验？".to_string(),
            title_en: "C-1 What would improve experience most?".to_string(),
            options_zh: options(&[
                "增添菜品种类 (蔬菜/肉类/海鲜)",
                "优化汤底选择",
                "提升出餐效率",
                "优化份量或定价",
                "改善服务态度或主动性",
                "优化卫生与舒适度",
                "其他（请说明）",
            ]),
            options_en: options(&[
                "More variety",
                "Better soup bases",
                "Improve speed",
                "Price/Portion optimization",
                "Better service",
                "Better hygiene/comfort",
                "Other",
            ]),
            visible_if: Some(VisibleIf::One(below_threshold("d1"))),
            required: true,
        },
        // Section D: acquisition channel
        Question {
            id: "channel_source".to_string(),
            section: "D".to_string(),
            kind: QuestionType::SingleChoice,
            title_zh: "请问您是通过什么方式了解到我们门店的？".to_string(),
            title_en: "How did you hear about us?".to_string(),
            options_zh: options(&[
                "户外广告（如门头、海报、灯箱等）",
                "新媒体平台（如 小红书 / Facebook / Instagram / Tiktok等）",
                "朋友推荐 / 口碑介绍",
                "商场逛街时看到",
                "其他方式（请说明）",
            ]),
            options_en: options(&[
                "Outdoor Ads",
                "Social Media",
                "Referral/Word of mouth",
                "Walk-in",
                "Other",
            ]),
            visible_if: None,
            required: true,
        },
        // Section E: open feedback
        Question {
            id: "e1".to_string(),
            section: "E".to_string(),
            kind: QuestionType::Text,
            title_zh: "7. 本次用餐您最喜欢的菜品是？".to_string(),
            title_en: "7. Your favorite dish today?".to_string(),
            options_zh: None,
            options_en: None,
            visible_if: None,
            required: false,
        },
        Question {
            id: "e2".to_string(),
            section: "E".to_string(),
            kind: QuestionType::Text,
            title_zh: "8. 有什么想对我们说的？(期待您的建议)".to_string(),
            title_en: "8. Any other suggestions?".to_string(),
            options_zh: None,
            options_en: None,
            visible_if: None,
            required: false,
        },
    ]
}
