pub const SURVEY_URL: &str = "/survey";
pub const SURVEY_NEXT_URL: &str = "/survey/next";
pub const SURVEY_BACK_URL: &str = "/survey/back";
pub const THANK_YOU_URL: &str = "/thank-you";

pub const ADMIN_LOGIN_URL: &str = "/admin";
pub const ADMIN_DO_LOGIN_URL: &str = "/admin/login";
pub const ADMIN_LOGOUT_URL: &str = "/admin/logout";
pub const ADMIN_DASHBOARD_URL: &str = "/admin/dashboard";
pub const ADMIN_ANALYZE_URL: &str = "/admin/analyze";
pub const ADMIN_RESPONSES_URL: &str = "/admin/responses";
pub const ADMIN_EXPORT_URL: &str = "/admin/export";
pub const ADMIN_SETTINGS_URL: &str = "/admin/settings";
pub const ADMIN_QUESTIONS_URL: &str = "/admin/questions";

pub const ADMIN_SESSION_COOKIE_NAME: &str = "admin_session";
pub const SURVEY_SESSION_COOKIE_NAME: &str = "survey_session";

// Rating questions run 0..=10 and start at the nominal default.
pub const RATING_MIN: i64 = 0;
pub const RATING_MAX: i64 = 10;
pub const DEFAULT_RATING: i64 = 9;

// Answer keys for elaborated "Other" text are the question id plus this suffix.
pub const OTHER_SUFFIX: &str = "_other";

// At most this many recent responses feed the AI analysis prompt.
pub const ANALYSIS_SAMPLE_SIZE: usize = 100;

// i18n
pub const LOCALE_COOKIE_NAME: &str = "lang";
pub const DEFAULT_LOCALE: &str = "en";
