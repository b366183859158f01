//! Aggregate counts and CSV export for the admin dashboard.

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use color_eyre::{eyre::eyre, Result};
use csv::{QuoteStyle, WriterBuilder};

use crate::models::{AnswerValue, Question, SurveyResponse};

#[derive(Debug, PartialEq, Eq)]
pub struct ResponseStats {
    pub total: usize,
    pub today: usize,
    pub week: usize,
    pub month: usize,
}

fn resolve_local(result: LocalResult<DateTime<Local>>, fallback: DateTime<Local>) -> DateTime<Local> {
    match result {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => fallback,
    }
}

fn start_of_day(now: DateTime<Local>) -> DateTime<Local> {
    resolve_local(now.with_time(NaiveTime::MIN), now)
}

fn start_of_month(now: DateTime<Local>) -> DateTime<Local> {
    let day_one = start_of_day(now);
    day_one.with_day(1).unwrap_or(day_one)
}

fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    resolve_local(
        Local.from_local_datetime(&date.and_time(NaiveTime::MIN)),
        Local::now(),
    )
}

/// Counts of responses since local midnight, since `now - 7 days`, and since
/// the first of the current calendar month. The month boundary is the
/// calendar month, not a rolling 30 days.
pub fn compute_stats(responses: &[SurveyResponse], now: DateTime<Local>) -> ResponseStats {
    let today = start_of_day(now).timestamp_millis();
    let week = (now - Duration::days(7)).timestamp_millis();
    let month = start_of_month(now).timestamp_millis();

    ResponseStats {
        total: responses.len(),
        today: responses.iter().filter(|r| r.timestamp >= today).count(),
        week: responses.iter().filter(|r| r.timestamp >= week).count(),
        month: responses.iter().filter(|r| r.timestamp >= month).count(),
    }
}

/// Optional export filter. The start day is included from local midnight;
/// the end day is included in full (exclusive bound at the next midnight).
#[derive(Debug, Default, Clone, Copy)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, timestamp: i64) -> bool {
        if let Some(start) = self.start {
            if timestamp < local_midnight(start).timestamp_millis() {
                return false;
            }
        }
        if let Some(end) = self.end {
            if timestamp >= local_midnight(end + Duration::days(1)).timestamp_millis() {
                return false;
            }
        }
        true
    }
}

/// Deterministic attachment name for an export:
/// `survey_export_<start|all>_to_<end|now>.csv`.
pub fn export_filename(range: &DateRange) -> String {
    let start = range
        .start
        .map(|d| d.to_string())
        .unwrap_or_else(|| "all".to_string());
    let end = range
        .end
        .map(|d| d.to_string())
        .unwrap_or_else(|| "now".to_string());
    format!("survey_export_{start}_to_{end}.csv")
}

fn scalar_cell(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Integer(n) => n.to_string(),
        AnswerValue::Text(s) => s.clone(),
        AnswerValue::List(items) => items.join("; "),
    }
}

/// One cell per question: multi-select answers joined with `"; "`, with the
/// elaborated other-text appended as `(Other: <text>)` when present.
fn answer_cell(response: &SurveyResponse, question: &Question) -> String {
    let other = response
        .answers
        .get(&question.other_key())
        .and_then(AnswerValue::canonical)
        .filter(|text| !text.is_empty());

    match response.answers.get(&question.id) {
        Some(value) => {
            let mut cell = scalar_cell(value);
            if let Some(other) = other {
                cell.push_str(&format!(" (Other: {other})"));
            }
            cell
        }
        None => String::new(),
    }
}

/// Build the export document, or `None` when the filtered set is empty —
/// "nothing to export" is a signal, not an error. Every cell is quoted and
/// internal quotes are doubled, so cells containing commas, quotes, or
/// newlines survive a round-trip through any RFC4180 reader. Headers are the
/// primary-locale (zh) question titles.
pub fn export_csv(
    responses: &[SurveyResponse],
    schema: &[Question],
    range: &DateRange,
) -> Result<Option<String>> {
    let filtered: Vec<&SurveyResponse> = responses
        .iter()
        .filter(|r| range.contains(r.timestamp))
        .collect();

    if filtered.is_empty() {
        return Ok(None);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    let mut header = vec![
        "ID".to_string(),
        "Date".to_string(),
        "Time".to_string(),
        "Language".to_string(),
    ];
    header.extend(schema.iter().map(|q| q.title_zh.clone()));
    writer.write_record(&header)?;

    for response in filtered {
        let when = resolve_local(
            Local.timestamp_millis_opt(response.timestamp),
            Local::now(),
        );
        let mut row = vec![
            response.id.clone(),
            when.format("%Y-%m-%d").to_string(),
            when.format("%H:%M:%S").to_string(),
            response.language.as_str().to_string(),
        ];
        row.extend(schema.iter().map(|q| answer_cell(response, q)));
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| eyre!("could not finish csv document: {e}"))?;
    Ok(Some(String::from_utf8(bytes)?))
}
