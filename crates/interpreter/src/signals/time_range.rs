//! Time-range extraction.

use chrono::{DateTime, NaiveDate, Utc};
use querylens_core::error::AnalysisError;
use querylens_core::profile::{Granularity, TimeContext};
use serde::Deserialize;
use tracing::debug;

use super::Classifier;
use crate::parse::extract_json;
use crate::prompts;

#[derive(Debug, Deserialize, Default)]
struct TimeReply {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default, alias = "relative_expression")]
    relative: Option<String>,
    #[serde(default)]
    granularity: Option<String>,
}

pub async fn extract(classifier: &Classifier, question: &str) -> Result<Option<TimeContext>, AnalysisError> {
    let instruction = prompts::time_range(Utc::now().date_naive());
    let reply = classifier.classify(&instruction, question).await?;
    parse(&reply)
}

/// `Ok(None)` when the question has no time reference.
pub(crate) fn parse(reply: &str) -> Result<Option<TimeContext>, AnalysisError> {
    let value = extract_json(reply)?;
    if value.is_null() {
        return Ok(None);
    }
    let parsed: TimeReply = serde_json::from_value(value)
        .map_err(|e| AnalysisError::UnparseableOutput(e.to_string()))?;

    let start = parsed.start.as_deref().and_then(parse_instant);
    let end = parsed.end.as_deref().and_then(parse_instant);
    let relative_expression = parsed
        .relative
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    if start.is_none() && end.is_none() && relative_expression.is_none() {
        return Ok(None);
    }

    Ok(Some(TimeContext {
        start,
        end,
        relative_expression,
        granularity: parsed
            .granularity
            .as_deref()
            .map(Granularity::parse)
            .unwrap_or_default(),
    }))
}

/// RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(_) => {
            debug!(raw, "Ignoring unparseable date in time range reply");
            None
        }
    }
}
