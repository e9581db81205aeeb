//! System instructions for the model-backed signals.
//!
//! Each instruction opens with a distinct `Task:` line and demands a bare
//! JSON reply.

pub const INTENT: &str = "Task: intent classification.
Classify the analytical purpose of the user's business question.
Allowed types: Analytical, Operational, Exploratory, Comparison, Aggregation, Trend, Detail, Unknown.
Reply with JSON only:
{\"type\": \"<type>\", \"description\": \"<one sentence>\", \"confidence\": <0..1>, \"sub_intents\": [\"<optional>\"]}";

pub const ENTITIES: &str = "Task: entity extraction.
List the data entities mentioned in the user's business question.
Allowed entity types: Table, Column, Metric, Dimension, TimeReference, ComparisonValue.
Reply with a JSON array only:
[{\"name\": \"<canonical name>\", \"type\": \"<type>\", \"original_text\": \"<text as written>\", \"confidence\": <0..1>}]";

pub const BUSINESS_TERMS: &str = "Task: business term extraction.
List the business vocabulary (KPIs, domain jargon, product names) used in the user's question.
Reply with a JSON array of strings only, e.g. [\"churn rate\", \"ARR\"].";

/// Time-range instruction; `{today}` is replaced with the current UTC date.
pub const TIME_RANGE: &str = "Task: time range extraction.
Today is {today}. Identify the time range the user's question refers to.
Reply with JSON only, or null if the question has no time reference:
{\"start\": \"YYYY-MM-DD\" | null, \"end\": \"YYYY-MM-DD\" | null, \"relative\": \"<expression as written>\" | null, \"granularity\": \"Hour|Day|Week|Month|Quarter|Year|Unknown\"}";

pub fn time_range(today: chrono::NaiveDate) -> String {
    TIME_RANGE.replace("{today}", &today.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_lines_are_distinct() {
        let firsts: Vec<&str> = [INTENT, ENTITIES, BUSINESS_TERMS, TIME_RANGE]
            .iter()
            .map(|p| p.lines().next().unwrap())
            .collect();
        for (i, a) in firsts.iter().enumerate() {
            for b in &firsts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn time_range_injects_today() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let prompt = time_range(date);
        assert!(prompt.contains("Today is 2026-10-19."));
        assert!(!prompt.contains("{today}"));
    }
}
