//! Intent classification.

use querylens_core::error::AnalysisError;
use querylens_core::profile::{Intent, IntentType};
use serde::Deserialize;

use super::Classifier;
use crate::parse::{parse_reply, unit_score};
use crate::prompts;

#[derive(Debug, Deserialize)]
struct IntentReply {
    #[serde(alias = "intent_type", alias = "intent")]
    r#type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default, alias = "subIntents")]
    sub_intents: Vec<String>,
}

/// Confidence assumed when the model omits one.
const DEFAULT_CONFIDENCE: f32 = 0.5;

pub async fn classify(classifier: &Classifier, question: &str) -> Result<Intent, AnalysisError> {
    let reply = classifier.classify(prompts::INTENT, question).await?;
    parse(&reply)
}

pub(crate) fn parse(reply: &str) -> Result<Intent, AnalysisError> {
    let parsed: IntentReply = parse_reply(reply)?;
    Ok(Intent {
        intent_type: IntentType::parse(&parsed.r#type),
        description: parsed.description.trim().to_string(),
        confidence: unit_score(parsed.confidence.unwrap_or(DEFAULT_CONFIDENCE)),
        sub_intents: parsed
            .sub_intents
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    })
}
