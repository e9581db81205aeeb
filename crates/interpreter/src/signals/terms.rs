//! Business-term extraction.

use querylens_core::error::AnalysisError;
use serde::Deserialize;
use std::collections::HashSet;

use super::Classifier;
use crate::parse::parse_reply;
use crate::prompts;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TermsReply {
    List(Vec<String>),
    Wrapped {
        #[serde(alias = "business_terms")]
        terms: Vec<String>,
    },
}

pub async fn extract(classifier: &Classifier, question: &str) -> Result<Vec<String>, AnalysisError> {
    let reply = classifier.classify(prompts::BUSINESS_TERMS, question).await?;
    parse(&reply)
}

pub(crate) fn parse(reply: &str) -> Result<Vec<String>, AnalysisError> {
    let raw = match parse_reply::<TermsReply>(reply)? {
        TermsReply::List(terms) | TermsReply::Wrapped { terms } => terms,
    };
    Ok(dedupe(raw))
}

/// Trim, drop empties, and deduplicate case-insensitively keeping the first
/// spelling.
pub fn dedupe(terms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}
