//! Entity extraction.

use querylens_core::error::AnalysisError;
use querylens_core::profile::{Entity, EntityType};
use serde::Deserialize;
use tracing::debug;

use super::Classifier;
use crate::parse::{parse_reply, unit_score};
use crate::prompts;

#[derive(Debug, Deserialize)]
struct EntityReply {
    name: String,
    #[serde(alias = "entity_type")]
    r#type: String,
    #[serde(default, alias = "text", alias = "originalText")]
    original_text: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntitiesReply {
    List(Vec<EntityReply>),
    Wrapped { entities: Vec<EntityReply> },
}

const DEFAULT_CONFIDENCE: f32 = 0.5;

pub async fn extract(classifier: &Classifier, question: &str) -> Result<Vec<Entity>, AnalysisError> {
    let reply = classifier.classify(prompts::ENTITIES, question).await?;
    parse(&reply)
}

/// Parse the reply, dropping entities whose type is outside the closed set.
pub(crate) fn parse(reply: &str) -> Result<Vec<Entity>, AnalysisError> {
    let raw = match parse_reply::<EntitiesReply>(reply)? {
        EntitiesReply::List(items) | EntitiesReply::Wrapped { entities: items } => items,
    };

    Ok(raw
        .into_iter()
        .filter_map(|item| {
            let Some(entity_type) = EntityType::parse(&item.r#type) else {
                debug!(name = %item.name, kind = %item.r#type, "Dropping entity of unknown type");
                return None;
            };
            let name = item.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(Entity {
                original_text: item.original_text.unwrap_or_else(|| name.clone()),
                name,
                entity_type,
                confidence: unit_score(item.confidence.unwrap_or(DEFAULT_CONFIDENCE)),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entities_in_order() {
        let entities = parse(
            r#"[
                {"name": "revenue", "type": "Metric", "original_text": "revenue", "confidence": 0.9},
                {"name": "region", "type": "dimension", "confidence": 0.8}
            ]"#,
        )
        .unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_type, EntityType::Metric);
        assert_eq!(entities[1].entity_type, EntityType::Dimension);
        assert_eq!(entities[1].original_text, "region");
    }

    #[test]
    fn drops_unknown_types_and_blank_names() {
        let entities = parse(
            r#"{"entities": [
                {"name": "Alice", "type": "Person"},
                {"name": "  ", "type": "Table"},
                {"name": "orders", "type": "Table"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "orders");
        assert_eq!(entities[0].confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(parse("[]").unwrap().is_empty());
    }
}
