//! Candidate metadata gathered for a profile, before scoring.
//!
//! These are the plain lists the metadata catalog hands to the prioritizer.
//! Each candidate carries its intrinsic relevance where the source has one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCandidate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    pub relevance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCandidate {
    pub table: String,
    pub name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub description: String,
    pub relevance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCandidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
    pub relevance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleCandidate {
    pub question: String,
    pub sql: String,
    pub relevance: f32,
}

/// A join path between two tables. Carries no independent relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCandidate {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    #[serde(default = "default_relationship_kind")]
    pub kind: String,
}

fn default_relationship_kind() -> String {
    "many_to_one".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryCandidate {
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    pub relevance: f32,
}

/// The full candidate pool for one request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateSchema {
    #[serde(default)]
    pub tables: Vec<TableCandidate>,
    #[serde(default)]
    pub columns: Vec<ColumnCandidate>,
    #[serde(default)]
    pub business_rules: Vec<RuleCandidate>,
    #[serde(default)]
    pub examples: Vec<ExampleCandidate>,
    #[serde(default)]
    pub relationships: Vec<RelationshipCandidate>,
    #[serde(default)]
    pub glossary: Vec<GlossaryCandidate>,
}

impl CandidateSchema {
    /// Total number of candidates across all lists.
    pub fn len(&self) -> usize {
        self.tables.len()
            + self.columns.len()
            + self.business_rules.len()
            + self.examples.len()
            + self.relationships.len()
            + self.glossary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only schema candidates that touch one of `tables`
    /// (case-insensitive). Rules, examples and glossary terms are kept.
    pub fn restricted_to_tables(&self, tables: &[String]) -> Self {
        let wanted = |name: &str| tables.iter().any(|t| t.eq_ignore_ascii_case(name));
        Self {
            tables: self.tables.iter().filter(|t| wanted(&t.name)).cloned().collect(),
            columns: self.columns.iter().filter(|c| wanted(&c.table)).cloned().collect(),
            business_rules: self.business_rules.clone(),
            examples: self.examples.clone(),
            relationships: self
                .relationships
                .iter()
                .filter(|r| wanted(&r.from_table) || wanted(&r.to_table))
                .cloned()
                .collect(),
            glossary: self.glossary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CandidateSchema {
        serde_json::from_value(serde_json::json!({
            "tables": [
                {"name": "orders", "relevance": 0.9},
                {"name": "tickets", "relevance": 0.4}
            ],
            "columns": [
                {"table": "orders", "name": "total", "relevance": 0.8},
                {"table": "tickets", "name": "status", "relevance": 0.3}
            ],
            "relationships": [
                {"from_table": "orders", "from_column": "customer_id",
                 "to_table": "customers", "to_column": "id"}
            ],
            "glossary": [{"term": "AOV", "definition": "Average order value", "relevance": 0.7}]
        }))
        .unwrap()
    }

    #[test]
    fn counts_all_candidates() {
        let schema = sample();
        assert_eq!(schema.len(), 6);
        assert!(!schema.is_empty());
        assert_eq!(schema.relationships[0].kind, "many_to_one");
    }

    #[test]
    fn restriction_filters_schema_but_keeps_knowledge() {
        let restricted = sample().restricted_to_tables(&["ORDERS".to_string()]);
        assert_eq!(restricted.tables.len(), 1);
        assert_eq!(restricted.columns.len(), 1);
        assert_eq!(restricted.relationships.len(), 1);
        assert_eq!(restricted.glossary.len(), 1);
    }
}
