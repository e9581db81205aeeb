//! Catalog collaborators: the business-domain catalog used by domain
//! detection, and the metadata catalog that assembles candidates.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::candidate::CandidateSchema;
use crate::error::AnalysisError;
use crate::profile::BusinessContextProfile;

/// A known business domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessDomain {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub related_tables: Vec<String>,
}

impl BusinessDomain {
    /// Text compared against the question: description plus concepts.
    pub fn match_text(&self) -> String {
        if self.key_concepts.is_empty() {
            self.description.clone()
        } else {
            format!("{} {}", self.description, self.key_concepts.join(" "))
        }
    }
}

/// Read-only source of known business domains.
#[async_trait]
pub trait DomainCatalog: Send + Sync {
    async fn domains(&self) -> Result<Vec<BusinessDomain>, AnalysisError>;
}

/// Domain catalog backed by a fixed list (typically from configuration).
#[derive(Debug, Clone, Default)]
pub struct StaticDomainCatalog {
    domains: Vec<BusinessDomain>,
}

impl StaticDomainCatalog {
    pub fn new(domains: Vec<BusinessDomain>) -> Self {
        Self { domains }
    }
}

#[async_trait]
impl DomainCatalog for StaticDomainCatalog {
    async fn domains(&self) -> Result<Vec<BusinessDomain>, AnalysisError> {
        Ok(self.domains.clone())
    }
}

/// Gathers candidate tables, columns, rules, examples, relationships and
/// glossary terms for a profile.
#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    async fn candidates(
        &self,
        profile: &BusinessContextProfile,
    ) -> Result<CandidateSchema, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_text_joins_concepts() {
        let domain = BusinessDomain {
            name: "Sales".into(),
            description: "Revenue and orders".into(),
            key_concepts: vec!["revenue".into(), "bookings".into()],
            related_tables: vec![],
        };
        assert_eq!(domain.match_text(), "Revenue and orders revenue bookings");
    }

    #[tokio::test]
    async fn static_catalog_returns_domains() {
        let catalog = StaticDomainCatalog::new(vec![BusinessDomain {
            name: "Support".into(),
            description: String::new(),
            key_concepts: vec![],
            related_tables: vec![],
        }]);
        let domains = catalog.domains().await.unwrap();
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].name, "Support");
    }
}
