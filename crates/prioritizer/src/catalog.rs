//! A metadata catalog serving a pre-loaded candidate schema.

use async_trait::async_trait;
use querylens_core::candidate::CandidateSchema;
use querylens_core::catalog::MetadataCatalog;
use querylens_core::error::AnalysisError;
use querylens_core::profile::BusinessContextProfile;
use std::path::Path;
use tracing::debug;

/// Serves one fixed `CandidateSchema`, narrowed to the tables of the
/// profile's domain when the domain is known.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataCatalog {
    schema: CandidateSchema,
}

impl StaticMetadataCatalog {
    pub fn new(schema: CandidateSchema) -> Self {
        Self { schema }
    }

    /// Load a schema from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, AnalysisError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::MissingDependency(format!("candidate file {}: {e}", path.display()))
        })?;
        let schema = serde_json::from_str(&raw).map_err(|e| {
            AnalysisError::UnparseableOutput(format!("candidate file {}: {e}", path.display()))
        })?;
        Ok(Self::new(schema))
    }
}

#[async_trait]
impl MetadataCatalog for StaticMetadataCatalog {
    async fn candidates(
        &self,
        profile: &BusinessContextProfile,
    ) -> Result<CandidateSchema, AnalysisError> {
        let domain = &profile.domain;
        if domain.is_unknown() || domain.related_tables.is_empty() {
            return Ok(self.schema.clone());
        }

        let narrowed = self.schema.restricted_to_tables(&domain.related_tables);
        if narrowed.tables.is_empty() {
            debug!(domain = %domain.name, "No candidate tables in domain, serving full schema");
            return Ok(self.schema.clone());
        }
        Ok(narrowed)
    }
}
