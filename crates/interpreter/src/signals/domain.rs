//! Domain detection by semantic similarity against the domain catalog.

use futures::future::try_join_all;
use querylens_core::catalog::{BusinessDomain, DomainCatalog};
use querylens_core::error::AnalysisError;
use querylens_core::profile::Domain;
use querylens_core::provider::SimilarityProvider;
use std::sync::Arc;
use tracing::debug;

/// Score every known domain against the question and return the best.
///
/// A missing catalog or similarity capability is an error (the analyzer
/// degrades it to the `Unknown` sentinel); an empty catalog is simply
/// `Unknown`.
pub async fn detect(
    question: &str,
    catalog: Option<&Arc<dyn DomainCatalog>>,
    similarity: Option<&Arc<dyn SimilarityProvider>>,
) -> Result<Domain, AnalysisError> {
    let catalog =
        catalog.ok_or_else(|| AnalysisError::MissingDependency("domain catalog".into()))?;
    let similarity =
        similarity.ok_or_else(|| AnalysisError::MissingDependency("similarity provider".into()))?;

    let domains = catalog.domains().await?;
    if domains.is_empty() {
        return Ok(Domain::unknown());
    }

    let texts: Vec<String> = domains.iter().map(BusinessDomain::match_text).collect();
    let scores: Vec<f32> = try_join_all(texts.iter().map(|t| similarity.similarity(question, t)))
        .await?
        .into_iter()
        .map(crate::parse::unit_score)
        .collect();

    // First domain wins ties.
    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }

    let winner = &domains[best];
    debug!(domain = %winner.name, relevance = scores[best], "Domain detected");
    Ok(Domain {
        name: winner.name.clone(),
        description: winner.description.clone(),
        related_tables: winner.related_tables.clone(),
        key_concepts: winner.key_concepts.clone(),
        relevance: scores[best],
    })
}
