//! Importance, efficiency and composite priority of a section.

use querylens_core::section::ContextSection;

use crate::weights::ImportanceWeights;

const RELEVANCE_WEIGHT: f64 = 0.4;
const IMPORTANCE_WEIGHT: f64 = 0.4;
const EFFICIENCY_WEIGHT: f64 = 0.2;

/// Relevance per token; 0 for a section that costs nothing.
pub fn efficiency(section: &ContextSection) -> f64 {
    if section.token_count == 0 {
        0.0
    } else {
        f64::from(section.relevance) / section.token_count as f64
    }
}

pub fn priority(relevance: f64, importance: f64, efficiency: f64) -> f64 {
    RELEVANCE_WEIGHT * relevance + IMPORTANCE_WEIGHT * importance + EFFICIENCY_WEIGHT * efficiency
}

/// Record importance, efficiency and priority on the section's attributes.
pub fn score(section: ContextSection, weights: &ImportanceWeights) -> ContextSection {
    let importance = weights.for_category(section.category);
    let efficiency = efficiency(&section);
    let priority = priority(f64::from(section.relevance), importance, efficiency);
    section
        .with_attribute(ContextSection::IMPORTANCE, importance)
        .with_attribute(ContextSection::EFFICIENCY, efficiency)
        .with_attribute(ContextSection::PRIORITY, priority)
}
