//! Presentation order of the final selection.

use querylens_core::section::ContextSection;
use std::cmp::Ordering;

/// Group by category in presentation order, most relevant first within a
/// category. Stable for equal relevance.
pub fn present(mut sections: Vec<ContextSection>) -> Vec<ContextSection> {
    sections.sort_by(|a, b| {
        a.category
            .presentation_rank()
            .cmp(&b.category.presentation_rank())
            .then_with(|| b.relevance.partial_cmp(&a.relevance).unwrap_or(Ordering::Equal))
    });
    sections
}
