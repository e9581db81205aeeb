//! Budgeted selection strategies.
//!
//! Every strategy takes scored sections and a budget in tokens and returns
//! the indices of the chosen sections in ascending order. The total token
//! cost of a selection never exceeds the budget, and a zero budget always
//! selects nothing.

pub mod coverage;
pub mod greedy;
pub mod knapsack;

use querylens_core::error::PrioritizationError;
use querylens_core::section::{ContextSection, OptimizationStrategy};
use std::cmp::Ordering;

pub fn select(
    sections: &[ContextSection],
    budget: usize,
    strategy: OptimizationStrategy,
    max_dp_cells: usize,
) -> Result<Vec<usize>, PrioritizationError> {
    if budget == 0 || sections.is_empty() {
        return Ok(Vec::new());
    }
    let mut chosen = match strategy {
        OptimizationStrategy::Balanced => knapsack::solve(sections, budget, max_dp_cells)?,
        OptimizationStrategy::MaxRelevance => greedy::max_relevance(sections, budget),
        OptimizationStrategy::MinTokens => greedy::min_tokens(sections, budget),
        OptimizationStrategy::MaxCoverage => coverage::max_coverage(sections, budget),
    };
    chosen.sort_unstable();
    Ok(chosen)
}

/// Indices of `sections` ordered by `key` descending. Stable: equal keys
/// keep their original order.
pub(crate) fn ranked_by<F>(sections: &[ContextSection], key: F) -> Vec<usize>
where
    F: Fn(&ContextSection) -> f64,
{
    let mut order: Vec<usize> = (0..sections.len()).collect();
    order.sort_by(|&a, &b| {
        key(&sections[b])
            .partial_cmp(&key(&sections[a]))
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Total token cost of the selected indices.
pub fn total_tokens(sections: &[ContextSection], chosen: &[usize]) -> usize {
    chosen.iter().map(|&i| sections[i].token_count).sum()
}
