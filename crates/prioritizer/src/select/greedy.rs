//! Greedy strategies: a single ranked pass, no backtracking. A section
//! that does not fit is skipped; later, smaller ones may still be taken.

use querylens_core::section::ContextSection;

use super::ranked_by;

/// Highest relevance first.
pub fn max_relevance(sections: &[ContextSection], budget: usize) -> Vec<usize> {
    fill(sections, ranked_by(sections, |s| f64::from(s.relevance)), budget)
}

/// Highest relevance per token first. Free sections with any relevance
/// rank ahead of everything else.
pub fn min_tokens(sections: &[ContextSection], budget: usize) -> Vec<usize> {
    fill(sections, ranked_by(sections, density), budget)
}

fn density(section: &ContextSection) -> f64 {
    let relevance = f64::from(section.relevance);
    match section.token_count {
        0 if relevance > 0.0 => f64::INFINITY,
        0 => 0.0,
        tokens => relevance / tokens as f64,
    }
}

fn fill(sections: &[ContextSection], order: Vec<usize>, budget: usize) -> Vec<usize> {
    let mut used = 0;
    order
        .into_iter()
        .filter(|&i| {
            let cost = sections[i].token_count;
            if used + cost <= budget {
                used += cost;
                true
            } else {
                false
            }
        })
        .collect()
}
