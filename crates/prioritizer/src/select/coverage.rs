//! MaxCoverage: one section per category first, then fill by relevance.

use querylens_core::section::{ContextSection, SectionCategory};

use super::ranked_by;

pub fn max_coverage(sections: &[ContextSection], budget: usize) -> Vec<usize> {
    let order = ranked_by(sections, |s| f64::from(s.relevance));
    let mut taken = vec![false; sections.len()];
    let mut chosen = Vec::new();
    let mut used = 0;

    // Fairness pass: best-ranked section of each present category that
    // still fits, visiting categories in presentation order.
    for category in SectionCategory::PRESENTATION_ORDER {
        let pick = order.iter().copied().find(|&i| {
            sections[i].category == category && used + sections[i].token_count <= budget
        });
        if let Some(i) = pick {
            taken[i] = true;
            used += sections[i].token_count;
            chosen.push(i);
        }
    }

    for i in order {
        if !taken[i] && used + sections[i].token_count <= budget {
            used += sections[i].token_count;
            chosen.push(i);
        }
    }
    chosen
}
