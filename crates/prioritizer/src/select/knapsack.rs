//! Balanced selection: exact 0/1 knapsack over quantized priority.
//!
//! Value is `priority × 1000` truncated to an integer, weight is the token
//! cost. A single value row of `budget + 1` entries is rolled over the items;
//! the `(n + 1) × (budget + 1)` decision table is kept as a bitset for
//! backtracking. Inclusion must be strictly better than exclusion, so ties
//! resolve to leaving the item out.

use querylens_core::error::PrioritizationError;
use querylens_core::section::ContextSection;

const VALUE_SCALE: f64 = 1000.0;

/// Integer knapsack value of a priority score.
pub fn quantize(priority: f64) -> u64 {
    if priority.is_finite() && priority > 0.0 {
        (priority * VALUE_SCALE) as u64
    } else {
        0
    }
}

/// Take/skip decision per `(item, budget)` cell, one bit each.
struct Decisions {
    width: usize,
    words: Vec<u64>,
}

impl Decisions {
    fn new(items: usize, width: usize) -> Self {
        Self {
            width,
            words: vec![0; (items * width).div_ceil(64)],
        }
    }

    fn take(&mut self, item: usize, b: usize) {
        let bit = item * self.width + b;
        self.words[bit / 64] |= 1u64 << (bit % 64);
    }

    fn taken(&self, item: usize, b: usize) -> bool {
        let bit = item * self.width + b;
        self.words[bit / 64] & (1u64 << (bit % 64)) != 0
    }
}

pub fn solve(
    sections: &[ContextSection],
    budget: usize,
    max_cells: usize,
) -> Result<Vec<usize>, PrioritizationError> {
    let n = sections.len();
    let width = budget + 1;
    let too_large = PrioritizationError::BudgetTooLarge {
        items: n,
        budget,
        max_cells,
    };
    let cells = (n + 1).checked_mul(width).ok_or_else(|| too_large.clone())?;
    if cells > max_cells {
        return Err(too_large);
    }

    let mut best = vec![0u64; width];
    let mut decisions = Decisions::new(n, width);

    for (i, section) in sections.iter().enumerate() {
        let weight = section.token_count;
        let value = quantize(section.priority());
        if weight > budget {
            continue;
        }
        // Descending so `best[b - weight]` still holds the previous row.
        for b in (weight..width).rev() {
            let include = best[b - weight] + value;
            if include > best[b] {
                best[b] = include;
                decisions.take(i, b);
            }
        }
    }

    let mut chosen = Vec::new();
    let mut remaining = budget;
    for i in (0..n).rev() {
        if decisions.taken(i, remaining) {
            chosen.push(i);
            remaining -= sections[i].token_count;
        }
    }
    chosen.reverse();
    Ok(chosen)
}
