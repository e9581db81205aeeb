//! `querylens optimize`: run a single selection strategy.

use querylens_core::section::{OptimizationStrategy, TokenBudget};
use querylens_prioritizer::materialize::materialize;
use querylens_providers::HeuristicTokenCounter;
use std::path::Path;

use super::{CommandResult, Pipeline, load_config};

pub async fn run(
    config_path: Option<&Path>,
    question: &str,
    candidates: &Path,
    strategy: Option<OptimizationStrategy>,
    budget: Option<usize>,
) -> CommandResult {
    let pipeline = Pipeline::from_config(load_config(config_path)?);
    let (profile, schema) = pipeline.interpret(question, None, candidates).await?;

    let limits = &pipeline.config.prioritization;
    let strategy = strategy.unwrap_or(limits.default_strategy);
    let budget = TokenBudget::new(
        limits.total_tokens,
        budget.unwrap_or(limits.context_tokens),
    );
    let sections = materialize(&schema, &HeuristicTokenCounter)?;
    let result = pipeline.prioritizer.optimize(sections, &profile, budget, strategy);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
