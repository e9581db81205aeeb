//! `querylens prioritize`: analyze, gather candidates, select context.

use querylens_core::section::TokenBudget;
use querylens_prioritizer::render_sections;
use std::path::Path;

use super::{CommandResult, Pipeline, load_config};

pub async fn run(
    config_path: Option<&Path>,
    question: &str,
    candidates: &Path,
    budget: Option<usize>,
    user: Option<&str>,
) -> CommandResult {
    let pipeline = Pipeline::from_config(load_config(config_path)?);
    let (profile, schema) = pipeline.interpret(question, user, candidates).await?;

    let limits = &pipeline.config.prioritization;
    let budget = TokenBudget::new(
        limits.total_tokens,
        budget.unwrap_or(limits.context_tokens),
    );
    let context = pipeline.prioritizer.prioritize(&schema, &profile, budget).await;

    if let Some(reason) = &context.degraded {
        eprintln!("warning: prioritization degraded: {reason}");
    }
    println!("{}", render_sections(&context.sections));
    println!();
    println!(
        "-- intent: {} | domain: {} | confidence: {:.2}",
        profile.intent.intent_type, profile.domain.name, profile.confidence_score
    );
    println!(
        "-- selected {}/{} sections, {}/{} tokens ({:.0}% of budget)",
        context.metrics.selected_count,
        context.metrics.candidate_count,
        context.metrics.total_tokens,
        context.metrics.budget,
        context.metrics.utilization * 100.0
    );
    println!("{}", serde_json::to_string_pretty(&pipeline.metrics.report())?);
    Ok(())
}
