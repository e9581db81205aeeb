//! `querylens analyze`: interpret a question.

use std::path::Path;

use super::{CommandResult, Pipeline, load_config};

pub async fn run(config_path: Option<&Path>, question: &str, user: Option<&str>) -> CommandResult {
    let pipeline = Pipeline::from_config(load_config(config_path)?);
    let profile = pipeline.analyzer.analyze(question, user).await;

    if profile.is_degraded() {
        let degraded: Vec<String> = profile.degraded_signals.iter().map(|s| s.to_string()).collect();
        eprintln!("warning: degraded signals: {}", degraded.join(", "));
    }
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
