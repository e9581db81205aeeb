//! `querylens config`: print or validate configuration.

use querylens_config::AppConfig;
use std::path::Path;

use super::{CommandResult, load_config};

pub fn run(config_path: Option<&Path>, validate: bool) -> CommandResult {
    if !validate {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config = load_config(config_path)?;
    println!("Configuration is valid");
    println!("   Provider:    {} ({})", config.provider.name, config.provider.api_url);
    println!("   Model:       {}", config.provider.model);
    println!(
        "   API key:     {}",
        if config.has_api_key() { "set" } else { "missing" }
    );
    println!("   Similarity:  {:?}", config.analysis.similarity);
    println!(
        "   Budget:      {}/{} tokens ({})",
        config.prioritization.context_tokens,
        config.prioritization.total_tokens,
        config.prioritization.default_strategy
    );
    println!("   Domains:     {}", config.domains.len());
    Ok(())
}
