pub mod analyze;
pub mod config_cmd;
pub mod optimize;
pub mod prioritize;

use querylens_config::AppConfig;
use querylens_core::candidate::CandidateSchema;
use querylens_core::catalog::MetadataCatalog;
use querylens_core::profile::BusinessContextProfile;
use querylens_interpreter::ContextAnalyzer;
use querylens_prioritizer::{ContextPrioritizer, StaticMetadataCatalog};
use querylens_telemetry::MetricsRegistry;
use std::path::Path;
use std::sync::Arc;

pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Load `--config PATH`, or the default location.
pub fn load_config(path: Option<&Path>) -> CommandResult<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if !config.has_api_key() {
        tracing::warn!("No API key configured; model-backed signals will be degraded");
    }
    Ok(config)
}

/// The analyzer and prioritizer wired from configuration, sharing one
/// metrics registry.
pub struct Pipeline {
    pub config: AppConfig,
    pub analyzer: ContextAnalyzer,
    pub prioritizer: ContextPrioritizer,
    pub metrics: Arc<MetricsRegistry>,
}

impl Pipeline {
    pub fn from_config(config: AppConfig) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        let provider = querylens_providers::build_provider(&config);
        let similarity = querylens_providers::build_similarity(&config, provider.clone());
        let analyzer =
            ContextAnalyzer::from_config(&config, provider, similarity).with_metrics(metrics.clone());
        let prioritizer = ContextPrioritizer::from_config(&config).with_metrics(metrics.clone());
        Self {
            config,
            analyzer,
            prioritizer,
            metrics,
        }
    }

    /// Analyze the question and gather its candidates from `candidates`.
    pub async fn interpret(
        &self,
        question: &str,
        user_id: Option<&str>,
        candidates: &Path,
    ) -> CommandResult<(BusinessContextProfile, CandidateSchema)> {
        let catalog = StaticMetadataCatalog::from_json_file(candidates)?;
        let profile = self.analyzer.analyze(question, user_id).await;
        let schema = catalog.candidates(&profile).await?;
        Ok((profile, schema))
    }
}
