//! `ContextPrioritizer`: score, select and order context sections.
//!
//! ```text
//! candidates ─► materialize ─► score ─► select(strategy) ─► order ─► cache
//! ```
//!
//! Both entry points fail soft: any scoring or selection error yields an
//! empty selection whose `degraded` field carries the reason.

use querylens_cache::{InMemoryCache, NoopCache, get_json, hashed_key, set_json};
use querylens_config::AppConfig;
use querylens_core::cache::ContextCache;
use querylens_core::candidate::CandidateSchema;
use querylens_core::error::PrioritizationError;
use querylens_core::profile::{BusinessContextProfile, IntentType};
use querylens_core::provider::TokenCounter;
use querylens_core::section::{ContextSection, OptimizationStrategy, TokenBudget};
use querylens_providers::HeuristicTokenCounter;
use querylens_telemetry::MetricsRegistry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::materialize::materialize;
use crate::model::{OptimizationMetrics, OptimizationResult, PrioritizedContext};
use crate::weights::ImportanceWeights;
use crate::{ordering, scoring, select};

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
const DEFAULT_MAX_DP_CELLS: usize = 50_000_000;
pub const PRIORITIZE_OPERATION: &str = "prioritize";

pub struct ContextPrioritizer {
    token_counter: Arc<dyn TokenCounter>,
    cache: Arc<dyn ContextCache>,
    metrics: Arc<MetricsRegistry>,
    cache_ttl: Duration,
    max_dp_cells: usize,
}

impl Default for ContextPrioritizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextPrioritizer {
    /// Heuristic token counting, in-memory cache, private metrics.
    pub fn new() -> Self {
        Self {
            token_counter: Arc::new(HeuristicTokenCounter),
            cache: Arc::new(InMemoryCache::new()),
            metrics: Arc::new(MetricsRegistry::new()),
            cache_ttl: DEFAULT_CACHE_TTL,
            max_dp_cells: DEFAULT_MAX_DP_CELLS,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let cache: Arc<dyn ContextCache> = if config.prioritization.cache_enabled {
            Arc::new(InMemoryCache::new())
        } else {
            Arc::new(NoopCache)
        };
        Self::new()
            .with_cache(cache)
            .with_cache_ttl(config.prioritization.cache_ttl())
            .with_max_dp_cells(config.prioritization.max_dp_cells)
    }

    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.token_counter = counter;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ContextCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_max_dp_cells(mut self, cells: usize) -> Self {
        self.max_dp_cells = cells;
        self
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Select the best sections of `schema` for `profile` within
    /// `budget.context` tokens, using the Balanced strategy.
    pub async fn prioritize(
        &self,
        schema: &CandidateSchema,
        profile: &BusinessContextProfile,
        budget: TokenBudget,
    ) -> PrioritizedContext {
        let started = Instant::now();
        let intent = profile.intent.intent_type;
        let key = context_key(schema, intent, budget.context);

        if let Some(key) = &key {
            if let Some(mut cached) = self.cached(key).await {
                debug!(sections = cached.sections.len(), "Prioritized context served from cache");
                cached.from_cache = true;
                self.record(PRIORITIZE_OPERATION, started, &cached.metrics);
                return cached;
            }
        }

        let strategy = OptimizationStrategy::Balanced;
        let outcome = materialize(schema, self.token_counter.as_ref())
            .and_then(|sections| self.run(sections, intent, budget.context, strategy));

        let context = match outcome {
            Ok((sections, mut metrics)) => {
                metrics.duration_ms = started.elapsed().as_millis() as u64;
                info!(
                    intent = %intent,
                    candidates = metrics.candidate_count,
                    selected = metrics.selected_count,
                    tokens = metrics.total_tokens,
                    budget = metrics.budget,
                    "Context prioritized"
                );
                let context = PrioritizedContext {
                    sections,
                    metrics,
                    from_cache: false,
                    degraded: None,
                };
                if let Some(key) = &key {
                    self.store(key, &context).await;
                }
                context
            }
            Err(e) => {
                warn!(error = %e, "Prioritization failed, returning empty context");
                PrioritizedContext {
                    sections: Vec::new(),
                    metrics: OptimizationMetrics::empty(
                        strategy,
                        schema.len(),
                        budget.context,
                        started.elapsed(),
                    ),
                    from_cache: false,
                    degraded: Some(e.to_string()),
                }
            }
        };

        self.record(PRIORITIZE_OPERATION, started, &context.metrics);
        context
    }

    /// Run one strategy over already-materialized sections. Relevance must
    /// be a finite value in [0, 1]. Not cached.
    pub fn optimize(
        &self,
        sections: Vec<ContextSection>,
        profile: &BusinessContextProfile,
        budget: TokenBudget,
        strategy: OptimizationStrategy,
    ) -> OptimizationResult {
        let started = Instant::now();
        let candidate_count = sections.len();
        let intent = profile.intent.intent_type;

        let outcome = validate(&sections)
            .and_then(|()| self.run(sections, intent, budget.context, strategy));

        let result = match outcome {
            Ok((selected, mut metrics)) => {
                metrics.duration_ms = started.elapsed().as_millis() as u64;
                OptimizationResult {
                    selected,
                    metrics,
                    degraded: None,
                }
            }
            Err(e) => {
                warn!(%strategy, error = %e, "Optimization failed, returning empty selection");
                OptimizationResult {
                    selected: Vec::new(),
                    metrics: OptimizationMetrics::empty(
                        strategy,
                        candidate_count,
                        budget.context,
                        started.elapsed(),
                    ),
                    degraded: Some(e.to_string()),
                }
            }
        };

        self.record(&format!("optimize:{strategy}"), started, &result.metrics);
        result
    }

    /// Score, select and order.
    fn run(
        &self,
        sections: Vec<ContextSection>,
        intent: IntentType,
        budget: usize,
        strategy: OptimizationStrategy,
    ) -> Result<(Vec<ContextSection>, OptimizationMetrics), PrioritizationError> {
        let weights = ImportanceWeights::for_intent(intent);
        let mut scored: Vec<ContextSection> = sections
            .into_iter()
            .map(|s| scoring::score(s, &weights))
            .collect();
        let candidate_count = scored.len();

        let chosen = select::select(&scored, budget, strategy, self.max_dp_cells)?;

        // `chosen` is ascending; take from the back so indices stay valid.
        let mut selected: Vec<ContextSection> =
            chosen.iter().rev().map(|&i| scored.swap_remove(i)).collect();
        selected.reverse();
        let ordered = ordering::present(selected);

        let metrics =
            OptimizationMetrics::measure(strategy, candidate_count, &ordered, budget, Duration::ZERO);
        Ok((ordered, metrics))
    }

    fn record(&self, operation: &str, started: Instant, metrics: &OptimizationMetrics) {
        self.metrics.record(
            operation,
            started.elapsed(),
            metrics.candidate_count,
            metrics.selected_count,
        );
    }

    async fn cached(&self, key: &str) -> Option<PrioritizedContext> {
        match get_json(self.cache.as_ref(), key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(cache = self.cache.name(), error = %e, "Cache read failed, recomputing");
                None
            }
        }
    }

    async fn store(&self, key: &str, context: &PrioritizedContext) {
        if let Err(e) = set_json(self.cache.as_ref(), key, context, self.cache_ttl).await {
            warn!(cache = self.cache.name(), error = %e, "Cache write failed");
        }
    }
}

/// `context:` + SHA-256 of the schema's JSON, the intent and the budget.
/// `None` when the schema cannot be serialized.
pub fn context_key(schema: &CandidateSchema, intent: IntentType, budget: usize) -> Option<String> {
    match serde_json::to_string(schema) {
        Ok(json) => Some(hashed_key(
            "context",
            &[json.as_str(), intent.as_str(), budget.to_string().as_str()],
        )),
        Err(e) => {
            warn!(error = %e, "Candidate schema not hashable, skipping cache");
            None
        }
    }
}

fn validate(sections: &[ContextSection]) -> Result<(), PrioritizationError> {
    for (index, section) in sections.iter().enumerate() {
        if !(0.0..=1.0).contains(&section.relevance) {
            return Err(PrioritizationError::InvalidSection {
                index,
                reason: format!("relevance {} outside [0, 1]", section.relevance),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use querylens_core::error::TokenizerError;
    use querylens_core::profile::{Domain, Intent};
    use querylens_core::provider::TokenHint;
    use querylens_core::section::SectionCategory;

    fn profile(intent_type: IntentType) -> BusinessContextProfile {
        BusinessContextProfile {
            id: "p1".into(),
            question: "total revenue by region".into(),
            user_id: None,
            intent: Intent {
                intent_type,
                description: String::new(),
                confidence: 0.9,
                sub_intents: vec![],
            },
            domain: Domain::unknown(),
            entities: vec![],
            business_terms: vec![],
            time_context: None,
            identified_metrics: vec![],
            identified_dimensions: vec![],
            comparison_terms: vec![],
            confidence_score: 0.7,
            degraded_signals: vec![],
            created_at: Utc::now(),
        }
    }

    fn schema() -> CandidateSchema {
        serde_json::from_value(serde_json::json!({
            "tables": [
                {"name": "orders", "description": "One row per order", "columns": ["id", "total", "region"], "relevance": 0.9},
                {"name": "customers", "description": "Customer master data", "relevance": 0.5}
            ],
            "columns": [
                {"table": "orders", "name": "total", "data_type": "numeric", "description": "Order value", "relevance": 0.95},
                {"table": "orders", "name": "region", "data_type": "text", "relevance": 0.8}
            ],
            "business_rules": [
                {"id": "R1", "name": "Net revenue", "description": "Exclude refunded orders", "relevance": 0.7}
            ],
            "examples": [
                {"question": "Revenue by month", "sql": "SELECT date_trunc('month', created_at), sum(total) FROM orders GROUP BY 1", "relevance": 0.6}
            ],
            "relationships": [
                {"from_table": "orders", "from_column": "customer_id", "to_table": "customers", "to_column": "id"}
            ],
            "glossary": [
                {"term": "ARR", "definition": "Annual recurring revenue", "relevance": 0.3}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn prioritize_stays_within_context_budget() {
        let prioritizer = ContextPrioritizer::new();
        for budget in [0, 5, 20, 40, 80, 500] {
            let context = prioritizer
                .prioritize(&schema(), &profile(IntentType::Aggregation), TokenBudget::new(8000, budget))
                .await;
            let used: usize = context.sections.iter().map(|s| s.token_count).sum();
            assert!(used <= budget, "budget {budget}: used {used}");
            assert_eq!(context.metrics.total_tokens, used);
            assert!(!context.is_degraded());
        }
    }

    #[tokio::test]
    async fn generous_budget_selects_everything_in_presentation_order() {
        let context = ContextPrioritizer::new()
            .prioritize(&schema(), &profile(IntentType::Aggregation), TokenBudget::context_only(10_000))
            .await;
        let categories: Vec<_> = context.sections.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![
                SectionCategory::TableDefinition,
                SectionCategory::TableDefinition,
                SectionCategory::ColumnDefinition,
                SectionCategory::ColumnDefinition,
                SectionCategory::Relationship,
                SectionCategory::BusinessRule,
                SectionCategory::Example,
                SectionCategory::Glossary,
            ]
        );
        assert_eq!(context.sections[0].attribute_str("source_table"), Some("orders"));
        assert_eq!(context.metrics.selected_count, 8);
    }

    #[tokio::test]
    async fn aggregation_table_importance_is_exact() {
        let context = ContextPrioritizer::new()
            .prioritize(&schema(), &profile(IntentType::Aggregation), TokenBudget::context_only(10_000))
            .await;
        for section in context
            .sections
            .iter()
            .filter(|s| s.category == SectionCategory::TableDefinition)
        {
            assert_eq!(section.importance(), Some(0.9));
        }
    }

    #[tokio::test]
    async fn warm_cache_returns_identical_selection() {
        let prioritizer = ContextPrioritizer::new();
        let p = profile(IntentType::Trend);
        let budget = TokenBudget::context_only(40);

        let first = prioritizer.prioritize(&schema(), &p, budget).await;
        let second = prioritizer.prioritize(&schema(), &p, budget).await;

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(
            serde_json::to_string(&first.sections).unwrap(),
            serde_json::to_string(&second.sections).unwrap()
        );

        // A different intent is a different key.
        let other = prioritizer.prioritize(&schema(), &profile(IntentType::Detail), budget).await;
        assert!(!other.from_cache);
    }

    #[tokio::test(start_paused = true)]
    async fn cached_context_expires() {
        let prioritizer = ContextPrioritizer::new().with_cache_ttl(Duration::from_secs(60));
        let p = profile(IntentType::Trend);
        prioritizer.prioritize(&schema(), &p, TokenBudget::default()).await;
        tokio::time::advance(Duration::from_secs(61)).await;
        let again = prioritizer.prioritize(&schema(), &p, TokenBudget::default()).await;
        assert!(!again.from_cache);
    }

    #[tokio::test]
    async fn from_config_honours_prioritization_cache_switch() {
        let mut config = AppConfig::default();
        config.prioritization.cache_enabled = false;
        let prioritizer = ContextPrioritizer::from_config(&config);
        let p = profile(IntentType::Trend);

        prioritizer.prioritize(&schema(), &p, TokenBudget::default()).await;
        let again = prioritizer.prioritize(&schema(), &p, TokenBudget::default()).await;
        assert!(!again.from_cache);
    }

    #[tokio::test]
    async fn unbounded_cache_ttl_does_not_panic() {
        let prioritizer =
            ContextPrioritizer::new().with_cache_ttl(Duration::from_secs(u64::MAX));
        let p = profile(IntentType::Trend);

        let first = prioritizer.prioritize(&schema(), &p, TokenBudget::default()).await;
        assert!(!first.sections.is_empty());
        let again = prioritizer.prioritize(&schema(), &p, TokenBudget::default()).await;
        assert!(again.from_cache);
    }

    struct BrokenCounter;

    impl TokenCounter for BrokenCounter {
        fn count_tokens(&self, _text: &str, _hint: TokenHint) -> Result<usize, TokenizerError> {
            Err(TokenizerError::Unavailable("offline".into()))
        }
    }

    #[tokio::test]
    async fn tokenizer_failure_fails_soft() {
        let context = ContextPrioritizer::new()
            .with_token_counter(Arc::new(BrokenCounter))
            .prioritize(&schema(), &profile(IntentType::Detail), TokenBudget::default())
            .await;
        assert!(context.sections.is_empty());
        assert!(context.is_degraded());
        assert_eq!(context.metrics.candidate_count, 8);
    }

    #[tokio::test]
    async fn oversized_dp_table_fails_soft() {
        let context = ContextPrioritizer::new()
            .with_max_dp_cells(10)
            .prioritize(&schema(), &profile(IntentType::Detail), TokenBudget::default())
            .await;
        assert!(context.sections.is_empty());
        assert!(context.degraded.as_deref().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn records_prioritize_metrics() {
        let metrics = Arc::new(MetricsRegistry::new());
        let prioritizer = ContextPrioritizer::new().with_metrics(metrics.clone());
        let p = profile(IntentType::Analytical);

        prioritizer.prioritize(&schema(), &p, TokenBudget::context_only(10_000)).await;
        prioritizer.prioritize(&schema(), &p, TokenBudget::context_only(10_000)).await;

        let summary = metrics.summary(PRIORITIZE_OPERATION).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_candidates, 16);
        assert_eq!(summary.total_selected, 16);
    }

    fn sections() -> Vec<ContextSection> {
        vec![
            ContextSection::new(SectionCategory::ColumnDefinition, "Column: orders.total", 30, 0.95),
            ContextSection::new(SectionCategory::TableDefinition, "Table: orders", 50, 0.9),
            ContextSection::new(SectionCategory::Glossary, "ARR: Annual recurring revenue", 20, 0.2),
            ContextSection::new(SectionCategory::Example, "Question: x\nSQL: SELECT 1", 40, 0.6),
        ]
    }

    #[test]
    fn optimize_orders_tables_before_columns_for_every_strategy() {
        let prioritizer = ContextPrioritizer::new();
        for strategy in OptimizationStrategy::ALL {
            let result = prioritizer.optimize(
                sections(),
                &profile(IntentType::Comparison),
                TokenBudget::context_only(100),
                strategy,
            );
            assert!(result.metrics.total_tokens <= 100, "{strategy}");
            let ranks: Vec<_> = result
                .selected
                .iter()
                .map(|s| s.category.presentation_rank())
                .collect();
            assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{strategy}: {ranks:?}");
            assert_eq!(result.metrics.strategy, strategy);
        }
    }

    #[test]
    fn optimize_zero_budget_is_empty() {
        let prioritizer = ContextPrioritizer::new();
        for strategy in OptimizationStrategy::ALL {
            let result = prioritizer.optimize(
                sections(),
                &profile(IntentType::Trend),
                TokenBudget::context_only(0),
                strategy,
            );
            assert!(result.selected.is_empty());
            assert!(result.degraded.is_none());
        }
    }

    #[test]
    fn optimize_rejects_invalid_relevance_softly() {
        let mut input = sections();
        input.push(ContextSection::new(SectionCategory::Glossary, "bad", 1, 1.5));
        let result = ContextPrioritizer::new().optimize(
            input,
            &profile(IntentType::Trend),
            TokenBudget::default(),
            OptimizationStrategy::MaxRelevance,
        );
        assert!(result.selected.is_empty());
        assert!(result.degraded.unwrap().starts_with("Invalid section 4"));
    }

    #[test]
    fn optimize_records_per_strategy_metrics() {
        let prioritizer = ContextPrioritizer::new();
        prioritizer.optimize(
            sections(),
            &profile(IntentType::Trend),
            TokenBudget::default(),
            OptimizationStrategy::MinTokens,
        );
        let summary = prioritizer.metrics().summary("optimize:min_tokens").unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total_candidates, 4);
    }
}
