//! End-to-end tests for the querylens pipeline.
//!
//! These exercise question interpretation, candidate gathering and
//! context prioritization together, with a scripted model.

use async_trait::async_trait;
use querylens_config::AppConfig;
use querylens_core::catalog::{BusinessDomain, MetadataCatalog};
use querylens_core::error::ProviderError;
use querylens_core::profile::{IntentType, SignalKind};
use querylens_core::provider::{Provider, ProviderRequest, ProviderResponse, SimilarityProvider};
use querylens_core::section::{OptimizationStrategy, SectionCategory, TokenBudget};
use querylens_interpreter::ContextAnalyzer;
use querylens_prioritizer::materialize::materialize;
use querylens_prioritizer::{ContextPrioritizer, StaticMetadataCatalog, render_sections};
use querylens_providers::{HeuristicTokenCounter, LexicalSimilarity};
use querylens_telemetry::MetricsRegistry;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// ── Mock Provider ────────────────────────────────────────────────────────

/// Answers each signal by keyword in its instruction; intent can be
/// made to fail.
struct ScriptedProvider {
    fail_intent: bool,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(fail_intent: bool) -> Self {
        Self {
            fail_intent,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let system = request.system.unwrap_or_default();
        let task = system.lines().next().unwrap_or_default();

        let content = if task.contains("intent") {
            if self.fail_intent {
                return Err(ProviderError::RateLimited {
                    retry_after_secs: 30,
                });
            }
            r#"{"type": "Aggregation", "description": "Total revenue per region", "confidence": 0.85}"#
        } else if task.contains("entity") {
            r#"```json
[{"name": "revenue", "type": "Metric", "original_text": "revenue", "confidence": 0.9},
 {"name": "region", "type": "Dimension", "original_text": "region", "confidence": 0.8}]
```"#
        } else if task.contains("business term") {
            r#"["revenue", "region"]"#
        } else if task.contains("time range") {
            "null"
        } else {
            return Err(ProviderError::Network(format!("unexpected task {task:?}")));
        };

        Ok(ProviderResponse {
            content: content.to_string(),
            model: "scripted".into(),
            usage: None,
        })
    }
}

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.domains = vec![
        BusinessDomain {
            name: "Sales".into(),
            description: "revenue by region and orders".into(),
            key_concepts: vec!["revenue".into(), "region".into()],
            related_tables: vec!["orders".into(), "regions".into()],
        },
        BusinessDomain {
            name: "Support".into(),
            description: "helpdesk tickets and agents".into(),
            key_concepts: vec!["sla".into()],
            related_tables: vec!["tickets".into()],
        },
    ];
    config
}

fn catalog() -> StaticMetadataCatalog {
    StaticMetadataCatalog::new(
        serde_json::from_value(serde_json::json!({
            "tables": [
                {"name": "orders", "description": "One row per order", "columns": ["id", "total", "region_id"], "relevance": 0.9},
                {"name": "regions", "description": "Sales regions", "columns": ["id", "name"], "relevance": 0.8},
                {"name": "tickets", "description": "Support tickets", "relevance": 0.7}
            ],
            "columns": [
                {"table": "orders", "name": "total", "data_type": "numeric", "relevance": 0.95},
                {"table": "regions", "name": "name", "data_type": "text", "relevance": 0.85},
                {"table": "tickets", "name": "status", "data_type": "text", "relevance": 0.5}
            ],
            "business_rules": [
                {"id": "R1", "name": "Net revenue", "description": "Exclude refunded orders", "relevance": 0.75}
            ],
            "examples": [
                {"question": "Revenue by region", "sql": "SELECT r.name, sum(o.total) FROM orders o JOIN regions r ON r.id = o.region_id GROUP BY 1", "relevance": 0.8}
            ],
            "relationships": [
                {"from_table": "orders", "from_column": "region_id", "to_table": "regions", "to_column": "id"},
                {"from_table": "tickets", "from_column": "order_id", "to_table": "orders", "to_column": "id"}
            ],
            "glossary": [
                {"term": "Net revenue", "definition": "Revenue after refunds", "relevance": 0.4}
            ]
        }))
        .unwrap(),
    )
}

fn analyzer(provider: Arc<ScriptedProvider>, metrics: Arc<MetricsRegistry>) -> ContextAnalyzer {
    let provider: Arc<dyn Provider> = provider;
    let similarity: Arc<dyn SimilarityProvider> = Arc::new(LexicalSimilarity);
    ContextAnalyzer::from_config(&config(), Some(provider), similarity).with_metrics(metrics)
}

const QUESTION: &str = "total revenue by region versus last year";

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn question_to_prioritized_context() {
    let metrics = Arc::new(MetricsRegistry::new());
    let provider = Arc::new(ScriptedProvider::new(false));
    let analyzer = analyzer(provider.clone(), metrics.clone());
    let prioritizer = ContextPrioritizer::from_config(&config()).with_metrics(metrics.clone());

    let profile = analyzer.analyze(QUESTION, Some("analyst")).await;
    assert_eq!(profile.intent.intent_type, IntentType::Aggregation);
    assert_eq!(profile.domain.name, "Sales");
    assert_eq!(profile.identified_metrics.len(), 1);
    assert_eq!(profile.comparison_terms, vec!["versus"]);
    assert!(profile.time_context.is_none());
    assert!(!profile.is_degraded());

    let schema = catalog().candidates(&profile).await.unwrap();
    assert!(schema.tables.iter().all(|t| t.name != "tickets"));

    let context = prioritizer
        .prioritize(&schema, &profile, TokenBudget::new(8000, 120))
        .await;
    assert!(!context.sections.is_empty());
    assert!(context.metrics.total_tokens <= 120);

    let first_column = context
        .sections
        .iter()
        .position(|s| s.category == SectionCategory::ColumnDefinition);
    let last_table = context
        .sections
        .iter()
        .rposition(|s| s.category == SectionCategory::TableDefinition);
    if let (Some(column), Some(table)) = (first_column, last_table) {
        assert!(table < column);
    }

    let rendered = render_sections(&context.sections);
    assert!(rendered.starts_with("[Tables]"));

    let report = metrics.report();
    assert_eq!(report.operation("analyze").unwrap().count, 1);
    assert_eq!(report.operation("prioritize").unwrap().count, 1);
    assert_eq!(provider.calls(), 4);
}

#[tokio::test]
async fn failed_intent_still_produces_context() {
    let metrics = Arc::new(MetricsRegistry::new());
    let analyzer = analyzer(Arc::new(ScriptedProvider::new(true)), metrics);

    let profile = analyzer.analyze(QUESTION, None).await;
    assert_eq!(profile.intent.intent_type, IntentType::Unknown);
    assert_eq!(profile.intent.confidence, 0.0);
    assert_eq!(profile.domain.name, "Sales");
    assert_eq!(profile.entities.len(), 2);
    assert_eq!(profile.business_terms, vec!["revenue", "region"]);
    assert_eq!(profile.degraded_signals, vec![SignalKind::Intent]);

    let schema = catalog().candidates(&profile).await.unwrap();
    let context = ContextPrioritizer::new()
        .prioritize(&schema, &profile, TokenBudget::default())
        .await;
    assert!(!context.is_degraded());
    assert_eq!(context.sections.len(), schema.len());
}

#[tokio::test]
async fn repeated_requests_are_served_from_cache() {
    let provider = Arc::new(ScriptedProvider::new(false));
    let analyzer = analyzer(provider.clone(), Arc::new(MetricsRegistry::new()));
    let prioritizer = ContextPrioritizer::new();
    let budget = TokenBudget::context_only(90);

    let p1 = analyzer.analyze(QUESTION, None).await;
    let schema = catalog().candidates(&p1).await.unwrap();
    let c1 = prioritizer.prioritize(&schema, &p1, budget).await;

    let p2 = analyzer.analyze(QUESTION, None).await;
    let c2 = prioritizer.prioritize(&schema, &p2, budget).await;

    assert_eq!(p1, p2);
    assert_eq!(provider.calls(), 4);
    assert!(c2.from_cache);
    assert_eq!(
        serde_json::to_string(&c1.sections).unwrap(),
        serde_json::to_string(&c2.sections).unwrap()
    );
}

#[tokio::test]
async fn strategies_agree_on_budget_and_order() {
    let analyzer = analyzer(
        Arc::new(ScriptedProvider::new(false)),
        Arc::new(MetricsRegistry::new()),
    );
    let profile = analyzer.analyze(QUESTION, None).await;
    let schema = catalog().candidates(&profile).await.unwrap();
    let sections = materialize(&schema, &HeuristicTokenCounter).unwrap();
    let prioritizer = ContextPrioritizer::new();

    let mut totals = Vec::new();
    for strategy in OptimizationStrategy::ALL {
        let result = prioritizer.optimize(
            sections.clone(),
            &profile,
            TokenBudget::context_only(60),
            strategy,
        );
        assert!(result.metrics.total_tokens <= 60, "{strategy}");
        let ranks: Vec<_> = result
            .selected
            .iter()
            .map(|s| s.category.presentation_rank())
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{strategy}");
        totals.push((strategy, result.metrics.total_priority));
    }

    let total = |wanted| {
        totals
            .iter()
            .find(|(s, _)| *s == wanted)
            .map(|(_, t)| *t)
            .unwrap()
    };
    // Balanced maximizes quantized priority; allow the quantization step.
    assert!(
        total(OptimizationStrategy::Balanced) + 0.001 * sections.len() as f64
            >= total(OptimizationStrategy::MaxRelevance)
    );
}
