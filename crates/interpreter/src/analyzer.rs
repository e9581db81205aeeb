//! `ContextAnalyzer`: the interpretation pipeline entry point.
//!
//! ```text
//! question ─► cache? ──hit──► profile
//!               │ miss
//!               ▼
//!   ┌─────────┬─────────┬──────────┬───────┬────────────┐
//!   │ intent  │ domain  │ entities │ terms │ time range │   (spawned tasks)
//!   └────┬────┴────┬────┴────┬─────┴───┬───┴─────┬──────┘
//!        └─────────┴─────────┴── join ──┴─────────┘
//!                          │
//!                    aggregate ─► cache ─► profile
//! ```
//!
//! Every branch is fault-isolated: an error or a panic in one branch
//! degrades that signal to its neutral default and never touches the
//! others.

use querylens_cache::{InMemoryCache, NoopCache, get_json, profile_key, set_json};
use querylens_config::AppConfig;
use querylens_core::cache::ContextCache;
use querylens_core::catalog::{DomainCatalog, StaticDomainCatalog};
use querylens_core::error::AnalysisError;
use querylens_core::profile::{BusinessContextProfile, Domain, Intent, Signal, SignalKind};
use querylens_core::provider::{Provider, SimilarityProvider};
use querylens_telemetry::MetricsRegistry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::aggregate::{Signals, build_profile};
use crate::signals::{Classifier, ClassifierSettings, domain, entities, intent, terms, time_range};

const SIGNAL_COUNT: usize = 5;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
pub const OPERATION: &str = "analyze";

pub struct ContextAnalyzer {
    classifier: Arc<Classifier>,
    domain_catalog: Option<Arc<dyn DomainCatalog>>,
    similarity: Option<Arc<dyn SimilarityProvider>>,
    cache: Arc<dyn ContextCache>,
    metrics: Arc<MetricsRegistry>,
    cache_ttl: Duration,
}

impl ContextAnalyzer {
    /// Analyzer with an in-memory cache, a private metrics registry, and
    /// no domain catalog or similarity (domain detection degrades).
    pub fn new(provider: Option<Arc<dyn Provider>>) -> Self {
        Self {
            classifier: Arc::new(Classifier::new(provider, ClassifierSettings::default())),
            domain_catalog: None,
            similarity: None,
            cache: Arc::new(InMemoryCache::new()),
            metrics: Arc::new(MetricsRegistry::new()),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Wire an analyzer from configuration. The domain catalog is built
    /// from `config.domains`.
    pub fn from_config(
        config: &AppConfig,
        provider: Option<Arc<dyn Provider>>,
        similarity: Arc<dyn SimilarityProvider>,
    ) -> Self {
        let settings = ClassifierSettings {
            model: config.provider.model.clone(),
            temperature: config.provider.temperature,
            max_tokens: config.provider.max_tokens,
        };
        let cache: Arc<dyn ContextCache> = if config.analysis.cache_enabled {
            Arc::new(InMemoryCache::new())
        } else {
            Arc::new(NoopCache)
        };

        Self::new(None)
            .with_classifier(Classifier::new(provider, settings))
            .with_domain_catalog(Arc::new(StaticDomainCatalog::new(config.domains.clone())))
            .with_similarity(similarity)
            .with_cache(cache)
            .with_cache_ttl(config.analysis.cache_ttl())
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_domain_catalog(mut self, catalog: Arc<dyn DomainCatalog>) -> Self {
        self.domain_catalog = Some(catalog);
        self
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn SimilarityProvider>) -> Self {
        self.similarity = Some(similarity);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ContextCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Share a metrics registry with other components.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Interpret `question`. Never fails: degraded signals are listed in
    /// the returned profile.
    pub async fn analyze(&self, question: &str, user_id: Option<&str>) -> BusinessContextProfile {
        let started = Instant::now();
        let key = profile_key(question, user_id);

        let profile = match self.cached(&key).await {
            Some(profile) => {
                debug!(profile_id = %profile.id, "Profile served from cache");
                profile
            }
            None => {
                let signals = self.gather(question).await;
                let profile = build_profile(question, user_id, signals);
                self.store(&key, &profile).await;
                info!(
                    profile_id = %profile.id,
                    intent = %profile.intent.intent_type,
                    domain = %profile.domain.name,
                    entities = profile.entities.len(),
                    confidence = profile.confidence_score,
                    degraded = profile.degraded_signals.len(),
                    "Question analyzed"
                );
                profile
            }
        };

        self.metrics.record(
            OPERATION,
            started.elapsed(),
            SIGNAL_COUNT,
            SIGNAL_COUNT - profile.degraded_signals.len(),
        );
        profile
    }

    /// Drop the cached profile for `(question, user)`.
    pub async fn invalidate(&self, question: &str, user_id: Option<&str>) -> bool {
        match self.cache.remove(&profile_key(question, user_id)).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(cache = self.cache.name(), error = %e, "Cache remove failed");
                false
            }
        }
    }

    /// Run the five branches as independent tasks and wait for all of them.
    async fn gather(&self, question: &str) -> Signals {
        let question: Arc<str> = Arc::from(question);

        let intent_task = {
            let (classifier, q) = (self.classifier.clone(), question.clone());
            tokio::spawn(async move { intent::classify(&classifier, &q).await })
        };
        let domain_task = {
            let (catalog, similarity, q) =
                (self.domain_catalog.clone(), self.similarity.clone(), question.clone());
            tokio::spawn(async move { domain::detect(&q, catalog.as_ref(), similarity.as_ref()).await })
        };
        let entities_task = {
            let (classifier, q) = (self.classifier.clone(), question.clone());
            tokio::spawn(async move { entities::extract(&classifier, &q).await })
        };
        let terms_task = {
            let (classifier, q) = (self.classifier.clone(), question.clone());
            tokio::spawn(async move { terms::extract(&classifier, &q).await })
        };
        let time_task = {
            let (classifier, q) = (self.classifier.clone(), question.clone());
            tokio::spawn(async move { time_range::extract(&classifier, &q).await })
        };

        let (intent, domain, entities, terms, time) =
            tokio::join!(intent_task, domain_task, entities_task, terms_task, time_task);

        Signals {
            intent: settle(SignalKind::Intent, intent, Intent::default()),
            domain: settle(SignalKind::Domain, domain, Domain::unknown()),
            entities: settle(SignalKind::Entities, entities, Vec::new()),
            business_terms: settle(SignalKind::BusinessTerms, terms, Vec::new()),
            time_range: settle(SignalKind::TimeRange, time, None),
        }
    }

    async fn cached(&self, key: &str) -> Option<BusinessContextProfile> {
        match get_json(self.cache.as_ref(), key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(cache = self.cache.name(), error = %e, "Cache read failed, recomputing");
                None
            }
        }
    }

    async fn store(&self, key: &str, profile: &BusinessContextProfile) {
        if let Err(e) = set_json(self.cache.as_ref(), key, profile, self.cache_ttl).await {
            warn!(cache = self.cache.name(), error = %e, "Cache write failed");
        }
    }
}

/// Turn a branch outcome into a signal, substituting `fallback` on error
/// or panic.
fn settle<T>(
    kind: SignalKind,
    outcome: Result<Result<T, AnalysisError>, JoinError>,
    fallback: T,
) -> Signal<T> {
    let error = match outcome {
        Ok(Ok(value)) => return Signal::ok(value),
        Ok(Err(e)) => e,
        Err(join) => AnalysisError::TaskAborted(join.to_string()),
    };
    warn!(signal = %kind, error = %error, "Signal degraded to default");
    Signal::degraded(fallback, error.to_string())
}
