//! Fan-in: combine the five signals into a `BusinessContextProfile`.

use chrono::Utc;
use querylens_core::profile::{
    BusinessContextProfile, Domain, Entity, EntityType, Intent, Signal, SignalKind, TimeContext,
};

const INTENT_WEIGHT: f32 = 0.3;
const DOMAIN_WEIGHT: f32 = 0.3;
const ENTITY_WEIGHT: f32 = 0.4;
/// Entity confidence assumed when no entities were extracted.
const NO_ENTITY_CONFIDENCE: f32 = 0.5;

pub const COMPARISON_KEYWORDS: &[&str] = &[
    "vs",
    "versus",
    "compared to",
    "compare",
    "higher than",
    "lower than",
    "more than",
    "less than",
    "greater than",
    "better than",
    "worse than",
    "difference between",
];

/// The settled outcome of every branch.
#[derive(Debug, Clone)]
pub struct Signals {
    pub intent: Signal<Intent>,
    pub domain: Signal<Domain>,
    pub entities: Signal<Vec<Entity>>,
    pub business_terms: Signal<Vec<String>>,
    pub time_range: Signal<Option<TimeContext>>,
}

impl Signals {
    pub fn degraded(&self) -> Vec<SignalKind> {
        [
            (SignalKind::Intent, self.intent.is_degraded()),
            (SignalKind::Domain, self.domain.is_degraded()),
            (SignalKind::Entities, self.entities.is_degraded()),
            (SignalKind::BusinessTerms, self.business_terms.is_degraded()),
            (SignalKind::TimeRange, self.time_range.is_degraded()),
        ]
        .into_iter()
        .filter_map(|(kind, degraded)| degraded.then_some(kind))
        .collect()
    }
}

/// 0.3 intent + 0.3 domain + 0.4 mean entity confidence.
pub fn confidence_score(intent: &Intent, domain: &Domain, entities: &[Entity]) -> f32 {
    let entity_confidence = if entities.is_empty() {
        NO_ENTITY_CONFIDENCE
    } else {
        entities.iter().map(|e| e.confidence).sum::<f32>() / entities.len() as f32
    };
    let score = INTENT_WEIGHT * intent.confidence
        + DOMAIN_WEIGHT * domain.relevance
        + ENTITY_WEIGHT * entity_confidence;
    crate::parse::unit_score(score)
}

/// Case-insensitive substring scan, in keyword order.
pub fn comparison_terms(question: &str) -> Vec<String> {
    let lowered = question.to_lowercase();
    COMPARISON_KEYWORDS
        .iter()
        .filter(|k| lowered.contains(**k))
        .map(|k| k.to_string())
        .collect()
}

fn of_type(entities: &[Entity], entity_type: EntityType) -> Vec<Entity> {
    entities
        .iter()
        .filter(|e| e.entity_type == entity_type)
        .cloned()
        .collect()
}

pub fn build_profile(question: &str, user_id: Option<&str>, signals: Signals) -> BusinessContextProfile {
    let degraded_signals = signals.degraded();
    let intent = signals.intent.value;
    let domain = signals.domain.value;
    let entities = signals.entities.value;

    BusinessContextProfile {
        id: uuid::Uuid::new_v4().to_string(),
        question: question.to_string(),
        user_id: user_id.map(str::to_string),
        confidence_score: confidence_score(&intent, &domain, &entities),
        identified_metrics: of_type(&entities, EntityType::Metric),
        identified_dimensions: of_type(&entities, EntityType::Dimension),
        comparison_terms: comparison_terms(question),
        intent,
        domain,
        entities,
        business_terms: signals.business_terms.value,
        time_context: signals.time_range.value,
        degraded_signals,
        created_at: Utc::now(),
    }
}
