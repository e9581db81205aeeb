//! Shared test helpers for interpreter tests.

use async_trait::async_trait;
use querylens_core::error::ProviderError;
use querylens_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::prompts;

/// What the mock does when an instruction is routed to it.
#[derive(Debug, Clone)]
pub enum Scripted {
    Text(String),
    Fail(ProviderError),
    Panic,
}

impl Scripted {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A mock provider that answers by the `Task:` line of the system
/// instruction, so concurrent branches get the right reply regardless of
/// arrival order.
///
/// Unrouted instructions fail with a network error.
pub struct RoutedMockProvider {
    routes: Mutex<HashMap<String, Scripted>>,
    call_count: AtomicUsize,
}

impl RoutedMockProvider {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Route `instruction` (matched by its first line) to `response`.
    pub fn on(self, instruction: &str, response: Scripted) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(task_line(instruction).to_string(), response);
        self
    }

    /// A provider answering all four model-backed signals for
    /// "total revenue by region last quarter".
    pub fn revenue_question() -> Self {
        Self::new()
            .on(
                prompts::INTENT,
                Scripted::text(
                    r#"{"type": "Aggregation", "description": "Sum revenue per region", "confidence": 0.9}"#,
                ),
            )
            .on(
                prompts::ENTITIES,
                Scripted::text(
                    r#"[{"name": "revenue", "type": "Metric", "original_text": "revenue", "confidence": 0.9},
                        {"name": "region", "type": "Dimension", "original_text": "region", "confidence": 0.7}]"#,
                ),
            )
            .on(prompts::BUSINESS_TERMS, Scripted::text(r#"["revenue", "Revenue", "region"]"#))
            .on(
                prompts::TIME_RANGE,
                Scripted::text(
                    r#"{"start": "2026-04-01", "end": "2026-06-30", "relative": "last quarter", "granularity": "Quarter"}"#,
                ),
            )
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

fn task_line(instruction: &str) -> &str {
    instruction.lines().next().unwrap_or_default()
}

#[async_trait]
impl Provider for RoutedMockProvider {
    fn name(&self) -> &str {
        "routed_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let system = request.system.unwrap_or_default();
        let scripted = self.routes.lock().unwrap().get(task_line(&system)).cloned();

        match scripted {
            Some(Scripted::Text(text)) => Ok(make_text_response(&text)),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Panic) => panic!("RoutedMockProvider: scripted panic"),
            None => Err(ProviderError::Network(format!(
                "RoutedMockProvider: no route for {:?}",
                task_line(&system)
            ))),
        }
    }
}

pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        content: text.to_string(),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}
