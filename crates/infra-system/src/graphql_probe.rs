// GraphQL health probe: POST `{ hello }` to the CRM endpoint

use async_trait::async_trait;
use crm_housekeeper_core::error::{AppError, Result};
use crm_housekeeper_core::port::HealthProbe;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PROBE_ATTEMPTS: u32 = 3;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Base delay between attempts (multiplied by the attempt number)
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

const HELLO_QUERY: &str = "{ hello }";

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

pub struct GraphqlHealthProbe {
    client: reqwest::Client,
    endpoint: String,
    attempts: u32,
}

impl GraphqlHealthProbe {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, attempts: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            attempts: attempts.max(1),
        })
    }

    async fn query_once(&self) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": HELLO_QUERY }))
            .send()
            .await
            .map_err(|e| AppError::Probe(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Probe(e.to_string()))?;

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| AppError::Probe(format!("invalid GraphQL response: {}", e)))?;

        parse_hello(body)
    }
}

fn parse_hello(body: GraphqlResponse) -> Result<String> {
    if !body.errors.is_empty() {
        let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
        return Err(AppError::Probe(messages.join("; ")));
    }

    match body.data {
        Some(data) => Ok(data.to_string()),
        None => Err(AppError::Probe("GraphQL response has no data".to_string())),
    }
}

#[async_trait]
impl HealthProbe for GraphqlHealthProbe {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    async fn check(&self) -> Result<String> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.query_once().await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    debug!(attempt = attempt, error = %e, "GraphQL probe attempt failed");
                    last_error = Some(e);
                    if attempt < self.attempts {
                        tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::Probe("probe never ran".to_string())))
    }
}
