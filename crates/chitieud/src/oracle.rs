//! Language oracle client.
//!
//! The oracle is a black box: prompt in, JSON-shaped text out. Everything
//! downstream depends only on the `Oracle` trait, so tests inject canned
//! responses and a rule-based classifier could be substituted without
//! touching merge or compose logic.

use std::future::Future;
use std::time::Duration;

use chitieu_common::error::BotError;

use crate::config::BotConfig;

/// Deterministic-leaning sampling for structured output.
const ORACLE_TEMPERATURE: f64 = 0.1;

/// Narrow seam to the language-understanding service.
pub trait Oracle {
    /// One synchronous (from the pipeline's point of view) completion call.
    /// Must return the raw response text; shape validation is the
    /// classifier's job.
    fn structured_complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, BotError>> + Send;
}

/// HTTP oracle against an OpenAI-compatible chat completions endpoint
/// (api.openai.com or a local Ollama server in compatibility mode).
pub struct HttpOracle {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpOracle {
    pub fn new(config: &BotConfig) -> Result<Self, BotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.oracle_timeout_secs))
            .build()
            .map_err(|e| BotError::OracleUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.oracle_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl Oracle for HttpOracle {
    async fn structured_complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, BotError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "response_format": {"type": "json_object"},
            "temperature": ORACLE_TEMPERATURE,
        });

        let mut request = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        // Timeouts surface here as send errors; the classifier treats them
        // the same as any other transport failure.
        let response = request
            .send()
            .await
            .map_err(|e| BotError::OracleUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::OracleUnavailable(format!(
                "oracle returned status {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BotError::MalformedOracleResponse(e.to_string()))?;

        json.pointer("/choices/0/message/content")
            .and_then(|c| c.as_str())
            .map(|c| c.to_string())
            .ok_or_else(|| {
                BotError::MalformedOracleResponse("missing message content".to_string())
            })
    }
}
