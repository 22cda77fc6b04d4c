//! Blocking text-generation client used by the oracle strategies.
//!
//! Every caller treats an oracle failure as "use the rule-based path instead",
//! so errors here are descriptive but never fatal.

use crate::config::GladiatorConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("oracle unavailable")]
    Unavailable,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("oracle returned HTTP {0}")]
    Status(u16),

    #[error("empty response")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("outside vocabulary: {0}")]
    OutOfVocabulary(String),
}

/// Anything that turns a prompt into text.
pub trait TextOracle {
    fn generate(&self, prompt: &str) -> Result<String, OracleError>;
}

impl<T: TextOracle + ?Sized> TextOracle for Arc<T> {
    fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        (**self).generate(prompt)
    }
}

/// Google Gemini `generateContent` client over a blocking `ureq` agent.
pub struct GeminiOracle {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiOracle {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            api_key,
            model,
            base_url,
        }
    }

    /// Builds a client when an API key is configured.
    pub fn from_config(config: &GladiatorConfig) -> Option<Self> {
        let api_key = config.oracle_api_key.clone()?;
        Some(Self::new(
            api_key,
            config.oracle_model.clone(),
            config.oracle_url.clone(),
            config.oracle_timeout,
        ))
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextOracle for GeminiOracle {
    fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = match self
            .agent
            .post(&self.endpoint())
            .query("key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_json(&request)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(OracleError::Status(code)),
            Err(e) => return Err(OracleError::Transport(e.to_string())),
        };

        let body: GenerateResponse = response
            .into_json()
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Strips a Markdown code fence (```json or bare ```) around a JSON payload.
pub fn extract_json_block(text: &str) -> &str {
    let text = text.trim();
    let body_start = if let Some(pos) = text.find("```json") {
        pos + "```json".len()
    } else if let Some(pos) = text.find("```") {
        pos + "```".len()
    } else {
        return text;
    };
    let rest = &text[body_start..];
    match rest.find("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_json() {
        assert_eq!(extract_json_block("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_fence() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nGood luck!";
        assert_eq!(extract_json_block(text), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_bare_fence() {
        let text = "```\n{\"b\": 2}\n```";
        assert_eq!(extract_json_block(text), "{\"b\": 2}");
    }

    #[test]
    fn test_extract_unterminated_fence() {
        assert_eq!(extract_json_block("```json\n{\"c\": 3}"), "{\"c\": 3}");
    }

    #[test]
    fn test_endpoint_format() {
        let oracle = GeminiOracle::new(
            "key".into(),
            "gemini-2.5-flash".into(),
            "https://example.test/v1beta/models/".into(),
            Duration::from_secs(1),
        );
        assert_eq!(
            oracle.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = GladiatorConfig::default();
        assert!(GeminiOracle::from_config(&config).is_none());

        let config = GladiatorConfig {
            oracle_api_key: Some("k".into()),
            ..GladiatorConfig::default()
        };
        assert!(GeminiOracle::from_config(&config).is_some());
    }
}
