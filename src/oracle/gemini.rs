//! Google Gemini `generateContent` client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::OracleConfig;
use crate::oracle::{MathOracle, OracleError, OracleReply};

/// Fallback variable consulted after the configured one.
pub const LEGACY_KEY_ENV: &str = "API_KEY";

const SYSTEM_INSTRUCTION: &str = "\
Jsi chytrý matematický asistent pro českou kalkulačku.
Tvým úkolem je vyřešit matematický problém zadaný uživatelem.

Pravidla:
1. Vrať odpověď ve formátu JSON.
2. \"answer\" by mělo být pouze číslo nebo krátký výsledek (např. \"42\" nebo \"x = 5\").
3. \"explanation\" by mělo být stručné vysvětlení v češtině (maximálně 1-2 věty). Pokud je výpočet triviální, vysvětlení může být prázdné.
4. Pokud zadání není matematický problém, slušně odmítni v \"explanation\" a \"answer\" nech prázdné.";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: json!({
                    "type": "OBJECT",
                    "properties": {
                        "answer": { "type": "STRING" },
                        "explanation": { "type": "STRING" },
                    },
                    "required": ["answer", "explanation"],
                }),
            },
        }
    }
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }

    pub fn into_reply(self) -> Result<OracleReply, OracleError> {
        let text = self.text().ok_or(OracleError::EmptyResponse)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Pick the API key: explicit config first, then the named env var, then
/// [`LEGACY_KEY_ENV`].
pub fn resolve_api_key(
    configured: Option<&str>,
    env_var: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    configured
        .map(str::to_string)
        .or_else(|| lookup(env_var))
        .or_else(|| lookup(LEGACY_KEY_ENV))
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

pub struct GeminiOracle {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    timeout: Duration,
}

impl GeminiOracle {
    pub fn from_config(config: &OracleConfig) -> Self {
        let api_key = resolve_api_key(config.api_key.as_deref(), &config.api_key_env, |name| {
            std::env::var(name).ok()
        });
        if api_key.is_none() {
            tracing::warn!(env = %config.api_key_env, "no oracle API key found");
        }
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    #[cfg(feature = "network")]
    fn send(&self, api_key: &str, request: &GenerateRequest) -> Result<GenerateResponse, OracleError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json()?)
    }

    #[cfg(not(feature = "network"))]
    fn send(&self, _api_key: &str, _request: &GenerateRequest) -> Result<GenerateResponse, OracleError> {
        let _ = self.timeout;
        Err(OracleError::NetworkDisabled)
    }
}

impl MathOracle for GeminiOracle {
    fn query(&self, prompt: &str) -> Result<OracleReply, OracleError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| OracleError::MissingCredential {
                env_var: self.api_key_env.clone(),
            })?;
        tracing::debug!(model = %self.model, "sending generateContent");
        let response = self.send(api_key, &GenerateRequest::new(prompt))?;
        response.into_reply()
    }
}
