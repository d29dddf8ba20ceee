//! Hugging Face Inference API client (sentiment classification and text
//! generation).

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("no inference token configured")]
    MissingToken,

    #[error("inference request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference api returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected inference response: {0}")]
    Shape(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sentiment {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub temperature: f64,
    pub num_return_sequences: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            temperature: 0.7,
            num_return_sequences: 1,
            top_p: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<Sentiment>>),
    Flat(Vec<Sentiment>),
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    inner: Arc<Inner>,
}

impl InferenceClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, InferenceError> {
        if token.trim().is_empty() {
            return Err(InferenceError::MissingToken);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
                token: token.trim().to_string(),
            }),
        })
    }

    /// Highest-scoring label for `text`.
    pub async fn classify(&self, model: &str, text: &str) -> Result<Sentiment, InferenceError> {
        let body = serde_json::json!({ "inputs": text });
        let raw = self.post(model, &body).await?;
        best_label(&raw)
    }

    /// First generated sequence, prompt echo included (the API returns it).
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, InferenceError> {
        let body = serde_json::json!({ "inputs": prompt, "parameters": params });
        let raw = self.post(model, &body).await?;
        first_generation(&raw)
    }

    async fn post(&self, model: &str, body: &serde_json::Value) -> Result<String, InferenceError> {
        let url = format!("{}/{}", self.inner.base_url, model);
        let resp = self
            .inner
            .http
            .post(&url)
            .bearer_auth(&self.inner.token)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        tracing::debug!(model, bytes = text.len(), "inference response");
        Ok(text)
    }
}

fn best_label(raw: &str) -> Result<Sentiment, InferenceError> {
    let parsed: ClassificationResponse =
        serde_json::from_str(raw).map_err(|e| InferenceError::Shape(e.to_string()))?;
    let labels = match parsed {
        ClassificationResponse::Nested(mut outer) => {
            if outer.is_empty() {
                Vec::new()
            } else {
                outer.swap_remove(0)
            }
        }
        ClassificationResponse::Flat(labels) => labels,
    };
    labels
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| InferenceError::Shape("no labels".into()))
}

fn first_generation(raw: &str) -> Result<String, InferenceError> {
    let parsed: Vec<Generated> =
        serde_json::from_str(raw).map_err(|e| InferenceError::Shape(e.to_string()))?;
    parsed
        .into_iter()
        .next()
        .map(|g| g.generated_text)
        .ok_or_else(|| InferenceError::Shape("no generated text".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_highest_score_nested() {
        let raw = r#"[[{"label":"NEGATIVE","score":0.1},{"label":"POSITIVE","score":0.9}]]"#;
        let s = best_label(raw).unwrap();
        assert_eq!(s.label, "POSITIVE");
    }

    #[test]
    fn accepts_flat_labels() {
        let raw = r#"[{"label":"NEGATIVE","score":0.8},{"label":"POSITIVE","score":0.2}]"#;
        assert_eq!(best_label(raw).unwrap().label, "NEGATIVE");
        assert!(matches!(best_label("[]"), Err(InferenceError::Shape(_))));
        assert!(matches!(best_label("{\"x\":1}"), Err(InferenceError::Shape(_))));
    }

    #[test]
    fn reads_generated_text() {
        let raw = r#"[{"generated_text":"prompt and more"}]"#;
        assert_eq!(first_generation(raw).unwrap(), "prompt and more");
        assert!(first_generation("[]").is_err());
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(
            InferenceClient::new("https://example", "  ", Duration::from_secs(1)),
            Err(InferenceError::MissingToken)
        ));
    }

    #[test]
    fn top_p_is_optional_on_the_wire() {
        let v = serde_json::to_value(GenerationParams::default()).unwrap();
        assert!(v.get("top_p").is_none());
        assert_eq!(v["max_length"], 150);
    }
}
