use crate::config::AiProvider;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Anything that can turn a system + user prompt into a JSON object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn model_name(&self) -> String;

    async fn complete_json(&self, system: &str, user: &str) -> Result<JsonValue>;
}

/// Chat-completions client for OpenAI and API-compatible vendors.
#[derive(Clone)]
pub struct OpenAiCompatibleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    label: &'static str,
}

impl OpenAiCompatibleProvider {
    pub fn new(provider: AiProvider, api_key: String, client: Client) -> Self {
        let (base_url, model) = match provider {
            AiProvider::OpenAi => ("https://api.openai.com/v1", "gpt-4o-mini"),
            AiProvider::DeepSeek => ("https://api.deepseek.com", "deepseek-chat"),
        };
        Self {
            client,
            api_key,
            base_url: base_url.to_string(),
            model: model.to_string(),
            label: provider.as_str(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_payload(&self, system: &str, user: &str) -> JsonValue {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user}
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.3
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn model_name(&self) -> String {
        self.label.to_string()
    }

    async fn complete_json(&self, system: &str, user: &str) -> Result<JsonValue> {
        let payload = self.build_payload(system, user);
        tracing::debug!(provider = self.label, model = %self.model, prompt_chars = user.len(), "calling language model");

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("{} API error {}: {}", self.label, status, text).into());
        }

        let body: JsonValue = res.json().await?;
        extract_message_json(&body)
            .ok_or_else(|| anyhow::anyhow!("Invalid {} response format", self.label).into())
    }
}

/// Pulls the JSON object out of `choices[0].message.content`.
pub fn extract_message_json(body: &JsonValue) -> Option<JsonValue> {
    let content = body
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())?;
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str::<JsonValue>(trimmed)
        .ok()
        .filter(JsonValue::is_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(kind: AiProvider) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(kind, "sk-test".into(), Client::new())
    }

    #[test]
    fn provider_selection_picks_model_and_endpoint() {
        let openai = provider(AiProvider::OpenAi);
        assert_eq!(openai.model_name(), "openai");
        assert_eq!(openai.model, "gpt-4o-mini");

        let deepseek = provider(AiProvider::DeepSeek);
        assert_eq!(deepseek.base_url, "https://api.deepseek.com");
        assert_eq!(deepseek.model, "deepseek-chat");
    }

    #[test]
    fn payload_requests_json_output() {
        let payload = provider(AiProvider::OpenAi).build_payload("sys", "usr");
        assert_eq!(payload["response_format"]["type"], "json_object");
        assert_eq!(payload["messages"][0]["content"], "sys");
        assert_eq!(payload["messages"][1]["role"], "user");
    }

    #[test]
    fn extracts_json_content_including_fenced_blocks() {
        let plain = json!({ "choices": [{ "message": { "content": "{\"match_score\": 80}" } }] });
        assert_eq!(extract_message_json(&plain).unwrap()["match_score"], 80);

        let fenced = json!({ "choices": [{ "message": { "content": "```json\n{\"a\": 1}\n```" } }] });
        assert_eq!(extract_message_json(&fenced).unwrap()["a"], 1);

        let prose = json!({ "choices": [{ "message": { "content": "I cannot help" } }] });
        assert!(extract_message_json(&prose).is_none());

        let array = json!({ "choices": [{ "message": { "content": "[1,2]" } }] });
        assert!(extract_message_json(&array).is_none());

        assert!(extract_message_json(&json!({})).is_none());
    }

    async fn stub_server(status: axum::http::StatusCode, body: JsonValue) -> String {
        let app = axum::Router::new().route(
            "/chat/completions",
            axum::routing::post(move |axum::Json(req): axum::Json<JsonValue>| {
                let body = body.clone();
                async move {
                    assert_eq!(req["response_format"]["type"], "json_object");
                    (status, axum::Json(body))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn completes_against_compatible_endpoint() {
        let reply = json!({ "choices": [{ "message": { "content": "{\"match_score\": 64}" } }] });
        let base = stub_server(axum::http::StatusCode::OK, reply).await;
        let provider = provider(AiProvider::DeepSeek).with_base_url(base);

        let out = provider.complete_json("sys", "usr").await.unwrap();
        assert_eq!(out["match_score"], 64);
    }

    #[tokio::test]
    async fn upstream_errors_surface_as_errors() {
        let base = stub_server(
            axum::http::StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "rate limited" } }),
        )
        .await;
        let provider = provider(AiProvider::OpenAi).with_base_url(base);
        assert!(provider.complete_json("sys", "usr").await.is_err());
    }
}
