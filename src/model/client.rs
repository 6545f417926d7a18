use std::time::Duration;

use reqwest::Client;

use super::error::ModelError;
use super::types::{Message, MessagesRequest, MessagesResponse, Tool, ToolChoice};
use super::{Completion, CompletionRequest, ModelClient};

const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Name of the single tool used to force an enumerated decision.
const SELECT_ACTION_TOOL: &str = "select_action";

/// Messages API client for the Anthropic endpoint.
///
/// Free-text requests go out as plain messages; choice requests attach a
/// single enum-constrained tool and force it via `tool_choice`, so the model
/// cannot answer outside the schema.
pub struct AnthropicClient {
    api_key: String,
    model: String,
    max_tokens: u32,
    client: Client,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Self {
        Self::with_base_url(api_key, model, max_tokens, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(
        api_key: String,
        model: String,
        max_tokens: u32,
        base_url: String,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            model,
            max_tokens,
            client,
            base_url,
        }
    }

    fn build_request(&self, req: &CompletionRequest) -> MessagesRequest {
        let (tools, tool_choice) = match &req.choices {
            Some(tokens) => {
                let schema = serde_json::json!({
                    "type": "object",
                    "properties": {
                        "action": {"type": "string", "enum": tokens}
                    },
                    "required": ["action"]
                });
                (
                    Some(vec![Tool {
                        name: SELECT_ACTION_TOOL.to_string(),
                        description: "Select the next workflow action.".to_string(),
                        input_schema: schema,
                    }]),
                    Some(ToolChoice::tool(SELECT_ACTION_TOOL)),
                )
            }
            None => (None, None),
        };

        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: req.system.clone(),
            messages: req.messages.clone(),
            tools,
            tool_choice,
        }
    }

    async fn send(&self, req: &MessagesRequest) -> Result<MessagesResponse, ModelError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(ModelError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ModelError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<MessagesResponse>().await?;
        Ok(body)
    }
}

impl ModelClient for AnthropicClient {
    async fn complete(&self, req: &CompletionRequest) -> Result<Completion, ModelError> {
        let wire = self.build_request(req);
        let response = self.send(&wire).await?;
        Ok(extract_completion(&response, req.choices.is_some()))
    }
}

/// Pull a completion out of a response.
///
/// For choice requests the forced `select_action` tool call carries the token
/// in `input.action`; anything malformed falls back to `Text` so the router
/// can reject it as an invalid decision instead of this layer guessing.
fn extract_completion(response: &MessagesResponse, expect_choice: bool) -> Completion {
    if expect_choice {
        for block in &response.content {
            if block.content_type == "tool_use"
                && block.name.as_deref() == Some(SELECT_ACTION_TOOL)
                && let Some(token) = block
                    .input
                    .as_ref()
                    .and_then(|input| input.get("action"))
                    .and_then(|action| action.as_str())
            {
                return Completion::Choice(token.to_string());
            }
        }
    }

    let text = response
        .content
        .iter()
        .filter(|block| block.content_type == "text")
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join("");
    Completion::Text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AnthropicClient {
        AnthropicClient::with_base_url(
            "sk-test".into(),
            "claude-sonnet-4-5-20250929".into(),
            4096,
            format!("{}/v1/messages", server.uri()),
        )
    }

    fn text_request() -> CompletionRequest {
        CompletionRequest {
            system: Some("Propose a requirement.".into()),
            messages: vec![Message {
                role: "user".into(),
                content: "build a CSV validator".into(),
            }],
            choices: None,
        }
    }

    fn choice_request() -> CompletionRequest {
        CompletionRequest {
            system: Some("Pick one.".into()),
            messages: vec![Message {
                role: "user".into(),
                content: "looks good".into(),
            }],
            choices: Some(vec!["refine_design".into(), "implement_design".into()]),
        }
    }

    #[tokio::test]
    async fn free_text_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_1",
                "content": [{"type": "text", "text": "Proposed requirements: ..."}],
                "model": "claude-sonnet-4-5-20250929",
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 10, "output_tokens": 20}
            })))
            .mount(&server)
            .await;

        let completion = client_for(&server).complete(&text_request()).await.unwrap();
        assert_eq!(
            completion,
            Completion::Text("Proposed requirements: ...".into())
        );
    }

    #[tokio::test]
    async fn forced_choice_sends_tool_schema_and_parses_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(serde_json::json!({
                "tool_choice": {"type": "tool", "name": "select_action"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_2",
                "content": [{
                    "type": "tool_use",
                    "id": "toolu_1",
                    "name": "select_action",
                    "input": {"action": "implement_design"}
                }],
                "model": "claude-sonnet-4-5-20250929",
                "stop_reason": "tool_use",
                "usage": {"input_tokens": 10, "output_tokens": 5}
            })))
            .mount(&server)
            .await;

        let completion = client_for(&server)
            .complete(&choice_request())
            .await
            .unwrap();
        assert_eq!(completion, Completion::Choice("implement_design".into()));
    }

    #[tokio::test]
    async fn malformed_choice_falls_back_to_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_3",
                "content": [{"type": "text", "text": "implement_design, probably"}],
                "model": "claude-sonnet-4-5-20250929",
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 10, "output_tokens": 5}
            })))
            .mount(&server)
            .await;

        let completion = client_for(&server)
            .complete(&choice_request())
            .await
            .unwrap();
        assert_eq!(
            completion,
            Completion::Text("implement_design, probably".into())
        );
    }

    #[tokio::test]
    async fn rate_limit_surfaces_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete(&text_request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::RateLimited {
                retry_after_ms: 7000
            }
        ));
    }

    #[tokio::test]
    async fn api_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete(&text_request())
            .await
            .unwrap_err();
        match err {
            ModelError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }
}
