use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::services::CompletionService;

pub struct OpenAiClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|err| {
            AppError::Configuration(format!("failed to build HTTP client: {err}"))
        })?;
        Ok(Self {
            http,
            api_key,
            base_url,
            model,
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Configuration("OpenAI API key not configured".to_string()))
    }

    fn completions_endpoint(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn generate_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> AppResult<String> {
        let api_key = self.api_key()?;
        let endpoint = Self::completions_endpoint(&self.base_url);
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            n: 1,
        };

        debug!(%endpoint, model = %self.model, "requesting chat completion");

        let response = self
            .http
            .post(&endpoint)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                let summary = if err.is_timeout() {
                    "request to the completion service timed out"
                } else {
                    "failed to reach the completion service"
                };
                AppError::completion(summary, format!("POST {endpoint}: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            warn!(%status, "completion service rejected the request");
            return Err(AppError::completion(
                format!("completion service responded with {status}"),
                body,
            ));
        }

        let payload: ChatCompletionResponse = response.json().await.map_err(|err| {
            AppError::completion(
                "failed to parse the completion service response",
                err.to_string(),
            )
        })?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AppError::completion(
                    "completion service returned no content",
                    "the response carried no choices or an empty message",
                )
            })?;

        debug!(chars = content.chars().count(), "received chat completion");
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    n: u8,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
