use crate::config::Config;
use crate::core::ai::http::build_client;
use crate::core::ai::provider::{extract_reply_text, ChatGateway, GatewayError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// OpenAI 兼容 Chat Completion 请求
#[derive(Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// 单条用户消息的非流式请求
    pub fn user(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Chat 消息
#[derive(Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone)]
pub struct OpenAICompatibleConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl From<&Config> for OpenAICompatibleConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            api_url: config.openai_url.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// 任意 OpenAI 兼容接口的网关，使用 Bearer 密钥认证
pub struct OpenAICompatibleGateway {
    client: Client,
    config: OpenAICompatibleConfig,
}

impl OpenAICompatibleGateway {
    pub fn new(config: OpenAICompatibleConfig) -> anyhow::Result<Self> {
        let client = build_client(config.timeout_secs, true)?;
        Ok(Self { client, config })
    }

    async fn send_chat_request(&self, api_key: &str, prompt: &str) -> anyhow::Result<serde_json::Value> {
        let request = ChatCompletionRequest {
            temperature: Some(0.7),
            ..ChatCompletionRequest::user(&self.config.model, prompt)
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} request failed: {} - {}", self.name(), status, text);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatGateway for OpenAICompatibleGateway {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(GatewayError::NotConfigured);
        };

        let body = self.send_chat_request(api_key, prompt).await.map_err(|e| {
            let detail = format!("{:#}", e);
            tracing::error!(provider = self.name(), error = %detail, "chat request failed");
            GatewayError::classify(&detail)
        })?;

        extract_reply_text(&body).ok_or_else(|| {
            tracing::warn!(provider = self.name(), body = %body, "unexpected response shape");
            GatewayError::UnexpectedResponse
        })
    }
}
