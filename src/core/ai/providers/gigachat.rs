use crate::config::Config;
use crate::core::ai::http::build_client;
use crate::core::ai::provider::{extract_reply_text, ChatGateway, GatewayError};
use crate::core::ai::providers::openai_compat::ChatCompletionRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct GigaChatConfig {
    /// Basic 授权密钥，缺失时网关始终返回未配置
    pub authorization_key: Option<String>,
    pub scope: String,
    pub auth_url: String,
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub verify_ssl: bool,
}

impl From<&Config> for GigaChatConfig {
    fn from(config: &Config) -> Self {
        Self {
            authorization_key: config.gigachat_authorization_key(),
            scope: config.gigachat_scope.clone(),
            auth_url: config.gigachat_auth_url.clone(),
            api_url: config.gigachat_api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            verify_ssl: config.gigachat_verify_ssl,
        }
    }
}

/// OAuth 令牌响应
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// GigaChat 网关
///
/// 每次调用都会打开一个新的会话：先用授权密钥换取访问令牌，
/// 再发送聊天请求。会话在调用结束时释放，无论成功与否。
pub struct GigaChatGateway {
    client: Client,
    config: GigaChatConfig,
}

impl GigaChatGateway {
    pub fn new(config: GigaChatConfig) -> anyhow::Result<Self> {
        let client = build_client(config.timeout_secs, config.verify_ssl)?;
        let gateway = Self { client, config };
        if !gateway.is_configured() {
            warn!("GigaChat authorization key is not set, every request will be skipped");
        }
        Ok(gateway)
    }

    pub fn is_configured(&self) -> bool {
        self.config.authorization_key.is_some()
    }

    /// 获取访问令牌并打开会话
    async fn open_session(&self, authorization_key: &str) -> anyhow::Result<GigaChatSession<'_>> {
        let request_id = Uuid::new_v4();

        let response = self
            .client
            .post(&self.config.auth_url)
            .header("Authorization", format!("Basic {}", authorization_key))
            .header("RqUID", request_id.to_string())
            .header("Accept", "application/json")
            .form(&[("scope", self.config.scope.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("GigaChat token request failed: {} - {}", status, text);
        }

        let token: TokenResponse = response.json().await?;
        debug!(session = %request_id, "GigaChat session opened");

        Ok(GigaChatSession {
            client: &self.client,
            config: &self.config,
            access_token: token.access_token,
            id: request_id,
        })
    }

    async fn exchange(&self, authorization_key: &str, prompt: &str) -> anyhow::Result<serde_json::Value> {
        let session = self.open_session(authorization_key).await?;
        session.chat(prompt).await
    }
}

/// 持有访问令牌的会话，离开作用域即释放
struct GigaChatSession<'a> {
    client: &'a Client,
    config: &'a GigaChatConfig,
    access_token: String,
    id: Uuid,
}

impl GigaChatSession<'_> {
    async fn chat(&self, prompt: &str) -> anyhow::Result<serde_json::Value> {
        let url = format!("{}/chat/completions", self.config.api_url);
        let request = ChatCompletionRequest::user(&self.config.model, prompt);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("GigaChat request failed: {} - {}", status, text);
        }

        Ok(response.json().await?)
    }
}

impl Drop for GigaChatSession<'_> {
    fn drop(&mut self) {
        debug!(session = %self.id, "GigaChat session released");
    }
}

#[async_trait]
impl ChatGateway for GigaChatGateway {
    fn name(&self) -> &str {
        "GigaChat"
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let Some(authorization_key) = self.config.authorization_key.as_deref() else {
            return Err(GatewayError::NotConfigured);
        };

        let body = self.exchange(authorization_key, prompt).await.map_err(|e| {
            let detail = format!("{:#}", e);
            error!(provider = self.name(), error = %detail, "chat request failed");
            GatewayError::classify(&detail)
        })?;

        extract_reply_text(&body).ok_or_else(|| {
            warn!(provider = self.name(), body = %body, "unexpected response shape");
            GatewayError::UnexpectedResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(key: Option<&str>) -> GigaChatConfig {
        GigaChatConfig {
            authorization_key: key.map(str::to_string),
            scope: "GIGACHAT_API_PERS".to_string(),
            auth_url: "http://127.0.0.1:9/oauth".to_string(),
            api_url: "http://127.0.0.1:9/api/v1".to_string(),
            model: "GigaChat".to_string(),
            timeout_secs: 1,
            verify_ssl: false,
        }
    }

    #[test]
    fn test_config_from_app_config() {
        let mut config = Config::default();
        config.gigachat_api_url = "https://example.test/api/v1/".to_string();
        config.gigachat_credentials = Some("key".to_string());

        let giga: GigaChatConfig = (&config).into();
        assert_eq!(giga.api_url, "https://example.test/api/v1");
        assert_eq!(giga.authorization_key, Some("key".to_string()));
        assert!(!giga.verify_ssl);
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_short_circuits() {
        let gateway = GigaChatGateway::new(test_config(None)).unwrap();
        assert!(!gateway.is_configured());
        assert_eq!(gateway.complete("привет").await, Err(GatewayError::NotConfigured));
    }
}
