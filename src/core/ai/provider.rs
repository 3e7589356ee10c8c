use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;

/// 错误详情最多保留的字符数
const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// 语言模型调用失败的类别
///
/// 网关从不向调用方抛出异常，所有失败都以该类型作为数据返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("⚠️ Не настроен ключ доступа к языковой модели")]
    NotConfigured,

    #[error("⚠️ Проблема с авторизацией")]
    Unauthorized,

    #[error("⚠️ Доступ запрещен")]
    AccessDenied,

    #[error("⚠️ Превышен лимит запросов")]
    RateLimited,

    #[error("⚠️ Неожиданный формат ответа")]
    UnexpectedResponse,

    #[error("⚠️ Ошибка: {0}")]
    Other(String),
}

impl GatewayError {
    /// 根据底层错误文本判断失败类别
    pub fn classify(error_text: &str) -> Self {
        let lower = error_text.to_lowercase();

        if lower.contains("credentials") || error_text.contains("401") {
            GatewayError::Unauthorized
        } else if error_text.contains("403") {
            GatewayError::AccessDenied
        } else if lower.contains("rate") || error_text.contains("429") {
            GatewayError::RateLimited
        } else {
            GatewayError::Other(error_text.chars().take(MAX_ERROR_DETAIL_CHARS).collect())
        }
    }

    /// 是否由缺少凭据引起
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::NotConfigured)
    }
}

/// 聊天补全服务接口
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// 提供商名称
    fn name(&self) -> &str;

    /// 提交提示词并返回模型回复
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// 从聊天服务的 JSON 回复中取出文本
///
/// 依次尝试 `choices[0].message.content`、`content`、`text`。
pub fn extract_reply_text(body: &serde_json::Value) -> Option<String> {
    let from_choices = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str());

    from_choices
        .or_else(|| body.get("content").and_then(|v| v.as_str()))
        .or_else(|| body.get("text").and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// 网关工厂
pub struct GatewayFactory;

impl GatewayFactory {
    /// 根据配置创建网关
    pub fn create(config: &Config) -> anyhow::Result<Box<dyn ChatGateway>> {
        use crate::core::ai::providers::{GigaChatGateway, OpenAICompatibleGateway};

        match config.provider.to_lowercase().as_str() {
            "gigachat" => Ok(Box::new(GigaChatGateway::new(config.into())?)),
            "openai" => Ok(Box::new(OpenAICompatibleGateway::new(config.into())?)),
            _ => anyhow::bail!(
                "Unknown AI provider: {} (supported: {})",
                config.provider,
                Self::list_providers().join(", ")
            ),
        }
    }

    /// 获取所有支持的提供商列表
    pub fn list_providers() -> Vec<&'static str> {
        vec!["gigachat", "openai"]
    }
}
