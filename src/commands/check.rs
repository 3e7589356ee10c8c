use crate::core::ai::{ChatGateway, GatewayError};

/// 自检使用的提示词
pub const CHECK_PROMPT: &str = "Ответь коротко: работаешь?";

/// 回复预览的最大字符数
const PREVIEW_CHARS: usize = 50;

/// 发送一条简短请求，确认模型服务可用
pub async fn check_connection(gateway: &dyn ChatGateway) -> Result<String, GatewayError> {
    let reply = gateway.complete(CHECK_PROMPT).await?;
    Ok(reply.chars().take(PREVIEW_CHARS).collect())
}
