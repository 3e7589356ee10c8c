pub mod gigachat;
pub mod openai_compat;

pub use gigachat::{GigaChatConfig, GigaChatGateway};
pub use openai_compat::{OpenAICompatibleConfig, OpenAICompatibleGateway};
