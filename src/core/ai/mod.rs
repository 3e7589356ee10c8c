pub mod http;
pub mod provider;
pub mod providers;

pub use provider::{extract_reply_text, ChatGateway, GatewayError, GatewayFactory};
