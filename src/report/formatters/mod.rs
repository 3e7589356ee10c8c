pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

use crate::report::Protocol;
use anyhow::Result;

/// 报告格式化器 trait
pub trait ReportFormatter: Send + Sync {
    /// 格式化报告
    fn format(&self, protocol: &Protocol) -> Result<String>;

    /// 获取支持的文件扩展名
    fn file_extension(&self) -> &str;
}
