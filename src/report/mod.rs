pub mod formatters;
pub mod generator;

pub use formatters::{JsonFormatter, MarkdownFormatter, ReportFormatter, TextFormatter};
pub use generator::ProtocolGenerator;

use chrono::{DateTime, Local};
use std::path::PathBuf;

use crate::models::ClauseRecord;

/// 协议（分歧记录）的渲染输入
#[derive(Debug, Clone)]
pub struct Protocol {
    pub clauses: Vec<ClauseRecord>,
    pub created_at: DateTime<Local>,
    /// 使用的模型服务名称，写入页脚
    pub provider: String,
    /// 已保存的协议文件
    pub document_path: Option<PathBuf>,
}

impl Protocol {
    pub fn new(clauses: Vec<ClauseRecord>, provider: impl Into<String>) -> Self {
        Self {
            clauses,
            created_at: Local::now(),
            provider: provider.into(),
            document_path: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Local>) -> Self {
        self.created_at = created_at;
        self
    }
}
