use crate::report::formatters::{MarkdownFormatter, ReportFormatter};
use crate::report::Protocol;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 协议文件名前缀
const FILE_PREFIX: &str = "Протокол_разногласий";

/// 协议文档生成器，负责渲染并保存到输出目录
pub struct ProtocolGenerator {
    output_dir: PathBuf,
    formatter: MarkdownFormatter,
}

impl ProtocolGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            output_dir: output_dir.into(),
            formatter: MarkdownFormatter::new()?,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 带时间戳的文件名
    pub fn file_name(&self, protocol: &Protocol) -> String {
        format!(
            "{}_{}.{}",
            FILE_PREFIX,
            protocol.created_at.format("%Y%m%d_%H%M%S"),
            self.formatter.file_extension()
        )
    }

    /// 渲染并写入文件，返回文件路径
    pub async fn save(&self, protocol: &Protocol) -> Result<PathBuf> {
        let content = self.formatter.format(protocol)?;

        fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create output directory: {:?}", self.output_dir))?;

        let output_path = self.output_dir.join(self.file_name(protocol));
        fs::write(&output_path, &content)
            .await
            .with_context(|| format!("Failed to write protocol to: {:?}", output_path))?;

        tracing::info!(path = %output_path.display(), clauses = protocol.clauses.len(), "protocol saved");
        Ok(output_path)
    }
}
