use super::{ReportFormatter, TextFormatter};
use crate::models::ClauseRecord;
use crate::report::Protocol;
use anyhow::Result;
use serde::Serialize;

/// JSON 格式化器，字段与上传接口的响应一致
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    risks_found: usize,
    analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    download_path: Option<String>,
    clauses: &'a [ClauseRecord],
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, protocol: &Protocol) -> Result<String> {
        let report = JsonReport {
            success: true,
            risks_found: protocol.clauses.len(),
            analysis: TextFormatter::new().format(protocol)?,
            download_path: protocol
                .document_path
                .as_ref()
                .map(|p| p.display().to_string()),
            clauses: &protocol.clauses,
        };

        let json_string = if self.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        Ok(json_string)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
