use super::ReportFormatter;
use crate::analysis::clause::is_acceptance;
use crate::report::Protocol;
use anyhow::Result;
use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde::Serialize;

const PROTOCOL_TEMPLATE: &str = include_str!("../templates/protocol.md.hbs");
const TEMPLATE_NAME: &str = "protocol";

/// 表格单元格转义：竖线转义，换行改为 `<br>`
fn escape_cell(text: &str) -> String {
    text.trim()
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

handlebars_helper!(cell: |text: str| escape_cell(text));

#[derive(Serialize)]
struct ProtocolView<'a> {
    date: String,
    provider: &'a str,
    clauses: Vec<ClauseView<'a>>,
}

#[derive(Serialize)]
struct ClauseView<'a> {
    number: usize,
    original: &'a str,
    revision: &'a str,
    comment: &'a str,
    accepted: bool,
}

/// 协议文档格式化器（Markdown，基于 handlebars 模板）
pub struct MarkdownFormatter {
    registry: Handlebars<'static>,
}

impl MarkdownFormatter {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("cell", Box::new(cell));
        registry.register_template_string(TEMPLATE_NAME, PROTOCOL_TEMPLATE)?;
        Ok(Self { registry })
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, protocol: &Protocol) -> Result<String> {
        let view = ProtocolView {
            date: protocol.created_at.format("%d.%m.%Y").to_string(),
            provider: &protocol.provider,
            clauses: protocol
                .clauses
                .iter()
                // 模板的 `#if` 只看是否为空串，先去掉空白
                .map(|clause| ClauseView {
                    number: clause.number,
                    original: clause.original_text.trim(),
                    revision: clause.revision_text.trim(),
                    comment: clause.comment_text.trim(),
                    accepted: is_acceptance(&clause.revision_text),
                })
                .collect(),
        };

        Ok(self.registry.render(TEMPLATE_NAME, &view)?)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}
