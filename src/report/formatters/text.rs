use super::ReportFormatter;
use crate::report::Protocol;
use anyhow::Result;

const WIDTH: usize = 80;

/// 纯文本格式化器，输出在终端展示的摘要
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    /// 生成分隔线
    fn separator(&self) -> String {
        "=".repeat(WIDTH)
    }

    /// 生成子分隔线
    fn sub_separator(&self) -> String {
        "─".repeat(WIDTH)
    }

    fn generate_header(&self, protocol: &Protocol) -> String {
        let mut content = String::new();

        content.push_str(&self.separator());
        content.push('\n');
        content.push_str("ПРОТОКОЛ РАЗНОГЛАСИЙ К ДОГОВОРУ ПОСТАВКИ\n");
        content.push_str(&self.separator());
        content.push_str("\n\n");
        content.push_str(&format!("Дата: {}\n", protocol.created_at.format("%d.%m.%Y %H:%M")));
        content.push_str(&format!("Проанализировано пунктов: {}\n\n", protocol.clauses.len()));

        content
    }

    fn generate_clauses(&self, protocol: &Protocol) -> String {
        let mut content = String::new();

        for clause in &protocol.clauses {
            content.push_str(&self.sub_separator());
            content.push('\n');
            content.push_str(&format!("ПУНКТ {} (строка {})\n", clause.number, clause.source_line));
            content.push_str(&self.sub_separator());
            content.push_str("\n\n");

            content.push_str("📄 РЕДАКЦИЯ ПОКУПАТЕЛЯ:\n");
            content.push_str(&clause.original_text);
            content.push_str("\n\n");

            content.push_str("✏️ РЕДАКЦИЯ ПОСТАВЩИКА:\n");
            content.push_str(&clause.revision_text);
            content.push_str("\n\n");

            content.push_str("💬 КОММЕНТАРИИ:\n");
            content.push_str(&clause.comment_text);
            content.push_str("\n\n");
        }

        content
    }

    fn generate_footer(&self, protocol: &Protocol) -> String {
        let mut content = String::new();

        content.push_str(&self.separator());
        content.push('\n');
        content.push_str("⚖️ ПРАВОВОЕ ОБОСНОВАНИЕ\n");
        content.push_str(&self.separator());
        content.push_str("\n\n");
        content.push_str("Предложенные изменения соответствуют:\n");
        content.push_str("• ГК РФ статьи 330-333 (неустойка)\n");
        content.push_str("• ГК РФ статьи 421-422 (свобода договора)\n");
        content.push_str("• ГК РФ статьи 450-453 (изменение договора)\n\n");
        content.push_str("📊 СТАНДАРТНЫЕ ПАРАМЕТРЫ:\n");
        content.push_str("• Неустойка: 0,05-0,1% в день, макс 5-10%\n");
        content.push_str("• Сроки уведомлений: 3-5 рабочих дней\n");
        content.push_str("• Сроки устранения: 5-10 рабочих дней\n");
        content.push_str("• Лимит ответственности: 30% от договора\n\n");
        content.push_str(&format!("Анализ выполнен: {}\n", protocol.provider));
        content.push_str(&self.separator());
        content.push('\n');

        content
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, protocol: &Protocol) -> Result<String> {
        let mut content = String::new();
        content.push_str(&self.generate_header(protocol));
        content.push_str(&self.generate_clauses(protocol));
        content.push_str(&self.generate_footer(protocol));
        Ok(content)
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}
