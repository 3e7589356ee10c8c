use std::sync::Arc;

use crate::core::ai::{ChatGateway, GatewayError};

/// 回复中供应商版本的段落标记
pub const REVISION_MARKER: &str = "SUPPLIER_REVISION:";
/// 回复中评论的段落标记
pub const COMMENTS_MARKER: &str = "COMMENTS:";
/// 模型偶尔改用的俄文段落标记
const REVISION_ALIASES: &[&str] = &[REVISION_MARKER, "РЕДАКЦИЯ_ПОСТАВЩИКА:"];
const COMMENTS_ALIASES: &[&str] = &[COMMENTS_MARKER, "КОММЕНТАРИИ:"];
/// 条款无需修改时模型应原样输出的短语
pub const ACCEPTANCE_PHRASE: &str = "Редакция Покупателя приемлема";

/// 单个条款的分析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseAnalysis {
    /// 供应商版本；模型未按格式回复时为空
    pub revision: String,
    pub comment: String,
}

/// 构建单个条款的提示词
pub fn build_prompt(clause_text: &str, clause_number: usize) -> String {
    format!(
        r#"Ты - опытный российский юрист, защищающий интересы ПОСТАВЩИКА.
Отвечай детально и конкретно, только на русском языке.

Проанализируй пункт договора с позиции ПОСТАВЩИКА.

ПУНКТ {clause_number}:
{clause_text}

ВАЖНО: Ответь СТРОГО в следующем формате:

{revision_marker}
[Напиши ПОЛНЫЙ исправленный текст пункта, защищающий интересы Поставщика.
Используй конкретные цифры: неустойка 0,05-0,1% в день, максимум 5-10% от суммы обязательства,
сроки уведомления и устранения недостатков 5-10 рабочих дней,
общий лимит ответственности 30% от суммы договора.
Если исправить невозможно или пункт корректный, напиши: "{acceptance}"]

{comments_marker}
[Напиши рекомендации для Поставщика:
- В чем риск для Поставщика?
- Почему предложена такая редакция?
- Что важно согласовать дополнительно?
Если редакция приемлема, напиши почему она защищает интересы Поставщика]

Отвечай БЕЗ лишнего текста, строго по формату выше."#,
        clause_number = clause_number,
        clause_text = clause_text,
        revision_marker = REVISION_MARKER,
        comments_marker = COMMENTS_MARKER,
        acceptance = ACCEPTANCE_PHRASE,
    )
}

/// 解析模型回复
///
/// 在第一个评论标记处切分：之前去掉版本标记作为版本，之后作为评论。
/// 缺少版本标记时整段回复作为评论，版本留空。
pub fn parse_reply(reply: &str) -> ClauseAnalysis {
    if !REVISION_ALIASES.iter().any(|m| reply.contains(m)) {
        return ClauseAnalysis {
            revision: String::new(),
            comment: reply.to_string(),
        };
    }

    let split = COMMENTS_ALIASES
        .iter()
        .filter_map(|m| reply.find(m).map(|pos| (pos, m.len())))
        .min_by_key(|(pos, _)| *pos);
    let (head, comment) = match split {
        Some((pos, len)) => (&reply[..pos], reply[pos + len..].trim().to_string()),
        None => (reply, String::new()),
    };

    let revision = REVISION_ALIASES
        .iter()
        .fold(head.to_string(), |text, marker| text.replace(marker, ""))
        .trim()
        .to_string();

    ClauseAnalysis { revision, comment }
}

/// 是否为接受原文的版本
pub fn is_acceptance(revision: &str) -> bool {
    let lower = revision.to_lowercase();
    lower.contains("приемлема") || lower.contains("принимается")
}

/// 条款分析器：构建提示词、调用网关并解析回复
#[derive(Clone)]
pub struct ClauseAnalyzer {
    gateway: Arc<dyn ChatGateway>,
}

impl ClauseAnalyzer {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self { gateway }
    }

    /// 分析一个条款；网关失败时原样返回错误，由调用方丢弃该条款
    pub async fn analyze(&self, clause_text: &str, clause_number: usize) -> Result<ClauseAnalysis, GatewayError> {
        let prompt = build_prompt(clause_text, clause_number);
        let reply = self.gateway.complete(&prompt).await?;
        Ok(parse_reply(&reply))
    }
}
