/// 流水线行为测试：使用脚本化网关代替真实模型服务
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ai_protocol::analysis::{ClauseAnalyzer, ContractPipeline, RiskClassifier};
use ai_protocol::core::ai::{ChatGateway, GatewayError};
use ai_protocol::models::RiskLevel;

const WELL_FORMED_REPLY: &str = "SUPPLIER_REVISION:\nРедакция Поставщика\nCOMMENTS:\nКомментарий юриста";

/// 按顺序返回预设回复的网关，预设用完后重复最后一个
struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    fallback: Result<String, GatewayError>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    fn always(reply: Result<String, GatewayError>) -> Arc<Self> {
        Self::scripted(Vec::new(), reply)
    }

    fn scripted(replies: Vec<Result<String, GatewayError>>, fallback: Result<String, GatewayError>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            fallback,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn pipeline_with(gateway: Arc<ScriptedGateway>) -> ContractPipeline {
    ContractPipeline::new(RiskClassifier::new(), ClauseAnalyzer::new(gateway))
}

/// 生成一条足够长的高风险条款
fn high_risk_line(index: usize) -> String {
    format!(
        "{}. За нарушение сроков поставки Поставщик уплачивает штраф в размере пяти процентов от стоимости",
        index
    )
}

#[tokio::test]
async fn test_single_high_risk_line_yields_one_record() {
    let gateway = ScriptedGateway::always(Ok(WELL_FORMED_REPLY.to_string()));
    let pipeline = pipeline_with(gateway.clone());

    let line = "Поставщик обязан уплатить штраф за каждый день просрочки исполнения обязательства";
    assert!(line.chars().count() > 50);

    let records = pipeline.run(line).await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.number, 1);
    assert_eq!(record.source_line, 1);
    assert_eq!(record.risk, RiskLevel::High);
    assert_eq!(record.original_text, line);
    assert_eq!(record.revision_text, "Редакция Поставщика");
    assert_eq!(record.comment_text, "Комментарий юриста");
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_stops_after_ten_accepted_clauses() {
    let gateway = ScriptedGateway::always(Ok(WELL_FORMED_REPLY.to_string()));
    let pipeline = pipeline_with(gateway.clone());

    let text: Vec<String> = (1..=15).map(high_risk_line).collect();
    let records = pipeline.run(&text.join("\n")).await;

    assert_eq!(records.len(), 10);
    assert_eq!(gateway.calls(), 10);

    // 第 11-15 行从未被发送
    let prompts = gateway.prompts.lock().unwrap();
    for index in 11..=15 {
        let marker = format!("{}. За нарушение", index);
        assert!(prompts.iter().all(|p| !p.contains(&marker)));
    }
}

#[tokio::test]
async fn test_numbers_are_dense_and_lines_ascending() {
    // 第 2、4 个候选失败，不占用序号
    let gateway = ScriptedGateway::scripted(
        vec![
            Ok(WELL_FORMED_REPLY.to_string()),
            Err(GatewayError::RateLimited),
            Ok(WELL_FORMED_REPLY.to_string()),
            Err(GatewayError::Other("timeout".to_string())),
        ],
        Ok(WELL_FORMED_REPLY.to_string()),
    );
    let pipeline = pipeline_with(gateway.clone());

    let mut lines = Vec::new();
    for index in 1..=14 {
        lines.push(high_risk_line(index));
        lines.push("Стороны действуют добросовестно и в соответствии с законодательством РФ".to_string());
    }
    let records = pipeline.run(&lines.join("\n")).await;

    assert_eq!(records.len(), 10);
    // 两次失败 + 十次成功
    assert_eq!(gateway.calls(), 12);

    let numbers: Vec<usize> = records.iter().map(|r| r.number).collect();
    assert_eq!(numbers, (1..=10).collect::<Vec<_>>());

    let source_lines: Vec<usize> = records.iter().map(|r| r.source_line).collect();
    assert!(source_lines.windows(2).all(|w| w[0] < w[1]));
    // 第 1 个候选在第 1 行，第 2 个（失败）在第 3 行，第 3 个在第 5 行
    assert_eq!(source_lines[0], 1);
    assert_eq!(source_lines[1], 5);
}

#[tokio::test]
async fn test_failed_candidate_does_not_consume_number() {
    let gateway = ScriptedGateway::scripted(
        vec![Err(GatewayError::Unauthorized)],
        Ok(WELL_FORMED_REPLY.to_string()),
    );
    let pipeline = pipeline_with(gateway.clone());

    let text = format!("{}\n{}", high_risk_line(1), high_risk_line(2));
    let records = pipeline.run(&text).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].number, 1);
    assert_eq!(records[0].source_line, 2);

    // 第二次调用的提示词使用序号 1
    let prompts = gateway.prompts.lock().unwrap();
    assert!(prompts[1].contains("ПУНКТ 1:"));
}

#[tokio::test]
async fn test_always_failing_gateway_yields_empty_result() {
    let gateway = ScriptedGateway::always(Err(GatewayError::NotConfigured));
    let pipeline = pipeline_with(gateway.clone());

    let text: Vec<String> = (1..=15).map(high_risk_line).collect();
    let records = pipeline.run(&text.join("\n")).await;

    assert!(records.is_empty());
    // 失败不计入上限，所有候选都被尝试
    assert_eq!(gateway.calls(), 15);
}

#[tokio::test]
async fn test_short_lines_never_reach_analyzer() {
    let gateway = ScriptedGateway::always(Ok(WELL_FORMED_REPLY.to_string()));
    let pipeline = pipeline_with(gateway.clone());

    let text = "Штраф 10%\nНеустойка взыскивается немедленно\nПредоплата 100%";
    let records = pipeline.run(text).await;

    assert!(records.is_empty());
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_unrisky_lines_are_skipped() {
    let gateway = ScriptedGateway::always(Ok(WELL_FORMED_REPLY.to_string()));
    let pipeline = pipeline_with(gateway.clone());

    let text = "Настоящий договор вступает в силу с момента его подписания обеими сторонами\n\
                Все приложения к настоящему договору являются его неотъемлемой частью";
    assert!(pipeline.run(text).await.is_empty());
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_degraded_reply_keeps_clause_with_empty_revision() {
    let gateway = ScriptedGateway::always(Ok("Модель ответила в свободной форме".to_string()));
    let pipeline = pipeline_with(gateway);

    let records = pipeline.run(&high_risk_line(1)).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].revision_text, "");
    assert_eq!(records[0].comment_text, "Модель ответила в свободной форме");
}

#[tokio::test]
async fn test_medium_risk_line_is_analyzed() {
    let gateway = ScriptedGateway::always(Ok(WELL_FORMED_REPLY.to_string()));
    let pipeline = pipeline_with(gateway);

    let line = "Покупатель вправе по своему усмотрению переносить сроки приемки поставленного товара";
    let records = pipeline.run(line).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].risk, RiskLevel::Medium);
}
