pub mod analyze;
pub mod check;

pub use analyze::*;
pub use check::*;

use std::path::Path;

use crate::cli::args::Args;
use crate::config::Config;
use crate::core::ai::GatewayFactory;
use crate::report::{JsonFormatter, ReportFormatter};

/// 命令路由器，根据参数决定执行哪个命令
pub async fn route_command(args: &Args, config: &Config) -> anyhow::Result<()> {
    // 连接自检
    if args.check {
        return handle_check(config).await;
    }

    let path = args
        .file
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Contract file is required"))?;

    if !matches!(args.format.as_str(), "text" | "json") {
        anyhow::bail!("Unsupported report format: {}", args.format);
    }

    let service = ProtocolService::from_config(config)?;

    if args.scan_only {
        return handle_scan(&service, path);
    }

    handle_analyze(&service, path, &args.format).await
}

async fn handle_check(config: &Config) -> anyhow::Result<()> {
    let gateway = GatewayFactory::create(config)?;
    println!("🧪 Тест подключения к {}...", gateway.name());

    match check_connection(gateway.as_ref()).await {
        Ok(preview) => {
            println!("✅ Тест прошел! {}...", preview);
            Ok(())
        }
        Err(err) if err.is_configuration() => {
            anyhow::bail!("Тест не прошел: {} (задайте GIGACHAT_CLIENT_SECRET или AI_PROTOCOL_OPENAI_API_KEY)", err)
        }
        Err(err) => anyhow::bail!("Тест не прошел: {}", err),
    }
}

fn handle_scan(service: &ProtocolService, path: &Path) -> anyhow::Result<()> {
    let candidates = service.scan_file(path)?;

    if candidates.is_empty() {
        println!("Не найдено проблемных пунктов для анализа");
        return Ok(());
    }

    println!("🔍 Найдено пунктов с риском: {}", candidates.len());
    for candidate in &candidates {
        println!(
            "  строка {:>4} [{}] {}",
            candidate.line_number, candidate.risk, candidate.text
        );
    }
    Ok(())
}

async fn handle_analyze(service: &ProtocolService, path: &Path, format: &str) -> anyhow::Result<()> {
    match service.process_file(path).await? {
        ProtocolOutcome::NoRiskyClauses => {
            println!("Не найдено проблемных пунктов для анализа");
        }
        ProtocolOutcome::Completed(artifacts) => {
            if format == "json" {
                println!("{}", JsonFormatter::new().format(&artifacts.protocol)?);
            } else {
                println!("{}", artifacts.report);
                println!("✅ Протокол разногласий сохранен: {}", artifacts.document_path.display());
            }
        }
    }
    Ok(())
}
