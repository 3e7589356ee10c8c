use ai_protocol::cli::args::Args;
use ai_protocol::commands::route_command;
use ai_protocol::config::Config;
use ai_protocol::infrastructure::{setup_logging, LoggingConfig, ProtocolError};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::new();
    config.update_from_args(&args);

    setup_logging(LoggingConfig::for_debug(config.debug))?;
    config.validate()?;

    if config.debug {
        tracing::debug!(provider = %config.provider, model = %config.model, "configuration loaded");
    }

    if let Err(err) = route_command(&args, &config).await {
        match err.downcast_ref::<ProtocolError>() {
            Some(protocol_err) if protocol_err.is_client_error() => {
                eprintln!("❌ {}", protocol_err);
            }
            _ => {
                tracing::error!(error = %format!("{:#}", err), "analysis failed");
                eprintln!("❌ Ошибка: {}", err);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
