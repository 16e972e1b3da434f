use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use compliance_desk::config::AppConfig;
use compliance_desk::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // Stderr always; a daily-rolling file too when a log dir is configured.
    // The guard must live until shutdown so buffered lines are flushed.
    let (file_layer, _log_guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "compliance-desk.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    eprintln!("📋 Compliance Desk v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Pages:  http://0.0.0.0:{}/", config.port);
    eprintln!("   API:    http://0.0.0.0:{}/api/resolve?path=/client/home", config.port);
    eprintln!("   Toasts: ws://0.0.0.0:{}/ws/notifications", config.port);
    eprintln!(
        "   Mock completion: {} ms{}",
        config.completion_delay.as_millis(),
        if config.fail_completions { " (failing)" } else { "" }
    );
    if let Some(dir) = &config.log_dir {
        eprintln!("   Logs:   {}", dir.display());
    }

    server::serve(&config)
        .await
        .with_context(|| format!("Server on port {} failed", config.port))?;

    Ok(())
}
