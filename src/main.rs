use anyhow::Result;
use clap::Parser;
use jetson_exporter::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let args = cli::Cli::parse();
    let app_config = config::AppConfig::load(args.config)?.with_port(args.port)?;
    tracing::info!(
        version = version::VERSION,
        backend = ?app_config.session.backend,
        temperature_presence = app_config.exporter.temperature_presence,
        "Starting {}",
        version::NAME
    );

    // A connection failure stops startup before the listener exists.
    let session = Arc::new(
        session::connect(&app_config.session)
            .map_err(|e| anyhow::anyhow!("telemetry session: {}", e))?,
    );
    let renderer = Arc::new(metrics::SnapshotRenderer::new(metrics::RenderOptions {
        temperature_presence: app_config.exporter.temperature_presence,
    }));

    let app = routes::app(renderer, session.clone(), &app_config.server.metrics_path);
    let addr = app_config.listen_addr();

    let served = async {
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(
            "Serving metrics at http://{}{}",
            addr,
            app_config.server.metrics_path
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        anyhow::Ok(())
    }
    .await;

    // Graceful shutdown has drained in-flight scrapes; error exits close here too.
    session.close();
    served
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Received shutdown signal");
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Received shutdown signal");
}
