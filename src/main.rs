use anyhow::Result;
use homeserver_status::*;
use std::sync::Arc;
use tokio::time::Duration;
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

    let app_config = config::AppConfig::load()?;
    tracing::info!(service = version::NAME, version = version::VERSION, "starting");

    let widget_surface = Arc::new(surface::WidgetSurface::new(
        app_config.publishing.broadcast_capacity,
    ));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let widget: Arc<dyn surface::StatusSurface> = widget_surface.clone();
    let poller_handle = match poller::StatusPoller::new(widget, poller::PollerSettings::default())? {
        Some(status_poller) => {
            tracing::info!(endpoint = poller::STATUS_ENDPOINT, "status poller started");
            Some(status_poller.start(
                shutdown_rx,
                Duration::from_secs(app_config.monitoring.stats_log_interval_secs),
            ))
        }
        None => None,
    };

    let app = routes::app(widget_surface);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
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
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            if let Some(handle) = poller_handle {
                let _ = handle.await;
            }
        }
    }

    Ok(())
}
