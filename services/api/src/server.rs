use crate::cli::ServeArgs;
use crate::infra::{load_tier_table, AppState, LoggingNotifier};
use crate::routes::with_service_routes;
use applyflow::clock::{Clock, SystemClock};
use applyflow::config::AppConfig;
use applyflow::error::AppError;
use applyflow::telemetry;
use applyflow::workflows::autofill::FieldValidator;
use applyflow::workflows::sla::{
    InMemorySlaRepository, ManualReviewOnly, SlaOptions, SlaScheduler, SlaService,
};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let tiers = load_tier_table(config.sla.tier_table_path.as_deref())?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sla_service = Arc::new(SlaService::new(
        Arc::new(InMemorySlaRepository::new()),
        Arc::new(LoggingNotifier),
        Arc::new(ManualReviewOnly),
        clock.clone(),
        SlaOptions::from_config(&config.sla, tiers),
    ));
    let validator = Arc::new(FieldValidator::new(clock));

    let cancel = CancellationToken::new();
    let scheduler = SlaScheduler::new(
        sla_service.clone(),
        config.sla.reconcile_interval,
        config.sla.risk_interval,
        cancel.clone(),
    )
    .spawn();

    let app = with_service_routes(validator, sla_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "applyflow service ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    readiness_flag.store(false, Ordering::Release);
    cancel.cancel();
    if let Err(err) = scheduler.await {
        warn!(error = %err, "sla scheduler did not stop cleanly");
    }
    info!("applyflow service stopped");
    Ok(())
}

/// Resolves on Ctrl+C, SIGTERM, or cancellation of `cancel`, then cancels it.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
        _ = cancel.cancelled() => info!("shutdown requested"),
    }
    cancel.cancel();
}
