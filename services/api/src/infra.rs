use applyflow::error::AppError;
use applyflow::workflows::sla::{NotifyError, SlaAlert, SlaNotifier, TierTable};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Notifier that records alerts in the service log until a delivery channel is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingNotifier;

impl SlaNotifier for LoggingNotifier {
    fn notify(&self, alert: SlaAlert) -> Result<(), NotifyError> {
        info!(
            template = %alert.template,
            user = %alert.user_id,
            details = ?alert.details,
            "sla notification"
        );
        Ok(())
    }
}

/// The CSV override when one is configured, otherwise the standard table.
pub(crate) fn load_tier_table(path: Option<&Path>) -> Result<TierTable, AppError> {
    match path {
        Some(path) => {
            let table = TierTable::from_path(path)?;
            info!(path = %path.display(), "loaded tier table override");
            Ok(table)
        }
        None => Ok(TierTable::standard()),
    }
}
