use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::repository::{SlaNotifier, SlaRepository};
use super::service::SlaService;
use super::verifier::InterviewVerifier;

/// Background driver for the reconciliation and risk sweeps.
///
/// Sweeps call the synchronous repository, so each one runs on the blocking pool.
pub struct SlaScheduler<R, N, V> {
    service: Arc<SlaService<R, N, V>>,
    reconcile_interval: Duration,
    risk_interval: Duration,
    cancel: CancellationToken,
}

impl<R, N, V> SlaScheduler<R, N, V>
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    pub fn new(
        service: Arc<SlaService<R, N, V>>,
        reconcile_interval: Duration,
        risk_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            service,
            reconcile_interval,
            risk_interval,
            cancel,
        }
    }

    /// Run both sweeps until the token is cancelled. The first ticks fire immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut reconcile = tokio::time::interval(self.reconcile_interval);
        reconcile.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut risk = tokio::time::interval(self.risk_interval);
        risk.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            reconcile_secs = self.reconcile_interval.as_secs(),
            risk_secs = self.risk_interval.as_secs(),
            "sla scheduler started"
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("sla scheduler shutting down");
                    break;
                }
                _ = reconcile.tick() => {
                    let service = Arc::clone(&self.service);
                    match tokio::task::spawn_blocking(move || service.run_reconciliation()).await {
                        Ok(Ok(_)) => {}
                        Ok(Err(err)) => error!(error = %err, "reconciliation sweep aborted"),
                        Err(err) => error!(error = %err, "reconciliation sweep panicked"),
                    }
                }
                _ = risk.tick() => {
                    let service = Arc::clone(&self.service);
                    match tokio::task::spawn_blocking(move || service.run_risk_sweep()).await {
                        Ok(Ok(_)) => {}
                        Ok(Err(err)) => error!(error = %err, "risk sweep aborted"),
                        Err(err) => error!(error = %err, "risk sweep panicked"),
                    }
                }
            }
        }
    }
}
