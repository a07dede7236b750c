use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicationCounters, InterviewVerification, SlaPeriod, SlaPeriodId, UserId, VerificationId,
};

/// Storage abstraction for periods, verifications, and counters.
///
/// `save_*` calls upsert by id. Callers serialize writes per user, so
/// implementations only need per-call atomicity.
pub trait SlaRepository: Send + Sync {
    fn save_period(&self, period: SlaPeriod) -> Result<(), RepositoryError>;
    fn fetch_period(&self, id: &SlaPeriodId) -> Result<Option<SlaPeriod>, RepositoryError>;
    fn active_period(&self, user_id: &UserId) -> Result<Option<SlaPeriod>, RepositoryError>;
    fn active_periods(&self) -> Result<Vec<SlaPeriod>, RepositoryError>;

    fn save_verification(&self, verification: InterviewVerification)
        -> Result<(), RepositoryError>;
    fn fetch_verification(
        &self,
        id: &VerificationId,
    ) -> Result<Option<InterviewVerification>, RepositoryError>;
    fn pending_verifications(&self) -> Result<Vec<InterviewVerification>, RepositoryError>;

    fn fetch_counters(&self, user_id: &UserId)
        -> Result<Option<ApplicationCounters>, RepositoryError>;
    fn save_counters(&self, counters: ApplicationCounters) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (e-mail, push, apply-volume controller, ...).
pub trait SlaNotifier: Send + Sync {
    fn notify(&self, alert: SlaAlert) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaAlert {
    pub template: String,
    pub user_id: UserId,
    pub details: BTreeMap<String, String>,
}

impl SlaAlert {
    pub fn new(template: &str, user_id: &UserId) -> Self {
        Self {
            template: template.to_string(),
            user_id: user_id.clone(),
            details: BTreeMap::new(),
        }
    }

    pub fn detail(mut self, key: &str, value: impl ToString) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

pub mod templates {
    pub const PERIOD_STARTED: &str = "sla_period_started";
    pub const INTERVIEW_VERIFIED: &str = "interview_verified";
    pub const COMPLETED: &str = "sla_completed";
    pub const FAILED: &str = "sla_failed";
    pub const CREDIT_ISSUED: &str = "sla_credit_issued";
    pub const REFUND_ISSUED: &str = "sla_refund_issued";
    pub const AT_RISK: &str = "sla_at_risk";
    pub const INCREASE_APPLY_VOLUME: &str = "increase_apply_volume";
}
