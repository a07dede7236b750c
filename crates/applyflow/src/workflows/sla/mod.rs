//! Interview-guarantee periods, application quotas, and their background sweeps.
//!
//! [`SlaService`] owns the state machines; [`SlaScheduler`] drives the hourly
//! reconciliation and six-hourly risk sweeps; [`sla_router`] exposes both
//! over HTTP.

pub mod domain;
mod limits;
mod locks;
pub mod memory;
mod progress;
pub mod repository;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod tiers;
pub mod verifier;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationAllowance, ApplicationCounters, InterviewSubmission, InterviewVerification,
    RiskLevel, SlaPeriod, SlaPeriodId, SlaProgress, SlaStatus, SubscriptionTier, UserId,
    VerificationId, VerificationStatus, VerificationType,
};
pub use limits::{DAILY_LIMIT_REACHED, WEEKLY_LIMIT_REACHED};
pub use locks::UserLocks;
pub use memory::InMemorySlaRepository;
pub use repository::{
    templates, NotifyError, RepositoryError, SlaAlert, SlaNotifier, SlaRepository,
};
pub use router::sla_router;
pub use scheduler::SlaScheduler;
pub use service::{
    ReconciliationReport, RiskEscalation, RiskSweepReport, SlaError, SlaOptions, SlaService,
    SweepFailure,
};
pub use tiers::{TierGuarantee, TierTable, TierTableError};
pub use verifier::{AutoVerification, InterviewVerifier, ManualReviewOnly, VerifierError};
