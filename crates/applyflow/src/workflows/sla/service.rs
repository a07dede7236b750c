use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{SlaConfig, MAX_VERIFICATION_EXPIRY_DAYS};

use super::domain::{
    ApplicationAllowance, ApplicationCounters, InterviewSubmission, InterviewVerification,
    RiskLevel, SlaPeriod, SlaPeriodId, SlaProgress, SlaStatus, SubscriptionTier, UserId,
    VerificationId, VerificationStatus,
};
use super::limits::{allowance, record_application, roll_counters};
use super::locks::UserLocks;
use super::progress::{compute_progress, DailyUsage};
use super::repository::{templates, RepositoryError, SlaAlert, SlaNotifier, SlaRepository};
use super::tiers::TierTable;
use super::verifier::{AutoVerification, InterviewVerifier};

const AUTO_VERIFIER_ID: &str = "auto-verifier";

/// Tunables for the engine; usually derived from [`SlaConfig`].
#[derive(Debug, Clone)]
pub struct SlaOptions {
    pub tiers: TierTable,
    pub verification_expiry: Duration,
    pub auto_credit: bool,
}

impl Default for SlaOptions {
    fn default() -> Self {
        Self::from_config(&SlaConfig::default(), TierTable::standard())
    }
}

impl SlaOptions {
    pub fn from_config(config: &SlaConfig, tiers: TierTable) -> Self {
        Self {
            tiers,
            verification_expiry: Duration::days(
                config
                    .verification_expiry_days
                    .clamp(1, MAX_VERIFICATION_EXPIRY_DAYS as i64),
            ),
            auto_credit: config.auto_credit,
        }
    }
}

/// Guarantee periods, application quotas, and interview verification.
///
/// Every mutation for a user runs under that user's entry in [`UserLocks`],
/// so request calls and background sweeps never interleave on the same
/// period or counters.
pub struct SlaService<R, N, V> {
    repository: Arc<R>,
    notifier: Arc<N>,
    verifier: Arc<V>,
    clock: Arc<dyn Clock>,
    options: SlaOptions,
    locks: UserLocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settlement {
    Credit,
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodClosure {
    Succeeded,
    Failed,
    Credited,
}

/// Outcome of one reconciliation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub examined: usize,
    pub completed: Vec<SlaPeriodId>,
    pub failed: Vec<SlaPeriodId>,
    pub credited: Vec<SlaPeriodId>,
    pub expired_verifications: Vec<VerificationId>,
    pub failures: Vec<SweepFailure>,
}

/// Outcome of one risk sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskSweepReport {
    pub examined: usize,
    pub escalations: Vec<RiskEscalation>,
    pub failures: Vec<SweepFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskEscalation {
    pub user_id: UserId,
    pub period_id: SlaPeriodId,
    pub risk_level: RiskLevel,
    pub expected_interviews: u32,
    pub interviews_verified: u32,
    pub days_remaining: i64,
}

/// A single item a sweep could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    pub subject: String,
    pub error: String,
}

impl<R, N, V> SlaService<R, N, V>
where
    R: SlaRepository + 'static,
    N: SlaNotifier + 'static,
    V: InterviewVerifier + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        verifier: Arc<V>,
        clock: Arc<dyn Clock>,
        options: SlaOptions,
    ) -> Self {
        Self {
            repository,
            notifier,
            verifier,
            clock,
            options,
            locks: UserLocks::new(),
        }
    }

    pub fn tiers(&self) -> &TierTable {
        &self.options.tiers
    }

    /// Open a new ACTIVE period, superseding any period already active for the user.
    pub fn start_sla_period(
        &self,
        user_id: &UserId,
        tier: SubscriptionTier,
    ) -> Result<SlaPeriod, SlaError> {
        self.locks.with_user(user_id, || {
            let now = self.clock.now();

            if let Some(mut previous) = self.repository.active_period(user_id)? {
                info!(user = %user_id, period = %previous.id, "superseding active guarantee period");
                previous.close(SlaStatus::Superseded, now);
                self.repository.save_period(previous)?;
            }

            let guarantee = self.options.tiers.guarantee(tier);
            let period = SlaPeriod {
                id: next_period_id(),
                user_id: user_id.clone(),
                tier,
                start_date: now,
                end_date: now + Duration::days(i64::from(guarantee.guarantee_days)),
                interviews_required: guarantee.interviews_required,
                interviews_verified: 0,
                status: SlaStatus::Active,
                disqualification_reason: None,
                credit_amount_cents: None,
                refund_amount_cents: None,
                completed_at: None,
            };
            self.repository.save_period(period.clone())?;

            info!(
                user = %user_id,
                period = %period.id,
                tier = %tier,
                end_date = %period.end_date,
                "started guarantee period"
            );
            self.publish(
                SlaAlert::new(templates::PERIOD_STARTED, user_id)
                    .detail("period_id", &period.id)
                    .detail("tier", tier)
                    .detail("interviews_required", period.interviews_required)
                    .detail("end_date", period.end_date.to_rfc3339()),
            );

            Ok(period)
        })
    }

    /// Pace of the user's ACTIVE period, or `None` without one.
    pub fn get_sla_progress(&self, user_id: &UserId) -> Result<Option<SlaProgress>, SlaError> {
        let now = self.clock.now();
        let Some(period) = self.repository.active_period(user_id)? else {
            return Ok(None);
        };
        let usage = self.daily_usage(&period, now)?;
        Ok(Some(compute_progress(&period, usage, now)))
    }

    /// Record interview evidence against the ACTIVE period.
    ///
    /// E-mail and calendar evidence is offered to the auto-verifier; any
    /// outcome other than a confirmation leaves the record pending.
    pub fn submit_interview_verification(
        &self,
        user_id: &UserId,
        submission: InterviewSubmission,
    ) -> Result<InterviewVerification, SlaError> {
        self.locks.with_user(user_id, || {
            let now = self.clock.now();
            let period = self
                .repository
                .active_period(user_id)?
                .ok_or_else(|| SlaError::NoActivePeriod(user_id.clone()))?;

            let verification = InterviewVerification {
                id: next_verification_id(),
                user_id: user_id.clone(),
                sla_period_id: period.id.clone(),
                job_id: submission.job_id.clone(),
                company_name: submission.company_name.clone(),
                interview_date: submission.interview_date,
                verification_type: submission.verification_type,
                evidence_hash: evidence_hash(&submission.evidence),
                status: VerificationStatus::PendingVerification,
                verified_by: None,
                notes: None,
                verified_at: None,
                submitted_at: now,
            };
            self.repository.save_verification(verification.clone())?;
            info!(
                user = %user_id,
                verification = %verification.id,
                kind = verification.verification_type.label(),
                "interview verification submitted"
            );

            if !verification.verification_type.supports_auto_verification() {
                return Ok(verification);
            }

            match self.verifier.attempt(&verification, &submission.evidence) {
                Ok(AutoVerification::Confirmed) => {
                    match self.resolve_verification(
                        verification.clone(),
                        true,
                        AUTO_VERIFIER_ID,
                        None,
                        now,
                    ) {
                        Ok(resolved) => Ok(resolved),
                        Err(error) => {
                            warn!(verification = %verification.id, %error, "auto-verification could not be applied");
                            let stored = self
                                .repository
                                .fetch_verification(&verification.id)?
                                .unwrap_or(verification);
                            Ok(stored)
                        }
                    }
                }
                Ok(AutoVerification::Inconclusive) => {
                    debug!(verification = %verification.id, "auto-verification inconclusive");
                    Ok(verification)
                }
                Err(error) => {
                    warn!(verification = %verification.id, %error, "auto-verification failed");
                    Ok(verification)
                }
            }
        })
    }

    /// Approve or reject a pending verification.
    ///
    /// Approval bumps the owning period once and completes it when the quota is met.
    pub fn verify_interview(
        &self,
        verification_id: &VerificationId,
        approved: bool,
        verifier_id: &str,
        notes: Option<String>,
    ) -> Result<InterviewVerification, SlaError> {
        let owner = self.load_verification(verification_id)?.user_id;

        self.locks.with_user(&owner, || {
            let verification = self.load_verification(verification_id)?;
            if !verification.is_pending() {
                return Err(SlaError::VerificationAlreadyResolved {
                    id: verification.id,
                    status: verification.status,
                });
            }
            self.resolve_verification(verification, approved, verifier_id, notes, self.clock.now())
        })
    }

    pub fn check_application_limits(
        &self,
        user_id: &UserId,
        tier: SubscriptionTier,
    ) -> Result<ApplicationAllowance, SlaError> {
        self.locks.with_user(user_id, || {
            let counters = self.load_counters(user_id, self.clock.now())?;
            let verdict = allowance(&counters, self.options.tiers.guarantee(tier));
            self.repository.save_counters(counters)?;
            Ok(verdict)
        })
    }

    /// Count one submitted application. Callers gate on the limit check first.
    pub fn increment_application_count(
        &self,
        user_id: &UserId,
    ) -> Result<ApplicationCounters, SlaError> {
        self.locks.with_user(user_id, || {
            let mut counters = self.load_counters(user_id, self.clock.now())?;
            record_application(&mut counters);
            self.repository.save_counters(counters.clone())?;
            debug!(
                user = %user_id,
                daily = counters.daily_count,
                weekly = counters.weekly_count,
                "application counted"
            );
            Ok(counters)
        })
    }

    /// Check and count in one step; a denied attempt leaves the counters untouched.
    pub fn try_consume_application(
        &self,
        user_id: &UserId,
        tier: SubscriptionTier,
    ) -> Result<ApplicationAllowance, SlaError> {
        self.locks.with_user(user_id, || {
            let mut counters = self.load_counters(user_id, self.clock.now())?;
            let guarantee = self.options.tiers.guarantee(tier);
            let before = allowance(&counters, guarantee);

            if !before.can_apply {
                self.repository.save_counters(counters)?;
                info!(user = %user_id, reason = ?before.reason, "application denied by quota");
                return Ok(before);
            }

            record_application(&mut counters);
            let after = allowance(&counters, guarantee);
            self.repository.save_counters(counters)?;

            Ok(ApplicationAllowance {
                can_apply: true,
                reason: None,
                daily_remaining: after.daily_remaining,
                weekly_remaining: after.weekly_remaining,
            })
        })
    }

    /// Disqualify the ACTIVE period, if any. Without one this is a no-op.
    pub fn disqualify_from_sla(
        &self,
        user_id: &UserId,
        reason: &str,
    ) -> Result<Option<SlaPeriod>, SlaError> {
        self.locks.with_user(user_id, || {
            let Some(mut period) = self.repository.active_period(user_id)? else {
                return Ok(None);
            };

            period.disqualification_reason = Some(reason.to_string());
            period.close(SlaStatus::Disqualified, self.clock.now());
            self.repository.save_period(period.clone())?;
            warn!(user = %user_id, period = %period.id, reason, "guarantee period disqualified");

            Ok(Some(period))
        })
    }

    pub fn process_sla_credit(&self, period_id: &SlaPeriodId) -> Result<SlaPeriod, SlaError> {
        self.settle_period(period_id, Settlement::Credit)
    }

    pub fn issue_sla_refund(&self, period_id: &SlaPeriodId) -> Result<SlaPeriod, SlaError> {
        self.settle_period(period_id, Settlement::Refund)
    }

    /// Close every ACTIVE period past its end date and expire stale verifications.
    ///
    /// Per-item failures are logged and collected; only a failure to list
    /// the active periods aborts the sweep.
    pub fn run_reconciliation(&self) -> Result<ReconciliationReport, SlaError> {
        let now = self.clock.now();
        let mut report = ReconciliationReport::default();

        for period in self.repository.active_periods()? {
            report.examined += 1;
            if !period.has_expired(now) {
                continue;
            }

            let outcome = self
                .locks
                .with_user(&period.user_id, || self.close_expired_period(&period.id, now));

            match outcome {
                Ok(Some(PeriodClosure::Succeeded)) => report.completed.push(period.id),
                Ok(Some(PeriodClosure::Failed)) => report.failed.push(period.id),
                Ok(Some(PeriodClosure::Credited)) => {
                    report.failed.push(period.id.clone());
                    report.credited.push(period.id);
                }
                Ok(None) => {}
                Err(error) => {
                    error!(period = %period.id, %error, "failed to reconcile guarantee period");
                    report.failures.push(SweepFailure {
                        subject: period.id.to_string(),
                        error: error.to_string(),
                    });
                }
            }
        }

        self.expire_verifications(now, &mut report);

        info!(
            examined = report.examined,
            completed = report.completed.len(),
            failed = report.failed.len(),
            credited = report.credited.len(),
            expired_verifications = report.expired_verifications.len(),
            failures = report.failures.len(),
            "reconciliation sweep finished"
        );
        Ok(report)
    }

    /// Recompute progress for every ACTIVE period and escalate HIGH/CRITICAL risk.
    pub fn run_risk_sweep(&self) -> Result<RiskSweepReport, SlaError> {
        let now = self.clock.now();
        let mut report = RiskSweepReport::default();

        for period in self.repository.active_periods()? {
            report.examined += 1;
            let outcome = self
                .locks
                .with_user(&period.user_id, || self.assess_risk(&period.id, now));

            match outcome {
                Ok(Some(escalation)) => report.escalations.push(escalation),
                Ok(None) => {}
                Err(error) => {
                    error!(period = %period.id, %error, "failed to assess guarantee risk");
                    report.failures.push(SweepFailure {
                        subject: period.id.to_string(),
                        error: error.to_string(),
                    });
                }
            }
        }

        info!(
            examined = report.examined,
            escalations = report.escalations.len(),
            failures = report.failures.len(),
            "risk sweep finished"
        );
        Ok(report)
    }

    fn resolve_verification(
        &self,
        mut verification: InterviewVerification,
        approved: bool,
        verifier_id: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<InterviewVerification, SlaError> {
        if !approved {
            verification.status = VerificationStatus::Rejected;
            verification.verified_by = Some(verifier_id.to_string());
            verification.notes = notes;
            verification.verified_at = Some(now);
            self.repository.save_verification(verification.clone())?;
            info!(verification = %verification.id, verifier = verifier_id, "interview verification rejected");
            return Ok(verification);
        }

        let mut period = self
            .repository
            .fetch_period(&verification.sla_period_id)?
            .ok_or_else(|| SlaError::PeriodNotFound(verification.sla_period_id.clone()))?;
        if !period.is_active() {
            return Err(SlaError::PeriodNotActive {
                id: period.id,
                status: period.status,
            });
        }

        let previous = period.clone();
        period.interviews_verified = period.interviews_verified.saturating_add(1);
        let completed = period.quota_met();
        if completed {
            period.close(SlaStatus::CompletedSuccess, now);
        }
        self.repository.save_period(period.clone())?;

        // The verification stays pending until the period count is stored.
        verification.status = VerificationStatus::Verified;
        verification.verified_by = Some(verifier_id.to_string());
        verification.notes = notes;
        verification.verified_at = Some(now);
        if let Err(error) = self.repository.save_verification(verification.clone()) {
            if let Err(restore) = self.repository.save_period(previous) {
                error!(period = %period.id, error = %restore, "failed to restore period after verification write failed");
            }
            return Err(error.into());
        }

        info!(
            verification = %verification.id,
            period = %period.id,
            verified = period.interviews_verified,
            required = period.interviews_required,
            "interview verified"
        );
        self.publish(
            SlaAlert::new(templates::INTERVIEW_VERIFIED, &period.user_id)
                .detail("period_id", &period.id)
                .detail("verification_id", &verification.id)
                .detail("company_name", &verification.company_name)
                .detail("interviews_verified", period.interviews_verified)
                .detail("interviews_required", period.interviews_required),
        );
        if completed {
            self.publish(
                SlaAlert::new(templates::COMPLETED, &period.user_id)
                    .detail("period_id", &period.id)
                    .detail("tier", period.tier),
            );
        }

        Ok(verification)
    }

    fn settle_period(
        &self,
        period_id: &SlaPeriodId,
        settlement: Settlement,
    ) -> Result<SlaPeriod, SlaError> {
        let owner = self.load_period(period_id)?.user_id;
        self.locks.with_user(&owner, || {
            let period = self.load_period(period_id)?;
            self.settle(period, settlement)
        })
    }

    fn settle(&self, mut period: SlaPeriod, settlement: Settlement) -> Result<SlaPeriod, SlaError> {
        if period.status != SlaStatus::CompletedFailed {
            return Err(SlaError::InvalidPeriodState {
                id: period.id,
                expected: SlaStatus::CompletedFailed,
                actual: period.status,
            });
        }

        let guarantee = self.options.tiers.guarantee(period.tier);
        let (amount, template) = match settlement {
            Settlement::Credit => {
                let amount = guarantee.credit_amount_cents();
                period.credit_amount_cents = Some(amount);
                period.status = SlaStatus::CreditIssued;
                (amount, templates::CREDIT_ISSUED)
            }
            Settlement::Refund => {
                let amount = guarantee.monthly_cost_cents;
                period.refund_amount_cents = Some(amount);
                period.status = SlaStatus::RefundIssued;
                (amount, templates::REFUND_ISSUED)
            }
        };
        self.repository.save_period(period.clone())?;

        info!(period = %period.id, status = %period.status, amount_cents = amount, "guarantee period settled");
        self.publish(
            SlaAlert::new(template, &period.user_id)
                .detail("period_id", &period.id)
                .detail("tier", period.tier)
                .detail("amount_cents", amount),
        );

        Ok(period)
    }

    fn close_expired_period(
        &self,
        period_id: &SlaPeriodId,
        now: DateTime<Utc>,
    ) -> Result<Option<PeriodClosure>, SlaError> {
        let Some(mut period) = self.repository.fetch_period(period_id)? else {
            return Ok(None);
        };
        if !period.is_active() || !period.has_expired(now) {
            return Ok(None);
        }

        if period.quota_met() {
            period.close(SlaStatus::CompletedSuccess, now);
            self.repository.save_period(period.clone())?;
            info!(period = %period.id, "guarantee period met");
            self.publish(
                SlaAlert::new(templates::COMPLETED, &period.user_id)
                    .detail("period_id", &period.id)
                    .detail("tier", period.tier),
            );
            return Ok(Some(PeriodClosure::Succeeded));
        }

        period.close(SlaStatus::CompletedFailed, now);
        self.repository.save_period(period.clone())?;
        warn!(
            period = %period.id,
            verified = period.interviews_verified,
            required = period.interviews_required,
            "guarantee period missed"
        );
        self.publish(
            SlaAlert::new(templates::FAILED, &period.user_id)
                .detail("period_id", &period.id)
                .detail("tier", period.tier)
                .detail("interviews_verified", period.interviews_verified)
                .detail("interviews_required", period.interviews_required),
        );

        if !self.options.auto_credit {
            return Ok(Some(PeriodClosure::Failed));
        }
        self.settle(period, Settlement::Credit)?;
        Ok(Some(PeriodClosure::Credited))
    }

    fn expire_verifications(&self, now: DateTime<Utc>, report: &mut ReconciliationReport) {
        let pending = match self.repository.pending_verifications() {
            Ok(pending) => pending,
            Err(error) => {
                error!(%error, "failed to list pending verifications");
                report.failures.push(SweepFailure {
                    subject: "pending_verifications".to_string(),
                    error: error.to_string(),
                });
                return;
            }
        };

        for verification in pending {
            let outcome = self.locks.with_user(&verification.user_id, || {
                self.expire_if_stale(&verification.id, now)
            });

            match outcome {
                Ok(true) => report.expired_verifications.push(verification.id),
                Ok(false) => {}
                Err(error) => {
                    error!(verification = %verification.id, %error, "failed to expire verification");
                    report.failures.push(SweepFailure {
                        subject: verification.id.to_string(),
                        error: error.to_string(),
                    });
                }
            }
        }
    }

    fn expire_if_stale(
        &self,
        verification_id: &VerificationId,
        now: DateTime<Utc>,
    ) -> Result<bool, SlaError> {
        let Some(mut verification) = self.repository.fetch_verification(verification_id)? else {
            return Ok(false);
        };
        if !verification.is_pending() {
            return Ok(false);
        }

        let timed_out = now - verification.submitted_at >= self.options.verification_expiry;
        let orphaned = match self.repository.fetch_period(&verification.sla_period_id)? {
            Some(period) => !period.is_active(),
            None => true,
        };
        if !timed_out && !orphaned {
            return Ok(false);
        }

        verification.status = VerificationStatus::Expired;
        self.repository.save_verification(verification)?;
        info!(verification = %verification_id, timed_out, orphaned, "interview verification expired");
        Ok(true)
    }

    fn assess_risk(
        &self,
        period_id: &SlaPeriodId,
        now: DateTime<Utc>,
    ) -> Result<Option<RiskEscalation>, SlaError> {
        let Some(period) = self.repository.fetch_period(period_id)? else {
            return Ok(None);
        };
        if !period.is_active() {
            return Ok(None);
        }

        let usage = self.daily_usage(&period, now)?;
        let progress = compute_progress(&period, usage, now);
        if !progress.risk_level.requires_escalation() {
            return Ok(None);
        }

        let deficit = progress
            .expected_interviews
            .saturating_sub(progress.interviews_verified);
        warn!(
            user = %period.user_id,
            period = %period.id,
            risk = %progress.risk_level,
            deficit,
            days_remaining = progress.days_remaining,
            "guarantee period at risk"
        );

        self.publish(
            SlaAlert::new(templates::INCREASE_APPLY_VOLUME, &period.user_id)
                .detail("period_id", &period.id)
                .detail("risk_level", progress.risk_level)
                .detail("interview_deficit", deficit)
                .detail("daily_cap", usage.cap),
        );
        self.publish(
            SlaAlert::new(templates::AT_RISK, &period.user_id)
                .detail("period_id", &period.id)
                .detail("risk_level", progress.risk_level)
                .detail("interviews_verified", progress.interviews_verified)
                .detail("expected_interviews", progress.expected_interviews)
                .detail("days_remaining", progress.days_remaining),
        );

        Ok(Some(RiskEscalation {
            user_id: period.user_id,
            period_id: period.id,
            risk_level: progress.risk_level,
            expected_interviews: progress.expected_interviews,
            interviews_verified: progress.interviews_verified,
            days_remaining: progress.days_remaining,
        }))
    }

    fn daily_usage(&self, period: &SlaPeriod, now: DateTime<Utc>) -> Result<DailyUsage, SlaError> {
        let cap = self.options.tiers.guarantee(period.tier).daily_cap;
        let used = match self.repository.fetch_counters(&period.user_id)? {
            Some(mut counters) => {
                roll_counters(&mut counters, now);
                counters.daily_count
            }
            None => 0,
        };
        Ok(DailyUsage { used, cap })
    }

    fn load_counters(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ApplicationCounters, SlaError> {
        let mut counters = self
            .repository
            .fetch_counters(user_id)?
            .unwrap_or_else(|| ApplicationCounters::new(user_id.clone(), now));
        roll_counters(&mut counters, now);
        Ok(counters)
    }

    fn load_period(&self, period_id: &SlaPeriodId) -> Result<SlaPeriod, SlaError> {
        self.repository
            .fetch_period(period_id)?
            .ok_or_else(|| SlaError::PeriodNotFound(period_id.clone()))
    }

    fn load_verification(
        &self,
        verification_id: &VerificationId,
    ) -> Result<InterviewVerification, SlaError> {
        self.repository
            .fetch_verification(verification_id)?
            .ok_or_else(|| SlaError::VerificationNotFound(verification_id.clone()))
    }

    /// Delivery failures are logged and never roll back state.
    fn publish(&self, alert: SlaAlert) {
        let template = alert.template.clone();
        let user_id = alert.user_id.clone();
        if let Err(error) = self.notifier.notify(alert) {
            warn!(template = %template, user = %user_id, %error, "failed to deliver sla notification");
        }
    }
}

fn next_period_id() -> SlaPeriodId {
    SlaPeriodId(format!("sla-{}", Uuid::new_v4()))
}

fn next_verification_id() -> VerificationId {
    VerificationId(format!("ivr-{}", Uuid::new_v4()))
}

/// SHA-256 hex digest of the evidence reference.
pub(crate) fn evidence_hash(evidence: &str) -> String {
    format!("{:x}", Sha256::digest(evidence.trim().as_bytes()))
}

/// Error raised by the SLA service.
#[derive(Debug, thiserror::Error)]
pub enum SlaError {
    #[error("user {0} has no active guarantee period")]
    NoActivePeriod(UserId),
    #[error("guarantee period {0} not found")]
    PeriodNotFound(SlaPeriodId),
    #[error("interview verification {0} not found")]
    VerificationNotFound(VerificationId),
    #[error("interview verification {id} is already {status}")]
    VerificationAlreadyResolved {
        id: VerificationId,
        status: VerificationStatus,
    },
    #[error("guarantee period {id} is {status}, not ACTIVE")]
    PeriodNotActive { id: SlaPeriodId, status: SlaStatus },
    #[error("guarantee period {id} is {actual}; expected {expected}")]
    InvalidPeriodState {
        id: SlaPeriodId,
        expected: SlaStatus,
        actual: SlaStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
