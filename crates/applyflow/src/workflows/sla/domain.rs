use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlaPeriodId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerificationId(pub String);

macro_rules! display_id {
    ($($name:ident),*) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

display_id!(UserId, SlaPeriodId, VerificationId);

/// Subscription tiers that carry an interview guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Free,
    Starter,
    Basic,
    Pro,
    Business,
    Enterprise,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 6] = [
        SubscriptionTier::Free,
        SubscriptionTier::Starter,
        SubscriptionTier::Basic,
        SubscriptionTier::Pro,
        SubscriptionTier::Business,
        SubscriptionTier::Enterprise,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "FREE",
            SubscriptionTier::Starter => "STARTER",
            SubscriptionTier::Basic => "BASIC",
            SubscriptionTier::Pro => "PRO",
            SubscriptionTier::Business => "BUSINESS",
            SubscriptionTier::Enterprise => "ENTERPRISE",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a guarantee period.
///
/// `Active` moves to one of the completed, disqualified, or superseded states;
/// `CompletedFailed` settles once into either a credit or a refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlaStatus {
    Active,
    CompletedSuccess,
    CompletedFailed,
    Disqualified,
    Superseded,
    CreditIssued,
    RefundIssued,
}

impl SlaStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SlaStatus::Active => "ACTIVE",
            SlaStatus::CompletedSuccess => "COMPLETED_SUCCESS",
            SlaStatus::CompletedFailed => "COMPLETED_FAILED",
            SlaStatus::Disqualified => "DISQUALIFIED",
            SlaStatus::Superseded => "SUPERSEDED",
            SlaStatus::CreditIssued => "CREDIT_ISSUED",
            SlaStatus::RefundIssued => "REFUND_ISSUED",
        }
    }
}

impl fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaPeriod {
    pub id: SlaPeriodId,
    pub user_id: UserId,
    pub tier: SubscriptionTier,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub interviews_required: u32,
    pub interviews_verified: u32,
    pub status: SlaStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqualification_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_amount_cents: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_amount_cents: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SlaPeriod {
    pub fn is_active(&self) -> bool {
        self.status == SlaStatus::Active
    }

    pub fn quota_met(&self) -> bool {
        self.interviews_verified >= self.interviews_required
    }

    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_date
    }

    /// Leave `Active` for a terminal state, stamping the completion time.
    pub(crate) fn close(&mut self, status: SlaStatus, now: DateTime<Utc>) {
        self.status = status;
        self.completed_at = Some(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationType {
    Email,
    Calendar,
    RecruiterConfirmation,
    Manual,
}

impl VerificationType {
    /// Email and calendar evidence can be checked without a human reviewer.
    pub const fn supports_auto_verification(self) -> bool {
        matches!(self, VerificationType::Email | VerificationType::Calendar)
    }

    pub const fn label(self) -> &'static str {
        match self {
            VerificationType::Email => "EMAIL",
            VerificationType::Calendar => "CALENDAR",
            VerificationType::RecruiterConfirmation => "RECRUITER_CONFIRMATION",
            VerificationType::Manual => "MANUAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    PendingVerification,
    Verified,
    Rejected,
    Expired,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::PendingVerification => "PENDING_VERIFICATION",
            VerificationStatus::Verified => "VERIFIED",
            VerificationStatus::Rejected => "REJECTED",
            VerificationStatus::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interview evidence as submitted by the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSubmission {
    pub job_id: String,
    pub company_name: String,
    pub interview_date: NaiveDate,
    pub verification_type: VerificationType,
    /// Reference to the evidence (message id, calendar link, ...). Only its hash is stored.
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewVerification {
    pub id: VerificationId,
    pub user_id: UserId,
    pub sla_period_id: SlaPeriodId,
    pub job_id: String,
    pub company_name: String,
    pub interview_date: NaiveDate,
    pub verification_type: VerificationType,
    pub evidence_hash: String,
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}

impl InterviewVerification {
    pub fn is_pending(&self) -> bool {
        self.status == VerificationStatus::PendingVerification
    }
}

/// Per-user application counters with independent daily and weekly clocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCounters {
    pub user_id: UserId,
    pub daily_count: u32,
    pub weekly_count: u32,
    pub last_reset: DateTime<Utc>,
    pub week_started: DateTime<Utc>,
}

impl ApplicationCounters {
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            daily_count: 0,
            weekly_count: 0,
            last_reset: now,
            week_started: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationAllowance {
    pub can_apply: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub daily_remaining: u32,
    pub weekly_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn requires_escalation(self) -> bool {
        self >= RiskLevel::High
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of how an active period is pacing against its quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaProgress {
    pub period_id: SlaPeriodId,
    pub user_id: UserId,
    pub tier: SubscriptionTier,
    pub interviews_required: u32,
    pub interviews_verified: u32,
    pub expected_interviews: u32,
    pub days_total: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub progress_percent: u8,
    pub is_on_track: bool,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub end_date: DateTime<Utc>,
}
