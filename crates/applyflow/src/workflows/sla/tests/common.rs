use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::clock::ManualClock;
use crate::workflows::sla::domain::{
    ApplicationCounters, InterviewSubmission, InterviewVerification, SlaPeriod, SlaPeriodId,
    UserId, VerificationId, VerificationType,
};
use crate::workflows::sla::repository::{
    NotifyError, RepositoryError, SlaAlert, SlaNotifier, SlaRepository,
};
use crate::workflows::sla::verifier::{AutoVerification, InterviewVerifier, VerifierError};
use crate::workflows::sla::{InMemorySlaRepository, ManualReviewOnly, SlaOptions, SlaService};

pub(super) type MemoryService<V = ManualReviewOnly> =
    SlaService<InMemorySlaRepository, MemoryNotifier, V>;

pub(super) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn submission(kind: VerificationType) -> InterviewSubmission {
    InterviewSubmission {
        job_id: "job-42".to_string(),
        company_name: "Acme Robotics".to_string(),
        interview_date: NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date"),
        verification_type: kind,
        evidence: "message-id:<abc123@mail.acme.test>".to_string(),
    }
}

pub(super) struct Harness<V = ManualReviewOnly> {
    pub(super) service: Arc<MemoryService<V>>,
    pub(super) repository: Arc<InMemorySlaRepository>,
    pub(super) notifier: Arc<MemoryNotifier>,
    pub(super) clock: Arc<ManualClock>,
}

pub(super) fn harness() -> Harness {
    harness_with(ManualReviewOnly, SlaOptions::default())
}

pub(super) fn harness_with<V: InterviewVerifier + 'static>(
    verifier: V,
    options: SlaOptions,
) -> Harness<V> {
    let repository = Arc::new(InMemorySlaRepository::new());
    let notifier = Arc::new(MemoryNotifier::default());
    let clock = Arc::new(ManualClock::new(start_time()));
    let service = Arc::new(SlaService::new(
        repository.clone(),
        notifier.clone(),
        Arc::new(verifier),
        clock.clone(),
        options,
    ));

    Harness {
        service,
        repository,
        notifier,
        clock,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<SlaAlert>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<SlaAlert> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }

    pub(super) fn templates(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|alert| alert.template)
            .collect()
    }
}

impl SlaNotifier for MemoryNotifier {
    fn notify(&self, alert: SlaAlert) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl SlaNotifier for OfflineNotifier {
    fn notify(&self, _alert: SlaAlert) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay down".to_string()))
    }
}

pub(super) struct ConfirmingVerifier;

impl InterviewVerifier for ConfirmingVerifier {
    fn attempt(
        &self,
        _verification: &InterviewVerification,
        _evidence: &str,
    ) -> Result<AutoVerification, VerifierError> {
        Ok(AutoVerification::Confirmed)
    }
}

pub(super) struct BrokenVerifier;

impl InterviewVerifier for BrokenVerifier {
    fn attempt(
        &self,
        _verification: &InterviewVerification,
        _evidence: &str,
    ) -> Result<AutoVerification, VerifierError> {
        Err(VerifierError::Unavailable("calendar api timeout".to_string()))
    }
}

/// In-memory repository that fails reads for selected periods and can
/// refuse whole classes of writes.
#[derive(Default)]
pub(super) struct FlakyRepository {
    pub(super) inner: InMemorySlaRepository,
    broken: Mutex<HashSet<SlaPeriodId>>,
    period_writes_down: AtomicBool,
    verification_writes_down: AtomicBool,
}

impl FlakyRepository {
    pub(super) fn set_period_writes_down(&self, down: bool) {
        self.period_writes_down.store(down, Ordering::SeqCst);
    }

    pub(super) fn set_verification_writes_down(&self, down: bool) {
        self.verification_writes_down.store(down, Ordering::SeqCst);
    }

    fn check_write(flag: &AtomicBool, what: &str) -> Result<(), RepositoryError> {
        if flag.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable(format!("{what} table read-only")))
        } else {
            Ok(())
        }
    }

    pub(super) fn break_period(&self, id: &SlaPeriodId) {
        self.broken
            .lock()
            .expect("flaky mutex poisoned")
            .insert(id.clone());
    }

    fn check(&self, id: &SlaPeriodId) -> Result<(), RepositoryError> {
        if self.broken.lock().expect("flaky mutex poisoned").contains(id) {
            Err(RepositoryError::Unavailable(format!("shard for {id} offline")))
        } else {
            Ok(())
        }
    }
}

impl SlaRepository for FlakyRepository {
    fn save_period(&self, period: SlaPeriod) -> Result<(), RepositoryError> {
        Self::check_write(&self.period_writes_down, "period")?;
        self.inner.save_period(period)
    }

    fn fetch_period(&self, id: &SlaPeriodId) -> Result<Option<SlaPeriod>, RepositoryError> {
        self.check(id)?;
        self.inner.fetch_period(id)
    }

    fn active_period(&self, user_id: &UserId) -> Result<Option<SlaPeriod>, RepositoryError> {
        self.inner.active_period(user_id)
    }

    fn active_periods(&self) -> Result<Vec<SlaPeriod>, RepositoryError> {
        self.inner.active_periods()
    }

    fn save_verification(
        &self,
        verification: InterviewVerification,
    ) -> Result<(), RepositoryError> {
        Self::check_write(&self.verification_writes_down, "verification")?;
        self.inner.save_verification(verification)
    }

    fn fetch_verification(
        &self,
        id: &VerificationId,
    ) -> Result<Option<InterviewVerification>, RepositoryError> {
        self.inner.fetch_verification(id)
    }

    fn pending_verifications(&self) -> Result<Vec<InterviewVerification>, RepositoryError> {
        self.inner.pending_verifications()
    }

    fn fetch_counters(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ApplicationCounters>, RepositoryError> {
        self.inner.fetch_counters(user_id)
    }

    fn save_counters(&self, counters: ApplicationCounters) -> Result<(), RepositoryError> {
        self.inner.save_counters(counters)
    }
}
