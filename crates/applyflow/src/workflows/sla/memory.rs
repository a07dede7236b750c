use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{
    ApplicationCounters, InterviewVerification, SlaPeriod, SlaPeriodId, UserId, VerificationId,
};
use super::repository::{RepositoryError, SlaRepository};

/// Process-local repository used by the service binary and tests.
#[derive(Debug, Default)]
pub struct InMemorySlaRepository {
    periods: Mutex<HashMap<SlaPeriodId, SlaPeriod>>,
    verifications: Mutex<HashMap<VerificationId, InterviewVerification>>,
    counters: Mutex<HashMap<UserId, ApplicationCounters>>,
}

impl InMemorySlaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn periods_for(&self, user_id: &UserId) -> Vec<SlaPeriod> {
        let guard = self.periods.lock().expect("period mutex poisoned");
        let mut periods: Vec<SlaPeriod> = guard
            .values()
            .filter(|period| &period.user_id == user_id)
            .cloned()
            .collect();
        periods.sort_by_key(|period| period.start_date);
        periods
    }
}

impl SlaRepository for InMemorySlaRepository {
    fn save_period(&self, period: SlaPeriod) -> Result<(), RepositoryError> {
        let mut guard = self.periods.lock().expect("period mutex poisoned");
        guard.insert(period.id.clone(), period);
        Ok(())
    }

    fn fetch_period(&self, id: &SlaPeriodId) -> Result<Option<SlaPeriod>, RepositoryError> {
        let guard = self.periods.lock().expect("period mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_period(&self, user_id: &UserId) -> Result<Option<SlaPeriod>, RepositoryError> {
        let guard = self.periods.lock().expect("period mutex poisoned");
        Ok(guard
            .values()
            .filter(|period| &period.user_id == user_id && period.is_active())
            .max_by_key(|period| period.start_date)
            .cloned())
    }

    fn active_periods(&self) -> Result<Vec<SlaPeriod>, RepositoryError> {
        let guard = self.periods.lock().expect("period mutex poisoned");
        let mut active: Vec<SlaPeriod> = guard
            .values()
            .filter(|period| period.is_active())
            .cloned()
            .collect();
        active.sort_by(|left, right| left.end_date.cmp(&right.end_date).then(left.id.cmp(&right.id)));
        Ok(active)
    }

    fn save_verification(
        &self,
        verification: InterviewVerification,
    ) -> Result<(), RepositoryError> {
        let mut guard = self
            .verifications
            .lock()
            .expect("verification mutex poisoned");
        guard.insert(verification.id.clone(), verification);
        Ok(())
    }

    fn fetch_verification(
        &self,
        id: &VerificationId,
    ) -> Result<Option<InterviewVerification>, RepositoryError> {
        let guard = self
            .verifications
            .lock()
            .expect("verification mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending_verifications(&self) -> Result<Vec<InterviewVerification>, RepositoryError> {
        let guard = self
            .verifications
            .lock()
            .expect("verification mutex poisoned");
        let mut pending: Vec<InterviewVerification> = guard
            .values()
            .filter(|verification| verification.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|verification| verification.submitted_at);
        Ok(pending)
    }

    fn fetch_counters(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ApplicationCounters>, RepositoryError> {
        let guard = self.counters.lock().expect("counter mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }

    fn save_counters(&self, counters: ApplicationCounters) -> Result<(), RepositoryError> {
        let mut guard = self.counters.lock().expect("counter mutex poisoned");
        guard.insert(counters.user_id.clone(), counters);
        Ok(())
    }
}
