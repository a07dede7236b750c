use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::workflows::sla::domain::{
    SlaPeriodId, SlaStatus, SubscriptionTier, VerificationId, VerificationStatus,
    VerificationType,
};
use crate::workflows::sla::repository::{templates, SlaRepository};
use crate::workflows::sla::service::evidence_hash;
use crate::workflows::sla::verifier::InterviewVerifier;
use crate::workflows::sla::{InMemorySlaRepository, ManualReviewOnly, SlaError, SlaOptions, SlaService};
use crate::clock::ManualClock;
use crate::config::SlaConfig;
use crate::workflows::sla::TierTable;

#[test]
fn start_creates_active_period_from_tier_terms() {
    let harness = harness();
    let period = harness
        .service
        .start_sla_period(&user("u-1"), SubscriptionTier::Pro)
        .expect("period starts");

    assert_eq!(period.status, SlaStatus::Active);
    assert_eq!(period.interviews_required, 3);
    assert_eq!(period.interviews_verified, 0);
    assert_eq!(period.start_date, start_time());
    assert_eq!(period.end_date, start_time() + Duration::days(45));
    assert!(period.id.0.starts_with("sla-"));
    assert_eq!(harness.notifier.templates(), vec![templates::PERIOD_STARTED]);
}

#[test]
fn starting_again_supersedes_the_previous_period() {
    let harness = harness();
    let user = user("u-1");
    let first = harness
        .service
        .start_sla_period(&user, SubscriptionTier::Starter)
        .unwrap();
    harness.clock.advance(Duration::days(3));
    let second = harness
        .service
        .start_sla_period(&user, SubscriptionTier::Business)
        .unwrap();

    let stored_first = harness.repository.fetch_period(&first.id).unwrap().unwrap();
    assert_eq!(stored_first.status, SlaStatus::Superseded);
    assert!(stored_first.completed_at.is_some());

    let active = harness.repository.active_period(&user).unwrap().unwrap();
    assert_eq!(active.id, second.id);
    assert_eq!(
        harness
            .repository
            .periods_for(&user)
            .iter()
            .filter(|period| period.is_active())
            .count(),
        1
    );
}

#[test]
fn submission_requires_an_active_period() {
    let harness = harness();
    match harness
        .service
        .submit_interview_verification(&user("ghost"), submission(VerificationType::Manual))
    {
        Err(SlaError::NoActivePeriod(id)) => assert_eq!(id.0, "ghost"),
        other => panic!("expected no active period, got {other:?}"),
    }
}

#[test]
fn submission_stores_only_the_evidence_hash() {
    let harness = harness();
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Basic)
        .unwrap();

    let verification = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::RecruiterConfirmation))
        .unwrap();

    assert_eq!(verification.status, VerificationStatus::PendingVerification);
    assert_eq!(verification.evidence_hash.len(), 64);
    assert_eq!(
        verification.evidence_hash,
        evidence_hash("message-id:<abc123@mail.acme.test>")
    );
    assert!(!verification.evidence_hash.contains("acme"));
    assert_eq!(verification.submitted_at, start_time());
}

#[test]
fn approval_that_meets_quota_completes_the_period_in_the_same_call() {
    let harness = harness();
    let user = user("u-1");
    let period = harness
        .service
        .start_sla_period(&user, SubscriptionTier::Basic)
        .unwrap();

    let first = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();
    let second = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();

    harness
        .service
        .verify_interview(&first.id, true, "ops-1", None)
        .unwrap();
    let after_first = harness.repository.fetch_period(&period.id).unwrap().unwrap();
    assert_eq!(after_first.interviews_verified, 1);
    assert_eq!(after_first.status, SlaStatus::Active);

    let resolved = harness
        .service
        .verify_interview(&second.id, true, "ops-1", Some("confirmed by phone".to_string()))
        .unwrap();
    assert_eq!(resolved.status, VerificationStatus::Verified);
    assert_eq!(resolved.verified_by.as_deref(), Some("ops-1"));
    assert_eq!(resolved.notes.as_deref(), Some("confirmed by phone"));

    let completed = harness.repository.fetch_period(&period.id).unwrap().unwrap();
    assert_eq!(completed.interviews_verified, 2);
    assert_eq!(completed.status, SlaStatus::CompletedSuccess);
    assert!(harness
        .notifier
        .templates()
        .contains(&templates::COMPLETED.to_string()));
}

#[test]
fn verifications_resolve_only_once() {
    let harness = harness();
    let user = user("u-1");
    let period = harness
        .service
        .start_sla_period(&user, SubscriptionTier::Business)
        .unwrap();
    let verification = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();

    harness
        .service
        .verify_interview(&verification.id, true, "ops-1", None)
        .unwrap();
    match harness
        .service
        .verify_interview(&verification.id, true, "ops-2", None)
    {
        Err(SlaError::VerificationAlreadyResolved { status, .. }) => {
            assert_eq!(status, VerificationStatus::Verified)
        }
        other => panic!("expected already resolved, got {other:?}"),
    }

    let stored = harness.repository.fetch_period(&period.id).unwrap().unwrap();
    assert_eq!(stored.interviews_verified, 1);
}

fn flaky_service<V: InterviewVerifier + 'static>(
    verifier: V,
) -> (
    Arc<FlakyRepository>,
    SlaService<FlakyRepository, MemoryNotifier, V>,
) {
    let repository = Arc::new(FlakyRepository::default());
    let service = SlaService::new(
        repository.clone(),
        Arc::new(MemoryNotifier::default()),
        Arc::new(verifier),
        Arc::new(ManualClock::new(start_time())),
        SlaOptions::default(),
    );
    (repository, service)
}

#[test]
fn failed_verification_write_keeps_the_period_count() {
    let (repository, service) = flaky_service(ManualReviewOnly);
    let user = user("u-1");
    let period = service
        .start_sla_period(&user, SubscriptionTier::Business)
        .unwrap();
    let verification = service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();

    repository.set_verification_writes_down(true);
    let err = service
        .verify_interview(&verification.id, true, "ops-1", None)
        .expect_err("verification write fails");
    assert!(matches!(err, SlaError::Repository(_)));

    let stored = repository.fetch_period(&period.id).unwrap().unwrap();
    assert_eq!(stored.interviews_verified, 0);
    assert!(repository
        .fetch_verification(&verification.id)
        .unwrap()
        .unwrap()
        .is_pending());

    repository.set_verification_writes_down(false);
    let resolved = service
        .verify_interview(&verification.id, true, "ops-1", None)
        .unwrap();
    assert_eq!(resolved.status, VerificationStatus::Verified);
    let stored = repository.fetch_period(&period.id).unwrap().unwrap();
    assert_eq!(stored.interviews_verified, 1);
}

#[test]
fn failed_period_write_leaves_the_verification_pending() {
    let (repository, service) = flaky_service(ManualReviewOnly);
    let user = user("u-1");
    let period = service
        .start_sla_period(&user, SubscriptionTier::Business)
        .unwrap();
    let verification = service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();

    repository.set_period_writes_down(true);
    assert!(service
        .verify_interview(&verification.id, true, "ops-1", None)
        .is_err());
    repository.set_period_writes_down(false);

    assert!(repository
        .fetch_verification(&verification.id)
        .unwrap()
        .unwrap()
        .is_pending());
    assert_eq!(
        repository
            .fetch_period(&period.id)
            .unwrap()
            .unwrap()
            .interviews_verified,
        0
    );
    service
        .verify_interview(&verification.id, true, "ops-1", None)
        .expect("retry succeeds");
}

#[test]
fn unapplied_auto_verification_returns_the_stored_record() {
    let (repository, service) = flaky_service(ConfirmingVerifier);
    let user = user("u-1");
    service
        .start_sla_period(&user, SubscriptionTier::Starter)
        .unwrap();

    repository.set_period_writes_down(true);
    let verification = service
        .submit_interview_verification(&user, submission(VerificationType::Email))
        .expect("submission still succeeds");
    assert!(verification.is_pending());
    assert_eq!(
        repository.fetch_verification(&verification.id).unwrap(),
        Some(verification)
    );
}

#[test]
fn rejection_leaves_the_period_untouched() {
    let harness = harness();
    let user = user("u-1");
    let period = harness
        .service
        .start_sla_period(&user, SubscriptionTier::Pro)
        .unwrap();
    let verification = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();

    let rejected = harness
        .service
        .verify_interview(&verification.id, false, "ops-1", Some("no evidence".to_string()))
        .unwrap();
    assert_eq!(rejected.status, VerificationStatus::Rejected);

    let stored = harness.repository.fetch_period(&period.id).unwrap().unwrap();
    assert_eq!(stored.interviews_verified, 0);
}

#[test]
fn unknown_verification_ids_are_reported() {
    let harness = harness();
    match harness.service.verify_interview(
        &VerificationId("ivr-missing".to_string()),
        true,
        "ops-1",
        None,
    ) {
        Err(SlaError::VerificationNotFound(id)) => assert_eq!(id.0, "ivr-missing"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn approving_after_the_period_closed_fails() {
    let harness = harness();
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Pro)
        .unwrap();
    let verification = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();
    harness
        .service
        .disqualify_from_sla(&user, "fabricated evidence")
        .unwrap();

    match harness
        .service
        .verify_interview(&verification.id, true, "ops-1", None)
    {
        Err(SlaError::PeriodNotActive { status, .. }) => {
            assert_eq!(status, SlaStatus::Disqualified)
        }
        other => panic!("expected period not active, got {other:?}"),
    }
    let stored = harness
        .repository
        .fetch_verification(&verification.id)
        .unwrap()
        .unwrap();
    assert!(stored.is_pending());
}

#[test]
fn email_evidence_is_auto_verified_when_confirmed() {
    let harness = harness_with(ConfirmingVerifier, SlaOptions::default());
    let user = user("u-1");
    let period = harness
        .service
        .start_sla_period(&user, SubscriptionTier::Starter)
        .unwrap();

    let verification = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Email))
        .unwrap();
    assert_eq!(verification.status, VerificationStatus::Verified);
    assert_eq!(verification.verified_by.as_deref(), Some("auto-verifier"));

    let stored = harness.repository.fetch_period(&period.id).unwrap().unwrap();
    assert_eq!(stored.status, SlaStatus::CompletedSuccess);
}

#[test]
fn manual_evidence_skips_the_auto_verifier() {
    let harness = harness_with(ConfirmingVerifier, SlaOptions::default());
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Starter)
        .unwrap();

    let verification = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();
    assert!(verification.is_pending());
}

#[test]
fn auto_verifier_failures_leave_the_record_pending() {
    let harness = harness_with(BrokenVerifier, SlaOptions::default());
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Starter)
        .unwrap();

    let verification = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Calendar))
        .expect("submission still succeeds");
    assert!(verification.is_pending());
}

#[test]
fn disqualification_is_a_noop_without_an_active_period() {
    let harness = harness();
    let outcome = harness
        .service
        .disqualify_from_sla(&user("nobody"), "spam")
        .unwrap();
    assert!(outcome.is_none());

    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Pro)
        .unwrap();
    let period = harness
        .service
        .disqualify_from_sla(&user, "duplicate account")
        .unwrap()
        .expect("period disqualified");
    assert_eq!(period.status, SlaStatus::Disqualified);
    assert_eq!(
        period.disqualification_reason.as_deref(),
        Some("duplicate account")
    );
}

#[test]
fn credit_requires_a_failed_period() {
    let harness = harness();
    let user = user("u-1");
    let period = harness
        .service
        .start_sla_period(&user, SubscriptionTier::Pro)
        .unwrap();

    match harness.service.process_sla_credit(&period.id) {
        Err(SlaError::InvalidPeriodState {
            expected, actual, ..
        }) => {
            assert_eq!(expected, SlaStatus::CompletedFailed);
            assert_eq!(actual, SlaStatus::Active);
        }
        other => panic!("expected invalid state, got {other:?}"),
    }

    match harness
        .service
        .process_sla_credit(&SlaPeriodId("sla-missing".to_string()))
    {
        Err(SlaError::PeriodNotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn refund_settles_a_failed_period_at_full_cost() {
    let options = SlaOptions {
        auto_credit: false,
        ..SlaOptions::default()
    };
    let harness = harness_with(ManualReviewOnly, options);
    let user = user("u-1");
    let period = harness
        .service
        .start_sla_period(&user, SubscriptionTier::Basic)
        .unwrap();

    harness.clock.advance(Duration::days(61));
    let report = harness.service.run_reconciliation().unwrap();
    assert_eq!(report.failed, vec![period.id.clone()]);
    assert!(report.credited.is_empty());

    let refunded = harness.service.issue_sla_refund(&period.id).unwrap();
    assert_eq!(refunded.status, SlaStatus::RefundIssued);
    assert_eq!(refunded.refund_amount_cents, Some(4_999));
    assert_eq!(refunded.credit_amount_cents, None);

    match harness.service.process_sla_credit(&period.id) {
        Err(SlaError::InvalidPeriodState { actual, .. }) => {
            assert_eq!(actual, SlaStatus::RefundIssued)
        }
        other => panic!("settlement must be one-way, got {other:?}"),
    }
}

#[test]
fn notification_failures_never_undo_state_changes() {
    let repository = Arc::new(InMemorySlaRepository::new());
    let service = SlaService::new(
        repository.clone(),
        Arc::new(OfflineNotifier),
        Arc::new(ManualReviewOnly),
        Arc::new(ManualClock::new(start_time())),
        SlaOptions::default(),
    );

    let period = service
        .start_sla_period(&user("u-1"), SubscriptionTier::Pro)
        .expect("start succeeds despite notifier outage");
    assert!(repository.fetch_period(&period.id).unwrap().is_some());
}

#[test]
fn options_clamp_out_of_range_expiry() {
    let config = SlaConfig {
        verification_expiry_days: i64::MAX,
        ..SlaConfig::default()
    };
    let options = SlaOptions::from_config(&config, TierTable::standard());
    assert_eq!(options.verification_expiry, Duration::days(3_650));

    let config = SlaConfig {
        verification_expiry_days: -5,
        ..SlaConfig::default()
    };
    let options = SlaOptions::from_config(&config, TierTable::standard());
    assert_eq!(options.verification_expiry, Duration::days(1));
}
