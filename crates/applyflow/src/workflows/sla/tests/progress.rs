use chrono::Duration;

use super::common::*;
use crate::workflows::sla::domain::{RiskLevel, SubscriptionTier, VerificationType};
use crate::workflows::sla::progress::{
    RECOMMEND_AUTO_APPLY, RECOMMEND_BROADEN_LOCATIONS, RECOMMEND_BROADEN_TITLES,
    RECOMMEND_SUBMIT_INTERVIEWS,
};

#[test]
fn progress_is_none_without_an_active_period() {
    let harness = harness();
    assert!(harness
        .service
        .get_sla_progress(&user("u-1"))
        .unwrap()
        .is_none());
}

#[test]
fn fresh_period_is_on_track_with_onboarding_advice() {
    let harness = harness();
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Pro)
        .unwrap();

    let progress = harness.service.get_sla_progress(&user).unwrap().unwrap();
    assert_eq!(progress.days_total, 45);
    assert_eq!(progress.days_remaining, 45);
    assert_eq!(progress.days_elapsed, 0);
    assert_eq!(progress.expected_interviews, 0);
    assert!(progress.is_on_track);
    assert_eq!(progress.risk_level, RiskLevel::Low);
    assert_eq!(progress.progress_percent, 0);
    assert_eq!(progress.recommendations.len(), 2);
    assert!(progress.recommendations[0].contains("0 of 50"));
    assert_eq!(progress.recommendations[1], RECOMMEND_SUBMIT_INTERVIEWS);
}

#[test]
fn expectation_follows_a_linear_pace() {
    let harness = harness();
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Pro)
        .unwrap();

    harness.clock.advance(Duration::days(30) + Duration::hours(1));
    let progress = harness.service.get_sla_progress(&user).unwrap().unwrap();
    assert_eq!(progress.days_remaining, 15, "partial days round up");
    assert_eq!(progress.days_elapsed, 30);
    assert_eq!(progress.expected_interviews, 2);
    assert!(!progress.is_on_track);
    assert_eq!(progress.risk_level, RiskLevel::Medium);
    assert_eq!(progress.recommendations[0], RECOMMEND_AUTO_APPLY);
}

#[test]
fn high_risk_adds_broadening_advice() {
    let harness = harness();
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Pro)
        .unwrap();

    harness.clock.advance(Duration::days(40));
    let progress = harness.service.get_sla_progress(&user).unwrap().unwrap();
    assert_eq!(progress.days_remaining, 5);
    assert_eq!(progress.expected_interviews, 2);
    assert_eq!(progress.risk_level, RiskLevel::High);
    assert!(progress
        .recommendations
        .contains(&RECOMMEND_BROADEN_TITLES.to_string()));
    assert!(progress
        .recommendations
        .contains(&RECOMMEND_BROADEN_LOCATIONS.to_string()));
}

#[test]
fn large_deficit_near_the_end_is_critical() {
    let harness = harness();
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Business)
        .unwrap();

    harness.clock.advance(Duration::days(42));
    let progress = harness.service.get_sla_progress(&user).unwrap().unwrap();
    assert_eq!(progress.days_remaining, 3);
    assert_eq!(progress.expected_interviews, 4);
    assert_eq!(progress.risk_level, RiskLevel::Critical);
}

#[test]
fn verified_interviews_pull_the_period_back_on_track() {
    let harness = harness();
    let user = user("u-1");
    harness
        .service
        .start_sla_period(&user, SubscriptionTier::Pro)
        .unwrap();
    harness.clock.advance(Duration::days(20));

    let verification = harness
        .service
        .submit_interview_verification(&user, submission(VerificationType::Manual))
        .unwrap();
    harness
        .service
        .verify_interview(&verification.id, true, "ops-1", None)
        .unwrap();

    for _ in 0..30 {
        harness.service.increment_application_count(&user).unwrap();
    }

    let progress = harness.service.get_sla_progress(&user).unwrap().unwrap();
    assert_eq!(progress.expected_interviews, 1);
    assert_eq!(progress.interviews_verified, 1);
    assert!(progress.is_on_track);
    assert_eq!(progress.progress_percent, 33);
    assert!(
        progress.recommendations.is_empty(),
        "unexpected advice: {:?}",
        progress.recommendations
    );
}
