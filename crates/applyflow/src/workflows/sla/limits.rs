use chrono::{DateTime, Duration, Utc};

use super::domain::{ApplicationAllowance, ApplicationCounters};
use super::tiers::TierGuarantee;

pub const DAILY_LIMIT_REACHED: &str = "Daily application limit reached";
pub const WEEKLY_LIMIT_REACHED: &str = "Weekly application limit reached";

const WEEK: i64 = 7;

/// Apply lazy resets. The daily and weekly clocks are independent; daily runs first.
pub(crate) fn roll_counters(counters: &mut ApplicationCounters, now: DateTime<Utc>) {
    if counters.last_reset.date_naive() != now.date_naive() {
        counters.daily_count = 0;
        counters.last_reset = now;
    }

    if now - counters.week_started >= Duration::days(WEEK) {
        counters.weekly_count = 0;
        counters.week_started = now;
    }
}

pub(crate) fn allowance(
    counters: &ApplicationCounters,
    guarantee: &TierGuarantee,
) -> ApplicationAllowance {
    let daily_remaining = guarantee.daily_cap.saturating_sub(counters.daily_count);
    let weekly_remaining = guarantee.weekly_cap.saturating_sub(counters.weekly_count);

    let reason = if daily_remaining == 0 {
        Some(DAILY_LIMIT_REACHED)
    } else if weekly_remaining == 0 {
        Some(WEEKLY_LIMIT_REACHED)
    } else {
        None
    };

    ApplicationAllowance {
        can_apply: reason.is_none(),
        reason: reason.map(str::to_string),
        daily_remaining,
        weekly_remaining,
    }
}

pub(crate) fn record_application(counters: &mut ApplicationCounters) {
    counters.daily_count = counters.daily_count.saturating_add(1);
    counters.weekly_count = counters.weekly_count.saturating_add(1);
}
