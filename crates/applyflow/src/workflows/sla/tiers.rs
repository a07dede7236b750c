use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::SubscriptionTier;

/// Guarantee terms and application caps for one subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierGuarantee {
    pub tier: SubscriptionTier,
    pub interviews_required: u32,
    pub guarantee_days: u32,
    pub daily_cap: u32,
    pub weekly_cap: u32,
    pub credit_percentage: u32,
    pub monthly_cost_cents: u64,
}

impl TierGuarantee {
    pub fn credit_amount_cents(&self) -> u64 {
        self.monthly_cost_cents * u64::from(self.credit_percentage) / 100
    }
}

const STANDARD: [TierGuarantee; 6] = [
    TierGuarantee {
        tier: SubscriptionTier::Free,
        interviews_required: 0,
        guarantee_days: 30,
        daily_cap: 5,
        weekly_cap: 25,
        credit_percentage: 0,
        monthly_cost_cents: 0,
    },
    TierGuarantee {
        tier: SubscriptionTier::Starter,
        interviews_required: 1,
        guarantee_days: 60,
        daily_cap: 15,
        weekly_cap: 75,
        credit_percentage: 50,
        monthly_cost_cents: 2_999,
    },
    TierGuarantee {
        tier: SubscriptionTier::Basic,
        interviews_required: 2,
        guarantee_days: 60,
        daily_cap: 25,
        weekly_cap: 125,
        credit_percentage: 75,
        monthly_cost_cents: 4_999,
    },
    TierGuarantee {
        tier: SubscriptionTier::Pro,
        interviews_required: 3,
        guarantee_days: 45,
        daily_cap: 50,
        weekly_cap: 250,
        credit_percentage: 100,
        monthly_cost_cents: 9_999,
    },
    TierGuarantee {
        tier: SubscriptionTier::Business,
        interviews_required: 5,
        guarantee_days: 45,
        daily_cap: 100,
        weekly_cap: 500,
        credit_percentage: 100,
        monthly_cost_cents: 19_999,
    },
    TierGuarantee {
        tier: SubscriptionTier::Enterprise,
        interviews_required: 10,
        guarantee_days: 30,
        daily_cap: 200,
        weekly_cap: 1_000,
        credit_percentage: 100,
        monthly_cost_cents: 49_999,
    },
];

/// Complete guarantee table; every tier always has exactly one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    rows: [TierGuarantee; 6],
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TierTable {
    pub fn standard() -> Self {
        Self { rows: STANDARD }
    }

    pub fn guarantee(&self, tier: SubscriptionTier) -> &TierGuarantee {
        &self.rows[tier.index()]
    }

    pub fn rows(&self) -> &[TierGuarantee] {
        &self.rows
    }

    pub fn from_path(path: &Path) -> Result<Self, TierTableError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Parse a full replacement table. Partial tables are rejected.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TierTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows: [Option<TierGuarantee>; 6] = [None; 6];

        for record in csv_reader.deserialize::<TierRow>() {
            let row = record?;
            let tier = SubscriptionTier::parse(&row.tier)
                .ok_or_else(|| TierTableError::UnknownTier(row.tier.clone()))?;
            let guarantee = row.into_guarantee(tier)?;

            let slot = &mut rows[tier.index()];
            if slot.is_some() {
                return Err(TierTableError::DuplicateTier(tier.label().to_string()));
            }
            *slot = Some(guarantee);
        }

        let mut complete = STANDARD;
        for tier in SubscriptionTier::ALL {
            complete[tier.index()] = rows[tier.index()]
                .ok_or_else(|| TierTableError::MissingTier(tier.label().to_string()))?;
        }

        Ok(Self { rows: complete })
    }
}

#[derive(Debug, Deserialize)]
struct TierRow {
    tier: String,
    interviews_required: u32,
    guarantee_days: u32,
    daily_cap: u32,
    weekly_cap: u32,
    credit_percentage: u32,
    monthly_cost_cents: u64,
}

impl TierRow {
    fn into_guarantee(self, tier: SubscriptionTier) -> Result<TierGuarantee, TierTableError> {
        let invalid = |reason: &str| TierTableError::InvalidGuarantee {
            tier: tier.label().to_string(),
            reason: reason.to_string(),
        };

        if self.guarantee_days == 0 {
            return Err(invalid("guarantee_days must be positive"));
        }
        if self.credit_percentage > 100 {
            return Err(invalid("credit_percentage must not exceed 100"));
        }
        if self.weekly_cap < self.daily_cap {
            return Err(invalid("weekly_cap must be at least daily_cap"));
        }

        Ok(TierGuarantee {
            tier,
            interviews_required: self.interviews_required,
            guarantee_days: self.guarantee_days,
            daily_cap: self.daily_cap,
            weekly_cap: self.weekly_cap,
            credit_percentage: self.credit_percentage,
            monthly_cost_cents: self.monthly_cost_cents,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TierTableError {
    #[error("failed to read tier table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tier table: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown subscription tier '{0}'")]
    UnknownTier(String),
    #[error("tier {0} appears more than once")]
    DuplicateTier(String),
    #[error("tier {0} is missing from the table")]
    MissingTier(String),
    #[error("tier {tier} is invalid: {reason}")]
    InvalidGuarantee { tier: String, reason: String },
}
