use super::domain::{AdvancePolicy, Property};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::trace;

/// Length of a lease month when converting a remaining lease into whole months.
pub const LEASE_MONTH_DAYS: i64 = 30;

/// Why a property cannot take part in an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IneligibilityReason {
    ActiveAdvance,
    MissingLeaseEnd,
    InsufficientTerm { remaining_months: i64 },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::ActiveAdvance => "an advance is already active".to_string(),
            IneligibilityReason::MissingLeaseEnd => "lease end date is unknown".to_string(),
            IneligibilityReason::InsufficientTerm { remaining_months } => {
                format!("only {remaining_months} month(s) remain on the lease")
            }
        }
    }
}

/// A property that passed the filter, with its whole remaining lease months.
#[derive(Debug, Clone, Copy)]
pub struct EligibleProperty<'a> {
    pub property: &'a Property,
    pub remaining_months: i64,
}

/// Whole 30-day periods between `now` and `lease_end`, floored toward negative infinity.
pub fn remaining_months(lease_end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let month = Duration::days(LEASE_MONTH_DAYS).num_milliseconds();
    (lease_end - now).num_milliseconds().div_euclid(month)
}

pub fn assess<'a>(
    property: &'a Property,
    now: DateTime<Utc>,
    policy: &AdvancePolicy,
) -> Result<EligibleProperty<'a>, IneligibilityReason> {
    if property.has_active_advance {
        return Err(IneligibilityReason::ActiveAdvance);
    }

    let lease_end = property
        .lease_end_date
        .ok_or(IneligibilityReason::MissingLeaseEnd)?;

    let remaining_months = remaining_months(lease_end, now);
    if remaining_months < i64::from(policy.min_months) {
        return Err(IneligibilityReason::InsufficientTerm { remaining_months });
    }

    Ok(EligibleProperty {
        property,
        remaining_months,
    })
}

/// Eligible subset in input order.
pub fn eligible_properties<'a>(
    properties: &'a [Property],
    now: DateTime<Utc>,
    policy: &AdvancePolicy,
) -> Vec<EligibleProperty<'a>> {
    properties
        .iter()
        .filter_map(|property| match assess(property, now, policy) {
            Ok(eligible) => Some(eligible),
            Err(reason) => {
                trace!(property_id = %property.id, ?reason, "property excluded from advance");
                None
            }
        })
        .collect()
}
