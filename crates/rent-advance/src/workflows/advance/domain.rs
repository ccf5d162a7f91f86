use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifier assigned to a property by the portfolio system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Property record as supplied by the portfolio system. Read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub monthly_rent: Decimal,
    #[serde(default)]
    pub lease_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub has_active_advance: bool,
    #[serde(default)]
    pub status: String,
}

/// Platform-wide bounds and rate applied to every advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancePolicy {
    pub min_months: u32,
    pub max_months: u32,
    pub advance_rate: Decimal,
}

impl AdvancePolicy {
    pub const STANDARD_MIN_MONTHS: u32 = 2;
    pub const STANDARD_MAX_MONTHS: u32 = 11;

    pub fn standard() -> Self {
        Self {
            min_months: Self::STANDARD_MIN_MONTHS,
            max_months: Self::STANDARD_MAX_MONTHS,
            advance_rate: Decimal::new(9, 1),
        }
    }

    /// Builds a policy, returning `None` unless `1 <= min <= max` and `0 < rate <= 1`.
    pub fn new(min_months: u32, max_months: u32, advance_rate: Decimal) -> Option<Self> {
        let months_valid = min_months >= 1 && min_months <= max_months;
        let rate_valid = advance_rate > Decimal::ZERO && advance_rate <= Decimal::ONE;
        (months_valid && rate_valid).then_some(Self {
            min_months,
            max_months,
            advance_rate,
        })
    }

    /// `floor(rent * months * rate)`; non-decreasing in `months`.
    pub fn advance_amount(&self, monthly_rent: Decimal, months: u32) -> Decimal {
        (monthly_rent * Decimal::from(months) * self.advance_rate).floor()
    }

    /// Amount advanced for a single month of rent, before flooring.
    pub fn monthly_advance(&self, monthly_rent: Decimal) -> Decimal {
        monthly_rent * self.advance_rate
    }

    pub fn clamp_months(&self, months: i64) -> u32 {
        let clamped = months.clamp(i64::from(self.min_months), i64::from(self.max_months));
        u32::try_from(clamped).unwrap_or(self.max_months)
    }
}

impl Default for AdvancePolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Largest target, monthly rent or portfolio rent total a request may carry.
///
/// Keeps `rent * months * rate` and every running total inside `Decimal` range for any
/// `u32` term length.
pub const MAX_CURRENCY_AMOUNT: i64 = 1_000_000_000_000_000;

fn max_currency_amount() -> Decimal {
    Decimal::from(MAX_CURRENCY_AMOUNT)
}

/// Validated input to the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationRequest {
    properties: Vec<Property>,
    target_amount: Decimal,
}

impl OptimizationRequest {
    pub fn new(
        properties: Vec<Property>,
        target_amount: Decimal,
    ) -> Result<Self, AdvanceRequestError> {
        if target_amount <= Decimal::ZERO {
            return Err(AdvanceRequestError::NonPositiveTarget(target_amount));
        }
        if target_amount > max_currency_amount() {
            return Err(AdvanceRequestError::AmountOutOfRange {
                subject: "target amount".to_string(),
                amount: target_amount,
            });
        }

        let mut seen = HashSet::new();
        let mut rent_total = Decimal::ZERO;
        for property in &properties {
            if property.monthly_rent < Decimal::ZERO {
                return Err(AdvanceRequestError::NegativeRent {
                    property_id: property.id.clone(),
                    monthly_rent: property.monthly_rent,
                });
            }
            if property.monthly_rent > max_currency_amount() {
                return Err(AdvanceRequestError::AmountOutOfRange {
                    subject: format!("monthly rent of property {}", property.id),
                    amount: property.monthly_rent,
                });
            }
            rent_total = rent_total
                .checked_add(property.monthly_rent)
                .filter(|total| *total <= max_currency_amount())
                .ok_or_else(|| AdvanceRequestError::AmountOutOfRange {
                    subject: "portfolio monthly rent total".to_string(),
                    amount: rent_total.saturating_add(property.monthly_rent),
                })?;
            if !seen.insert(&property.id) {
                return Err(AdvanceRequestError::DuplicateProperty(property.id.clone()));
            }
        }

        Ok(Self {
            properties,
            target_amount,
        })
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn target_amount(&self) -> Decimal {
        self.target_amount
    }
}

/// Contract violations rejected before the optimizer runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdvanceRequestError {
    #[error("target amount must be positive (received {0})")]
    NonPositiveTarget(Decimal),
    #[error("property {property_id} has negative monthly rent {monthly_rent}")]
    NegativeRent {
        property_id: PropertyId,
        monthly_rent: Decimal,
    },
    #[error("property {0} appears more than once")]
    DuplicateProperty(PropertyId),
    #[error(
        "{subject} of {amount} exceeds the supported maximum of {max}",
        max = MAX_CURRENCY_AMOUNT
    )]
    AmountOutOfRange { subject: String, amount: Decimal },
}
