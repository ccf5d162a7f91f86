use super::domain::{AdvancePolicy, Property, PropertyId};
use super::eligibility::EligibleProperty;
use rust_decimal::Decimal;

/// Feasible term range and its monetary endpoints for one eligible property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyOption<'a> {
    pub property: &'a Property,
    pub available_months: u32,
    pub min_advance: Decimal,
    pub max_advance: Decimal,
}

impl<'a> PropertyOption<'a> {
    pub fn from_eligible(eligible: EligibleProperty<'a>, policy: &AdvancePolicy) -> Self {
        let property = eligible.property;
        let available_months = policy.clamp_months(eligible.remaining_months);

        Self {
            property,
            available_months,
            min_advance: policy.advance_amount(property.monthly_rent, policy.min_months),
            max_advance: policy.advance_amount(property.monthly_rent, available_months),
        }
    }

    pub fn id(&self) -> &'a PropertyId {
        &self.property.id
    }

    pub fn monthly_rent(&self) -> Decimal {
        self.property.monthly_rent
    }
}

pub fn property_options<'a>(
    eligible: &[EligibleProperty<'a>],
    policy: &AdvancePolicy,
) -> Vec<PropertyOption<'a>> {
    eligible
        .iter()
        .map(|entry| PropertyOption::from_eligible(*entry, policy))
        .collect()
}

/// A property option paired with the number of months currently advanced on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermAssignment<'a> {
    pub option: PropertyOption<'a>,
    pub months: u32,
}

impl<'a> TermAssignment<'a> {
    pub fn at_minimum(option: PropertyOption<'a>, policy: &AdvancePolicy) -> Self {
        Self {
            option,
            months: policy.min_months,
        }
    }

    pub fn at_maximum(option: PropertyOption<'a>) -> Self {
        Self {
            option,
            months: option.available_months,
        }
    }

    pub fn amount(&self, policy: &AdvancePolicy) -> Decimal {
        policy.advance_amount(self.option.monthly_rent(), self.months)
    }

    pub fn has_headroom(&self) -> bool {
        self.months < self.option.available_months
    }

    /// Amount gained by advancing one more month.
    pub fn next_month_gain(&self, policy: &AdvancePolicy) -> Decimal {
        let rent = self.option.monthly_rent();
        policy.advance_amount(rent, self.months + 1) - policy.advance_amount(rent, self.months)
    }
}

pub fn total_amount(assignments: &[TermAssignment<'_>], policy: &AdvancePolicy) -> Decimal {
    assignments
        .iter()
        .map(|assignment| assignment.amount(policy))
        .sum()
}
