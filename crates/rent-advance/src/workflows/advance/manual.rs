use super::bounds::{total_amount, PropertyOption, TermAssignment};
use super::domain::{AdvancePolicy, OptimizationRequest, PropertyId};
use super::eligibility::{assess, IneligibilityReason};
use super::result::PropertyAllocation;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running total for a selection adjusted by an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSelection {
    pub allocations: Vec<PropertyAllocation>,
    pub total_amount: Decimal,
    pub target_amount: Decimal,
    pub remaining_amount: Decimal,
    pub overage: Decimal,
    pub meets_target: bool,
}

/// Operator override that cannot be honored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("property {0} is not part of the request")]
    UnknownProperty(PropertyId),
    #[error("property {property_id} is not eligible: {}", .reason.summary())]
    IneligibleProperty {
        property_id: PropertyId,
        reason: IneligibilityReason,
    },
    #[error("property {property_id} term of {requested} month(s) is outside {min}..={max}")]
    TermOutOfRange {
        property_id: PropertyId,
        requested: u32,
        min: u32,
        max: u32,
    },
}

/// Checks each `terms` entry against the property's bounds and totals the selection.
pub fn evaluate_selection(
    request: &OptimizationRequest,
    terms: &BTreeMap<PropertyId, u32>,
    now: DateTime<Utc>,
    policy: &AdvancePolicy,
) -> Result<ManualSelection, SelectionError> {
    let mut chosen = Vec::with_capacity(terms.len());

    for (property_id, &months) in terms {
        let property = request
            .properties()
            .iter()
            .find(|property| &property.id == property_id)
            .ok_or_else(|| SelectionError::UnknownProperty(property_id.clone()))?;

        let eligible = assess(property, now, policy).map_err(|reason| {
            SelectionError::IneligibleProperty {
                property_id: property_id.clone(),
                reason,
            }
        })?;

        let option = PropertyOption::from_eligible(eligible, policy);
        if months < policy.min_months || months > option.available_months {
            return Err(SelectionError::TermOutOfRange {
                property_id: property_id.clone(),
                requested: months,
                min: policy.min_months,
                max: option.available_months,
            });
        }

        chosen.push((option, months));
    }

    chosen.sort_by(|(left, _), (right, _)| right.monthly_rent().cmp(&left.monthly_rent()));
    let assignments: Vec<TermAssignment<'_>> = chosen
        .into_iter()
        .map(|(option, months)| TermAssignment { option, months })
        .collect();

    let target_amount = request.target_amount();
    let total = total_amount(&assignments, policy);

    Ok(ManualSelection {
        allocations: assignments
            .iter()
            .map(|assignment| PropertyAllocation::from_assignment(assignment, policy))
            .collect(),
        total_amount: total,
        target_amount,
        remaining_amount: (target_amount - total).max(Decimal::ZERO),
        overage: (total - target_amount).max(Decimal::ZERO),
        meets_target: total >= target_amount,
    })
}
