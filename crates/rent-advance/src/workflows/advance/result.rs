use super::bounds::{total_amount, TermAssignment};
use super::domain::{AdvancePolicy, PropertyId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const NO_ELIGIBLE_PROPERTIES_MESSAGE: &str = "No eligible properties available for advance";

/// Pass that produced a selection covering the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    Greedy,
    Distributed,
    Fallback,
}

impl SelectionStrategy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Greedy => "Minimum terms",
            Self::Distributed => "Distributed terms",
            Self::Fallback => "Maximum terms with trim",
        }
    }
}

/// How an optimization run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationOutcome {
    NoEligibleProperties,
    Reachable {
        strategy: SelectionStrategy,
        overage: Decimal,
    },
    CappedAtMaximum {
        maximum_available: Decimal,
    },
    Shortfall {
        shortfall: Decimal,
    },
}

/// One selected property with the term assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAllocation {
    pub property_id: PropertyId,
    pub monthly_rent: Decimal,
    pub term_months: u32,
    pub available_months: u32,
    pub advance_amount: Decimal,
}

impl PropertyAllocation {
    pub(crate) fn from_assignment(assignment: &TermAssignment<'_>, policy: &AdvancePolicy) -> Self {
        Self {
            property_id: assignment.option.id().clone(),
            monthly_rent: assignment.option.monthly_rent(),
            term_months: assignment.months,
            available_months: assignment.option.available_months,
            advance_amount: assignment.amount(policy),
        }
    }
}

/// Suggested selection for a target amount. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationResult {
    pub target_amount: Decimal,
    pub total_amount: Decimal,
    /// Ordered by monthly rent, highest first.
    pub allocations: Vec<PropertyAllocation>,
    pub outcome: AllocationOutcome,
    pub evaluated_at: DateTime<Utc>,
}

impl OptimizationResult {
    pub(crate) fn no_eligible_properties(target_amount: Decimal, now: DateTime<Utc>) -> Self {
        Self {
            target_amount,
            total_amount: Decimal::ZERO,
            allocations: Vec::new(),
            outcome: AllocationOutcome::NoEligibleProperties,
            evaluated_at: now,
        }
    }

    pub(crate) fn capped(
        assignments: &[TermAssignment<'_>],
        target_amount: Decimal,
        policy: &AdvancePolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let total_amount = total_amount(assignments, policy);
        Self::assemble(
            assignments,
            target_amount,
            total_amount,
            AllocationOutcome::CappedAtMaximum {
                maximum_available: total_amount,
            },
            policy,
            now,
        )
    }

    /// Reachable when the selection covers the target, otherwise a shortfall.
    pub(crate) fn covering(
        assignments: &[TermAssignment<'_>],
        strategy: SelectionStrategy,
        target_amount: Decimal,
        policy: &AdvancePolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let total_amount = total_amount(assignments, policy);
        let outcome = if total_amount >= target_amount {
            AllocationOutcome::Reachable {
                strategy,
                overage: total_amount - target_amount,
            }
        } else {
            AllocationOutcome::Shortfall {
                shortfall: target_amount - total_amount,
            }
        };
        Self::assemble(assignments, target_amount, total_amount, outcome, policy, now)
    }

    fn assemble(
        assignments: &[TermAssignment<'_>],
        target_amount: Decimal,
        total_amount: Decimal,
        outcome: AllocationOutcome,
        policy: &AdvancePolicy,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            target_amount,
            total_amount,
            allocations: assignments
                .iter()
                .map(|assignment| PropertyAllocation::from_assignment(assignment, policy))
                .collect(),
            outcome,
            evaluated_at: now,
        }
    }

    pub fn is_exact_match(&self) -> bool {
        self.total_amount == self.target_amount
    }

    pub fn selected_property_ids(&self) -> BTreeSet<PropertyId> {
        self.allocations
            .iter()
            .map(|allocation| allocation.property_id.clone())
            .collect()
    }

    pub fn term_months_by_property(&self) -> BTreeMap<PropertyId, u32> {
        self.allocations
            .iter()
            .map(|allocation| (allocation.property_id.clone(), allocation.term_months))
            .collect()
    }

    pub fn message(&self) -> String {
        let count = self.allocations.len();
        let noun = if count == 1 { "property" } else { "properties" };

        match &self.outcome {
            AllocationOutcome::NoEligibleProperties => NO_ELIGIBLE_PROPERTIES_MESSAGE.to_string(),
            AllocationOutcome::CappedAtMaximum { maximum_available } => format!(
                "Maximum available is ${maximum_available}. Selected all properties at maximum terms."
            ),
            AllocationOutcome::Reachable { overage, .. } if overage.is_zero() => format!(
                "Exact match: selected {count} {noun} totaling ${}.",
                self.total_amount
            ),
            AllocationOutcome::Reachable { overage, .. } => format!(
                "Selected {count} {noun} totaling ${} (${overage} above the ${} target).",
                self.total_amount, self.target_amount
            ),
            AllocationOutcome::Shortfall { shortfall } => format!(
                "Unable to reach the ${} target. Selected {count} {noun} totaling ${} (${shortfall} short).",
                self.target_amount, self.total_amount
            ),
        }
    }

    pub fn view(&self) -> OptimizationResultView {
        OptimizationResultView {
            selected_property_ids: self.selected_property_ids(),
            term_months_by_property: self.term_months_by_property(),
            allocations: self.allocations.clone(),
            total_amount: self.total_amount,
            target_amount: self.target_amount,
            is_exact_match: self.is_exact_match(),
            message: self.message(),
            outcome: self.outcome.clone(),
            evaluated_at: self.evaluated_at,
        }
    }
}

/// Serializable shape handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResultView {
    pub selected_property_ids: BTreeSet<PropertyId>,
    pub term_months_by_property: BTreeMap<PropertyId, u32>,
    pub allocations: Vec<PropertyAllocation>,
    pub total_amount: Decimal,
    pub target_amount: Decimal,
    pub is_exact_match: bool,
    pub message: String,
    pub outcome: AllocationOutcome,
    pub evaluated_at: DateTime<Utc>,
}
