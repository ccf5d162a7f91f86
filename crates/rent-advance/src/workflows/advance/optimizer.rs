use super::bounds::{property_options, total_amount};
use super::distribution::distribute_months;
use super::domain::{AdvancePolicy, OptimizationRequest, PropertyId};
use super::eligibility::eligible_properties;
use super::fallback::fill_at_maximum_terms;
use super::greedy::{global_ceiling, rank_by_rent, select_all_at_maximum, select_at_minimum_terms};
use super::manual::{evaluate_selection, ManualSelection, SelectionError};
use super::result::{OptimizationResult, SelectionStrategy};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Stateless optimizer applying one [`AdvancePolicy`] to each request.
#[derive(Debug, Clone, Default)]
pub struct AdvanceOptimizer {
    policy: AdvancePolicy,
}

impl AdvanceOptimizer {
    pub fn new(policy: AdvancePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AdvancePolicy {
        &self.policy
    }

    /// Suggests properties and terms covering the request's target amount.
    ///
    /// Decision order: no eligible properties, target above the portfolio ceiling,
    /// minimum terms, distributed terms, then maximum terms with a trim. The last branch
    /// may still fall short, which is reported in the outcome rather than as an error.
    pub fn optimize(&self, request: &OptimizationRequest, now: DateTime<Utc>) -> OptimizationResult {
        let policy = &self.policy;
        let target = request.target_amount();

        let eligible = eligible_properties(request.properties(), now, policy);
        if eligible.is_empty() {
            debug!(
                submitted = request.properties().len(),
                "no eligible properties for advance"
            );
            return OptimizationResult::no_eligible_properties(target, now);
        }

        let ranked = rank_by_rent(property_options(&eligible, policy));
        let ceiling = global_ceiling(&ranked);
        if target > ceiling {
            debug!(%target, %ceiling, "target exceeds portfolio ceiling");
            return OptimizationResult::capped(&select_all_at_maximum(&ranked), target, policy, now);
        }

        let greedy = select_at_minimum_terms(&ranked, target, policy);
        if total_amount(&greedy, policy) >= target {
            debug!(selected = greedy.len(), "target covered at minimum terms");
            return OptimizationResult::covering(
                &greedy,
                SelectionStrategy::Greedy,
                target,
                policy,
                now,
            );
        }

        let distributed = distribute_months(&greedy, target, policy);
        if total_amount(&distributed, policy) >= target {
            debug!(selected = distributed.len(), "target covered by distributing months");
            return OptimizationResult::covering(
                &distributed,
                SelectionStrategy::Distributed,
                target,
                policy,
                now,
            );
        }

        let fallback = fill_at_maximum_terms(&ranked, target, policy);
        debug!(selected = fallback.len(), "using maximum-term fallback");
        OptimizationResult::covering(&fallback, SelectionStrategy::Fallback, target, policy, now)
    }

    pub fn evaluate_selection(
        &self,
        request: &OptimizationRequest,
        terms: &BTreeMap<PropertyId, u32>,
        now: DateTime<Utc>,
    ) -> Result<ManualSelection, SelectionError> {
        evaluate_selection(request, terms, now, &self.policy)
    }
}

/// Runs the optimizer with the standard two to eleven month, 90% policy.
pub fn optimize_property_selection(
    request: &OptimizationRequest,
    now: DateTime<Utc>,
) -> OptimizationResult {
    AdvanceOptimizer::default().optimize(request, now)
}
