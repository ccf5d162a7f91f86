//! Extends term-months on an already chosen subset until the target is covered.
//!
//! Each round either finishes with the cheapest single-month step that crosses the target
//! or spends one month on the highest-rent property that still has headroom. The search
//! is bounded by the month headroom of the subset and does not look for the globally
//! smallest overage.

use super::bounds::{total_amount, TermAssignment};
use super::domain::AdvancePolicy;
use rust_decimal::Decimal;
use tracing::trace;

/// `initial` must be ordered by rent, highest first.
pub fn distribute_months<'a>(
    initial: &[TermAssignment<'a>],
    target: Decimal,
    policy: &AdvancePolicy,
) -> Vec<TermAssignment<'a>> {
    let mut assignments = initial.to_vec();
    let mut running_total = total_amount(&assignments, policy);

    while running_total < target {
        let Some(step) = next_step(&assignments, running_total, target, policy) else {
            trace!(%running_total, %target, "every selected property is at its cap");
            break;
        };

        assignments[step.index].months += 1;
        running_total += step.gain;

        if step.closes_gap {
            break;
        }
    }

    assignments
}

#[derive(Debug, Clone, Copy)]
struct Step {
    index: usize,
    gain: Decimal,
    closes_gap: bool,
}

fn next_step(
    assignments: &[TermAssignment<'_>],
    running_total: Decimal,
    target: Decimal,
    policy: &AdvancePolicy,
) -> Option<Step> {
    let mut closing: Option<Step> = None;
    let mut highest_rent: Option<Step> = None;

    for (index, assignment) in assignments.iter().enumerate() {
        if !assignment.has_headroom() {
            continue;
        }

        let gain = assignment.next_month_gain(policy);
        if running_total + gain >= target {
            if closing.map_or(true, |best| gain < best.gain) {
                closing = Some(Step {
                    index,
                    gain,
                    closes_gap: true,
                });
            }
        } else if highest_rent.is_none() {
            highest_rent = Some(Step {
                index,
                gain,
                closes_gap: false,
            });
        }
    }

    closing.or(highest_rent)
}
