use super::common::*;
use rust_decimal::Decimal;

use crate::workflows::advance::bounds::property_options;
use crate::workflows::advance::domain::{AdvancePolicy, Property};
use crate::workflows::advance::eligibility::eligible_properties;
use crate::workflows::advance::fallback::fill_at_maximum_terms;
use crate::workflows::advance::greedy::rank_by_rent;
use crate::workflows::advance::{
    optimize_property_selection, AdvanceOptimizer, AllocationOutcome, OptimizationResult,
    SelectionStrategy, MAX_CURRENCY_AMOUNT, NO_ELIGIBLE_PROPERTIES_MESSAGE,
};

#[test]
fn single_property_extends_term_until_target_is_covered() {
    let request = request(vec![property("a", 3000, 11)], 20_000);
    let result = optimize_property_selection(&request, now());

    assert_eq!(result.term_months_by_property().get(&id("a")), Some(&8));
    assert_eq!(result.total_amount, Decimal::from(21_600));
    assert_eq!(
        result.outcome,
        AllocationOutcome::Reachable {
            strategy: SelectionStrategy::Distributed,
            overage: Decimal::from(1600),
        }
    );
    assert!(!result.is_exact_match());
    assert_consistent(&result, &request);
}

#[test]
fn long_leases_are_capped_at_eleven_months() {
    let request = request(vec![property("a", 3000, 30)], 20_000);
    let result = optimize_property_selection(&request, now());

    assert_eq!(result.allocations[0].available_months, 11);
    assert_eq!(result.allocations[0].term_months, 8);
    assert_consistent(&result, &request);
}

#[test]
fn empty_portfolio_returns_zero_result() {
    let request = request(Vec::new(), 5000);
    let result = optimize_property_selection(&request, now());

    assert!(result.selected_property_ids().is_empty());
    assert_eq!(result.total_amount, Decimal::ZERO);
    assert_eq!(result.outcome, AllocationOutcome::NoEligibleProperties);
    assert_eq!(result.message(), NO_ELIGIBLE_PROPERTIES_MESSAGE);
}

#[test]
fn portfolio_of_ineligible_properties_returns_zero_result() {
    let mut active = property("active", 4000, 11);
    active.has_active_advance = true;
    let mut open_ended = property("open", 4000, 11);
    open_ended.lease_end_date = None;
    let ending = property("ending", 4000, 1);

    let request = request(vec![active, open_ended, ending], 5000);
    let result = optimize_property_selection(&request, now());

    assert_eq!(result.outcome, AllocationOutcome::NoEligibleProperties);
    assert_eq!(result.message(), "No eligible properties available for advance");
}

#[test]
fn target_above_ceiling_selects_everything_at_maximum() {
    let request = request(
        vec![property("a", 5000, 11), property("b", 2000, 11)],
        80_000,
    );
    let result = optimize_property_selection(&request, now());

    assert_eq!(result.allocations.len(), 2);
    assert!(result.allocations.iter().all(|a| a.term_months == 11));
    assert_eq!(result.total_amount, Decimal::from(69_300));
    assert!(!result.is_exact_match());
    assert_eq!(
        result.outcome,
        AllocationOutcome::CappedAtMaximum {
            maximum_available: Decimal::from(69_300),
        }
    );
    assert_eq!(
        result.message(),
        "Maximum available is $69300. Selected all properties at maximum terms."
    );
    assert_consistent(&result, &request);
}

#[test]
fn minimum_terms_on_highest_rents_can_match_exactly() {
    let request = request(
        vec![
            property("c", 1000, 11),
            property("a", 3000, 11),
            property("b", 2000, 11),
        ],
        9000,
    );
    let result = optimize_property_selection(&request, now());

    let ids: Vec<&str> = result
        .allocations
        .iter()
        .map(|allocation| allocation.property_id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(result.allocations.iter().all(|a| a.term_months == 2));
    assert!(result.is_exact_match());
    assert_eq!(
        result.outcome,
        AllocationOutcome::Reachable {
            strategy: SelectionStrategy::Greedy,
            overage: Decimal::ZERO,
        }
    );
    assert_eq!(
        result.message(),
        "Exact match: selected 2 properties totaling $9000."
    );
}

#[test]
fn fewest_properties_are_touched_when_one_suffices() {
    let request = request(
        vec![
            property("c", 1000, 11),
            property("a", 3000, 11),
            property("b", 2000, 11),
        ],
        5000,
    );
    let result = optimize_property_selection(&request, now());

    assert_eq!(result.selected_property_ids().len(), 1);
    assert!(result.selected_property_ids().contains(&id("a")));
    assert_eq!(result.total_amount, Decimal::from(5400));
}

#[test]
fn ineligible_properties_are_skipped_before_selection() {
    let mut active = property("active", 10_000, 11);
    active.has_active_advance = true;
    let request = request(
        vec![active, property("ending", 9000, 1), property("e", 1500, 6)],
        4000,
    );
    let result = optimize_property_selection(&request, now());

    assert_eq!(result.term_months_by_property().len(), 1);
    assert_eq!(result.term_months_by_property().get(&id("e")), Some(&3));
    assert_eq!(result.total_amount, Decimal::from(4050));
    assert_consistent(&result, &request);
}

#[test]
fn short_lease_caps_high_rent_and_shifts_months_to_others() {
    let request = request(
        vec![property("high", 2000, 3), property("low", 500, 11)],
        7000,
    );
    let result = optimize_property_selection(&request, now());

    let terms = result.term_months_by_property();
    assert_eq!(terms.get(&id("high")), Some(&3));
    assert_eq!(terms.get(&id("low")), Some(&4));
    assert_eq!(result.total_amount, Decimal::from(7200));
    assert_consistent(&result, &request);
}

#[test]
fn target_equal_to_ceiling_is_reached_exactly() {
    let request = request(
        vec![property("a", 5000, 11), property("b", 2000, 11)],
        69_300,
    );
    let result = optimize_property_selection(&request, now());

    assert!(result.is_exact_match());
    assert!(result.allocations.iter().all(|a| a.term_months == 11));
    assert!(matches!(
        result.outcome,
        AllocationOutcome::Reachable {
            strategy: SelectionStrategy::Distributed,
            ..
        }
    ));
}

#[test]
fn repeated_runs_with_frozen_time_are_identical() {
    let request = request(
        vec![
            property("a", 2750, 7),
            property("b", 2750, 9),
            property("c", 1325, 11),
            property("d", 990, 4),
        ],
        23_456,
    );

    let first = optimize_property_selection(&request, now());
    let second = optimize_property_selection(&request, now());
    assert_eq!(first, second);
    assert_eq!(first.view(), second.view());
}

#[test]
fn custom_policy_changes_bounds_and_rate() {
    let policy = AdvancePolicy::new(3, 6, Decimal::new(8, 1)).expect("valid policy");
    let optimizer = AdvanceOptimizer::new(policy);
    let request = request(vec![property("a", 1000, 11), property("b", 800, 2)], 4000);

    let result = optimizer.optimize(&request, now());

    // "b" has fewer than three months left; "a" runs 3 months (2400) up to 5 (4000).
    assert_eq!(result.term_months_by_property().len(), 1);
    assert_eq!(result.allocations[0].available_months, 6);
    assert_eq!(result.allocations[0].term_months, 5);
    assert!(result.is_exact_match());
}

#[test]
fn largest_accepted_amounts_are_optimized_without_overflow() {
    let half = MAX_CURRENCY_AMOUNT / 2;
    let request = request(
        vec![property("a", half, 11), property("b", half, 11)],
        MAX_CURRENCY_AMOUNT,
    );

    let result = optimize_property_selection(&request, now());

    // Minimum terms give 9e14 each; the second property covers the 1e15 target.
    assert_eq!(result.total_amount, Decimal::from(1_800_000_000_000_000_i64));
    assert_eq!(
        result.outcome,
        AllocationOutcome::Reachable {
            strategy: SelectionStrategy::Greedy,
            overage: Decimal::from(800_000_000_000_000_i64),
        }
    );
    assert_consistent(&result, &request);

    let long_terms = AdvancePolicy::new(2, u32::MAX, Decimal::ONE).expect("valid policy");
    let full_rate = AdvanceOptimizer::new(long_terms).optimize(&request, now());
    assert!(full_rate.is_exact_match());
    assert_eq!(full_rate.allocations.len(), 1);
    assert_eq!(full_rate.allocations[0].term_months, 2);
    assert_eq!(full_rate.allocations[0].available_months, 11);
}

fn fallback_result(properties: &[Property], target: i64) -> OptimizationResult {
    let policy = AdvancePolicy::standard();
    let eligible = eligible_properties(properties, now(), &policy);
    let ranked = rank_by_rent(property_options(&eligible, &policy));
    let selected = fill_at_maximum_terms(&ranked, Decimal::from(target), &policy);
    OptimizationResult::covering(
        &selected,
        SelectionStrategy::Fallback,
        Decimal::from(target),
        &policy,
        now(),
    )
}

#[test]
fn fallback_reports_trimmed_reachable_selection() {
    let properties = vec![property("second", 1000, 11), property("first", 2000, 11)];
    let result = fallback_result(&properties, 25_000);

    let terms = result.term_months_by_property();
    assert_eq!(terms.get(&id("first")), Some(&11));
    assert_eq!(terms.get(&id("second")), Some(&6));
    assert_eq!(
        result.outcome,
        AllocationOutcome::Reachable {
            strategy: SelectionStrategy::Fallback,
            overage: Decimal::from(200),
        }
    );
}

#[test]
fn fallback_reports_shortfall_when_portfolio_is_exhausted() {
    let properties = vec![property("only", 2000, 5)];
    let result = fallback_result(&properties, 20_000);

    assert_eq!(result.total_amount, Decimal::from(9000));
    assert_eq!(
        result.outcome,
        AllocationOutcome::Shortfall {
            shortfall: Decimal::from(11_000),
        }
    );
    assert!(result.message().contains("$11000 short"));
}
