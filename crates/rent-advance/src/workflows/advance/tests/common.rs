use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::workflows::advance::domain::{AdvancePolicy, OptimizationRequest, Property, PropertyId};
use crate::workflows::advance::eligibility::{assess, LEASE_MONTH_DAYS};
use crate::workflows::advance::result::OptimizationResult;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 24, 9, 30, 0)
        .single()
        .expect("valid evaluation time")
}

/// Lease end placed a few days past `months_left` whole lease months.
pub(super) fn lease_ending_in(months_left: i64) -> DateTime<Utc> {
    now() + Duration::days(months_left * LEASE_MONTH_DAYS + 3)
}

pub(super) fn property(id: &str, rent: i64, months_left: i64) -> Property {
    Property {
        id: PropertyId::new(id),
        monthly_rent: Decimal::from(rent),
        lease_end_date: Some(lease_ending_in(months_left)),
        has_active_advance: false,
        status: "active".to_string(),
    }
}

pub(super) fn request(properties: Vec<Property>, target: i64) -> OptimizationRequest {
    OptimizationRequest::new(properties, Decimal::from(target)).expect("valid request")
}

pub(super) fn id(value: &str) -> PropertyId {
    PropertyId::new(value)
}

/// Checks term bounds and recomputes the total from the allocations.
pub(super) fn assert_consistent(result: &OptimizationResult, request: &OptimizationRequest) {
    let policy = AdvancePolicy::standard();
    let mut expected_total = Decimal::ZERO;

    for allocation in &result.allocations {
        let property = request
            .properties()
            .iter()
            .find(|property| property.id == allocation.property_id)
            .expect("allocation references a submitted property");
        let eligible = assess(property, result.evaluated_at, &policy).expect("property eligible");
        let available = policy.clamp_months(eligible.remaining_months);

        assert!(allocation.term_months >= policy.min_months);
        assert!(allocation.term_months <= available);
        assert_eq!(allocation.available_months, available);

        let amount = policy.advance_amount(property.monthly_rent, allocation.term_months);
        assert_eq!(allocation.advance_amount, amount);
        expected_total += amount;
    }

    assert_eq!(result.total_amount, expected_total);
    assert_eq!(
        result.selected_property_ids().len(),
        result.allocations.len(),
        "selected ids are unique"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
