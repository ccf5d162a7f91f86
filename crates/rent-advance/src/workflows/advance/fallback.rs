use super::bounds::{PropertyOption, TermAssignment};
use super::domain::AdvancePolicy;
use rust_decimal::prelude::ToPrimitive as _;
use rust_decimal::Decimal;
use tracing::trace;

/// Adds ranked options at their longest term until `target` is crossed, then shortens
/// the term of the option that crossed it.
///
/// If every option is used and the target is still out of reach, the full selection is
/// returned as is.
pub fn fill_at_maximum_terms<'a>(
    ranked: &[PropertyOption<'a>],
    target: Decimal,
    policy: &AdvancePolicy,
) -> Vec<TermAssignment<'a>> {
    let mut selected = Vec::new();
    let mut running_total = Decimal::ZERO;

    for option in ranked {
        selected.push(TermAssignment::at_maximum(*option));
        running_total += option.max_advance;

        if running_total >= target {
            if let Some(last) = selected.last_mut() {
                trim_crossing_term(last, running_total, target, policy);
            }
            break;
        }
    }

    selected
}

fn trim_crossing_term(
    crossing: &mut TermAssignment<'_>,
    running_total: Decimal,
    target: Decimal,
    policy: &AdvancePolicy,
) {
    let monthly = policy.monthly_advance(crossing.option.monthly_rent());
    if monthly <= Decimal::ZERO {
        return;
    }

    let excess = running_total - target;
    let Some(mut months_to_reduce) = excess
        .checked_div(monthly)
        .and_then(|months| months.floor().to_u32())
    else {
        return;
    };
    let trimmed = crossing.months.checked_sub(months_to_reduce);
    if months_to_reduce == 0 || trimmed.map_or(true, |months| months < policy.min_months) {
        return;
    }

    // Flooring each amount can cost a fraction, so back off until the target still holds.
    let others = running_total - crossing.option.max_advance;
    while months_to_reduce > 0 {
        let reduced = crossing.months - months_to_reduce;
        if others + policy.advance_amount(crossing.option.monthly_rent(), reduced) >= target {
            trace!(
                property_id = %crossing.option.id(),
                from = crossing.months,
                to = reduced,
                "trimmed crossing term"
            );
            crossing.months = reduced;
            return;
        }
        months_to_reduce -= 1;
    }
}
