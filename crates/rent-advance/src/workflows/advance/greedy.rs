use super::bounds::{total_amount, PropertyOption, TermAssignment};
use super::domain::AdvancePolicy;
use rust_decimal::Decimal;

/// Orders options by monthly rent, highest first. Equal rents keep their input order.
pub fn rank_by_rent<'a>(mut options: Vec<PropertyOption<'a>>) -> Vec<PropertyOption<'a>> {
    options.sort_by(|left, right| right.monthly_rent().cmp(&left.monthly_rent()));
    options
}

/// Sum of every option's maximum advance.
pub fn global_ceiling(options: &[PropertyOption<'_>]) -> Decimal {
    options.iter().map(|option| option.max_advance).sum()
}

/// Every option at its longest available term.
pub fn select_all_at_maximum<'a>(ranked: &[PropertyOption<'a>]) -> Vec<TermAssignment<'a>> {
    ranked
        .iter()
        .copied()
        .map(TermAssignment::at_maximum)
        .collect()
}

/// Takes ranked options at the minimum term until the running total reaches `target`
/// or the options run out.
pub fn select_at_minimum_terms<'a>(
    ranked: &[PropertyOption<'a>],
    target: Decimal,
    policy: &AdvancePolicy,
) -> Vec<TermAssignment<'a>> {
    let mut selected = Vec::new();
    let mut running_total = Decimal::ZERO;

    for option in ranked {
        if running_total >= target {
            break;
        }
        running_total += option.min_advance;
        selected.push(TermAssignment::at_minimum(*option, policy));
    }

    debug_assert_eq!(running_total, total_amount(&selected, policy));
    selected
}
