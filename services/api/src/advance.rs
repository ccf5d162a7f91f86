use crate::infra::{load_properties, parse_datetime, parse_term};
use chrono::{DateTime, Utc};
use clap::Args;
use rent_advance::config::AppConfig;
use rent_advance::error::AppError;
use rent_advance::workflows::advance::eligibility::assess;
use rent_advance::workflows::advance::{
    AdvanceOptimizer, AllocationOutcome, ManualSelection, OptimizationRequest,
    OptimizationResult, Property, PropertyAllocation, PropertyId,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct OptimizeArgs {
    /// JSON file holding the property portfolio
    #[arg(long)]
    pub(crate) properties: PathBuf,
    /// Requested advance amount
    #[arg(long)]
    pub(crate) target: Decimal,
    /// Evaluation time (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long, value_parser = parse_datetime)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// List every property with its eligibility before the suggestion
    #[arg(long)]
    pub(crate) list_properties: bool,
    /// Print the result as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SelectArgs {
    /// JSON file holding the property portfolio
    #[arg(long)]
    pub(crate) properties: PathBuf,
    /// Requested advance amount
    #[arg(long)]
    pub(crate) target: Decimal,
    /// Chosen term as PROPERTY=MONTHS (repeatable)
    #[arg(long = "term", value_parser = parse_term, required = true)]
    pub(crate) terms: Vec<(PropertyId, u32)>,
    /// Evaluation time (RFC 3339 or YYYY-MM-DD, defaults to now)
    #[arg(long, value_parser = parse_datetime)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), AppError> {
    let OptimizeArgs {
        properties,
        target,
        now,
        list_properties,
        json,
    } = args;

    let config = AppConfig::load()?;
    let optimizer = AdvanceOptimizer::new(config.advance);
    let now = now.unwrap_or_else(Utc::now);
    let request = OptimizationRequest::new(load_properties(&properties)?, target)?;

    if list_properties && !json {
        render_portfolio(request.properties(), &optimizer, now);
    }

    let result = optimizer.optimize(&request, now);
    if json {
        println!("{}", serde_json::to_string_pretty(&result.view())?);
    } else {
        render_optimization(&result);
    }
    Ok(())
}

pub(crate) fn run_select(args: SelectArgs) -> Result<(), AppError> {
    let SelectArgs {
        properties,
        target,
        terms,
        now,
    } = args;

    let config = AppConfig::load()?;
    let optimizer = AdvanceOptimizer::new(config.advance);
    let now = now.unwrap_or_else(Utc::now);
    let request = OptimizationRequest::new(load_properties(&properties)?, target)?;
    let terms: BTreeMap<PropertyId, u32> = terms.into_iter().collect();

    let selection = optimizer.evaluate_selection(&request, &terms, now)?;
    render_selection(&selection);
    Ok(())
}

fn render_portfolio(properties: &[Property], optimizer: &AdvanceOptimizer, now: DateTime<Utc>) {
    println!("Portfolio ({} properties, evaluated {})", properties.len(), now.to_rfc3339());
    for property in properties {
        let eligibility = match assess(property, now, optimizer.policy()) {
            Ok(eligible) => format!(
                "eligible, {} month(s) available",
                optimizer.policy().clamp_months(eligible.remaining_months)
            ),
            Err(reason) => format!("ineligible, {}", reason.summary()),
        };
        println!(
            "- {} | ${}/month | {}",
            property.id, property.monthly_rent, eligibility
        );
    }
    println!();
}

fn render_optimization(result: &OptimizationResult) {
    println!("Advance suggestion for ${}", result.target_amount);
    if result.allocations.is_empty() {
        println!("- {}", result.message());
        return;
    }

    render_allocations(&result.allocations);
    println!("Total: ${}", result.total_amount);

    match &result.outcome {
        AllocationOutcome::Reachable { strategy, .. } => {
            println!("Strategy: {}", strategy.label());
        }
        AllocationOutcome::CappedAtMaximum { .. } | AllocationOutcome::Shortfall { .. } => {
            println!("Strategy: maximum available");
        }
        AllocationOutcome::NoEligibleProperties => {}
    }
    println!("{}", result.message());
}

fn render_selection(selection: &ManualSelection) {
    println!("Manual selection against ${}", selection.target_amount);
    render_allocations(&selection.allocations);
    println!("Total: ${}", selection.total_amount);
    if selection.meets_target {
        println!("Target met (${} over)", selection.overage);
    } else {
        println!("Still needed: ${}", selection.remaining_amount);
    }
}

fn render_allocations(allocations: &[PropertyAllocation]) {
    for allocation in allocations {
        println!(
            "- {}: {} of {} month(s) at ${}/month -> ${}",
            allocation.property_id,
            allocation.term_months,
            allocation.available_months,
            allocation.monthly_rent,
            allocation.advance_amount
        );
    }
}
