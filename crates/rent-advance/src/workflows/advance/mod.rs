//! Allocation of a cash target across rental properties as rent advances.
//!
//! The optimizer filters eligible properties, derives each property's term bounds, picks
//! the fewest high-rent properties at the minimum term, extends terms on that subset, and
//! falls back to maximum terms with a trim when the subset cannot cover the target.

pub mod bounds;
pub mod distribution;
pub mod domain;
pub mod eligibility;
pub mod fallback;
pub mod greedy;
pub mod manual;
mod optimizer;
pub mod result;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{
    AdvancePolicy, AdvanceRequestError, OptimizationRequest, Property, PropertyId,
    MAX_CURRENCY_AMOUNT,
};
pub use eligibility::IneligibilityReason;
pub use manual::{ManualSelection, SelectionError};
pub use optimizer::{optimize_property_selection, AdvanceOptimizer};
pub use result::{
    AllocationOutcome, OptimizationResult, OptimizationResultView, PropertyAllocation,
    SelectionStrategy, NO_ELIGIBLE_PROPERTIES_MESSAGE,
};
pub use router::advance_router;
