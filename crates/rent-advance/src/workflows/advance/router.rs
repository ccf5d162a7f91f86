use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::domain::{OptimizationRequest, Property, PropertyId};
use super::manual::ManualSelection;
use super::optimizer::AdvanceOptimizer;
use super::result::OptimizationResultView;
use crate::error::AppError;

/// Body accepted by the optimize endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeAdvancePayload {
    pub target_amount: Decimal,
    pub properties: Vec<Property>,
    /// Evaluation time; the server clock is used when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Body accepted by the manual selection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualSelectionPayload {
    pub target_amount: Decimal,
    pub properties: Vec<Property>,
    pub terms: BTreeMap<PropertyId, u32>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Router exposing the optimizer and the manual selection calculator.
pub fn advance_router(optimizer: Arc<AdvanceOptimizer>) -> Router {
    Router::new()
        .route("/api/v1/advances/optimize", post(optimize_handler))
        .route("/api/v1/advances/selection", post(selection_handler))
        .with_state(optimizer)
}

pub(crate) async fn optimize_handler(
    State(optimizer): State<Arc<AdvanceOptimizer>>,
    Json(payload): Json<OptimizeAdvancePayload>,
) -> Result<Json<OptimizationResultView>, AppError> {
    let OptimizeAdvancePayload {
        target_amount,
        properties,
        now,
    } = payload;

    let request = OptimizationRequest::new(properties, target_amount)?;
    let result = optimizer.optimize(&request, now.unwrap_or_else(Utc::now));
    Ok(Json(result.view()))
}

pub(crate) async fn selection_handler(
    State(optimizer): State<Arc<AdvanceOptimizer>>,
    Json(payload): Json<ManualSelectionPayload>,
) -> Result<Json<ManualSelection>, AppError> {
    let ManualSelectionPayload {
        target_amount,
        properties,
        terms,
        now,
    } = payload;

    let request = OptimizationRequest::new(properties, target_amount)?;
    let selection =
        optimizer.evaluate_selection(&request, &terms, now.unwrap_or_else(Utc::now))?;
    Ok(Json(selection))
}
