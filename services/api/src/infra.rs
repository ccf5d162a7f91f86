use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use rent_advance::error::AppError;
use rent_advance::workflows::advance::{Property, PropertyId};
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}

/// Parses an operator term choice written as `property-id=months`.
pub(crate) fn parse_term(raw: &str) -> Result<(PropertyId, u32), String> {
    let (id, months) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PROPERTY=MONTHS, received '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing property id in '{raw}'"));
    }
    let months = months
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid month count in '{raw}' ({err})"))?;
    Ok((PropertyId::new(id), months))
}

pub(crate) fn load_properties(path: &Path) -> Result<Vec<Property>, AppError> {
    let raw = fs::read_to_string(path)?;
    let properties = serde_json::from_str(&raw)?;
    Ok(properties)
}
