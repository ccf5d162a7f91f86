use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_advance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rent_advance::config::AppConfig;
use rent_advance::error::AppError;
use rent_advance::telemetry;
use rent_advance::workflows::advance::AdvanceOptimizer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let optimizer = Arc::new(AdvanceOptimizer::new(config.advance));
    let app = with_advance_routes(optimizer)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        min_months = config.advance.min_months,
        max_months = config.advance.max_months,
        advance_rate = %config.advance.advance_rate,
        "rent advance optimizer ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
