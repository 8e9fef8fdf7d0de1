use crate::cli::ServeArgs;
use crate::infra::{resolve_rules, AppState, XpState};
use crate::routes::xp_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use questlog_xp::config::AppConfig;
use questlog_xp::error::AppError;
use questlog_xp::telemetry;
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

    let rules = resolve_rules(None, &config)?;
    rules.validate()?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };
    let xp_state = XpState {
        rules: Arc::new(rules),
    };

    let app = xp_router(xp_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "quest log xp service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
