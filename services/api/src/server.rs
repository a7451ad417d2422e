use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use kyc_aml::compliance::{
    ComplianceService, HealthMonitor, HttpIdentityAuthority, HttpPaymentService,
    MemoryVerificationStore, StaticRiskScreener,
};
use kyc_aml::config::AppConfig;
use kyc_aml::error::AppError;
use kyc_aml::telemetry;

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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let identity = Arc::new(HttpIdentityAuthority::new(
        config.upstream.auth_base_url.as_str(),
    )?);
    let payment = Arc::new(HttpPaymentService::new(
        config.upstream.payment_base_url.as_str(),
    )?);
    let store = Arc::new(MemoryVerificationStore::default());
    let screener = Arc::new(StaticRiskScreener::default());
    let service = Arc::new(ComplianceService::new(store, identity.clone(), screener));

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        health: HealthMonitor::new(identity, payment),
    };

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "kyc/aml compliance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
