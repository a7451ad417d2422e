use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use kyc_aml::compliance::{
    compliance_router, ComplianceService, HealthReport, IdentityAuthority, RiskScreener,
    VerificationStore,
};

pub(crate) fn with_service_routes<S, C, A>(service: Arc<ComplianceService<S, C, A>>) -> axum::Router
where
    S: VerificationStore + 'static,
    C: IdentityAuthority + 'static,
    A: RiskScreener + 'static,
{
    compliance_router(service)
        .route("/", axum::routing::get(root_endpoint))
        .route("/health", axum::routing::get(health_endpoint))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn root_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "KYC/AML Compliance Service",
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": ["auth-service", "payment-service"],
    }))
}

pub(crate) async fn health_endpoint(Extension(state): Extension<AppState>) -> Json<HealthReport> {
    Json(state.health.report().await)
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use kyc_aml::compliance::{AggregateHealth, DependencyProbe, HealthMonitor, ProbeFailure};

    struct StubProbe {
        name: &'static str,
        healthy: bool,
    }

    #[async_trait]
    impl DependencyProbe for StubProbe {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn probe(&self) -> Result<(), ProbeFailure> {
            if self.healthy {
                Ok(())
            } else {
                Err(ProbeFailure::Timeout)
            }
        }
    }

    fn app_state(ready: bool, payment_healthy: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            health: HealthMonitor::new(
                Arc::new(StubProbe {
                    name: "auth-service",
                    healthy: true,
                }),
                Arc::new(StubProbe {
                    name: "payment-service",
                    healthy: payment_healthy,
                }),
            ),
        }
    }

    #[tokio::test]
    async fn readiness_endpoint_reports_initializing_until_flagged() {
        let state = app_state(false, true);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_endpoint_degrades_but_never_fails() {
        let state = app_state(true, false);
        let Json(report) = health_endpoint(Extension(state)).await;
        assert_eq!(report.status, AggregateHealth::Degraded);
    }

    #[tokio::test]
    async fn root_endpoint_lists_upstream_dependencies() {
        let Json(body) = root_endpoint().await;
        assert_eq!(body["dependencies"][0], "auth-service");
        assert_eq!(body["dependencies"][1], "payment-service");
    }
}
