use std::sync::Arc;

use async_trait::async_trait;

use crate::compliance::health::{
    AggregateHealth, DependencyHealth, DependencyProbe, HealthMonitor, ProbeFailure,
};

struct StubProbe {
    name: &'static str,
    healthy: bool,
}

impl StubProbe {
    fn healthy(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            healthy: true,
        })
    }

    fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            healthy: false,
        })
    }
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

#[tokio::test]
async fn report_is_healthy_when_all_probes_pass() {
    let monitor = HealthMonitor::new(
        StubProbe::healthy("auth-service"),
        StubProbe::healthy("payment-service"),
    );

    let report = monitor.report().await;

    assert_eq!(report.status, AggregateHealth::Healthy);
    assert_eq!(
        report.dependencies["auth-service"],
        DependencyHealth::Healthy
    );
    assert_eq!(
        report.dependencies["payment-service"],
        DependencyHealth::Healthy
    );
}

#[tokio::test]
async fn single_probe_failure_degrades_the_aggregate() {
    let monitor = HealthMonitor::new(
        StubProbe::healthy("auth-service"),
        StubProbe::failing("payment-service"),
    );

    let report = monitor.report().await;

    assert_eq!(report.status, AggregateHealth::Degraded);
    assert_eq!(
        report.dependencies["auth-service"],
        DependencyHealth::Healthy
    );
    assert_eq!(
        report.dependencies["payment-service"],
        DependencyHealth::Unhealthy
    );
}

#[tokio::test]
async fn report_serializes_expected_labels() {
    let monitor = HealthMonitor::new(
        StubProbe::failing("auth-service"),
        StubProbe::failing("payment-service"),
    );

    let report = monitor.report().await;
    let value = serde_json::to_value(&report).expect("serializes");

    assert_eq!(value["status"], "degraded");
    assert_eq!(value["service"], "kyc-aml-service");
    assert_eq!(value["dependencies"]["auth-service"], "unhealthy");
    assert!(value["timestamp"].is_string());
}
