use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const SERVICE_NAME: &str = "kyc-aml-service";

/// Reachability probe against one upstream dependency.
#[async_trait]
pub trait DependencyProbe: Send + Sync {
    fn name(&self) -> &'static str;
    async fn probe(&self) -> Result<(), ProbeFailure>;
}

/// Why a dependency probe did not come back healthy.
#[derive(Debug, thiserror::Error)]
pub enum ProbeFailure {
    #[error("dependency returned http {status}")]
    Unhealthy { status: u16 },
    #[error("dependency probe timed out")]
    Timeout,
    #[error("dependency unreachable: {0}")]
    Transport(#[source] reqwest::Error),
}

impl ProbeFailure {
    fn from_request_error(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}

/// Reported reachability of a single dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyHealth {
    Healthy,
    Unhealthy,
}

/// Aggregate health of this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateHealth {
    Healthy,
    Degraded,
}

/// Health payload returned by the health endpoint. Building it never fails;
/// unreachable dependencies degrade the aggregate instead.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: AggregateHealth,
    pub service: &'static str,
    pub dependencies: BTreeMap<&'static str, DependencyHealth>,
    pub timestamp: DateTime<Utc>,
}

/// Aggregates this service's upstream reachability: healthy only when every
/// probe answers within its timeout.
#[derive(Clone)]
pub struct HealthMonitor {
    identity: Arc<dyn DependencyProbe>,
    payment: Arc<dyn DependencyProbe>,
}

impl HealthMonitor {
    pub fn new(identity: Arc<dyn DependencyProbe>, payment: Arc<dyn DependencyProbe>) -> Self {
        Self { identity, payment }
    }

    pub async fn report(&self) -> HealthReport {
        let (identity, payment) = tokio::join!(self.identity.probe(), self.payment.probe());

        let mut dependencies = BTreeMap::new();
        dependencies.insert(self.identity.name(), classify(self.identity.name(), identity));
        dependencies.insert(self.payment.name(), classify(self.payment.name(), payment));

        let status = if dependencies
            .values()
            .all(|health| *health == DependencyHealth::Healthy)
        {
            AggregateHealth::Healthy
        } else {
            AggregateHealth::Degraded
        };

        HealthReport {
            status,
            service: SERVICE_NAME,
            dependencies,
            timestamp: Utc::now(),
        }
    }
}

fn classify(name: &'static str, outcome: Result<(), ProbeFailure>) -> DependencyHealth {
    match outcome {
        Ok(()) => DependencyHealth::Healthy,
        Err(failure) => {
            warn!(dependency = name, error = %failure, "dependency probe failed");
            DependencyHealth::Unhealthy
        }
    }
}

/// Health-only HTTP client for the payment service.
pub struct HttpPaymentService {
    base_url: String,
    http: reqwest::Client,
}

impl HttpPaymentService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: base_url.into(),
            http: reqwest::Client::builder().build()?,
        })
    }
}

#[async_trait]
impl DependencyProbe for HttpPaymentService {
    fn name(&self) -> &'static str {
        "payment-service"
    }

    async fn probe(&self) -> Result<(), ProbeFailure> {
        probe_health_endpoint(&self.http, format!("{}/health", self.base_url)).await
    }
}

#[async_trait]
impl DependencyProbe for super::identity::HttpIdentityAuthority {
    fn name(&self) -> &'static str {
        "auth-service"
    }

    async fn probe(&self) -> Result<(), ProbeFailure> {
        probe_health_endpoint(self.http(), self.health_url()).await
    }
}

async fn probe_health_endpoint(
    http: &reqwest::Client,
    url: String,
) -> Result<(), ProbeFailure> {
    let response = http
        .get(url)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .map_err(ProbeFailure::from_request_error)?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(ProbeFailure::Unhealthy {
            status: response.status().as_u16(),
        })
    }
}
