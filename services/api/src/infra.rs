use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use kyc_aml::compliance::HealthMonitor;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) health: HealthMonitor,
}
