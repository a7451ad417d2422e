use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::SubjectId;

/// AML determination for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmlStatus {
    Cleared,
    Flagged,
    Blocked,
}

/// Risk score levels, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Outcome of a single AML screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmlAssessment {
    pub subject_id: SubjectId,
    pub aml_status: AmlStatus,
    pub risk_level: RiskLevel,
    pub checked_at: DateTime<Utc>,
}

/// Screening strategy seam. The workflow contract stays fixed while the
/// scoring engine behind it can be swapped out.
#[async_trait]
pub trait RiskScreener: Send + Sync {
    async fn screen(&self, subject: SubjectId) -> AmlAssessment;
}

/// Constant-result screener: clears every subject at low risk.
#[derive(Debug, Clone, Copy)]
pub struct StaticRiskScreener {
    status: AmlStatus,
    risk: RiskLevel,
}

impl StaticRiskScreener {
    pub const fn new(status: AmlStatus, risk: RiskLevel) -> Self {
        Self { status, risk }
    }
}

impl Default for StaticRiskScreener {
    fn default() -> Self {
        Self::new(AmlStatus::Cleared, RiskLevel::Low)
    }
}

#[async_trait]
impl RiskScreener for StaticRiskScreener {
    async fn screen(&self, subject: SubjectId) -> AmlAssessment {
        AmlAssessment {
            subject_id: subject,
            aml_status: self.status,
            risk_level: self.risk,
            checked_at: Utc::now(),
        }
    }
}
