//! KYC/AML compliance workflow.
//!
//! A submission is gated by the identity authority's credential check,
//! committed to the in-memory verification store, and then pushed back
//! upstream as a best-effort status cascade. Local state is the source of
//! truth for this service; the cascade is fire-once and its failure is
//! surfaced as a warning, never a rollback.

pub mod aml;
pub mod domain;
pub mod health;
pub mod identity;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use aml::{AmlAssessment, AmlStatus, RiskLevel, RiskScreener, StaticRiskScreener};
pub use domain::{
    Credential, IdentityClaims, KycSubmission, RejectionRequest, SubjectId, VerificationRecord,
    VerificationStatus,
};
pub use health::{
    AggregateHealth, DependencyHealth, DependencyProbe, HealthMonitor, HealthReport,
    HttpPaymentService, ProbeFailure,
};
pub use identity::{AuthFailure, CascadeFailure, HttpIdentityAuthority, IdentityAuthority};
pub use router::compliance_router;
pub use service::{
    CascadeOutcome, ComplianceError, ComplianceService, RejectionReceipt, SubmissionReceipt,
};
pub use store::{MemoryVerificationStore, StoreError, VerificationStore};
