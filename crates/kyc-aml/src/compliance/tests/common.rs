use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::compliance::aml::StaticRiskScreener;
use crate::compliance::domain::{
    Credential, IdentityClaims, KycSubmission, RejectionRequest, SubjectId, VerificationStatus,
};
use crate::compliance::identity::{AuthFailure, CascadeFailure, IdentityAuthority};
use crate::compliance::service::ComplianceService;
use crate::compliance::store::MemoryVerificationStore;

#[derive(Debug, Clone, Copy)]
pub(super) enum VerifyMode {
    Accept,
    Deny,
    TimeOut,
}

#[derive(Debug, Clone, Copy)]
pub(super) enum CascadeMode {
    Accept,
    Reject,
    TimeOut,
}

/// Scripted identity authority double recording every cascade attempt.
pub(super) struct ScriptedAuthority {
    verify: VerifyMode,
    cascade: CascadeMode,
    pushes: Mutex<Vec<(SubjectId, VerificationStatus)>>,
}

impl ScriptedAuthority {
    pub(super) fn new(verify: VerifyMode, cascade: CascadeMode) -> Self {
        Self {
            verify,
            cascade,
            pushes: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn accepting() -> Self {
        Self::new(VerifyMode::Accept, CascadeMode::Accept)
    }

    pub(super) fn pushes(&self) -> Vec<(SubjectId, VerificationStatus)> {
        self.pushes.lock().expect("pushes mutex poisoned").clone()
    }
}

#[async_trait]
impl IdentityAuthority for ScriptedAuthority {
    async fn verify_credential(
        &self,
        _credential: &Credential,
    ) -> Result<IdentityClaims, AuthFailure> {
        match self.verify {
            VerifyMode::Accept => Ok(IdentityClaims(json!({ "user_id": 42 }))),
            VerifyMode::Deny => Err(AuthFailure::Denied { status: 401 }),
            VerifyMode::TimeOut => Err(AuthFailure::Timeout),
        }
    }

    async fn push_status(
        &self,
        subject: SubjectId,
        status: VerificationStatus,
        _credential: &Credential,
    ) -> Result<(), CascadeFailure> {
        self.pushes
            .lock()
            .expect("pushes mutex poisoned")
            .push((subject, status));
        match self.cascade {
            CascadeMode::Accept => Ok(()),
            CascadeMode::Reject => Err(CascadeFailure::Rejected { status: 503 }),
            CascadeMode::TimeOut => Err(CascadeFailure::Timeout),
        }
    }
}

pub(super) type TestService =
    ComplianceService<MemoryVerificationStore, ScriptedAuthority, StaticRiskScreener>;

pub(super) fn build_service(
    authority: ScriptedAuthority,
) -> (
    Arc<TestService>,
    Arc<MemoryVerificationStore>,
    Arc<ScriptedAuthority>,
) {
    let store = Arc::new(MemoryVerificationStore::default());
    let authority = Arc::new(authority);
    let screener = Arc::new(StaticRiskScreener::default());
    let service = Arc::new(ComplianceService::new(
        store.clone(),
        authority.clone(),
        screener,
    ));
    (service, store, authority)
}

pub(super) fn credential() -> Credential {
    Credential::new("Bearer test-token")
}

pub(super) fn submission(subject: i64) -> KycSubmission {
    KycSubmission {
        subject_id: SubjectId(subject),
        document_type: "passport".to_string(),
        document_url: "doc://x".to_string(),
    }
}

pub(super) fn rejection(subject: i64) -> RejectionRequest {
    RejectionRequest {
        subject_id: SubjectId(subject),
        reason: "document illegible".to_string(),
    }
}
