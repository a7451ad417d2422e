use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::aml::{AmlAssessment, RiskScreener};
use super::domain::{
    Credential, IdentityClaims, KycSubmission, RejectionRequest, SubjectId, VerificationRecord,
    VerificationStatus,
};
use super::identity::{AuthFailure, CascadeFailure, IdentityAuthority};
use super::store::{StoreError, VerificationStore};

/// Coordinates the submit/reject workflow: credential gate, local write, then
/// a single best-effort cascade to the identity authority.
pub struct ComplianceService<S, C, A> {
    store: Arc<S>,
    identity: Arc<C>,
    screener: Arc<A>,
}

/// Terminal classification of one fire-once cascade attempt. The local record
/// is already committed by the time this is produced and is never rolled back.
#[derive(Debug)]
pub enum CascadeOutcome {
    /// The authority acknowledged the update; local and upstream state agree.
    Confirmed,
    /// The authority did not acknowledge; local and upstream state may now
    /// diverge until a later submission reconciles them.
    Failed(CascadeFailure),
}

impl CascadeOutcome {
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, CascadeOutcome::Confirmed)
    }
}

/// Result of a completed submission: the committed record plus the cascade
/// classification.
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub record: VerificationRecord,
    pub cascade: CascadeOutcome,
}

/// Result of a completed rejection. The cascade outcome is carried for
/// observability; callers surface success regardless.
#[derive(Debug)]
pub struct RejectionReceipt {
    pub subject_id: SubjectId,
    pub reason: String,
    pub cascade: CascadeOutcome,
}

/// Error raised by the compliance workflow.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error("invalid or expired credential")]
    Unauthorized(#[source] AuthFailure),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<S, C, A> ComplianceService<S, C, A>
where
    S: VerificationStore + 'static,
    C: IdentityAuthority + 'static,
    A: RiskScreener + 'static,
{
    pub fn new(store: Arc<S>, identity: Arc<C>, screener: Arc<A>) -> Self {
        Self {
            store,
            identity,
            screener,
        }
    }

    /// Submit KYC documents for a subject.
    ///
    /// The local write is unconditional once the credential clears and is
    /// never rolled back; a failed cascade downgrades the receipt to a
    /// warning-level outcome instead.
    pub async fn submit(
        &self,
        credential: &Credential,
        submission: KycSubmission,
    ) -> Result<SubmissionReceipt, ComplianceError> {
        self.authorize(credential).await?;

        let record = VerificationRecord {
            subject_id: submission.subject_id,
            document_type: submission.document_type,
            document_url: submission.document_url,
            status: VerificationStatus::Verified,
            submitted_at: Utc::now(),
        };
        self.store.upsert(record.clone())?;
        info!(subject = %record.subject_id, "KYC document recorded");

        let cascade = self
            .propagate(record.subject_id, VerificationStatus::Verified, credential)
            .await;

        Ok(SubmissionReceipt { record, cascade })
    }

    /// Reject a subject's KYC submission.
    ///
    /// A pre-existing local record is updated to `rejected`; no record is
    /// fabricated for subjects that never submitted. The cascade failure is
    /// absorbed here and only reported through the receipt.
    pub async fn reject(
        &self,
        credential: &Credential,
        request: RejectionRequest,
    ) -> Result<RejectionReceipt, ComplianceError> {
        self.authorize(credential).await?;

        if let Some(mut record) = self.store.fetch(request.subject_id)? {
            record.status = VerificationStatus::Rejected;
            self.store.upsert(record)?;
        }
        info!(subject = %request.subject_id, reason = %request.reason, "KYC submission rejected");

        let cascade = self
            .propagate(request.subject_id, VerificationStatus::Rejected, credential)
            .await;

        Ok(RejectionReceipt {
            subject_id: request.subject_id,
            reason: request.reason,
            cascade,
        })
    }

    /// Pure read of the subject's stored record. No external calls beyond the
    /// credential gate.
    pub async fn status(
        &self,
        credential: &Credential,
        subject: SubjectId,
    ) -> Result<Option<VerificationRecord>, ComplianceError> {
        self.authorize(credential).await?;
        Ok(self.store.fetch(subject)?)
    }

    /// Screen a subject against the configured AML strategy.
    pub async fn aml_check(
        &self,
        credential: &Credential,
        subject: SubjectId,
    ) -> Result<AmlAssessment, ComplianceError> {
        self.authorize(credential).await?;
        Ok(self.screener.screen(subject).await)
    }

    async fn authorize(&self, credential: &Credential) -> Result<IdentityClaims, ComplianceError> {
        self.identity
            .verify_credential(credential)
            .await
            .map_err(|failure| {
                warn!(kind = failure.kind(), error = %failure, "credential verification failed");
                ComplianceError::Unauthorized(failure)
            })
    }

    /// One attempt, no retries: classify the push and move on.
    async fn propagate(
        &self,
        subject: SubjectId,
        status: VerificationStatus,
        credential: &Credential,
    ) -> CascadeOutcome {
        match self.identity.push_status(subject, status, credential).await {
            Ok(()) => {
                info!(subject = %subject, status = status.label(), "identity authority acknowledged status update");
                CascadeOutcome::Confirmed
            }
            Err(failure) => {
                warn!(
                    subject = %subject,
                    status = status.label(),
                    kind = failure.kind(),
                    error = %failure,
                    "status cascade failed; local record stands"
                );
                CascadeOutcome::Failed(failure)
            }
        }
    }
}
