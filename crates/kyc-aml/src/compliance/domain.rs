use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for the person or entity a compliance record pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub i64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compliance determination tracked per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Rejected,
    NotSubmitted,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
            VerificationStatus::NotSubmitted => "not_submitted",
        }
    }
}

/// The single compliance record kept per subject.
///
/// A new submission replaces the previous record wholesale; no history is
/// retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub subject_id: SubjectId,
    pub document_type: String,
    pub document_url: String,
    pub status: VerificationStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Inbound payload for a KYC document submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycSubmission {
    pub subject_id: SubjectId,
    pub document_type: String,
    pub document_url: String,
}

/// Inbound payload for a KYC rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRequest {
    pub subject_id: SubjectId,
    pub reason: String,
}

/// Opaque bearer credential as presented by the caller.
///
/// The raw header value is forwarded to the identity authority verbatim and
/// never inspected or decoded locally.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Claims payload the identity authority returns for a valid credential.
///
/// Kept as raw JSON; this service gates on the authority's verdict and does
/// not interpret individual claims.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityClaims(pub serde_json::Value);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_never_prints_the_token() {
        let credential = Credential::new("Bearer super-secret");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("super-secret"));
        assert_eq!(credential.as_str(), "Bearer super-secret");
    }

    #[test]
    fn status_serializes_with_snake_case_labels() {
        let json = serde_json::to_string(&VerificationStatus::NotSubmitted).expect("serializes");
        assert_eq!(json, "\"not_submitted\"");
        assert_eq!(VerificationStatus::Verified.label(), "verified");
    }
}
