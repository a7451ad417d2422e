use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

use super::domain::{Credential, IdentityClaims, SubjectId, VerificationStatus};

const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);
const CASCADE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client contract for the identity authority: the service of record for
/// authorization decisions and the target of the status cascade.
#[async_trait]
pub trait IdentityAuthority: Send + Sync {
    /// Delegate credential validation to the authority. Read-only.
    async fn verify_credential(&self, credential: &Credential)
        -> Result<IdentityClaims, AuthFailure>;

    /// Push the subject's compliance status upstream. Fire-once: callers
    /// never retry; a failure is classified and reported, not recovered.
    async fn push_status(
        &self,
        subject: SubjectId,
        status: VerificationStatus,
        credential: &Credential,
    ) -> Result<(), CascadeFailure>;
}

/// Why a credential could not be verified.
///
/// Externally every variant collapses into one uniform unauthorized answer;
/// the distinction exists for structured logging only.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    #[error("identity authority rejected the credential (http {status})")]
    Denied { status: u16 },
    #[error("credential verification timed out")]
    Timeout,
    #[error("identity authority unreachable: {0}")]
    Transport(#[source] reqwest::Error),
}

impl AuthFailure {
    pub const fn kind(&self) -> &'static str {
        match self {
            AuthFailure::Denied { .. } => "denied",
            AuthFailure::Timeout => "timeout",
            AuthFailure::Transport(_) => "transport",
        }
    }

    fn from_request_error(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}

/// Why a status cascade did not reach the authority.
#[derive(Debug, thiserror::Error)]
pub enum CascadeFailure {
    #[error("identity authority rejected the status update (http {status})")]
    Rejected { status: u16 },
    #[error("status update timed out")]
    Timeout,
    #[error("identity authority unreachable: {0}")]
    Transport(#[source] reqwest::Error),
}

impl CascadeFailure {
    pub const fn kind(&self) -> &'static str {
        match self {
            CascadeFailure::Rejected { .. } => "rejected",
            CascadeFailure::Timeout => "timeout",
            CascadeFailure::Transport(_) => "transport",
        }
    }

    fn from_request_error(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }
}

/// HTTP client for the identity authority.
pub struct HttpIdentityAuthority {
    base_url: String,
    http: reqwest::Client,
}

impl HttpIdentityAuthority {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: base_url.into(),
            http: reqwest::Client::builder().build()?,
        })
    }

    pub(crate) fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

#[async_trait]
impl IdentityAuthority for HttpIdentityAuthority {
    async fn verify_credential(
        &self,
        credential: &Credential,
    ) -> Result<IdentityClaims, AuthFailure> {
        let response = self
            .http
            .get(format!("{}/api/auth/verify-token", self.base_url))
            .header(AUTHORIZATION, credential.as_str())
            .timeout(VERIFY_TIMEOUT)
            .send()
            .await
            .map_err(AuthFailure::from_request_error)?;

        if !response.status().is_success() {
            return Err(AuthFailure::Denied {
                status: response.status().as_u16(),
            });
        }

        let claims = response
            .json::<serde_json::Value>()
            .await
            .map_err(AuthFailure::from_request_error)?;
        Ok(IdentityClaims(claims))
    }

    async fn push_status(
        &self,
        subject: SubjectId,
        status: VerificationStatus,
        credential: &Credential,
    ) -> Result<(), CascadeFailure> {
        let response = self
            .http
            .put(format!("{}/api/auth/user/{}", self.base_url, subject))
            .header(AUTHORIZATION, credential.as_str())
            .json(&serde_json::json!({ "kyc_status": status.label() }))
            .timeout(CASCADE_TIMEOUT)
            .send()
            .await
            .map_err(CascadeFailure::from_request_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CascadeFailure::Rejected {
                status: response.status().as_u16(),
            })
        }
    }
}
