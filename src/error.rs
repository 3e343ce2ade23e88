//! Unified error taxonomy for the orchestration core.
//!
//! Every provider, the registry, and the selector convert their failures into
//! an [`OrchestratorError`] before they cross back into the orchestrator.
//! `is_retryable()` and `retry_after_seconds()` are the single source of
//! truth the retry loop consults — no call site re-derives retryability from
//! an HTTP status or vendor error string.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// The unified error taxonomy (spec §7).
#[derive(Error, Debug, Clone)]
pub enum OrchestratorError {
    #[error("authentication failed for provider '{provider}': {message}")]
    AuthError { provider: String, message: String },

    #[error("forbidden: {message}")]
    ForbiddenError { provider: String, message: String },

    #[error("invalid request: {message}")]
    InvalidRequestError { message: String },

    #[error("rate limit exceeded for provider '{provider}'")]
    RateLimit {
        provider: String,
        retry_after_seconds: Option<u64>,
    },

    #[error("quota exceeded for provider '{provider}': {message}")]
    QuotaExceeded { provider: String, message: String },

    #[error("provider '{provider}' returned a server error: {message}")]
    ServerError { provider: String, message: String },

    #[error("request to provider '{provider}' timed out")]
    TimeoutError { provider: String },

    #[error("network error contacting provider '{provider}': {message}")]
    NetworkError { provider: String, message: String },

    #[error("no provider registered for model '{model}' (provider '{provider}')")]
    ProviderUnavailable { model: String, provider: String },

    #[error("model '{model}' not found in registry")]
    ModelNotFound { model: String },

    #[error("invalid model metadata for '{model}': {reason}")]
    InvalidModelMetadata { model: String, reason: String },

    #[error("no models registered")]
    NoModelsRegistered,

    #[error("no viable model for requirements: {reasoning}")]
    ModelSelectionFailed { reasoning: String },

    #[error("provider '{provider}' error: {message}")]
    ProviderError {
        provider: String,
        message: String,
        retryable: bool,
    },

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    #[error("unknown error: {message}")]
    UnknownError { message: String },
}

impl OrchestratorError {
    /// Whether the orchestrator's retry loop should attempt this call again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit { .. }
                | Self::ServerError { .. }
                | Self::TimeoutError { .. }
                | Self::NetworkError { .. }
        ) || matches!(self, Self::ProviderError { retryable, .. } if *retryable)
    }

    /// Provider-supplied retry hint, when known.
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            Self::RateLimit {
                retry_after_seconds,
                ..
            } => *retry_after_seconds,
            _ => None,
        }
    }

    /// Name of the provider involved, when the error is provider-scoped.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::AuthError { provider, .. }
            | Self::ForbiddenError { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::QuotaExceeded { provider, .. }
            | Self::ServerError { provider, .. }
            | Self::TimeoutError { provider }
            | Self::NetworkError { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::ProviderError { provider, .. } => Some(provider),
            _ => None,
        }
    }
}

/// Maps an HTTP status code (and optional `Retry-After` header value) from a
/// vendor response into the unified taxonomy, per the canonical mapping in
/// spec §9: 401→Auth, 403→Forbidden, 400→InvalidRequest,
/// 429→RateLimit(retryable), 5xx→ServerError(retryable),
/// everything else→ProviderError(non-retryable).
pub fn map_http_status(
    provider: &str,
    status: u16,
    message: impl Into<String>,
    retry_after_seconds: Option<u64>,
) -> OrchestratorError {
    let message = message.into();
    match status {
        401 => OrchestratorError::AuthError {
            provider: provider.to_string(),
            message,
        },
        403 => OrchestratorError::ForbiddenError {
            provider: provider.to_string(),
            message,
        },
        400 => OrchestratorError::InvalidRequestError { message },
        429 => OrchestratorError::RateLimit {
            provider: provider.to_string(),
            retry_after_seconds,
        },
        500..=599 => OrchestratorError::ServerError {
            provider: provider.to_string(),
            message,
        },
        _ => OrchestratorError::ProviderError {
            provider: provider.to_string(),
            message,
            retryable: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_variants() {
        assert!(
            OrchestratorError::RateLimit {
                provider: "openai".into(),
                retry_after_seconds: Some(2)
            }
            .is_retryable()
        );
        assert!(
            OrchestratorError::ServerError {
                provider: "openai".into(),
                message: "boom".into()
            }
            .is_retryable()
        );
        assert!(!OrchestratorError::AuthError {
            provider: "openai".into(),
            message: "bad key".into()
        }
        .is_retryable());
    }

    #[test]
    fn http_status_mapping() {
        assert!(matches!(
            map_http_status("openai", 401, "x", None),
            OrchestratorError::AuthError { .. }
        ));
        assert!(matches!(
            map_http_status("openai", 429, "x", Some(3)),
            OrchestratorError::RateLimit {
                retry_after_seconds: Some(3),
                ..
            }
        ));
        assert!(matches!(
            map_http_status("openai", 503, "x", None),
            OrchestratorError::ServerError { .. }
        ));
        assert!(matches!(
            map_http_status("openai", 418, "x", None),
            OrchestratorError::ProviderError {
                retryable: false,
                ..
            }
        ));
    }
}
