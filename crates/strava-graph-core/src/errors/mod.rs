// ABOUTME: Unified error type and error codes for the entity graph and its transport
// ABOUTME: Authorization, data-shape and configuration failures surface unchanged to callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error handling
//!
//! Every failure in the graph is a [`GraphError`]. The core never retries and
//! never recovers silently: a variant produced by the transport reaches the
//! caller of the accessor that triggered it untouched.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Standard error codes, grouped by range like the platform error codes
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// Credentials were rejected by the API
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    /// Credentials lack the permission for this call
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1004,

    // Validation (3000-3999)
    /// Payload did not have a reconcilable shape
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    /// Operation is not available for this entity
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // External Services (5000-5999)
    /// API answered with a non-success status
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// API could not be reached or its body could not be decoded
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// API quota exhausted
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,

    // Configuration (6000-6999)
    /// No client or credential could be resolved
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// Configuration value present but unusable
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,
}

impl ErrorCode {
    /// HTTP status code conventionally associated with this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidFormat | Self::InvalidInput => 400,
            Self::AuthInvalid => 401,
            Self::PermissionDenied => 403,
            Self::ExternalRateLimited => 429,
            Self::ConfigMissing | Self::ConfigInvalid => 500,
            Self::ExternalServiceError | Self::ExternalServiceUnavailable => 502,
        }
    }

    /// User-facing description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthInvalid => "The provided access token was rejected",
            Self::PermissionDenied => "The access token lacks permission for this operation",
            Self::InvalidFormat => "The API returned data in an unexpected shape",
            Self::InvalidInput => "The operation is not available for this resource",
            Self::ExternalServiceError => "The API returned an error response",
            Self::ExternalServiceUnavailable => "The API could not be reached",
            Self::ExternalRateLimited => "API rate limit exceeded",
            Self::ConfigMissing => "Required client configuration is missing",
            Self::ConfigInvalid => "Client configuration is invalid",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One entry of the `errors` array the API attaches to failure bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFieldError {
    /// Resource the error refers to (e.g. `AccessToken`)
    #[serde(default)]
    pub resource: String,
    /// Field the error refers to (e.g. `write_permission`)
    #[serde(default)]
    pub field: String,
    /// Machine-readable code (e.g. `missing`)
    #[serde(default)]
    pub code: String,
}

/// Errors produced by the entity graph and its transport
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The API rejected the credentials (401/403)
    #[error("Authorization failed ({status}): {message}")]
    Authorization {
        /// HTTP status returned by the API
        status: u16,
        /// Message from the response body
        message: String,
        /// Structured field errors from the response body
        errors: Vec<ApiFieldError>,
    },

    /// A payload did not match any reconcilable shape
    #[error("Unexpected payload shape for {context}: expected {expected}, found {found}")]
    DataShape {
        /// Where the payload was being reconciled
        context: String,
        /// Shape that was expected
        expected: &'static str,
        /// Shape that was received
        found: &'static str,
    },

    /// No usable client or credential
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-success response other than an authorization failure
    #[error("API request failed with status {status}: {message}")]
    Api {
        /// HTTP status returned by the API
        status: u16,
        /// Message or body returned by the API
        message: String,
    },

    /// Network or decoding failure below the API level
    #[error("Transport error: {message}")]
    Transport {
        /// What the transport was doing
        message: String,
        /// Underlying error
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// The operation is not available for this entity
    #[error("Cannot {operation}: {reason}")]
    InvalidOperation {
        /// Operation that was attempted
        operation: &'static str,
        /// Why it is not available
        reason: &'static str,
    },
}

/// Result alias used throughout the graph
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Build a data-shape error
    #[must_use]
    pub fn data_shape(context: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::DataShape {
            context: context.into(),
            expected,
            found,
        }
    }

    /// Build a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Build a transport error wrapping its source
    #[must_use]
    pub fn transport(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Build the error for an endpoint only the authenticated athlete may call
    #[must_use]
    pub const fn requires_current_athlete(operation: &'static str) -> Self {
        Self::InvalidOperation {
            operation,
            reason: "only available for the authenticated athlete",
        }
    }

    /// Standard error code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Authorization { status: 403, .. } => ErrorCode::PermissionDenied,
            Self::Authorization { .. } => ErrorCode::AuthInvalid,
            Self::DataShape { .. } => ErrorCode::InvalidFormat,
            Self::Configuration(_) => ErrorCode::ConfigMissing,
            Self::Api { status: 429, .. } => ErrorCode::ExternalRateLimited,
            Self::Api { .. } => ErrorCode::ExternalServiceError,
            Self::Transport { .. } => ErrorCode::ExternalServiceUnavailable,
            Self::InvalidOperation { .. } => ErrorCode::InvalidInput,
        }
    }

    /// Whether this is an authorization failure from the API
    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_codes_split_on_status() {
        let unauthorized = GraphError::Authorization {
            status: 401,
            message: "Authorization Error".into(),
            errors: vec![],
        };
        let forbidden = GraphError::Authorization {
            status: 403,
            message: "Authorization Error".into(),
            errors: vec![],
        };
        assert_eq!(unauthorized.code(), ErrorCode::AuthInvalid);
        assert_eq!(forbidden.code(), ErrorCode::PermissionDenied);
        assert_eq!(forbidden.code().http_status(), 403);
    }

    #[test]
    fn test_data_shape_message() {
        let err = GraphError::data_shape("athlete activities", "object or list of objects", "string");
        assert_eq!(
            err.to_string(),
            "Unexpected payload shape for athlete activities: expected object or list of objects, found string"
        );
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_rate_limited_api_error() {
        let err = GraphError::Api {
            status: 429,
            message: "Rate Limit Exceeded".into(),
        };
        assert_eq!(err.code(), ErrorCode::ExternalRateLimited);
        assert!(!err.is_authorization());
    }
}
