// ABOUTME: reqwest-backed Transport implementation for the v3 REST API
// ABOUTME: Maps 401/403 to authorization errors and records rate-limit usage per response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use strava_graph_core::constants::headers;
use strava_graph_core::{ApiFieldError, GraphError, GraphResult, Params, Usage};
use tracing::{debug, error, warn};
use url::Url;

use crate::config::TransportConfig;
use crate::credentials::Credentials;
use crate::http_client::client_for;
use crate::transport::{Method, Transport};

/// Error body the API returns alongside non-success statuses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiFieldError>,
}

/// Production transport over HTTPS
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    usage: RwLock<Option<Usage>>,
}

impl HttpTransport {
    /// Build a transport for the given credentials
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Configuration`] when the configured base URL does not parse.
    pub fn new(credentials: Credentials, config: &TransportConfig) -> GraphResult<Self> {
        let mut base = config.api_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            GraphError::configuration(format!("invalid API base URL {base}: {e}"))
        })?;
        Ok(Self {
            client: client_for(config),
            base_url,
            credentials,
            usage: RwLock::new(None),
        })
    }

    /// Resolve credentials from `token` or the configured application, then build
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Configuration`] when no credential resolves.
    pub fn from_token(token: Option<String>, config: &TransportConfig) -> GraphResult<Self> {
        Self::new(Credentials::resolve(token, config)?, config)
    }

    /// Credentials in use
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn endpoint(&self, path: &str) -> GraphResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| GraphError::configuration(format!("invalid request path {path}: {e}")))
    }

    fn signed_params(&self, params: &Params) -> Params {
        match &self.credentials {
            Credentials::AccessToken(_) => params.clone(),
            Credentials::Application {
                client_id,
                client_secret,
            } => {
                let mut signed = params.clone();
                signed.push("client_id", client_id);
                signed.push("client_secret", client_secret);
                signed
            }
        }
    }

    fn record_usage(&self, response_headers: &HeaderMap) {
        let limit = response_headers
            .get(headers::RATE_LIMIT_LIMIT)
            .and_then(|v| v.to_str().ok());
        let usage = response_headers
            .get(headers::RATE_LIMIT_USAGE)
            .and_then(|v| v.to_str().ok());
        let Some(parsed) = limit.zip(usage).and_then(|(l, u)| Usage::parse(l, u)) else {
            return;
        };
        if parsed.is_exhausted() {
            warn!(
                "API quota exhausted: {}/{} (15m), {}/{} (daily)",
                parsed.recent_usage, parsed.recent_limit, parsed.daily_usage, parsed.daily_limit
            );
        }
        *self.usage.write().unwrap_or_else(PoisonError::into_inner) = Some(parsed);
    }
}

fn failure(status: StatusCode, body: &str) -> GraphError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = if parsed.message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    } else {
        parsed.message
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GraphError::Authorization {
            status: status.as_u16(),
            message,
            errors: parsed.errors,
        },
        _ => GraphError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, params: &Params) -> GraphResult<Value> {
        let url = self.endpoint(path)?;
        let params = self.signed_params(params);
        debug!("{method} {url} with {} params", params.len());

        let builder = match method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
            Method::Put => self.client.put(url.clone()),
            Method::Delete => self.client.delete(url.clone()),
        };
        let builder = if method.uses_query() {
            builder.query(params.pairs())
        } else {
            builder.form(params.pairs())
        };
        let builder = match &self.credentials {
            Credentials::AccessToken(token) => builder.bearer_auth(token),
            Credentials::Application { .. } => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| GraphError::transport(format!("{method} {path} failed"), e))?;
        self.record_usage(response.headers());

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GraphError::transport(format!("reading {path} response"), e))?;

        if !status.is_success() {
            error!("API error response for {method} {path}: {status}");
            return Err(failure(status, &body));
        }

        debug!("{method} {path}: {status}, {} bytes", body.len());
        if body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&body)
            .map_err(|e| GraphError::transport(format!("decoding {path} response"), e))
    }

    fn usage(&self) -> Option<Usage> {
        *self.usage.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn transport(credentials: Credentials) -> HttpTransport {
        HttpTransport::new(credentials, &TransportConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_versioned_base() {
        let t = transport(Credentials::AccessToken("t".into()));
        assert_eq!(
            t.endpoint("athletes/227615/koms").unwrap().as_str(),
            "https://www.strava.com/api/v3/athletes/227615/koms"
        );
        assert_eq!(
            t.endpoint("/athlete").unwrap().as_str(),
            "https://www.strava.com/api/v3/athlete"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let config = TransportConfig::default().with_base_url("http://localhost:9000/api/v3");
        let t = HttpTransport::new(Credentials::AccessToken("t".into()), &config).unwrap();
        assert_eq!(
            t.endpoint("athlete").unwrap().as_str(),
            "http://localhost:9000/api/v3/athlete"
        );
    }

    #[test]
    fn test_application_credentials_are_appended() {
        let t = transport(Credentials::Application {
            client_id: "42".into(),
            client_secret: "s".into(),
        });
        let signed = t.signed_params(&Params::new().with("page", 2));
        assert_eq!(signed.get("page"), Some("2"));
        assert_eq!(signed.get("client_id"), Some("42"));
        assert_eq!(signed.get("client_secret"), Some("s"));

        let bearer = transport(Credentials::AccessToken("t".into()));
        assert_eq!(bearer.signed_params(&Params::new()).len(), 0);
    }

    #[test]
    fn test_usage_recorded_from_headers() {
        let t = transport(Credentials::AccessToken("t".into()));
        assert!(t.usage().is_none());

        let mut response_headers = HeaderMap::new();
        response_headers.insert(headers::RATE_LIMIT_LIMIT, HeaderValue::from_static("600,30000"));
        response_headers.insert(headers::RATE_LIMIT_USAGE, HeaderValue::from_static("12,3400"));
        t.record_usage(&response_headers);

        let usage = t.usage().unwrap();
        assert_eq!(usage.recent_limit, 600);
        assert_eq!(usage.daily_usage, 3400);
    }

    #[test]
    fn test_unauthorized_maps_to_authorization_error() {
        let body = r#"{"message":"Authorization Error","errors":[{"resource":"Athlete","field":"access_token","code":"invalid"}]}"#;
        match failure(StatusCode::UNAUTHORIZED, body) {
            GraphError::Authorization {
                status,
                message,
                errors,
            } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authorization Error");
                assert_eq!(errors[0].field, "access_token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_failures_map_to_api_error() {
        let err = failure(StatusCode::NOT_FOUND, "not json");
        assert!(matches!(err, GraphError::Api { status: 404, ref message } if message == "Not Found"));
    }
}
