// ABOUTME: Constants for API endpoints, environment keys, headers and paging limits
// ABOUTME: Grouped by domain so transport and graph code share a single source of truth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// API endpoint defaults
pub mod api {
    /// Base URL of the v3 API; trailing slash so relative paths join under it
    pub const DEFAULT_BASE_URL: &str = "https://www.strava.com/api/v3/";

    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default connection timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Bounding box used by segment explorer when the caller gives none
    pub const DEFAULT_EXPLORER_BOUNDS: &str = "37.821362,-122.505373,37.842038,-122.465977";
}

/// Environment variable names read by configuration loaders
pub mod env_config {
    /// Override for the API base URL
    pub const API_BASE: &str = "STRAVA_API_BASE";

    /// Application client id used when no access token is supplied
    pub const CLIENT_ID: &str = "STRAVA_CLIENT_ID";

    /// Application client secret used when no access token is supplied
    pub const CLIENT_SECRET: &str = "STRAVA_CLIENT_SECRET";

    /// Athlete access token
    pub const ACCESS_TOKEN: &str = "STRAVA_ACCESS_TOKEN";

    /// Request timeout override in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "STRAVA_HTTP_TIMEOUT_SECS";

    /// Connection timeout override in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "STRAVA_HTTP_CONNECT_TIMEOUT_SECS";
}

/// Response header names
pub mod headers {
    /// `"<15-minute limit>,<daily limit>"`
    pub const RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";

    /// `"<15-minute usage>,<daily usage>"`
    pub const RATE_LIMIT_USAGE: &str = "X-RateLimit-Usage";
}

/// Paging limits enforced by the API
pub mod paging {
    /// Largest page size the API accepts
    pub const MAX_PER_PAGE: u32 = 200;
}

/// Payload keys with structural meaning for the graph
pub mod payload_keys {
    /// Wire representation of fidelity (1 = meta, 2 = summary, 3 = detailed)
    pub const RESOURCE_STATE: &str = "resource_state";
}
