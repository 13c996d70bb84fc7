// ABOUTME: API quota usage parsed from the rate-limit response headers
// ABOUTME: Tracks the 15-minute and daily windows reported after every call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Quota limits and usage for the short (15-minute) and daily windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Requests allowed per 15 minutes
    pub recent_limit: u32,
    /// Requests allowed per day
    pub daily_limit: u32,
    /// Requests made in the current 15-minute window
    pub recent_usage: u32,
    /// Requests made today
    pub daily_usage: u32,
}

impl Usage {
    /// Parse the `X-RateLimit-Limit` and `X-RateLimit-Usage` header values,
    /// both formatted as `"<recent>,<daily>"`
    #[must_use]
    pub fn parse(limit: &str, usage: &str) -> Option<Self> {
        let (recent_limit, daily_limit) = parse_pair(limit)?;
        let (recent_usage, daily_usage) = parse_pair(usage)?;
        Some(Self {
            recent_limit,
            daily_limit,
            recent_usage,
            daily_usage,
        })
    }

    /// Fraction of the 15-minute limit used, between 0.0 and 1.0
    #[must_use]
    pub fn recent_pct(&self) -> f64 {
        fraction(self.recent_usage, self.recent_limit)
    }

    /// Fraction of the daily limit used, between 0.0 and 1.0
    #[must_use]
    pub fn daily_pct(&self) -> f64 {
        fraction(self.daily_usage, self.daily_limit)
    }

    /// Whether either window is exhausted
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.recent_usage >= self.recent_limit || self.daily_usage >= self.daily_limit
    }
}

fn parse_pair(raw: &str) -> Option<(u32, u32)> {
    let (recent, daily) = raw.split_once(',')?;
    Some((recent.trim().parse().ok()?, daily.trim().parse().ok()?))
}

fn fraction(used: u32, limit: u32) -> f64 {
    if limit == 0 {
        0.0
    } else {
        f64::from(used) / f64::from(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers() {
        let usage = Usage::parse("600,30000", "254,12536");
        assert_eq!(
            usage,
            Some(Usage {
                recent_limit: 600,
                daily_limit: 30000,
                recent_usage: 254,
                daily_usage: 12536,
            })
        );
    }

    #[test]
    fn test_percentages() {
        let usage = Usage::parse("600,30000", "300,15000").unwrap_or(Usage {
            recent_limit: 0,
            daily_limit: 0,
            recent_usage: 0,
            daily_usage: 0,
        });
        assert!((usage.recent_pct() - 0.5).abs() < f64::EPSILON);
        assert!((usage.daily_pct() - 0.5).abs() < f64::EPSILON);
        assert!(!usage.is_exhausted());
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(Usage::parse("600", "1,2"), None);
        assert_eq!(Usage::parse("a,b", "1,2"), None);
    }
}
