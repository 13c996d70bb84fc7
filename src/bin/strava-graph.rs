// ABOUTME: strava-graph CLI - browse the authenticated athlete's object graph from the shell
// ABOUTME: Prints raw entity payloads as JSON; logging goes to stderr
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! export STRAVA_ACCESS_TOKEN=...
//!
//! # Authenticated athlete, detailed
//! strava-graph athlete
//!
//! # Second page of activities, 50 per page
//! strava-graph activities --page 2 --per-page 50
//!
//! # One activity with its segment efforts
//! strava-graph activity 1234567890
//!
//! # Running races of 2024
//! strava-graph races --year 2024
//!
//! # Segment explorer
//! strava-graph explore --bounds 37.82,-122.50,37.84,-122.46
//!
//! # Rate-limit usage after an athlete fetch
//! strava-graph usage
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use strava_graph::logging::LoggingConfig;
use strava_graph::{CollectionQuery, GraphConfig, Handle, Resource, StravaClient};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "strava-graph",
    about = "Browse the Strava v3 object graph",
    long_about = "Fetches entities through the strava-graph cache and prints their payloads as JSON. \
                  Credentials come from STRAVA_ACCESS_TOKEN or STRAVA_CLIENT_ID/STRAVA_CLIENT_SECRET."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Access token override
    #[arg(long, global = true)]
    token: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Show the authenticated athlete
    Athlete,

    /// List the authenticated athlete's activities
    Activities {
        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Show one activity in detail
    Activity {
        /// Activity id
        id: u64,
    },

    /// List running races
    Races {
        /// Race year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Explore popular segments in a bounding box
    Explore {
        /// `sw.lat,sw.lng,ne.lat,ne.lng`
        #[arg(long)]
        bounds: Option<String>,
    },

    /// Show rate-limit usage
    Usage,
}

fn payloads<R: Resource>(entities: &[Handle<R>]) -> Value {
    Value::Array(
        entities
            .iter()
            .map(|entity| Value::Object(entity.raw_payload()))
            .collect(),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GraphConfig::from_env();
    if let Some(token) = cli.token {
        config = config.with_access_token(token);
    }
    let logging = if cli.verbose {
        LoggingConfig {
            level: "debug".into(),
            ..config.logging.clone()
        }
    } else {
        config.logging.clone()
    };
    logging.init()?;

    let client = StravaClient::from_config(&config)?;

    let output = match cli.command {
        Command::Athlete => {
            let athlete = client.current_athlete().await?;
            Value::Object(athlete.raw_payload())
        }
        Command::Activities { page, per_page } => {
            let athlete = client.current_athlete().await?;
            let mut query = CollectionQuery::all();
            if let Some(page) = page {
                query = query.with_page(page);
            }
            if let Some(per_page) = per_page {
                query = query.with_per_page(per_page);
            }
            let activities = athlete.activities(&query).await?;
            info!("Fetched {} activities", activities.len());
            payloads(&activities)
        }
        Command::Activity { id } => {
            let activity = client.activity(id)?.ensure_detailed().await?;
            let efforts = activity.segment_efforts();
            json!({
                "activity": Value::Object(activity.raw_payload()),
                "segment_effort_count": efforts.len(),
            })
        }
        Command::Races { year } => payloads(&client.list_races(year).await?),
        Command::Explore { bounds } => payloads(&client.segment_explorer(bounds.as_deref()).await?),
        Command::Usage => {
            client.current_athlete().await?;
            client.usage().map_or(Value::Null, |usage| {
                json!({
                    "recent_usage": usage.recent_usage,
                    "recent_limit": usage.recent_limit,
                    "daily_usage": usage.daily_usage,
                    "daily_limit": usage.daily_limit,
                    "recent_pct": usage.recent_pct(),
                    "daily_pct": usage.daily_pct(),
                })
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
