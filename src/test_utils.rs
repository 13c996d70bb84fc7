// ABOUTME: In-memory transport that replays canned JSON bodies and records every request
// ABOUTME: Lets tests count network calls and script authorization or API failures per path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Scripted transport for tests and offline demos
//!
//! Replies are queued per `(method, path)`. Each request pops the next reply;
//! the last one stays in place and answers every later request, so a single
//! scripted body serves repeated calls.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use strava_graph_core::{ApiFieldError, GraphError, GraphResult, Params, Usage};
use strava_graph_transport::{ClientRef, Method, Transport};
use tokio::task;
use tracing::debug;

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Failure {
        status: u16,
        message: String,
        errors: Vec<ApiFieldError>,
    },
}

impl Reply {
    fn into_result(self) -> GraphResult<Value> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Failure {
                status: status @ (401 | 403),
                message,
                errors,
            } => Err(GraphError::Authorization {
                status,
                message,
                errors,
            }),
            Self::Failure {
                status, message, ..
            } => Err(GraphError::Api { status, message }),
        }
    }
}

/// One request seen by a [`ScriptedTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Request method
    pub method: Method,
    /// Path relative to the API base
    pub path: String,
    /// Parameters as sent
    pub params: Params,
}

#[derive(Default)]
struct Script {
    replies: HashMap<(Method, String), VecDeque<Reply>>,
    calls: Vec<RecordedCall>,
}

/// Transport answering from a script instead of the network
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
    usage: Option<Usage>,
}

impl ScriptedTransport {
    /// Empty script; every request fails with a 404 until replies are added
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn enqueue(&self, method: Method, path: &str, reply: Reply) {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        script
            .replies
            .entry((method, path.trim_start_matches('/').to_owned()))
            .or_default()
            .push_back(reply);
    }

    /// Queue a JSON body for `method path`
    #[must_use]
    pub fn on(self, method: Method, path: &str, body: Value) -> Self {
        self.enqueue(method, path, Reply::Json(body));
        self
    }

    /// Queue a JSON body for `GET path`
    #[must_use]
    pub fn on_get(self, path: &str, body: Value) -> Self {
        self.on(Method::Get, path, body)
    }

    /// Queue a failure status for `method path`
    ///
    /// 401 and 403 become [`GraphError::Authorization`]; every other status
    /// becomes [`GraphError::Api`].
    #[must_use]
    pub fn fail(self, method: Method, path: &str, status: u16, message: &str) -> Self {
        self.fail_with(method, path, status, message, Vec::new())
    }

    /// [`ScriptedTransport::fail`] with structured field errors
    #[must_use]
    pub fn fail_with(
        self,
        method: Method,
        path: &str,
        status: u16,
        message: &str,
        errors: Vec<ApiFieldError>,
    ) -> Self {
        self.enqueue(
            method,
            path,
            Reply::Failure {
                status,
                message: message.to_owned(),
                errors,
            },
        );
        self
    }

    /// Report `usage` from [`Transport::usage`]
    #[must_use]
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Shared handle usable as an entity client
    #[must_use]
    pub fn client(self: &Arc<Self>) -> ClientRef {
        Arc::clone(self) as ClientRef
    }

    /// Every request seen so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .clone()
    }

    /// Number of requests seen for `method path`
    #[must_use]
    pub fn call_count(&self, method: Method, path: &str) -> usize {
        let path = path.trim_start_matches('/');
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    /// Number of requests seen in total
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .len()
    }

    fn next_reply(&self, method: Method, path: &str, params: &Params) -> Option<Reply> {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        script.calls.push(RecordedCall {
            method,
            path: path.to_owned(),
            params: params.clone(),
        });
        let queue = script.replies.get_mut(&(method, path.to_owned()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, method: Method, path: &str, params: &Params) -> GraphResult<Value> {
        let path = path.trim_start_matches('/');
        debug!("scripted {method} {path} with {} params", params.len());
        // yield like a network round trip
        task::yield_now().await;
        self.next_reply(method, path, params).map_or_else(
            || {
                Err(GraphError::Api {
                    status: 404,
                    message: format!("no scripted reply for {method} {path}"),
                })
            },
            Reply::into_result,
        )
    }

    fn usage(&self) -> Option<Usage> {
        self.usage
    }
}
