//! In-memory upstream that replays a fixed script of responses.
//!
//! Each call pops the next entry; once a single entry is left it is
//! replayed forever. Every requested URL is recorded.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::{Upstream, UpstreamResponse};
use crate::error::{Result, UpstreamError};

/// One scripted reply
#[derive(Debug, Clone)]
pub enum Scripted {
    Response { status: u16, body: String },
    Unreachable,
}

impl Scripted {
    /// 200 with `{"data": data}`
    pub fn ok(data: serde_json::Value) -> Self {
        Scripted::Response {
            status: 200,
            body: serde_json::json!({ "data": data }).to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Scripted::Response {
            status,
            body: "Internal Server Error".to_string(),
        }
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Scripted::Response {
            status,
            body: body.into(),
        }
    }

    pub fn unreachable() -> Self {
        Scripted::Unreachable
    }
}

#[derive(Debug, Default)]
pub struct ScriptedUpstream {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedUpstream {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// URLs requested so far, in order
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    async fn get(&self, url: &str) -> Result<UpstreamResponse> {
        self.calls.lock().await.push(url.to_string());

        let next = {
            let mut script = self.script.lock().await;
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match next {
            Some(Scripted::Response { status, body }) => Ok(UpstreamResponse::new(url, status, body)),
            Some(Scripted::Unreachable) => Err(UpstreamError::Transport {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
            None => Err(UpstreamError::Transport {
                url: url.to_string(),
                reason: "script is empty".to_string(),
            }),
        }
    }
}
