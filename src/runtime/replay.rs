// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! JSON-lines event replay
//!
//! Feeds a recorded stream of host notifications through a running event
//! loop, one line per event:
//!
//! ```text
//! {"event": "session_updated", "id": 3, "private": true}
//! {"event": "message", "disableInPrivateMode": true}
//! {"event": "request", "request_id": 1, "url": "https://amazon.de/", "session_id": 3}
//! {"event": "session_removed", "id": 3}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::EventLoopHandle;
use crate::error::{Error, Result};
use crate::network::{InterceptAction, RequestDetails};
use crate::preferences::ConfigMessage;
use crate::session::{SessionId, SessionInfo};

/// One recorded host notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    Request(RequestDetails),
    SessionUpdated(SessionInfo),
    SessionRemoved { id: SessionId },
    Message(ConfigMessage),
}

impl ReplayEvent {
    /// Parse a single line
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Decision for one replayed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    /// 1-based input line
    pub line: usize,
    pub request: RequestDetails,
    pub action: InterceptAction,
}

/// Replay every event from `reader`, returning one outcome per request
pub async fn replay<R>(handle: &EventLoopHandle, reader: R) -> Result<Vec<ReplayOutcome>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut outcomes = Vec::new();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event = ReplayEvent::parse(trimmed)
            .map_err(|e| Error::config(format!("line {}: {}", line_no, e)))?;

        match event {
            ReplayEvent::Request(request) => {
                let action = handle.before_request(request.clone()).await;
                outcomes.push(ReplayOutcome {
                    line: line_no,
                    request,
                    action,
                });
            }
            ReplayEvent::SessionUpdated(info) => handle.session_updated(info)?,
            ReplayEvent::SessionRemoved { id } => handle.session_removed(id)?,
            ReplayEvent::Message(message) => handle.send_message(message)?,
        }
    }

    Ok(outcomes)
}
