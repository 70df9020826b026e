// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session (tab) tracking
//!
//! Remembers which open sessions are private. Entries are created when a
//! session is enumerated at startup or first reported, refreshed on update
//! and dropped on close. An unknown session reads as non-private.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::RawId;

/// Opaque session identifier (a browser tab id in the extension host)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawId> for SessionId {
    fn from(raw: RawId) -> Self {
        Self(raw.into())
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for SessionId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session metadata as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session identifier
    pub id: SessionId,
    /// Whether the session is private/incognito
    #[serde(default, alias = "incognito")]
    pub private: bool,
}

impl SessionInfo {
    pub fn new(id: impl Into<SessionId>, private: bool) -> Self {
        Self {
            id: id.into(),
            private,
        }
    }
}

/// Per-session privacy flags
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    sessions: HashMap<SessionId, bool>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or refresh a session, returning its previous flag
    pub fn record(&mut self, info: &SessionInfo) -> Option<bool> {
        self.sessions.insert(info.id.clone(), info.private)
    }

    /// Record every session from a startup enumeration
    pub fn record_all<'a>(&mut self, sessions: impl IntoIterator<Item = &'a SessionInfo>) {
        for info in sessions {
            self.record(info);
        }
    }

    /// Forget a closed session. Returns whether it was known.
    pub fn remove(&mut self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Whether the session is known to be private.
    ///
    /// Requests without a session and unknown sessions are non-private.
    pub fn is_private(&self, id: Option<&SessionId>) -> bool {
        id.and_then(|id| self.sessions.get(id))
            .copied()
            .unwrap_or(false)
    }

    /// Recorded flag, if the session is known
    pub fn get(&self, id: &SessionId) -> Option<bool> {
        self.sessions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of private sessions currently open
    pub fn private_count(&self) -> usize {
        self.sessions.values().filter(|p| **p).count()
    }
}

/// Source of the sessions open at startup
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Enumerate every open session
    async fn query_all(&self) -> Result<Vec<SessionInfo>>;
}

/// Fixed session list, for hosts that report sessions up front
#[derive(Debug, Clone, Default)]
pub struct StaticSessions {
    sessions: Vec<SessionInfo>,
}

impl StaticSessions {
    pub fn new(sessions: Vec<SessionInfo>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl SessionSource for StaticSessions {
    async fn query_all(&self) -> Result<Vec<SessionInfo>> {
        Ok(self.sessions.clone())
    }
}
