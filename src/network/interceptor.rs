// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Navigation interceptor
//!
//! Owns all mutable state of the redirect core: session privacy flags, the
//! private-mode preference and the last processed request id. Every handler
//! runs to completion on in-memory state only, so a decision is available
//! as soon as the hook fires.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::event::{InterceptAction, RequestDetails, RequestId};
use crate::preferences::{ConfigMessage, Preferences};
use crate::rules::RewriteRules;
use crate::session::{SessionId, SessionInfo, SessionTracker};

/// Interception statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptStats {
    /// Requests that reached the handler
    pub requests: u64,
    /// Requests rejected by the registration filter
    pub filtered: u64,
    /// Requests skipped because their session is private
    pub private_skipped: u64,
    /// Repeated notifications for an already processed request
    pub duplicates: u64,
    /// Redirects issued
    pub redirects: u64,
    /// Requests left untouched by the rule engine
    pub passed_through: u64,
}

/// Redirect decision core
pub struct RedirectInterceptor {
    /// Rewrite rules
    rules: RewriteRules,
    /// Privacy flag per open session
    sessions: SessionTracker,
    /// Current preference
    preferences: Preferences,
    /// Most recently processed request
    last_request_id: Option<RequestId>,
    /// Shared statistics
    stats: Arc<RwLock<InterceptStats>>,
}

impl RedirectInterceptor {
    /// Create an interceptor with default preferences and no known sessions
    pub fn new(rules: RewriteRules) -> Self {
        Self {
            rules,
            sessions: SessionTracker::new(),
            preferences: Preferences::default(),
            last_request_id: None,
            stats: Arc::new(RwLock::new(InterceptStats::default())),
        }
    }

    /// Set initial preferences
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Handle one request notification.
    ///
    /// Callers deliver only requests that passed the registration filter.
    pub fn before_request(&mut self, request: &RequestDetails) -> InterceptAction {
        self.stats.write().requests += 1;

        if self.preferences.disable_in_private_mode
            && self.sessions.is_private(request.session_id.as_ref())
        {
            tracing::debug!(request_id = %request.request_id, "Private session, not rewriting");
            self.stats.write().private_skipped += 1;
            return InterceptAction::Continue;
        }

        if self.last_request_id.as_ref() == Some(&request.request_id) {
            tracing::debug!(request_id = %request.request_id, "Duplicate notification ignored");
            self.stats.write().duplicates += 1;
            return InterceptAction::Continue;
        }
        // Recorded before evaluating so later duplicates are caught even
        // when this request is not rewritten.
        self.last_request_id = Some(request.request_id.clone());

        let decision = self.rules.evaluate(&request.url);
        match decision.into_url() {
            Some(url) => {
                tracing::info!(
                    request_id = %request.request_id,
                    from = %request.url,
                    to = %url,
                    "Redirecting"
                );
                self.stats.write().redirects += 1;
                InterceptAction::Redirect { url }
            }
            None => {
                tracing::debug!(request_id = %request.request_id, url = %request.url, "No rewrite");
                self.stats.write().passed_through += 1;
                InterceptAction::Continue
            }
        }
    }

    /// Handle a session update notification
    pub fn on_session_updated(&mut self, session: &SessionInfo) {
        tracing::debug!(session = %session.id, private = session.private, "Session updated");
        self.sessions.record(session);
    }

    /// Handle a session close notification
    pub fn on_session_removed(&mut self, id: &SessionId) {
        if self.sessions.remove(id) {
            tracing::debug!(session = %id, "Session removed");
        }
    }

    /// Record sessions enumerated at startup
    pub fn record_sessions<'a>(&mut self, sessions: impl IntoIterator<Item = &'a SessionInfo>) {
        self.sessions.record_all(sessions);
    }

    /// Handle a runtime configuration message
    pub fn on_message(&mut self, message: &ConfigMessage) {
        if self.preferences.apply(message) {
            tracing::info!(
                disable_in_private_mode = self.preferences.disable_in_private_mode,
                "Preference updated"
            );
        }
    }

    /// Count a request rejected by the registration filter
    pub(crate) fn record_filtered(&self) {
        self.stats.write().filtered += 1;
    }

    /// Rule set used for every decision
    pub fn rules(&self) -> &RewriteRules {
        &self.rules
    }

    /// Known sessions and their privacy flags
    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    /// Preferences currently in effect
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Id of the most recently processed request
    pub fn last_request_id(&self) -> Option<&RequestId> {
        self.last_request_id.as_ref()
    }

    /// Snapshot of the statistics
    pub fn stats(&self) -> InterceptStats {
        self.stats.read().clone()
    }

    /// Shared handle to the statistics
    pub fn stats_handle(&self) -> Arc<RwLock<InterceptStats>> {
        Arc::clone(&self.stats)
    }
}
