// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Single-queue event loop
//!
//! Request notifications, session notifications and configuration messages
//! share one queue and are handled one at a time in arrival order. The
//! interceptor is owned by the loop task, so its state needs no locking.
//! Request events carry a reply channel; the caller gets exactly one
//! decision and falls back to [`InterceptAction::Continue`] if the loop is
//! gone.

mod replay;

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::RedirectConfig;
use crate::error::{Error, Result};
use crate::network::{
    InterceptAction, InterceptStats, RedirectInterceptor, RequestDetails, RequestFilter,
};
use crate::preferences::{ConfigMessage, PreferenceStore, Preferences};
use crate::session::{SessionId, SessionInfo, SessionSource};

pub use replay::{replay, ReplayEvent, ReplayOutcome};

/// Named event sources handlers are bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// Request-observation hook
    BeforeRequest,
    /// Session metadata changed
    SessionUpdated,
    /// Session closed
    SessionRemoved,
    /// Runtime configuration channel
    RuntimeMessage,
}

/// One queued event
#[derive(Debug)]
pub enum Event {
    BeforeRequest {
        request: RequestDetails,
        reply: oneshot::Sender<InterceptAction>,
    },
    SessionUpdated(SessionInfo),
    SessionRemoved(SessionId),
    RuntimeMessage(ConfigMessage),
}

impl Event {
    pub fn source(&self) -> EventSource {
        match self {
            Event::BeforeRequest { .. } => EventSource::BeforeRequest,
            Event::SessionUpdated(_) => EventSource::SessionUpdated,
            Event::SessionRemoved(_) => EventSource::SessionRemoved,
            Event::RuntimeMessage(_) => EventSource::RuntimeMessage,
        }
    }
}

/// Event loop owning the interceptor
pub struct EventLoop {
    interceptor: RedirectInterceptor,
    filter: RequestFilter,
}

impl EventLoop {
    /// Create a loop around an interceptor and its registration filter
    pub fn new(interceptor: RedirectInterceptor, filter: RequestFilter) -> Self {
        Self {
            interceptor,
            filter,
        }
    }

    /// Build the interceptor from config, run the startup reads and spawn
    /// the loop.
    ///
    /// The stored preference is read once and every open session is
    /// recorded before the first event is accepted. Either source failing
    /// is logged and startup continues with defaults.
    pub async fn start(
        config: &RedirectConfig,
        store: &dyn PreferenceStore,
        sessions: &dyn SessionSource,
    ) -> Result<(EventLoopHandle, JoinHandle<RedirectInterceptor>)> {
        let rules = config.build_rules()?;
        let filter = config.request_filter(&rules)?;

        let preferences = Preferences::load(store, config.initial_preferences()).await;
        let mut interceptor = RedirectInterceptor::new(rules).with_preferences(preferences);

        match sessions.query_all().await {
            Ok(open) => interceptor.record_sessions(&open),
            Err(e) => tracing::warn!(error = %e, "Could not enumerate sessions"),
        }

        tracing::info!(
            patterns = filter.url_patterns().count(),
            sessions = interceptor.sessions().len(),
            disable_in_private_mode = preferences.disable_in_private_mode,
            "Interceptor ready"
        );

        Ok(Self::new(interceptor, filter).spawn())
    }

    /// Spawn the loop on the current runtime
    pub fn spawn(self) -> (EventLoopHandle, JoinHandle<RedirectInterceptor>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = EventLoopHandle {
            sender,
            stats: self.interceptor.stats_handle(),
        };
        let task = tokio::spawn(self.run(receiver));
        (handle, task)
    }

    /// Process events until every handle is dropped, then hand back the
    /// interceptor
    pub async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Event>) -> RedirectInterceptor {
        while let Some(event) = receiver.recv().await {
            self.dispatch(event);
        }
        tracing::debug!("Event queue closed");
        self.interceptor
    }

    /// Route one event to the handler bound to its source
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::BeforeRequest { request, reply } => {
                let action = self.on_before_request(&request);
                // Receiver gone means the host stopped waiting; nothing to do.
                let _ = reply.send(action);
            }
            Event::SessionUpdated(info) => self.interceptor.on_session_updated(&info),
            Event::SessionRemoved(id) => self.interceptor.on_session_removed(&id),
            Event::RuntimeMessage(message) => self.interceptor.on_message(&message),
        }
    }

    /// Registration filter, then the interceptor
    pub fn on_before_request(&mut self, request: &RequestDetails) -> InterceptAction {
        if !self.filter.matches(request) {
            self.interceptor.record_filtered();
            return InterceptAction::Continue;
        }
        self.interceptor.before_request(request)
    }

    pub fn interceptor(&self) -> &RedirectInterceptor {
        &self.interceptor
    }

    pub fn filter(&self) -> &RequestFilter {
        &self.filter
    }
}

/// Cloneable sender side of the event loop
#[derive(Clone)]
pub struct EventLoopHandle {
    sender: mpsc::UnboundedSender<Event>,
    stats: Arc<RwLock<InterceptStats>>,
}

impl EventLoopHandle {
    /// Deliver a request notification and wait for the decision.
    ///
    /// Never fails: a closed loop means the request proceeds unmodified.
    pub async fn before_request(&self, request: RequestDetails) -> InterceptAction {
        let (reply, decision) = oneshot::channel();
        if self
            .sender
            .send(Event::BeforeRequest { request, reply })
            .is_err()
        {
            tracing::warn!("Event loop closed, letting request through");
            return InterceptAction::Continue;
        }
        decision.await.unwrap_or_default()
    }

    /// Report a session update
    pub fn session_updated(&self, info: SessionInfo) -> Result<()> {
        self.send(Event::SessionUpdated(info))
    }

    /// Report a closed session
    pub fn session_removed(&self, id: SessionId) -> Result<()> {
        self.send(Event::SessionRemoved(id))
    }

    /// Deliver a configuration message (fire-and-forget)
    pub fn send_message(&self, message: ConfigMessage) -> Result<()> {
        self.send(Event::RuntimeMessage(message))
    }

    /// Snapshot of the statistics
    pub fn stats(&self) -> InterceptStats {
        self.stats.read().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn send(&self, event: Event) -> Result<()> {
        self.sender.send(event).map_err(|_| Error::EventLoopClosed)
    }
}
