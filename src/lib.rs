// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # smile-redirect - Charity Subdomain Redirector
//!
//! Intercepts top-level navigations to supported shop domains and redirects
//! them to the charity (`smile.`) subdomain, except for paths that break
//! there (sign-in, account and settings pages).
//!
//! ## Features
//!
//! - Pure rule engine: domain patterns, regex exclusion fragments, loop guard
//! - Registration filter: origin match patterns, resource types, methods
//! - Duplicate suppression for repeated hook notifications
//! - Optional private-session exemption, synced from a preference store
//! - Single-queue event loop with fail-open request decisions
//!
//! ## Example
//!
//! ```rust,no_run
//! use smile_redirect::{EventLoop, MemoryStore, RedirectConfig, RequestDetails, StaticSessions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (handle, _task) = EventLoop::start(
//!         &RedirectConfig::default(),
//!         &MemoryStore::new(),
//!         &StaticSessions::default(),
//!     )
//!     .await?;
//!
//!     let action = handle
//!         .before_request(RequestDetails::navigation("1", "https://amazon.de/dp/B000123456"))
//!         .await;
//!     println!("{:?}", action);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod network;
pub mod preferences;
pub mod rules;
pub mod runtime;
pub mod session;

// Re-exports for convenience

// Configuration
pub use config::RedirectConfig;

// Errors
pub use error::{Error, ErrorContext, Result};

// Rules
pub use rules::{
    compute_rewrite, default_rules, DomainPattern, RewriteDecision, RewriteRules,
    RewriteTemplate,
};

// Network
pub use network::{
    InterceptAction, InterceptStats, MatchPattern, RedirectInterceptor, RequestDetails,
    RequestFilter, RequestId, ResourceType,
};

// Sessions
pub use session::{SessionId, SessionInfo, SessionSource, SessionTracker, StaticSessions};

// Preferences
pub use preferences::{
    ConfigMessage, JsonFileStore, MemoryStore, PreferenceStore, Preferences,
    DISABLE_IN_PRIVATE_MODE_KEY,
};

// Runtime
pub use runtime::{replay, Event, EventLoop, EventLoopHandle, EventSource, ReplayEvent, ReplayOutcome};

/// smile-redirect version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
