// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request interception
//!
//! Request events, the registration filter and the redirect interceptor.

mod event;
mod filter;
mod interceptor;

pub(crate) use event::RawId;
pub use event::{InterceptAction, RequestDetails, RequestId, ResourceType};
pub use filter::{MatchPattern, RequestFilter};
pub use interceptor::{InterceptStats, RedirectInterceptor};
