// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request event types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// Identifier as delivered by a host hook: browsers use numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Opaque identifier of one in-flight request.
///
/// Hooks may report the same request more than once; equal ids mean the
/// same request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RawId> for RequestId {
    fn from(raw: RawId) -> Self {
        Self(raw.into())
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for RequestId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resource type of a request, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Top-level document navigation
    #[serde(alias = "document")]
    MainFrame,
    /// Iframe navigation
    SubFrame,
    /// Link stylesheet
    Stylesheet,
    /// Script tag
    Script,
    /// Image
    Image,
    /// Font
    Font,
    /// Plugin object
    Object,
    /// XMLHttpRequest / fetch
    #[serde(alias = "xhr", alias = "fetch")]
    XmlHttpRequest,
    /// Beacon / ping
    Ping,
    /// Media (audio/video)
    Media,
    /// WebSocket handshake
    WebSocket,
    /// Unknown
    #[serde(other)]
    Other,
}

impl ResourceType {
    /// Whether this is a primary-document navigation
    pub fn is_navigation(&self) -> bool {
        matches!(self, ResourceType::MainFrame)
    }
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_resource_type() -> ResourceType {
    ResourceType::MainFrame
}

/// One notification from the request-observation hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDetails {
    /// Request identifier
    pub request_id: RequestId,
    /// Full request URL
    pub url: String,
    /// Originating session (tab); `None` for requests outside any tab
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// HTTP method
    #[serde(default = "default_method")]
    pub method: String,
    /// Resource type
    #[serde(default = "default_resource_type")]
    pub resource_type: ResourceType,
}

impl RequestDetails {
    /// Create a top-level `GET` navigation
    pub fn navigation(request_id: impl Into<RequestId>, url: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            url: url.into(),
            session_id: None,
            method: default_method(),
            resource_type: ResourceType::MainFrame,
        }
    }

    /// Set originating session
    pub fn session(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set HTTP method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set resource type
    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self
    }
}

/// Decision returned to the host for one request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InterceptAction {
    /// Let the request proceed to its original destination
    #[default]
    Continue,
    /// Substitute the navigation target
    Redirect { url: String },
}

impl InterceptAction {
    /// Redirect target, if any
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            InterceptAction::Redirect { url } => Some(url),
            InterceptAction::Continue => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, InterceptAction::Redirect { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_details_from_hook_json() {
        let json = r#"{
            "request_id": 4711,
            "url": "https://amazon.de/dp/B000123456",
            "session_id": 3,
            "method": "GET",
            "resource_type": "main_frame"
        }"#;
        let details: RequestDetails = serde_json::from_str(json).unwrap();

        assert_eq!(details.request_id, RequestId::from(4711u64));
        assert_eq!(details.session_id, Some(SessionId::from(3u64)));
        assert!(details.resource_type.is_navigation());
    }

    #[test]
    fn test_numeric_ids_of_any_size() {
        let details: RequestDetails = serde_json::from_str(
            r#"{"request_id": 18446744073709551615, "url": "https://amazon.com/", "session_id": -3}"#,
        )
        .unwrap();
        assert_eq!(details.request_id.as_str(), "18446744073709551615");
        assert_eq!(details.session_id, Some(SessionId::from("-3")));

        let id: RequestId = serde_json::from_str("12.5").unwrap();
        assert_eq!(id.as_str(), "12.5");
    }

    #[test]
    fn test_request_details_defaults() {
        let json = r#"{"request_id": "r-1", "url": "https://amazon.com/"}"#;
        let details: RequestDetails = serde_json::from_str(json).unwrap();

        assert_eq!(details.method, "GET");
        assert_eq!(details.resource_type, ResourceType::MainFrame);
        assert_eq!(details.session_id, None);
    }

    #[test]
    fn test_unknown_resource_type() {
        let t: ResourceType = serde_json::from_str(r#""csp_report""#).unwrap();
        assert_eq!(t, ResourceType::Other);

        let t: ResourceType = serde_json::from_str(r#""xhr""#).unwrap();
        assert_eq!(t, ResourceType::XmlHttpRequest);
    }

    #[test]
    fn test_intercept_action_json() {
        let action = InterceptAction::Redirect {
            url: "https://smile.amazon.com/".to_string(),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(
            json,
            r#"{"action":"redirect","url":"https://smile.amazon.com/"}"#
        );
        assert_eq!(action.redirect_url(), Some("https://smile.amazon.com/"));
        assert!(!InterceptAction::Continue.is_redirect());
    }
}
