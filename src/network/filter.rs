// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Registration filter for the request hook
//!
//! A handler is registered for a list of origin match patterns
//! (`*://amazon.com/*`), a list of resource types and optionally a list of
//! methods. Requests outside the filter never reach the handler.

use regex::Regex;
use url::Url;

use super::event::{RequestDetails, ResourceType};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SchemeMatch {
    /// `*` covers `http` and `https`
    Web,
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostMatch {
    Any,
    Exact(String),
    /// `*.example.com`: the domain itself or any subdomain
    Suffix(String),
}

/// Parsed `<scheme>://<host>/<path>` match pattern
#[derive(Debug, Clone)]
pub struct MatchPattern {
    source: String,
    scheme: SchemeMatch,
    host: HostMatch,
    path: Regex,
}

impl MatchPattern {
    /// Parse a match pattern such as `*://www.amazon.de/*`
    pub fn parse(pattern: &str) -> Result<Self> {
        let (scheme, rest) = pattern
            .split_once("://")
            .ok_or_else(|| Error::invalid_match_pattern(pattern, "missing '://'"))?;

        let scheme = match scheme {
            "*" => SchemeMatch::Web,
            "http" | "https" => SchemeMatch::Exact(scheme.to_string()),
            other => {
                return Err(Error::invalid_match_pattern(
                    pattern,
                    format!("unsupported scheme '{}'", other),
                ))
            }
        };

        let (host, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => return Err(Error::invalid_match_pattern(pattern, "missing path")),
        };

        let host = match host {
            "" => return Err(Error::invalid_match_pattern(pattern, "empty host")),
            "*" => HostMatch::Any,
            h if h.starts_with("*.") => HostMatch::Suffix(h[2..].to_ascii_lowercase()),
            h if h.contains('*') => {
                return Err(Error::invalid_match_pattern(
                    pattern,
                    "'*' is only allowed as the first host label",
                ))
            }
            h => HostMatch::Exact(h.to_ascii_lowercase()),
        };

        let glob = path
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let path = Regex::new(&format!("^{}$", glob))
            .map_err(|e| Error::invalid_pattern(pattern, e))?;

        Ok(Self {
            source: pattern.to_string(),
            scheme,
            host,
            path,
        })
    }

    /// Whether `url` falls under this pattern. Unparseable URLs never match.
    pub fn matches(&self, url: &str) -> bool {
        let Ok(url) = Url::parse(url) else {
            return false;
        };
        self.matches_url(&url)
    }

    fn matches_url(&self, url: &Url) -> bool {
        let scheme_ok = match &self.scheme {
            SchemeMatch::Web => matches!(url.scheme(), "http" | "https"),
            SchemeMatch::Exact(s) => url.scheme() == s,
        };
        if !scheme_ok {
            return false;
        }

        let Some(host) = url.host_str() else {
            return false;
        };
        let host_ok = match &self.host {
            HostMatch::Any => true,
            HostMatch::Exact(h) => host == h,
            HostMatch::Suffix(suffix) => {
                host == suffix
                    || host
                        .strip_suffix(suffix.as_str())
                        .map_or(false, |prefix| prefix.ends_with('.'))
            }
        };
        if !host_ok {
            return false;
        }

        let target = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        self.path.is_match(&target)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Which requests a handler is registered for
#[derive(Debug, Clone)]
pub struct RequestFilter {
    urls: Vec<MatchPattern>,
    types: Vec<ResourceType>,
    methods: Vec<String>,
}

impl RequestFilter {
    /// Filter on origin patterns and resource types, any method.
    ///
    /// An empty type list matches nothing.
    pub fn new<S: AsRef<str>>(urls: &[S], types: Vec<ResourceType>) -> Result<Self> {
        let urls = urls
            .iter()
            .map(|p| MatchPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            urls,
            types,
            methods: Vec::new(),
        })
    }

    /// Restrict to these HTTP methods (case-insensitive)
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods
            .into_iter()
            .map(|m| m.into().to_ascii_uppercase())
            .collect();
        self
    }

    /// Whether a request should be delivered to the handler
    pub fn matches(&self, request: &RequestDetails) -> bool {
        // No registered types means no requests.
        if !self.types.contains(&request.resource_type) {
            return false;
        }
        if !self.methods.is_empty()
            && !self
                .methods
                .iter()
                .any(|m| m.eq_ignore_ascii_case(&request.method))
        {
            return false;
        }

        let Ok(url) = Url::parse(&request.url) else {
            return false;
        };
        self.urls.is_empty() || self.urls.iter().any(|p| p.matches_url(&url))
    }

    /// Registered origin patterns
    pub fn url_patterns(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(|p| p.as_str())
    }

    pub fn resource_types(&self) -> &[ResourceType] {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_pattern() {
        let p = MatchPattern::parse("*://www.amazon.co.uk/*").unwrap();

        assert!(p.matches("https://www.amazon.co.uk/"));
        assert!(p.matches("http://www.amazon.co.uk/gp/sign-in?x=1"));
        assert!(!p.matches("https://amazon.co.uk/"));
        assert!(!p.matches("ftp://www.amazon.co.uk/"));
        assert!(!p.matches("garbage"));
    }

    #[test]
    fn test_match_pattern_path_and_host_wildcards() {
        let p = MatchPattern::parse("https://*.example.com/account/*").unwrap();

        assert!(p.matches("https://example.com/account/x"));
        assert!(p.matches("https://shop.example.com/account/"));
        assert!(!p.matches("https://badexample.com/account/x"));
        assert!(!p.matches("https://shop.example.com/cart"));
        assert!(!p.matches("http://shop.example.com/account/x"));
    }

    #[test]
    fn test_match_pattern_errors() {
        assert!(MatchPattern::parse("amazon.com/*").is_err());
        assert!(MatchPattern::parse("*://amazon.com").is_err());
        assert!(MatchPattern::parse("ftp://amazon.com/*").is_err());
        assert!(MatchPattern::parse("*://ama*zon.com/*").is_err());
    }

    #[test]
    fn test_filter_main_frame_only() {
        let filter = RequestFilter::new(
            &["*://amazon.com/*", "*://www.amazon.com/*"],
            vec![ResourceType::MainFrame],
        )
        .unwrap();

        let nav = RequestDetails::navigation("1", "https://www.amazon.com/dp/X");
        assert!(filter.matches(&nav));

        let image = nav.clone().resource_type(ResourceType::Image);
        assert!(!filter.matches(&image));

        let xhr = nav.clone().resource_type(ResourceType::XmlHttpRequest);
        assert!(!filter.matches(&xhr));

        let other_site = RequestDetails::navigation("2", "https://example.com/");
        assert!(!filter.matches(&other_site));
    }

    #[test]
    fn test_filter_methods() {
        let filter = RequestFilter::new(&["*://amazon.com/*"], vec![ResourceType::MainFrame])
            .unwrap()
            .methods(["get"]);

        let get = RequestDetails::navigation("1", "https://amazon.com/");
        assert!(filter.matches(&get));
        assert!(!filter.matches(&get.clone().method("POST")));
    }

    #[test]
    fn test_filter_without_types_matches_nothing() {
        let filter = RequestFilter::new(&["*://amazon.com/*"], Vec::new()).unwrap();

        let nav = RequestDetails::navigation("1", "https://amazon.com/");
        assert!(!filter.matches(&nav));
        assert!(!filter.matches(&nav.resource_type(ResourceType::Image)));
    }
}
