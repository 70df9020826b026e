// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Redirect configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, Result};
use crate::network::{RequestFilter, ResourceType};
use crate::preferences::Preferences;
use crate::rules::{
    DomainPattern, RewriteRules, RewriteTemplate, DEFAULT_BASE, DEFAULT_EXCLUSIONS,
    DEFAULT_SCHEME, DEFAULT_SUBDOMAIN, DEFAULT_TLDS,
};

/// Redirect configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Supported domains
    pub domains: Vec<DomainPattern>,
    /// Path fragments that are never rewritten
    pub exclusions: Vec<String>,
    /// Subdomain of rewritten URLs
    pub subdomain: String,
    /// Scheme of rewritten URLs
    pub scheme: String,
    /// Only intercept `GET` requests
    pub require_get: bool,
    /// Initial private-mode preference, used until the store says otherwise
    pub disable_in_private_mode: bool,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            domains: vec![DomainPattern::new(DEFAULT_BASE, DEFAULT_TLDS.iter().copied())],
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            subdomain: DEFAULT_SUBDOMAIN.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            require_get: false,
            disable_in_private_mode: false,
        }
    }
}

impl RedirectConfig {
    /// Create a new config with the built-in rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Config that also ignores non-`GET` navigations
    pub fn strict() -> Self {
        Self {
            require_get: true,
            ..Default::default()
        }
    }

    /// Parse a (possibly partial) JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a (possibly partial) JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_path(path)?;
        serde_json::from_str(&text).with_path(path)
    }

    /// Add a supported domain
    pub fn domain(mut self, domain: DomainPattern) -> Self {
        self.domains.push(domain);
        self
    }

    /// Replace the supported domains
    pub fn domains(mut self, domains: Vec<DomainPattern>) -> Self {
        self.domains = domains;
        self
    }

    /// Add an exclusion fragment
    pub fn exclusion(mut self, fragment: impl Into<String>) -> Self {
        self.exclusions.push(fragment.into());
        self
    }

    /// Replace the exclusion fragments
    pub fn exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Set rewrite subdomain
    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = subdomain.into();
        self
    }

    /// Set rewrite scheme
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Only intercept `GET` requests
    pub fn require_get(mut self, require: bool) -> Self {
        self.require_get = require;
        self
    }

    /// Set the initial private-mode preference
    pub fn disable_in_private_mode(mut self, disable: bool) -> Self {
        self.disable_in_private_mode = disable;
        self
    }

    /// Compile the rewrite rules
    pub fn build_rules(&self) -> Result<RewriteRules> {
        RewriteRules::new(
            self.domains.clone(),
            self.exclusions.clone(),
            RewriteTemplate {
                scheme: self.scheme.clone(),
                subdomain: self.subdomain.clone(),
            },
        )
    }

    /// Registration filter for the request hook.
    ///
    /// Always limited to top-level document navigations.
    pub fn request_filter(&self, rules: &RewriteRules) -> Result<RequestFilter> {
        let patterns = rules.match_patterns();
        let filter = RequestFilter::new(patterns.as_slice(), vec![ResourceType::MainFrame])?;
        Ok(if self.require_get {
            filter.methods(["GET"])
        } else {
            filter
        })
    }

    /// Preferences in effect before the persisted store is read
    pub fn initial_preferences(&self) -> Preferences {
        Preferences::new(self.disable_in_private_mode)
    }
}
