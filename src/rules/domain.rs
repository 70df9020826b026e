// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Supported domain patterns

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A base hostname and the country suffixes it is served under.
///
/// Matches `http(s)://(www.)?<base>.<tld>` for every `tld`, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPattern {
    /// Base hostname, e.g. `amazon`
    pub base: String,
    /// Country suffixes, e.g. `com`, `co.uk`
    pub tlds: Vec<String>,
}

impl DomainPattern {
    /// Create a new domain pattern
    pub fn new<I, S>(base: impl Into<String>, tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base: base.into(),
            tlds: tlds.into_iter().map(Into::into).collect(),
        }
    }

    /// Bare hostnames covered by this pattern (`amazon.com`, ...)
    pub fn hosts(&self) -> impl Iterator<Item = String> + '_ {
        self.tlds.iter().map(move |tld| format!("{}.{}", self.base, tld))
    }

    /// Registration match patterns for the bare and `www.` forms of every host
    pub fn match_patterns(&self) -> Vec<String> {
        self.hosts()
            .flat_map(|host| [format!("*://{}/*", host), format!("*://www.{}/*", host)])
            .collect()
    }

    /// Compile the scheme + host prefix matcher.
    ///
    /// The `host` group excludes any `www.` prefix and `port` holds an
    /// explicit `:<digits>`. The trailing class requires a host boundary so
    /// `amazon.com.example.net` stays out of scope.
    pub(crate) fn compile(&self) -> Result<Regex> {
        self.validate()?;

        let tlds = self
            .tlds
            .iter()
            .map(|tld| regex::escape(tld))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(
            r"^https?://(?:www\.)?(?P<host>{}\.(?:{}))(?P<port>:\d+)?(?:[/?#]|$)",
            regex::escape(&self.base),
            tlds
        );

        Regex::new(&pattern).map_err(|e| Error::invalid_pattern(pattern, e))
    }

    fn validate(&self) -> Result<()> {
        if self.base.is_empty() || self.base.contains(|c: char| c == '/' || c == ':') {
            return Err(Error::config(format!(
                "invalid base hostname '{}'",
                self.base
            )));
        }
        if self.tlds.is_empty() {
            return Err(Error::config(format!(
                "domain '{}' has no country suffixes",
                self.base
            )));
        }
        if let Some(tld) = self.tlds.iter().find(|t| t.is_empty() || t.starts_with('.')) {
            return Err(Error::config(format!(
                "invalid suffix '{}' for domain '{}'",
                tld, self.base
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amazon() -> DomainPattern {
        DomainPattern::new("amazon", ["com", "co.uk", "de"])
    }

    #[test]
    fn test_match_patterns() {
        let patterns = amazon().match_patterns();
        assert_eq!(patterns.len(), 6);
        assert_eq!(patterns[0], "*://amazon.com/*");
        assert_eq!(patterns[1], "*://www.amazon.com/*");
        assert_eq!(patterns[3], "*://www.amazon.co.uk/*");
    }

    #[test]
    fn test_host_regex() {
        let re = amazon().compile().unwrap();

        let caps = re.captures("https://www.amazon.co.uk/gp").unwrap();
        assert_eq!(&caps["host"], "amazon.co.uk");

        assert!(re.is_match("http://amazon.de"));
        assert!(re.is_match("https://amazon.com:443/"));
        assert!(!re.is_match("https://amazon.com:x/"));
        assert!(!re.is_match("https://amazon.com.example.net/"));
        assert!(!re.is_match("https://amazon.company.com/"));
        assert!(!re.is_match("https://smile.amazon.com/"));
        assert!(!re.is_match("ftp://amazon.com/"));
    }

    #[test]
    fn test_dots_are_literal() {
        let re = amazon().compile().unwrap();
        assert!(!re.is_match("https://amazonXcoXuk/"));
    }

    #[test]
    fn test_validation() {
        assert!(DomainPattern::new("amazon", Vec::<String>::new())
            .compile()
            .is_err());
        assert!(DomainPattern::new("", ["com"]).compile().is_err());
        assert!(DomainPattern::new("amazon", [".com"]).compile().is_err());
    }

    #[test]
    fn test_port_group() {
        let re = amazon().compile().unwrap();

        let caps = re.captures("https://www.amazon.de:8443/gp/sign-in").unwrap();
        assert_eq!(&caps["host"], "amazon.de");
        assert_eq!(&caps["port"], ":8443");

        let caps = re.captures("https://amazon.de/dp/X").unwrap();
        assert!(caps.name("port").is_none());
    }
}
