// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Rewrite rule engine
//!
//! Decides, for a single URL, whether it should be served from the charity
//! subdomain. Matching is two explicit steps: the scheme + host prefix must
//! belong to a configured domain, then the path must not start with any
//! exclusion fragment. No state is kept between calls.

use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_SCHEME, DEFAULT_SUBDOMAIN};
use super::domain::DomainPattern;
use crate::error::{Error, Result};

/// Substitution template for rewritten URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteTemplate {
    /// Scheme of the rewritten URL
    pub scheme: String,
    /// Subdomain placed in front of `<base>.<tld>`
    pub subdomain: String,
}

impl Default for RewriteTemplate {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            subdomain: DEFAULT_SUBDOMAIN.to_string(),
        }
    }
}

impl RewriteTemplate {
    fn render(&self, host: &str, rest: &str) -> String {
        format!("{}://{}.{}{}", self.scheme, self.subdomain, host, rest)
    }
}

/// Outcome of evaluating one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteDecision {
    /// Redirect to this URL
    Rewrite(String),
    /// Host is not one of the configured domains
    OutOfScope,
    /// Host matched, but the path hit an exclusion
    Excluded {
        /// The exclusion fragment that matched
        pattern: String,
    },
    /// Rewriting would produce the input URL again
    Unchanged,
}

impl RewriteDecision {
    /// Whether this decision produces a redirect
    pub fn is_rewrite(&self) -> bool {
        matches!(self, RewriteDecision::Rewrite(_))
    }

    /// Rewritten URL, or `None` for every no-change outcome
    pub fn into_url(self) -> Option<String> {
        match self {
            RewriteDecision::Rewrite(url) => Some(url),
            _ => None,
        }
    }

    /// Short label used in logs and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            RewriteDecision::Rewrite(_) => "rewrite",
            RewriteDecision::OutOfScope => "out-of-scope",
            RewriteDecision::Excluded { .. } => "excluded",
            RewriteDecision::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledDomain {
    pattern: DomainPattern,
    matcher: Regex,
}

/// Compiled rewrite rules
#[derive(Debug, Clone)]
pub struct RewriteRules {
    domains: Vec<CompiledDomain>,
    exclusions: Vec<String>,
    exclusion_set: RegexSet,
    template: RewriteTemplate,
}

impl RewriteRules {
    /// Compile a rule set.
    ///
    /// Every exclusion fragment is anchored at the start of the path, after
    /// the hostname and any explicit port.
    pub fn new(
        domains: Vec<DomainPattern>,
        exclusions: Vec<String>,
        template: RewriteTemplate,
    ) -> Result<Self> {
        if template.scheme.is_empty() || template.subdomain.is_empty() {
            return Err(Error::config("rewrite template needs a scheme and a subdomain"));
        }

        let mut compiled = Vec::with_capacity(domains.len());
        for pattern in domains {
            let matcher = pattern.compile()?;
            compiled.push(CompiledDomain { pattern, matcher });
        }

        let anchored: Vec<String> = exclusions.iter().map(|e| format!("^(?:{})", e)).collect();
        // Compile one by one first so a failure names its fragment.
        for (fragment, pattern) in exclusions.iter().zip(&anchored) {
            Regex::new(pattern).map_err(|e| Error::invalid_pattern(fragment.clone(), e))?;
        }
        let exclusion_set = RegexSet::new(&anchored)
            .map_err(|e| Error::invalid_pattern(exclusions.join(" | "), e))?;

        Ok(Self {
            domains: compiled,
            exclusions,
            exclusion_set,
            template,
        })
    }

    /// Evaluate a URL and report why it is or is not rewritten
    pub fn evaluate(&self, url: &str) -> RewriteDecision {
        for domain in &self.domains {
            let Some(caps) = domain.matcher.captures(url) else {
                continue;
            };
            let Some(host) = caps.name("host") else {
                continue;
            };
            let rest = &url[host.end()..];
            let path_start = caps.name("port").map_or(host.end(), |port| port.end());
            let path = &url[path_start..];

            if let Some(idx) = self.exclusion_set.matches(path).iter().next() {
                return RewriteDecision::Excluded {
                    pattern: self.exclusions[idx].clone(),
                };
            }

            let candidate = self.template.render(host.as_str(), rest);
            if candidate == url {
                return RewriteDecision::Unchanged;
            }
            return RewriteDecision::Rewrite(candidate);
        }

        RewriteDecision::OutOfScope
    }

    /// Rewritten URL, or `None` when the original must load unmodified
    pub fn compute_rewrite(&self, url: &str) -> Option<String> {
        self.evaluate(url).into_url()
    }

    /// Origin patterns a request hook should be registered for
    pub fn match_patterns(&self) -> Vec<String> {
        self.domains
            .iter()
            .flat_map(|d| d.pattern.match_patterns())
            .collect()
    }

    /// Configured domains
    pub fn domains(&self) -> impl Iterator<Item = &DomainPattern> {
        self.domains.iter().map(|d| &d.pattern)
    }

    /// Configured exclusion fragments, in order
    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// Substitution template
    pub fn template(&self) -> &RewriteTemplate {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::defaults::{DEFAULT_BASE, DEFAULT_EXCLUSIONS, DEFAULT_TLDS};

    fn rules() -> RewriteRules {
        RewriteRules::new(
            vec![DomainPattern::new(DEFAULT_BASE, DEFAULT_TLDS.iter().copied())],
            DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            RewriteTemplate::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_rewrites_in_scope_urls() {
        let rules = rules();

        assert_eq!(
            rules.compute_rewrite("https://amazon.de/dp/B000123456").as_deref(),
            Some("https://smile.amazon.de/dp/B000123456")
        );
        assert_eq!(
            rules.compute_rewrite("https://amazon.co.uk/").as_deref(),
            Some("https://smile.amazon.co.uk/")
        );
        assert_eq!(
            rules
                .compute_rewrite("http://www.amazon.com/s?k=rust+book&ref=nb#top")
                .as_deref(),
            Some("https://smile.amazon.com/s?k=rust+book&ref=nb#top")
        );
    }

    #[test]
    fn test_bare_host_and_port() {
        let rules = rules();
        assert_eq!(
            rules.compute_rewrite("https://www.amazon.de").as_deref(),
            Some("https://smile.amazon.de")
        );
        assert_eq!(
            rules.compute_rewrite("https://amazon.com:443/dp/X").as_deref(),
            Some("https://smile.amazon.com:443/dp/X")
        );
    }

    #[test]
    fn test_exclusions() {
        let rules = rules();

        assert_eq!(
            rules.evaluate("https://www.amazon.com/gp/sign-in?x=1"),
            RewriteDecision::Excluded {
                pattern: "/gp/sign-in".to_string()
            }
        );
        assert_eq!(
            rules.evaluate("https://amazon.de/gp/css/settings"),
            RewriteDecision::Excluded {
                pattern: r"/gp/[^/]+/settings".to_string()
            }
        );
        assert!(rules.compute_rewrite("https://amazon.co.uk/ap/signin?openid=1").is_none());
        assert!(rules.compute_rewrite("https://amazon.com/local/ajax/x").is_none());
    }

    #[test]
    fn test_exclusions_are_anchored_at_path_start() {
        let rules = rules();

        // Exclusion text later in the path does not count.
        assert!(rules
            .compute_rewrite("https://amazon.com/dp/X?next=/gp/sign-in")
            .is_some());
        // Escaped dot stays literal.
        assert!(rules.compute_rewrite("https://amazon.com/gp/aw/soXhtml").is_some());
        assert!(rules.compute_rewrite("https://amazon.com/gp/aw/so.html").is_none());
        // Settings fragment needs exactly one segment between.
        assert!(rules.compute_rewrite("https://amazon.com/gp/settings").is_some());
    }

    #[test]
    fn test_out_of_scope() {
        let rules = rules();

        for url in [
            "https://amazon.fr/dp/X",
            "https://example.com/",
            "https://amazon.com.example.net/",
            "https://notamazon.com/",
            "not a url",
            "",
        ] {
            assert_eq!(rules.evaluate(url), RewriteDecision::OutOfScope, "{}", url);
        }
    }

    #[test]
    fn test_exclusions_apply_with_explicit_port() {
        let rules = rules();

        assert_eq!(
            rules.evaluate("https://amazon.com:8443/gp/sign-in"),
            RewriteDecision::Excluded {
                pattern: "/gp/sign-in".to_string()
            }
        );
        assert!(rules
            .compute_rewrite("https://www.amazon.com:443/ap/signin?x=1")
            .is_none());
        assert!(rules
            .compute_rewrite("http://amazon.de:80/gp/css/settings")
            .is_none());

        // Port survives the rewrite.
        assert_eq!(
            rules.compute_rewrite("https://amazon.com:8443/dp/X").as_deref(),
            Some("https://smile.amazon.com:8443/dp/X")
        );
    }

    fn assert_rewrites_are_stable(rules: &RewriteRules) {
        let tails = [
            "",
            "/",
            "/dp/B000123456",
            "/s?k=rust+book&ref=nb",
            "/gp/bestsellers#top",
            "?q=1",
            "#frag",
            ":8443/dp/X?x=1#y",
            ":443/",
        ];

        for domain in rules.domains() {
            for host in domain.hosts() {
                for prefix in ["", "www."] {
                    for scheme in ["http", "https"] {
                        for tail in tails {
                            let url = format!("{}://{}{}{}", scheme, prefix, host, tail);
                            let Some(first) = rules.compute_rewrite(&url) else {
                                panic!("expected a rewrite for {}", url);
                            };
                            assert_eq!(rules.compute_rewrite(&first), None, "{} -> {}", url, first);
                            assert_eq!(
                                rules.evaluate(&first),
                                RewriteDecision::OutOfScope,
                                "{}",
                                first
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_rewrite_output_is_stable() {
        assert_rewrites_are_stable(&rules());
    }

    #[test]
    fn test_rewrite_output_is_stable_with_custom_template() {
        let rules = RewriteRules::new(
            vec![
                DomainPattern::new(DEFAULT_BASE, DEFAULT_TLDS.iter().copied()),
                DomainPattern::new("shop", ["example", "co.example"]),
            ],
            DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            RewriteTemplate {
                scheme: "https".to_string(),
                subdomain: "give".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            rules.compute_rewrite("http://www.shop.co.example/cart").as_deref(),
            Some("https://give.shop.co.example/cart")
        );
        assert_rewrites_are_stable(&rules);
    }

    #[test]
    fn test_identical_candidate_is_no_change() {
        let rules = RewriteRules::new(
            vec![DomainPattern::new("amazon", ["com"])],
            vec![],
            RewriteTemplate {
                scheme: "https".to_string(),
                subdomain: "www".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            rules.evaluate("https://www.amazon.com/dp/X"),
            RewriteDecision::Unchanged
        );
        assert_eq!(
            rules.compute_rewrite("http://amazon.com/dp/X").as_deref(),
            Some("https://www.amazon.com/dp/X")
        );
    }

    #[test]
    fn test_multiple_domains_in_order() {
        let rules = RewriteRules::new(
            vec![
                DomainPattern::new("amazon", ["com"]),
                DomainPattern::new("shop", ["example"]),
            ],
            vec!["/account".to_string()],
            RewriteTemplate::default(),
        )
        .unwrap();

        assert_eq!(
            rules.compute_rewrite("https://www.shop.example/cart").as_deref(),
            Some("https://smile.shop.example/cart")
        );
        assert!(rules.compute_rewrite("https://shop.example/account").is_none());
        assert_eq!(rules.match_patterns().len(), 4);
    }

    #[test]
    fn test_bad_exclusion_names_fragment() {
        let err = RewriteRules::new(
            vec![DomainPattern::new("amazon", ["com"])],
            vec!["/ok".to_string(), "/gp/[".to_string()],
            RewriteTemplate::default(),
        )
        .unwrap_err();

        assert_eq!(err.pattern(), Some("/gp/["));
    }
}
