// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL rewrite rules
//!
//! Pure matching logic. Nothing here knows about sessions, tabs or
//! preferences; privacy policy belongs to the interceptor.

mod defaults;
mod domain;
mod engine;

use lazy_static::lazy_static;

pub use defaults::{
    DEFAULT_BASE, DEFAULT_EXCLUSIONS, DEFAULT_SCHEME, DEFAULT_SUBDOMAIN, DEFAULT_TLDS,
};
pub use domain::DomainPattern;
pub use engine::{RewriteDecision, RewriteRules, RewriteTemplate};

lazy_static! {
    static ref DEFAULT_RULES: RewriteRules = RewriteRules::new(
        vec![DomainPattern::new(DEFAULT_BASE, DEFAULT_TLDS.iter().copied())],
        DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
        RewriteTemplate::default(),
    )
    .expect("built-in rule set must compile");
}

/// Built-in rule set
pub fn default_rules() -> &'static RewriteRules {
    &DEFAULT_RULES
}

/// Rewrite `url` with the built-in rule set
pub fn compute_rewrite(url: &str) -> Option<String> {
    DEFAULT_RULES.compute_rewrite(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples() {
        assert_eq!(compute_rewrite("https://www.amazon.com/gp/sign-in?x=1"), None);
        assert_eq!(
            compute_rewrite("https://amazon.de/dp/B000123456").as_deref(),
            Some("https://smile.amazon.de/dp/B000123456")
        );
        assert_eq!(
            compute_rewrite("https://amazon.co.uk/").as_deref(),
            Some("https://smile.amazon.co.uk/")
        );
    }

    #[test]
    fn test_every_exclusion_blocks_every_host() {
        let rules = default_rules();
        let samples = [
            "/ap/signin",
            "/exec/obidos/account-access-login",
            "/exec/obidos/subst/marketplace/sell-your-stuff.html",
            "/gp/yourstore/home",
            "/gp/video/watchlist",
            "/myh/manage",
            "/wishlist/universal",
        ];

        for host in rules.domains().flat_map(|d| d.hosts().collect::<Vec<_>>()) {
            for path in samples {
                for prefix in ["https://", "https://www."] {
                    let url = format!("{}{}{}?ref=x", prefix, host, path);
                    assert_eq!(compute_rewrite(&url), None, "{}", url);
                }
            }
        }
    }

    #[test]
    fn test_default_match_patterns() {
        let patterns = default_rules().match_patterns();
        assert_eq!(
            patterns,
            vec![
                "*://amazon.com/*",
                "*://www.amazon.com/*",
                "*://amazon.co.uk/*",
                "*://www.amazon.co.uk/*",
                "*://amazon.de/*",
                "*://www.amazon.de/*",
            ]
        );
    }
}
