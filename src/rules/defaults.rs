// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Built-in rule set

/// Base hostname of the supported shop
pub const DEFAULT_BASE: &str = "amazon";

/// Supported country suffixes, in match order
pub const DEFAULT_TLDS: &[&str] = &["com", "co.uk", "de"];

/// Subdomain substituted into rewritten URLs
pub const DEFAULT_SUBDOMAIN: &str = "smile";

/// Scheme of rewritten URLs
pub const DEFAULT_SCHEME: &str = "https";

/// Paths that break when served from the charity subdomain.
///
/// Each entry is a regex fragment anchored directly after the hostname, so
/// it acts as a path prefix and may use its own regex syntax.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    r"/ap/signin",
    r"/exec/obidos/account-access-login",
    r"/exec/obidos/change-style",
    r"/exec/obidos/dt/assoc/handle-buy-box",
    r"/exec/obidos/flex-sign-in",
    r"/exec/obidos/handle-buy-box",
    r"/exec/obidos/refer-a-friend-login",
    r"/exec/obidos/subst/associates/join",
    r"/exec/obidos/subst/marketplace/sell-your-stuff\.html",
    r"/forum/kindle",
    r"/gp/[^/]+/settings",
    r"/gp/aag",
    r"/gp/aw/so\.html",
    r"/gp/aw/sp\.html",
    r"/gp/customer-reviews/write-a-review\.html",
    r"/gp/flex/sign-out\.html",
    r"/gp/navigation-country",
    r"/gp/navigation/redirector\.html",
    r"/gp/rate-it",
    r"/gp/redirect\.html",
    r"/gp/rentallist",
    r"/gp/sign-in",
    r"/gp/socialmedia/giveaways",
    r"/gp/switch-language",
    r"/gp/video/library",
    r"/gp/video/watchlist",
    r"/gp/wishlist/universal",
    r"/gp/yourstore",
    r"/myh/manage",
    r"/local/ajax/",
    r"/wishlist/get-button",
    r"/wishlist/universal",
];
