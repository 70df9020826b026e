// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! smile-redirect CLI
//!
//! Inspect the rewrite rules and replay recorded host events.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tokio::io::BufReader;

use smile_redirect::{
    replay, EventLoop, InterceptAction, JsonFileStore, MemoryStore, PreferenceStore,
    RedirectConfig, RewriteDecision, StaticSessions,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smile_redirect=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "rewrite" => {
            if args.len() < 3 {
                eprintln!("Usage: smile-redirect rewrite <url>...");
                return ExitCode::from(1);
            }
            rewrite_urls(&args[2..])
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: smile-redirect check <url>");
                return ExitCode::from(1);
            }
            check_url(&args[2])
        }
        "patterns" => print_patterns(),
        "replay" => {
            if args.len() < 3 {
                eprintln!("Usage: smile-redirect replay <events.jsonl> [--config <file>] [--prefs <file>]");
                return ExitCode::from(1);
            }
            match replay_file(&args[2..]).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Replay failed: {:#}", e);
                    ExitCode::from(1)
                }
            }
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("smile-redirect {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"smile-redirect - Charity Subdomain Redirector

USAGE:
    smile-redirect <COMMAND> [OPTIONS]

COMMANDS:
    rewrite <url>...    Print the rewritten URL (or the original) for each URL
    check <url>         Explain the rewrite decision for a URL
    patterns            List the origin patterns the request hook is registered for
    replay <file>       Replay JSON-lines host events through the interceptor
    help                Show this help message
    version             Show version information

REPLAY OPTIONS:
    --config <file>     JSON config (domains, exclusions, subdomain, ...)
    --prefs <file>      JSON preference store ({{"disableInPrivateMode": true}})

EXAMPLES:
    smile-redirect rewrite https://amazon.de/dp/B000123456
    smile-redirect check "https://www.amazon.com/gp/sign-in?x=1"
    smile-redirect replay events.jsonl --prefs storage.json
"#
    );
}

fn load_rules() -> Option<smile_redirect::RewriteRules> {
    match RedirectConfig::default().build_rules() {
        Ok(rules) => Some(rules),
        Err(e) => {
            eprintln!("Failed to build rules: {}", e);
            None
        }
    }
}

fn rewrite_urls(urls: &[String]) -> ExitCode {
    let Some(rules) = load_rules() else {
        return ExitCode::from(1);
    };

    for url in urls {
        match rules.compute_rewrite(url) {
            Some(rewritten) => println!("{}", rewritten),
            None => println!("{}", url),
        }
    }
    ExitCode::SUCCESS
}

fn check_url(url: &str) -> ExitCode {
    let Some(rules) = load_rules() else {
        return ExitCode::from(1);
    };

    let decision = rules.evaluate(url);
    println!("URL:      {}", url);
    println!("Decision: {}", decision.label());
    match decision {
        RewriteDecision::Rewrite(target) => println!("Target:   {}", target),
        RewriteDecision::Excluded { pattern } => println!("Matched:  {}", pattern),
        RewriteDecision::OutOfScope => println!("Host is not a supported domain"),
        RewriteDecision::Unchanged => println!("Rewrite would not change the URL"),
    }
    ExitCode::SUCCESS
}

fn print_patterns() -> ExitCode {
    let Some(rules) = load_rules() else {
        return ExitCode::from(1);
    };

    for pattern in rules.match_patterns() {
        println!("{}", pattern);
    }
    ExitCode::SUCCESS
}

async fn replay_file(args: &[String]) -> anyhow::Result<()> {
    let mut events: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut prefs_path: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(iter.next().context("--config needs a file")?.into());
            }
            "--prefs" => {
                prefs_path = Some(iter.next().context("--prefs needs a file")?.into());
            }
            other if events.is_none() => events = Some(other.into()),
            other => anyhow::bail!("unexpected argument '{}'", other),
        }
    }
    let events = events.context("missing events file")?;

    let config = match config_path {
        Some(path) => RedirectConfig::from_json_file(&path)?,
        None => RedirectConfig::default(),
    };
    let store: Box<dyn PreferenceStore> = match prefs_path {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };

    let (handle, task) = EventLoop::start(&config, store.as_ref(), &StaticSessions::default()).await?;

    let file = tokio::fs::File::open(&events)
        .await
        .with_context(|| format!("opening {}", events.display()))?;
    let outcomes = replay(&handle, BufReader::new(file)).await?;

    for outcome in &outcomes {
        match &outcome.action {
            InterceptAction::Redirect { url } => {
                println!("{:>4}  {} -> {}", outcome.line, outcome.request.url, url)
            }
            InterceptAction::Continue => {
                println!("{:>4}  {} (continue)", outcome.line, outcome.request.url)
            }
        }
    }

    drop(handle);
    let interceptor = task.await.context("event loop task failed")?;
    println!();
    println!("{}", serde_json::to_string_pretty(&interceptor.stats())?);

    Ok(())
}
