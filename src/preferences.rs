// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! User preference sync
//!
//! The preference is read once from a persisted store at startup and then
//! overwritten by runtime configuration messages. This crate never writes
//! back to the store; the settings UI owns that.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, ErrorContext, Result};

/// Store key of the private-mode preference
pub const DISABLE_IN_PRIVATE_MODE_KEY: &str = "disableInPrivateMode";

/// In-memory preference state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Skip rewriting for requests from private sessions
    pub disable_in_private_mode: bool,
}

impl Preferences {
    pub fn new(disable_in_private_mode: bool) -> Self {
        Self {
            disable_in_private_mode,
        }
    }

    /// Read the persisted preference once.
    ///
    /// `initial` is kept when the key is absent or the store fails.
    pub async fn load(store: &dyn PreferenceStore, initial: Preferences) -> Self {
        match store.get(DISABLE_IN_PRIVATE_MODE_KEY).await {
            Ok(Some(value)) => {
                let prefs = Self::new(is_truthy(&value));
                tracing::debug!(
                    disable_in_private_mode = prefs.disable_in_private_mode,
                    "Loaded stored preference"
                );
                prefs
            }
            Ok(None) => initial,
            Err(e) => {
                tracing::warn!(error = %e, "Preference store unavailable, using defaults");
                initial
            }
        }
    }

    /// Apply a runtime configuration message. Returns whether anything changed.
    ///
    /// A message without the field leaves the preference as it is.
    pub fn apply(&mut self, message: &ConfigMessage) -> bool {
        match message.disable_in_private_mode {
            Some(value) if value != self.disable_in_private_mode => {
                self.disable_in_private_mode = value;
                true
            }
            _ => false,
        }
    }
}

/// Message sent by the settings UI over the runtime channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMessage {
    #[serde(
        rename = "disableInPrivateMode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub disable_in_private_mode: Option<bool>,
}

impl ConfigMessage {
    pub fn disable_in_private_mode(value: bool) -> Self {
        Self {
            disable_in_private_mode: Some(value),
        }
    }
}

/// JavaScript-style truthiness of a stored value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Persisted key/value store the preference is read from
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Get the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }
}

/// JSON object on disk, shaped like the extension's local storage area.
///
/// A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_path(&self.path),
        };

        let value: Value = serde_json::from_str(&text).with_path(&self.path)?;
        match value {
            Value::Object(mut map) => Ok(map.remove(key)),
            _ => Err(Error::config(format!(
                "{}: preference file must hold a JSON object",
                self.path.display()
            ))),
        }
    }
}
