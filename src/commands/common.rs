//! Helpers shared by the command handlers: store opening and output rendering.

use std::path::Path;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{
    api::ApiClient, config::Settings, graph::GraphStore, wide::WideColumnStore, Result,
};

/// Resources a command may need, opened lazily from the settings.
pub struct CommandContext {
    pub settings: Settings,
}

impl CommandContext {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn open_wide(&self) -> Result<WideColumnStore> {
        WideColumnStore::open(&self.settings.store_paths().wide)
    }

    pub fn open_graph(&self) -> Result<GraphStore> {
        GraphStore::open(&self.settings.store_paths().graph)
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        debug!(url = %self.settings.api_url, "using REST service");
        ApiClient::new(
            self.settings.api_url.clone(),
            Duration::from_secs(self.settings.timeout_secs),
        )
    }
}

/// Pretty JSON when `as_json`, otherwise the text rendering.
pub fn render<T, F>(value: &T, as_json: bool, text: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if as_json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

/// Render a list one line per item, or `empty` when there is nothing.
pub fn render_list<T, F>(items: &[T], as_json: bool, empty: &str, line: F) -> Result<String>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    render(items, as_json, |items| {
        if items.is_empty() {
            empty.to_string()
        } else {
            items.iter().map(line).collect::<Vec<_>>().join("\n")
        }
    })
}

/// Render an optional record, or `missing` when there is none.
pub fn render_option<T, F>(item: &Option<T>, as_json: bool, missing: &str, text: F) -> Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    render(item, as_json, |item| match item {
        Some(value) => text(value),
        None => missing.to_string(),
    })
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "reading JSON file");
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Optional value or a dash.
pub fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
