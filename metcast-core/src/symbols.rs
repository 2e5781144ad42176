//! Weather-symbol code to icon reference lookup.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use crate::error::{Result, WeatherError};

pub const DEFAULT_ICON_TEMPLATE: &str =
    "https://api.met.no/weatherapi/weathericon/1.1/?symbol={symbol}&content_type=image/svg%2Bxml";

const SYMBOL_PLACEHOLDER: &str = "{symbol}";

/// One row of the on-disk catalog file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SymbolEntry {
    pub symbol_id: u32,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolCatalog {
    /// Every code maps to the template with `{symbol}` substituted.
    Template(String),
    /// Only listed codes resolve, to `static_path/filename`.
    Catalog {
        static_path: String,
        entries: HashMap<u32, String>,
    },
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        SymbolCatalog::Template(DEFAULT_ICON_TEMPLATE.to_string())
    }
}

impl SymbolCatalog {
    pub fn from_entries(static_path: impl Into<String>, entries: Vec<SymbolEntry>) -> Self {
        SymbolCatalog::Catalog {
            static_path: static_path.into(),
            entries: entries.into_iter().map(|e| (e.symbol_id, e.filename)).collect(),
        }
    }

    /// Load a JSON catalog (`[{"symbol_id": 1, "filename": "sun.svg"}, ...]`).
    pub fn load(path: &Path, static_path: impl Into<String>) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            WeatherError::Config(format!("Failed to read symbol catalog {}: {e}", path.display()))
        })?;
        let entries: Vec<SymbolEntry> = serde_json::from_str(&contents).map_err(|e| {
            WeatherError::Config(format!("Failed to parse symbol catalog {}: {e}", path.display()))
        })?;
        tracing::debug!(count = entries.len(), path = %path.display(), "Loaded symbol catalog");
        Ok(Self::from_entries(static_path, entries))
    }

    pub fn resolve(&self, symbol_code: u32) -> Option<String> {
        match self {
            SymbolCatalog::Template(template) => {
                Some(template.replace(SYMBOL_PLACEHOLDER, &symbol_code.to_string()))
            }
            SymbolCatalog::Catalog { static_path, entries } => entries.get(&symbol_code).map(|f| {
                format!("{}/{}", static_path.trim_end_matches('/'), f)
            }),
        }
    }
}
