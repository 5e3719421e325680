//! Table configuration
//!
//! Feature flags decide which concerns a table offers and, in turn, which
//! parts of the view state are persisted and read back.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tv_core::PaginationMode;

use crate::DataError;

/// Feature switches of one table instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFeatures {
    pub column_orderable: bool,
    pub column_resizable: bool,
    pub column_visibility_toggle: bool,
    pub groupable: bool,
    pub pagination: bool,
    pub sortable: bool,
    pub filterable: bool,
    pub search: bool,
    pub row_virtualization: bool,
}

impl Default for TableFeatures {
    fn default() -> Self {
        Self {
            column_orderable: false,
            column_resizable: false,
            column_visibility_toggle: true,
            groupable: true,
            pagination: false,
            sortable: true,
            filterable: true,
            search: true,
            row_virtualization: true,
        }
    }
}

/// Engine configuration for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub features: TableFeatures,
    pub pagination_mode: PaginationMode,
    /// Seconds a persisted search query stays valid
    pub search_ttl_secs: u64,
    pub search_debounce_ms: u64,
    pub default_per_page: usize,
    pub page_size_options: Vec<usize>,
    pub storage_prefix: String,
    /// Key the view state is persisted under, `"default"` when unset
    pub save_key: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            features: TableFeatures::default(),
            pagination_mode: PaginationMode::Client,
            search_ttl_secs: 1800,
            search_debounce_ms: 300,
            default_per_page: 10,
            page_size_options: vec![10, 25, 50, 100],
            storage_prefix: "table-view-".to_string(),
            save_key: None,
        }
    }
}

impl TableConfig {
    pub fn with_save_key(mut self, key: impl Into<String>) -> Self {
        self.save_key = Some(key.into());
        self
    }

    pub fn with_features(mut self, features: TableFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn save_key(&self) -> &str {
        self.save_key.as_deref().unwrap_or("default")
    }

    /// Full storage key: prefix followed by the save key
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.storage_prefix, self.save_key())
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_json_file(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
