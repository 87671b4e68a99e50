//! The `--config` file for `tabex export`.
//!
//! The file holds the entity's export options plus a `scope_definitions`
//! object naming the scopes available to `--scope` and to `"scopes"`:
//!
//! ```json
//! {
//!     "except": ["password"],
//!     "scope_definitions": {
//!         "admins": { "conditions": { "is_admin": "true" } },
//!         "newest": { "order": "id DESC", "limit": 10 }
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tabex_export::{ExportOptions, MemoryTable, OrderBy, Query};
use tracing::debug;

/// Parsed `--config` file.
#[derive(Debug, Default)]
pub struct ExportConfigFile {
    pub options: ExportOptions,
    pub scopes: BTreeMap<String, ScopeDefinition>,
}

/// A named scope: a query fragment over the loaded table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScopeDefinition {
    pub conditions: BTreeMap<String, String>,
    /// SQL-style ordering, e.g. `"id DESC"`.
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ScopeDefinition {
    pub fn query(&self) -> Query {
        Query {
            conditions: self.conditions.clone(),
            order: self
                .order
                .as_deref()
                .map(OrderBy::parse_list)
                .unwrap_or_default(),
            limit: self.limit,
            offset: self.offset,
            ..Query::default()
        }
    }
}

#[derive(Deserialize)]
struct ScopeSection {
    #[serde(default)]
    scope_definitions: BTreeMap<String, ScopeDefinition>,
}

impl ExportConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parse {}", path.display()))
    }

    /// Options and scope definitions from one JSON document. Unknown keys
    /// are ignored by both.
    pub fn from_json(json: &str) -> Result<Self> {
        let options = ExportOptions::from_json(json)?;
        let section: ScopeSection =
            serde_json::from_str(json).context("invalid scope_definitions")?;
        Ok(Self {
            options,
            scopes: section.scope_definitions,
        })
    }

    /// Register every scope definition on `table`.
    pub fn define_scopes(&self, mut table: MemoryTable) -> MemoryTable {
        for (name, definition) in &self.scopes {
            debug!(scope = %name, "scope defined");
            table = table.with_scope(name.as_str(), definition.query());
        }
        table
    }
}
