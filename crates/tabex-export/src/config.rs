//! Per-entity export configuration.

use tabex_format::FormatRegistry;
use tabex_model::{ExportError, Result};
use tracing::{debug, warn};

use crate::entity::EntityType;
use crate::options::{ExportOptions, NameList};
use crate::query::Query;

/// Resolved export settings for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    columns: Vec<String>,
    formats: Vec<String>,
    query: Query,
    headers: Option<Vec<String>>,
}

impl ExportConfig {
    /// Resolve `options` against the entity schema and the registered formats.
    pub fn declare(
        entity: &EntityType,
        options: &ExportOptions,
        registry: &FormatRegistry,
    ) -> Result<Self> {
        let formats: Vec<String> = match &options.formats {
            None => registry.ids().map(str::to_string).collect(),
            Some(requested) => {
                let allowed: Vec<String> = registry
                    .ids()
                    .filter(|id| requested.contains(id))
                    .map(str::to_string)
                    .collect();
                if allowed.is_empty() {
                    return Err(ExportError::FormatNotFound {
                        requested: requested.names().join(", "),
                    });
                }
                allowed
            }
        };

        let columns = resolve_columns(
            entity.columns(),
            options.only.as_ref(),
            options.except.as_ref(),
        );
        debug!(
            entity = entity.name(),
            columns = columns.len(),
            formats = formats.len(),
            "export configuration declared"
        );

        Ok(Self {
            columns,
            formats,
            query: options.query(),
            headers: options.headers.clone(),
        })
    }

    /// Default columns, in export order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Allowed format identifiers, in registry order.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    pub fn allows(&self, format: &str) -> bool {
        self.formats.iter().any(|id| id == format)
    }
}

/// Apply `only`/`except` to a default column list.
///
/// `only` replaces the defaults outright and takes precedence when both are
/// given. Names in `except` that are not defaults are ignored.
pub fn resolve_columns(
    defaults: &[String],
    only: Option<&NameList>,
    except: Option<&NameList>,
) -> Vec<String> {
    match (only, except) {
        (Some(only), Some(except)) => {
            warn!(
                only = ?only.names(),
                except = ?except.names(),
                "both only and except given; except is ignored"
            );
            only.names().to_vec()
        }
        (Some(only), None) => only.names().to_vec(),
        (None, Some(except)) => defaults
            .iter()
            .filter(|column| !except.contains(column))
            .cloned()
            .collect(),
        (None, None) => defaults.to_vec(),
    }
}
