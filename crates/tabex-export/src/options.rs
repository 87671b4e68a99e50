//! Declaration options and per-call overrides.

use std::collections::BTreeMap;

use serde::Deserialize;
use tabex_model::{ExportError, HeaderSpec, Result};

use crate::query::{OrderBy, Query};

/// One name or an ordered list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct NameList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for NameList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(name) => NameList(vec![name]),
            OneOrMany::Many(names) => NameList(names),
        }
    }
}

impl NameList {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|candidate| candidate == name)
    }
}

impl From<&str> for NameList {
    fn from(name: &str) -> Self {
        NameList(vec![name.to_string()])
    }
}

impl From<String> for NameList {
    fn from(name: String) -> Self {
        NameList(vec![name])
    }
}

impl<S: Into<String>> From<Vec<S>> for NameList {
    fn from(names: Vec<S>) -> Self {
        NameList(names.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for NameList {
    fn from(names: [S; N]) -> Self {
        NameList(names.into_iter().map(Into::into).collect())
    }
}

/// Options an entity type declares when it opts into exporting.
///
/// Deserializes from JSON; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Export exactly these columns.
    pub only: Option<NameList>,
    /// Export the schema columns minus these.
    pub except: Option<NameList>,
    /// Restrict the allowed formats to these identifiers.
    #[serde(rename = "as")]
    pub formats: Option<NameList>,
    pub scopes: Vec<String>,
    pub conditions: BTreeMap<String, String>,
    /// SQL-style ordering, e.g. `"last_name ASC, id DESC"`.
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub include: Vec<String>,
    pub group: Option<String>,
    pub having: Option<String>,
    pub joins: Vec<String>,
    /// Default header labels, one per default column.
    pub headers: Option<Vec<String>>,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|error| ExportError::InvalidOptions {
            message: error.to_string(),
        })
    }

    #[must_use]
    pub fn only(mut self, columns: impl Into<NameList>) -> Self {
        self.only = Some(columns.into());
        self
    }

    #[must_use]
    pub fn except(mut self, columns: impl Into<NameList>) -> Self {
        self.except = Some(columns.into());
        self
    }

    #[must_use]
    pub fn formats(mut self, formats: impl Into<NameList>) -> Self {
        self.formats = Some(formats.into());
        self
    }

    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn condition(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.insert(column.into(), value.into());
        self
    }

    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    /// The retrieval filters these options describe.
    pub fn query(&self) -> Query {
        Query {
            scopes: self.scopes.clone(),
            conditions: self.conditions.clone(),
            order: self
                .order
                .as_deref()
                .map(OrderBy::parse_list)
                .unwrap_or_default(),
            limit: self.limit,
            offset: self.offset,
            include: self.include.clone(),
            group: self.group.clone(),
            having: self.having.clone(),
            joins: self.joins.clone(),
        }
    }
}

/// Per-call overrides for a configured export.
///
/// Set fields replace the entity defaults.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub only: Option<NameList>,
    pub except: Option<NameList>,
    pub headers: HeaderSpec,
    pub scopes: Option<Vec<String>>,
    pub conditions: Option<BTreeMap<String, String>>,
    pub order: Option<Vec<OrderBy>>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ExportRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn only(mut self, columns: impl Into<NameList>) -> Self {
        self.only = Some(columns.into());
        self
    }

    #[must_use]
    pub fn except(mut self, columns: impl Into<NameList>) -> Self {
        self.except = Some(columns.into());
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: HeaderSpec) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn condition(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions
            .get_or_insert_with(BTreeMap::new)
            .insert(column.into(), value.into());
        self
    }

    #[must_use]
    pub fn order(mut self, order: &str) -> Self {
        self.order = Some(OrderBy::parse_list(order));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// True when the call picks its own columns.
    pub fn overrides_columns(&self) -> bool {
        self.only.is_some() || self.except.is_some()
    }

    /// The entity's default query with this request's overrides applied.
    pub fn apply_to(&self, defaults: &Query) -> Query {
        let mut query = defaults.clone();
        if let Some(scopes) = &self.scopes {
            query.scopes.clone_from(scopes);
        }
        if let Some(conditions) = &self.conditions {
            query.conditions.clone_from(conditions);
        }
        if let Some(order) = &self.order {
            query.order.clone_from(order);
        }
        if self.limit.is_some() {
            query.limit = self.limit;
        }
        if self.offset.is_some() {
            query.offset = self.offset;
        }
        query
    }
}

/// Options for reports built from caller-supplied rows.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub headers: HeaderSpec,
    /// Column identifiers used when headers are derived; defaults to the
    /// entity's configured columns.
    pub columns: Option<Vec<String>>,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn headers(mut self, headers: HeaderSpec) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}
