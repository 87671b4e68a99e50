//! In-memory record store.
//!
//! Tables hold string-valued records, named scopes and computed attributes.
//! Used by the CLI and by tests; behaves like a small relational store for
//! the subset of [`Query`] it understands.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use tabex_model::{ExportError, FieldError, Result};
use tracing::{debug, warn};

use crate::entity::EntityType;
use crate::query::{Direction, OrderBy, Query};
use crate::record::{EXPORT_OVERRIDE_SUFFIX, ExportRecord, RecordStore};

/// A computed attribute or export override.
pub type Method = Arc<dyn Fn(&MemoryRecord) -> std::result::Result<String, FieldError> + Send + Sync>;

/// One stored record.
#[derive(Clone)]
pub struct MemoryRecord {
    columns: Arc<[String]>,
    values: BTreeMap<String, String>,
    methods: Arc<BTreeMap<String, Method>>,
}

impl MemoryRecord {
    /// Stored value of `column`, without consulting methods.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

impl std::fmt::Debug for MemoryRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRecord")
            .field("values", &self.values)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExportRecord for MemoryRecord {
    fn column_names(&self) -> Vec<String> {
        self.columns.to_vec()
    }

    fn read_attribute(&self, name: &str) -> std::result::Result<String, FieldError> {
        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }
        match self.methods.get(name) {
            Some(method) => method(self),
            None => Err(FieldError::UnknownAttribute(name.to_string())),
        }
    }

    fn export_override(&self, name: &str) -> Option<std::result::Result<String, FieldError>> {
        let method = self
            .methods
            .get(&format!("{name}{EXPORT_OVERRIDE_SUFFIX}"))?;
        Some(method(self))
    }
}

/// A table: schema columns, rows, named scopes and methods.
#[derive(Clone, Default)]
pub struct MemoryTable {
    columns: Vec<String>,
    rows: Vec<BTreeMap<String, String>>,
    scopes: BTreeMap<String, Query>,
    methods: Arc<BTreeMap<String, Method>>,
}

impl MemoryTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row given as values in column order. Missing trailing values
    /// are left unset; extra values are dropped.
    pub fn push_row<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = self
            .columns
            .iter()
            .cloned()
            .zip(values.into_iter().map(Into::into))
            .collect();
        self.rows.push(row);
    }

    /// Append a row given as `(column, value)` pairs.
    pub fn insert<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let row = pairs
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect();
        self.rows.push(row);
    }

    /// Register a named scope as a query fragment.
    #[must_use]
    pub fn with_scope(mut self, name: impl Into<String>, fragment: Query) -> Self {
        self.scopes.insert(name.into(), fragment);
        self
    }

    /// Register a computed attribute. Naming it `<attribute>_export` makes it
    /// the export override for that attribute.
    #[must_use]
    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&MemoryRecord) -> std::result::Result<String, FieldError> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.methods).insert(name.into(), Arc::new(method));
        self
    }

    /// Expand scopes into one query: scope fragments in order, then the
    /// query's own terms on top.
    fn plan(&self, query: &Query) -> Result<Query> {
        let mut plan = Query::new();
        for name in &query.scopes {
            let fragment = self
                .scopes
                .get(name)
                .ok_or_else(|| ExportError::Store(format!("unknown scope {name}")))?;
            plan.merge(fragment);
        }
        let mut own = query.clone();
        own.scopes.clear();
        plan.merge(&own);
        Ok(plan)
    }

    fn select(&self, query: &Query) -> Result<Vec<MemoryRecord>> {
        let plan = self.plan(query)?;
        if !plan.include.is_empty()
            || !plan.joins.is_empty()
            || plan.group.is_some()
            || plan.having.is_some()
        {
            warn!(
                include = ?plan.include,
                joins = ?plan.joins,
                group = ?plan.group,
                having = ?plan.having,
                "relational query options are ignored by the memory store"
            );
        }

        let columns: Arc<[String]> = self.columns.clone().into();
        let mut records: Vec<MemoryRecord> = self
            .rows
            .iter()
            .map(|values| MemoryRecord {
                columns: Arc::clone(&columns),
                values: values.clone(),
                methods: Arc::clone(&self.methods),
            })
            .filter(|record| matches_conditions(record, &plan.conditions))
            .collect();

        if !plan.order.is_empty() {
            records.sort_by(|a, b| compare_records(a, b, &plan.order));
        }

        let offset = plan.offset.unwrap_or(0);
        let limit = plan.limit.unwrap_or(usize::MAX);
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }
}

impl std::fmt::Debug for MemoryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTable")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn matches_conditions(record: &MemoryRecord, conditions: &BTreeMap<String, String>) -> bool {
    conditions.iter().all(|(column, expected)| {
        record
            .read_attribute(column)
            .is_ok_and(|value| value == *expected)
    })
}

fn compare_records(a: &MemoryRecord, b: &MemoryRecord, order: &[OrderBy]) -> Ordering {
    order
        .iter()
        .map(|term| {
            let left = a.read_attribute(&term.column).unwrap_or_default();
            let right = b.read_attribute(&term.column).unwrap_or_default();
            let ordering = compare_values(&left, &right);
            match term.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Numbers compare numerically and sort before text; text compares as text.
fn compare_values(left: &str, right: &str) -> Ordering {
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(left), Ok(right)) => left.total_cmp(&right),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => left.cmp(right),
    }
}

/// Tables keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, MemoryTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, table: MemoryTable) -> Self {
        self.insert_table(name, table);
        self
    }

    pub fn insert_table(&mut self, name: impl Into<String>, table: MemoryTable) {
        self.tables.insert(name.into(), table);
    }

    /// An entity type whose schema is the named table's columns.
    pub fn entity_type(&self, name: impl Into<String>, table: &str) -> Option<EntityType> {
        self.tables
            .get(table)
            .map(|stored| EntityType::new(name, table, stored.columns.iter().cloned()))
    }
}

impl RecordStore for MemoryStore {
    type Record = MemoryRecord;

    fn fetch(&self, entity: &EntityType, query: &Query) -> Result<Vec<MemoryRecord>> {
        let table = self
            .tables
            .get(entity.table())
            .ok_or_else(|| ExportError::Store(format!("no table named {}", entity.table())))?;
        let records = table.select(query)?;
        debug!(table = entity.table(), selected = records.len(), "memory store query");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> MemoryTable {
        let mut table = MemoryTable::new(["id", "first_name", "last_name"]);
        table.push_row(["1", "user_1", "Doe"]);
        table.push_row(["2", "user_2", "Doe"]);
        table.push_row(["10", "user_10", "Roe"]);
        table
    }

    fn first_names(records: &[MemoryRecord]) -> Vec<&str> {
        records
            .iter()
            .filter_map(|record| record.value("first_name"))
            .collect()
    }

    #[test]
    fn scopes_merge_in_order() {
        let table = users()
            .with_scope("a_limiter", Query::new().with_limit(1))
            .with_scope("order_by", Query::new().with_order(OrderBy::desc("id")));
        let query = Query {
            scopes: vec!["a_limiter".to_string(), "order_by".to_string()],
            ..Query::default()
        };
        assert_eq!(first_names(&table.select(&query).unwrap()), vec!["user_10"]);
    }

    #[test]
    fn ids_sort_numerically() {
        let query = Query::new().with_order(OrderBy::asc("id"));
        assert_eq!(
            first_names(&users().select(&query).unwrap()),
            vec!["user_1", "user_2", "user_10"]
        );
    }

    #[test]
    fn numbers_sort_before_text() {
        let mut table = MemoryTable::new(["code"]);
        for index in (0..100).rev() {
            table.push_row([format!("{index}a")]);
            table.push_row([index.to_string()]);
        }
        let records = table
            .select(&Query::new().with_order(OrderBy::asc("code")))
            .unwrap();
        let codes: Vec<&str> = records
            .iter()
            .filter_map(|record| record.value("code"))
            .collect();

        let mut expected: Vec<String> = (0..100).map(|index| index.to_string()).collect();
        let mut text: Vec<String> = (0..100).map(|index| format!("{index}a")).collect();
        text.sort();
        expected.extend(text);
        assert_eq!(codes, expected);
        assert_eq!(compare_values("9", "10"), Ordering::Less);
        assert_eq!(compare_values("10", "1a"), Ordering::Less);
        assert_eq!(compare_values("1a", "9"), Ordering::Greater);
    }

    #[test]
    fn inserted_rows_may_be_sparse() {
        let mut table = users();
        table.insert([("id", "3"), ("first_name", "user_3")]);
        let records = table
            .select(&Query::new().with_condition("id", "3"))
            .unwrap();
        assert_eq!(first_names(&records), vec!["user_3"]);
        assert_eq!(records[0].resolve_field("last_name"), "");
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn conditions_then_offset_then_limit() {
        let query = Query::new()
            .with_condition("last_name", "Doe")
            .with_offset(1)
            .with_limit(5);
        assert_eq!(first_names(&users().select(&query).unwrap()), vec!["user_2"]);
    }

    #[test]
    fn unknown_scope_is_a_store_error() {
        let query = Query {
            scopes: vec!["missing".to_string()],
            ..Query::default()
        };
        assert!(matches!(users().select(&query), Err(ExportError::Store(_))));
    }

    #[test]
    fn methods_provide_virtual_attributes_and_overrides() {
        let table = users()
            .with_method("full_name", |record| {
                Ok(format!(
                    "{} {}",
                    record.value("first_name").unwrap_or_default(),
                    record.value("last_name").unwrap_or_default()
                ))
            })
            .with_method("last_name_export", |_| Ok("REDACTED".to_string()));
        let records = table.select(&Query::new().with_limit(1)).unwrap();
        assert_eq!(records[0].resolve_field("full_name"), "user_1 Doe");
        assert_eq!(records[0].resolve_field("last_name"), "REDACTED");
        assert_eq!(records[0].resolve_field("nope"), "");
    }
}
