//! Retrieval filters handed to the record store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One ordering term, e.g. `last_name DESC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Parse an SQL-style ordering list such as `"last_name ASC, id DESC"`.
    ///
    /// A missing or unrecognised direction means ascending.
    pub fn parse_list(list: &str) -> Vec<OrderBy> {
        list.split(',')
            .filter_map(|term| {
                let mut parts = term.split_whitespace();
                let column = parts.next()?;
                let direction = match parts.next() {
                    Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
                    _ => Direction::Asc,
                };
                Some(OrderBy {
                    column: column.to_string(),
                    direction,
                })
            })
            .collect()
    }
}

/// Filters, ordering and paging applied when fetching records.
///
/// `include`, `group`, `having` and `joins` are passed through untouched;
/// their meaning belongs to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Named pre-filters, applied in order before the rest of the query.
    pub scopes: Vec<String>,
    /// Column equality conditions.
    pub conditions: BTreeMap<String, String>,
    pub order: Vec<OrderBy>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub include: Vec<String>,
    pub group: Option<String>,
    pub having: Option<String>,
    pub joins: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer `other` on top of this query.
    ///
    /// Scalars from `other` replace ours when set; conditions are merged
    /// (later values win); scopes, ordering, includes and joins accumulate.
    pub fn merge(&mut self, other: &Query) {
        self.scopes.extend(other.scopes.iter().cloned());
        self.conditions.extend(
            other
                .conditions
                .iter()
                .map(|(column, value)| (column.clone(), value.clone())),
        );
        self.order.extend(other.order.iter().cloned());
        if other.limit.is_some() {
            self.limit = other.limit;
        }
        if other.offset.is_some() {
            self.offset = other.offset;
        }
        self.include.extend(other.include.iter().cloned());
        if other.group.is_some() {
            self.group.clone_from(&other.group);
        }
        if other.having.is_some() {
            self.having.clone_from(&other.having);
        }
        self.joins.extend(other.joins.iter().cloned());
    }

    #[must_use]
    pub fn with_condition(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.insert(column.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_order_lists() {
        assert_eq!(
            OrderBy::parse_list("last_name ASC, id desc,first_name"),
            vec![
                OrderBy::asc("last_name"),
                OrderBy::desc("id"),
                OrderBy::asc("first_name")
            ]
        );
        assert!(OrderBy::parse_list(" , ").is_empty());
    }

    #[test]
    fn merge_layers_scalars_and_accumulates_lists() {
        let mut base = Query::new().with_limit(1).with_condition("active", "true");
        let top = Query::new()
            .with_order(OrderBy::desc("id"))
            .with_condition("active", "false")
            .with_offset(2);
        base.merge(&top);
        assert_eq!(base.limit, Some(1));
        assert_eq!(base.offset, Some(2));
        assert_eq!(base.order, vec![OrderBy::desc("id")]);
        assert_eq!(base.conditions.get("active").map(String::as_str), Some("false"));
    }
}
