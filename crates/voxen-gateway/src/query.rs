//! The filter/sort/limit query model record collections accept.
//!
//! Filters are equality, AND, OR and IN predicates over named fields — the
//! full extent of what the gateway supports. [`Filter::matches`] evaluates
//! the same predicate against an in-process JSON document so the in-memory
//! gateway and the remote one agree on semantics.

use serde_json::{json, Map, Value};

/// A predicate over record fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `field == value`
    Eq(&'static str, Value),
    /// `field` is one of the listed values.
    In(&'static str, Vec<Value>),
    /// Every sub-filter holds.
    And(Vec<Filter>),
    /// At least one sub-filter holds.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Eq(field, value.into())
    }

    pub fn is_in(field: &'static str, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::In(field, values.into_iter().map(Into::into).collect())
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::Or(filters.into_iter().collect())
    }

    /// Wire representation of the predicate.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Eq(field, value) => {
                let mut predicate = Map::new();
                predicate.insert((*field).to_string(), value.clone());
                Value::Object(predicate)
            }
            Self::In(field, values) => {
                let mut predicate = Map::new();
                predicate.insert((*field).to_string(), json!({ "in": values }));
                Value::Object(predicate)
            }
            Self::And(filters) => {
                json!({ "AND": filters.iter().map(Filter::to_value).collect::<Vec<_>>() })
            }
            Self::Or(filters) => {
                json!({ "OR": filters.iter().map(Filter::to_value).collect::<Vec<_>>() })
            }
        }
    }

    /// Evaluate the predicate against one JSON document.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::Eq(field, value) => doc.get(*field) == Some(value),
            Self::In(field, values) => doc
                .get(*field)
                .map(|v| values.contains(v))
                .unwrap_or(false),
            Self::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Order results by one field.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: Direction,
}

/// A list query: optional filter, optional order, optional cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, field: &'static str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy { field, direction });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Wire representation: `{ "where": ..., "orderBy": ..., "limit": ... }`.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(ref filter) = self.filter {
            body.insert("where".into(), filter.to_value());
        }
        if let Some(ref order) = self.order_by {
            let mut ordering = Map::new();
            ordering.insert(order.field.to_string(), json!(order.direction.as_str()));
            body.insert("orderBy".into(), Value::Object(ordering));
        }
        if let Some(limit) = self.limit {
            body.insert("limit".into(), json!(limit));
        }
        Value::Object(body)
    }

    /// Apply the query to a set of in-process documents: filter, sort, cap.
    pub fn apply(&self, docs: &[Value]) -> Vec<Value> {
        let mut matched: Vec<Value> = docs
            .iter()
            .filter(|d| self.filter.as_ref().map(|f| f.matches(d)).unwrap_or(true))
            .cloned()
            .collect();

        if let Some(ref order) = self.order_by {
            matched.sort_by(|a, b| {
                let ord = compare_fields(a.get(order.field), b.get(order.field));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit as usize);
        }
        matched
    }
}

/// Field comparison for sorting. Timestamps are RFC 3339 strings, so string
/// ordering is chronological; numbers compare numerically.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Value> {
        vec![
            json!({ "id": "a", "channelId": "c1", "position": 2, "createdAt": "2024-01-02T00:00:00Z" }),
            json!({ "id": "b", "channelId": "c1", "position": 0, "createdAt": "2024-01-01T00:00:00Z" }),
            json!({ "id": "c", "channelId": "c2", "position": 1, "createdAt": "2024-01-03T00:00:00Z" }),
        ]
    }

    #[test]
    fn eq_filters_by_field() {
        let query = ListQuery::new().filter(Filter::eq("channelId", "c1"));
        let out = query.apply(&docs());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn and_or_compose() {
        let filter = Filter::or([
            Filter::and([Filter::eq("channelId", "c1"), Filter::eq("id", "a")]),
            Filter::eq("id", "c"),
        ]);
        let out = ListQuery::new().filter(filter).apply(&docs());
        let ids: Vec<_> = out.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn in_matches_any_listed_value() {
        let filter = Filter::is_in("id", ["a", "c"]);
        assert_eq!(ListQuery::new().filter(filter).apply(&docs()).len(), 2);
    }

    #[test]
    fn order_by_position_ascending() {
        let out = ListQuery::new()
            .order_by("position", Direction::Asc)
            .apply(&docs());
        let positions: Vec<_> = out.iter().map(|d| d["position"].as_u64().unwrap()).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn order_by_timestamp_descending_and_limit() {
        let out = ListQuery::new()
            .order_by("createdAt", Direction::Desc)
            .limit(2)
            .apply(&docs());
        let ids: Vec<_> = out.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn wire_body_shape() {
        let query = ListQuery::new()
            .filter(Filter::and([
                Filter::eq("userId", "u1"),
                Filter::eq("status", "pending"),
            ]))
            .order_by("createdAt", Direction::Asc)
            .limit(100);
        let body = query.to_body();
        assert_eq!(
            body["where"]["AND"][1],
            json!({ "status": "pending" })
        );
        assert_eq!(body["orderBy"], json!({ "createdAt": "asc" }));
        assert_eq!(body["limit"], json!(100));
    }

    #[test]
    fn missing_field_never_matches() {
        let filter = Filter::eq("absent", "x");
        assert!(!filter.matches(&docs()[0]));
    }
}
