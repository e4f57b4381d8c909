//! Dynamic `WHERE` clause assembly shared by the list queries.
//!
//! Conditions are pushed with a `{}` marker that is replaced by the next
//! positional placeholder, and the matching value is recorded so it can be
//! bound in the same order.

use sitetrack_core::status::StatusId;
use sitetrack_core::types::Timestamp;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// A value bound to a dynamic placeholder.
#[derive(Debug, Clone)]
pub(crate) enum BindValue {
    BigInt(i64),
    SmallInt(StatusId),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

/// Accumulates `AND`-joined conditions and their bind values.
#[derive(Debug, Default)]
pub(crate) struct Filter {
    conditions: Vec<String>,
    bind_values: Vec<BindValue>,
}

impl Filter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a condition without a bind value.
    pub(crate) fn raw(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Add a condition. Every `{}` in `template` refers to the same new placeholder.
    pub(crate) fn push(&mut self, template: &str, value: BindValue) -> &mut Self {
        let placeholder = format!("${}", self.bind_values.len() + 1);
        self.conditions.push(template.replace("{}", &placeholder));
        self.bind_values.push(value);
        self
    }

    /// Index of the next free placeholder, for trailing `LIMIT`/`OFFSET`.
    pub(crate) fn next_index(&self) -> usize {
        self.bind_values.len() + 1
    }

    pub(crate) fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Bind the recorded values to a `QueryAs`.
    pub(crate) fn bind_as<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.bind_values {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::SmallInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }

    /// Bind the recorded values to a `QueryScalar`.
    pub(crate) fn bind_scalar<'q, O>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        for val in &self.bind_values {
            q = match val {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::SmallInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let filter = Filter::new();
        assert_eq!(filter.where_clause(), "");
        assert_eq!(filter.next_index(), 1);
    }

    #[test]
    fn placeholders_are_numbered_in_push_order() {
        let mut filter = Filter::new();
        filter
            .push("u.company_id = {}", BindValue::BigInt(4))
            .raw("u.is_active = true")
            .push(
                "(u.first_name ILIKE {} OR u.email ILIKE {})",
                BindValue::Text("%ann%".into()),
            );
        assert_eq!(
            filter.where_clause(),
            "WHERE u.company_id = $1 AND u.is_active = true AND (u.first_name ILIKE $2 OR u.email ILIKE $2)"
        );
        assert_eq!(filter.next_index(), 3);
    }
}
