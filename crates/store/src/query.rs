//! Minimal relational query model the scoper output attaches to.
//!
//! Route handlers build a [`TableQuery`], the gate wraps it in a
//! `ScopedQuery`, and this module renders the pair into SQL with numbered
//! binds (or evaluates it row-wise for in-memory stores).

use postdesk_authz::{ScopedQuery, TenantFilter, TenantPredicate};
use postdesk_core::TenantId;

/// Scalar value bound into a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
}

/// Column predicate: equality or set membership.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Value),
    In(Vec<Value>),
}

/// A filterable single-table read.
///
/// Table and column names come from code, never from request input — they
/// are interpolated into SQL; values are always bound.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub table: String,
    pub filters: Vec<(String, Predicate)>,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, column: impl Into<String>, predicate: Predicate) -> Self {
        self.filters.push((column.into(), predicate));
        self
    }
}

/// Row that belongs to a tenant (for in-memory evaluation).
pub trait TenantOwned {
    fn tenant_id(&self) -> TenantId;
}

/// Render `SELECT * FROM ...` for a scoped query.
pub fn render_select(scoped: &ScopedQuery<TableQuery>) -> (String, Vec<Value>) {
    render(scoped, "*")
}

/// Render `SELECT COUNT(*) FROM ...` for a scoped query.
pub fn render_count(scoped: &ScopedQuery<TableQuery>) -> (String, Vec<Value>) {
    render(scoped, "COUNT(*)")
}

fn render(scoped: &ScopedQuery<TableQuery>, projection: &str) -> (String, Vec<Value>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut binds: Vec<Value> = Vec::new();

    for (column, predicate) in &scoped.query.filters {
        push_predicate(column, predicate, &mut clauses, &mut binds);
    }
    push_tenant_filter(&scoped.filter, &mut clauses, &mut binds);

    let mut sql = format!("SELECT {} FROM {}", projection, scoped.query.table);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    (sql, binds)
}

fn push_predicate(
    column: &str,
    predicate: &Predicate,
    clauses: &mut Vec<String>,
    binds: &mut Vec<Value>,
) {
    match predicate {
        Predicate::Eq(value) => {
            binds.push(value.clone());
            clauses.push(format!("{} = ${}", column, binds.len()));
        }
        Predicate::In(values) if values.is_empty() => {
            // An empty IN list must not render as "no restriction".
            clauses.push("FALSE".to_string());
        }
        Predicate::In(values) => {
            let mut placeholders = Vec::with_capacity(values.len());
            for value in values {
                binds.push(value.clone());
                placeholders.push(format!("${}", binds.len()));
            }
            clauses.push(format!("{} IN ({})", column, placeholders.join(", ")));
        }
    }
}

fn push_tenant_filter(filter: &TenantFilter, clauses: &mut Vec<String>, binds: &mut Vec<Value>) {
    match &filter.predicate {
        TenantPredicate::All => {}
        TenantPredicate::Eq(tenant_id) => {
            binds.push(Value::Int(tenant_id.as_i64()));
            clauses.push(format!("{} = ${}", filter.column, binds.len()));
        }
        TenantPredicate::In(tenant_ids) => {
            let mut placeholders = Vec::with_capacity(tenant_ids.len());
            for tenant_id in tenant_ids {
                binds.push(Value::Int(tenant_id.as_i64()));
                placeholders.push(format!("${}", binds.len()));
            }
            clauses.push(format!("{} IN ({})", filter.column, placeholders.join(", ")));
        }
        TenantPredicate::Never => {
            clauses.push("FALSE".to_string());
        }
    }
}
