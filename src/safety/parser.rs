//! SQL parsing and classification logic.
//!
//! Uses sqlparser-rs with the generic dialect, which accepts the Trino-style
//! SQL Athena runs, to parse statements and classify them.

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use super::StatementKind;

/// Classifies a single SQL statement.
///
/// Fails if the SQL cannot be parsed, is empty, or holds several statements.
pub fn classify_sql(sql: &str) -> Result<StatementKind, String> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)
        .map_err(|e| format!("could not parse SQL: {e}"))?;

    match statements.as_slice() {
        [] => Err("empty SQL statement".to_string()),
        [statement] => Ok(classify_statement(statement)),
        _ => Err(format!(
            "expected a single statement, found {}",
            statements.len()
        )),
    }
}

/// Accepts `sql` only if it is a single read-only statement.
pub fn ensure_read_only(sql: &str) -> Result<StatementKind, String> {
    let kind = classify_sql(sql)?;
    if kind.is_read_only() {
        Ok(kind)
    } else {
        Err(format!("{kind} statements are not allowed in reports"))
    }
}

fn classify_statement(statement: &Statement) -> StatementKind {
    match statement {
        // Query: may contain data-modifying CTEs, so recurse
        Statement::Query(query) => classify_query(query),
        Statement::Explain {
            analyze, statement, ..
        } => {
            // EXPLAIN ANALYZE runs the statement
            let inner = classify_statement(statement);
            if *analyze && !inner.is_read_only() {
                inner
            } else {
                StatementKind::Explain
            }
        }

        Statement::Insert { .. } => StatementKind::Insert,
        Statement::Update { .. } => StatementKind::Update,
        Statement::Delete { .. } => StatementKind::Delete,
        Statement::Merge { .. } => StatementKind::Merge,

        Statement::Drop { .. }
        | Statement::Truncate { .. }
        | Statement::AlterTable { .. }
        | Statement::AlterView { .. }
        | Statement::CreateTable { .. }
        | Statement::CreateView { .. }
        | Statement::CreateSchema { .. }
        | Statement::CreateDatabase { .. }
        | Statement::Grant { .. }
        | Statement::Revoke { .. } => StatementKind::Ddl,

        _ => StatementKind::Other,
    }
}

/// Returns the first non-read-only kind found, or `Select`.
fn first_mutation(kinds: impl IntoIterator<Item = StatementKind>) -> StatementKind {
    kinds
        .into_iter()
        .find(|kind| !kind.is_read_only())
        .unwrap_or(StatementKind::Select)
}

fn classify_query(query: &Query) -> StatementKind {
    let ctes = query
        .with
        .iter()
        .flat_map(|with| with.cte_tables.iter())
        .map(|cte| classify_query(&cte.query));

    first_mutation(ctes.chain(std::iter::once(classify_set_expr(&query.body))))
}

fn classify_set_expr(set_expr: &SetExpr) -> StatementKind {
    match set_expr {
        SetExpr::Select(select) => classify_select(select),
        SetExpr::Query(query) => classify_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            first_mutation([classify_set_expr(left), classify_set_expr(right)])
        }
        SetExpr::Values(_) | SetExpr::Table(_) => StatementKind::Select,
        // INSERT/UPDATE/DELETE bodies inside a WITH
        SetExpr::Insert(stmt) | SetExpr::Update(stmt) => classify_statement(stmt),
        _ => StatementKind::Other,
    }
}

fn classify_select(select: &Select) -> StatementKind {
    first_mutation(select.from.iter().map(classify_table_with_joins))
}

fn classify_table_with_joins(twj: &TableWithJoins) -> StatementKind {
    let joins = twj.joins.iter().map(|join| classify_table_factor(&join.relation));
    first_mutation(std::iter::once(classify_table_factor(&twj.relation)).chain(joins))
}

fn classify_table_factor(factor: &TableFactor) -> StatementKind {
    match factor {
        TableFactor::Derived { subquery, .. } => classify_query(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => classify_table_with_joins(table_with_joins),
        _ => StatementKind::Select,
    }
}
