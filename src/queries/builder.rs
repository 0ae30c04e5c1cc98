//! Parameterized SQL statement builders
//!
//! Every builder emits a statement with `$N` placeholders and a positional
//! parameter vector; request values never appear in the SQL text.
//! Identifiers (table and column names) are validated before
//! interpolation.

use super::errors::{QueryError, QueryResult};
use super::request::{CrudRequest, Operation};

/// A built statement: SQL text plus positional bind parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

impl CrudRequest {
    /// Build the statement for one operation.
    ///
    /// The entry must already have passed [`CrudRequest::validate`]; the
    /// builders still re-check arity and identifiers because they are the
    /// last gate before SQL text exists.
    pub fn statement(&self, operation: Operation) -> QueryResult<Statement> {
        match operation {
            Operation::Create => self.insert_statement(),
            Operation::Read => self.select_statement(),
            Operation::Update => self.update_statement(),
            Operation::Delete => self.delete_statement(),
            Operation::Exists => self.exists_statement(),
        }
    }

    /// `INSERT INTO t (c1, c2) VALUES ($1, $2)`
    fn insert_statement(&self) -> QueryResult<Statement> {
        self.check_identifiers()?;
        if self.columns.is_empty() {
            return Err(QueryError::ConditionsRequired("insert"));
        }
        check_arity(&self.columns, &self.params)?;

        let placeholders: Vec<String> =
            (1..=self.columns.len()).map(|i| format!("${i}")).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table_name,
            self.columns.join(", "),
            placeholders.join(", "),
        );

        Ok(Statement {
            sql,
            params: self.params.clone(),
        })
    }

    /// `SELECT c1, c2 FROM t [WHERE c1 = $1 AND ...]`
    ///
    /// No columns selects `*`; no params selects without a filter.
    fn select_statement(&self) -> QueryResult<Statement> {
        self.check_identifiers()?;

        let select_list = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };

        if self.params.is_empty() {
            return Ok(Statement {
                sql: format!("SELECT {} FROM {}", select_list, self.table_name),
                params: Vec::new(),
            });
        }

        check_arity(&self.columns, &self.params)?;
        let conditions = where_conditions(&self.columns, 1);

        Ok(Statement {
            sql: format!(
                "SELECT {} FROM {} WHERE {}",
                select_list, self.table_name, conditions,
            ),
            params: self.params.clone(),
        })
    }

    /// `UPDATE t SET c1 = $1, ... WHERE c1 = $n AND ...`
    ///
    /// `new_params` are the replacement values, `params` the filter values;
    /// both pair positionally with `columns`.
    fn update_statement(&self) -> QueryResult<Statement> {
        self.check_identifiers()?;
        if self.columns.is_empty() {
            return Err(QueryError::ConditionsRequired("update"));
        }
        check_arity(&self.columns, &self.new_params)?;
        check_arity(&self.columns, &self.params)?;

        let assignments: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        let conditions = where_conditions(&self.columns, self.columns.len() + 1);

        let mut params = self.new_params.clone();
        params.extend(self.params.iter().cloned());

        Ok(Statement {
            sql: format!(
                "UPDATE {} SET {} WHERE {}",
                self.table_name,
                assignments.join(", "),
                conditions,
            ),
            params,
        })
    }

    /// `DELETE FROM t WHERE c1 = $1 AND ...`
    ///
    /// Refuses to build without conditions: an unfiltered DELETE is assumed
    /// to be a malformed request, not an intent to empty the table.
    fn delete_statement(&self) -> QueryResult<Statement> {
        self.check_identifiers()?;
        if self.columns.is_empty() {
            return Err(QueryError::ConditionsRequired("delete"));
        }
        check_arity(&self.columns, &self.params)?;

        Ok(Statement {
            sql: format!(
                "DELETE FROM {} WHERE {}",
                self.table_name,
                where_conditions(&self.columns, 1),
            ),
            params: self.params.clone(),
        })
    }

    /// `SELECT EXISTS (SELECT 1 FROM t WHERE c1 = $1 AND ...)`
    fn exists_statement(&self) -> QueryResult<Statement> {
        self.check_identifiers()?;
        if self.columns.is_empty() {
            return Err(QueryError::ConditionsRequired("exists"));
        }
        check_arity(&self.columns, &self.params)?;

        Ok(Statement {
            sql: format!(
                "SELECT EXISTS (SELECT 1 FROM {} WHERE {})",
                self.table_name,
                where_conditions(&self.columns, 1),
            ),
            params: self.params.clone(),
        })
    }

    fn check_identifiers(&self) -> QueryResult<()> {
        check_identifier(&self.table_name)?;
        for column in &self.columns {
            check_identifier(column)?;
        }
        Ok(())
    }
}

/// `c1 = $start AND c2 = $start+1 AND ...`
fn where_conditions(columns: &[String], start: usize) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, start + i))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn check_arity(columns: &[String], params: &[String]) -> QueryResult<()> {
    if columns.len() != params.len() {
        return Err(QueryError::ArityMismatch {
            columns: columns.len(),
            params: params.len(),
        });
    }
    Ok(())
}

/// Identifiers are restricted to `[A-Za-z_][A-Za-z0-9_]*`; everything else
/// travels as a bind parameter, so this is the only interpolation gate.
fn check_identifier(name: &str) -> QueryResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);

    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier(name.to_string()))
    }
}
