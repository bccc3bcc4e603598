//! Stored-procedure execution
//!
//! All database access in the catalog goes through [`QueryExecutor`]. Each
//! call acquires a connection from the pool, runs exactly one stored
//! procedure with named arguments, materializes the result into owned
//! [`Record`]s, and releases the connection. No SQL is composed anywhere
//! else in the crate.

use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row, TypeInfo};
use thiserror::Error;
use uuid::Uuid;

use super::record::{Field, Record};

/// Errors raised by procedure execution
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The database rejected the call or the connection failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A result column has a type the record model cannot hold
    #[error("column '{column}' has unsupported type {type_name}")]
    UnsupportedColumn { column: String, type_name: String },
}

/// A stored-procedure invocation with named, typed arguments
///
/// Renders to Postgres named-argument notation
/// (`SELECT * FROM proc(p_name => $1, ...)`), so argument order in code
/// never has to match the procedure's declaration order.
#[derive(Debug, Clone)]
pub struct ProcCall {
    procedure: &'static str,
    args: Vec<(&'static str, ProcArg)>,
}

#[derive(Debug, Clone)]
enum ProcArg {
    Uuid(Uuid),
    Text(String),
}

impl ProcCall {
    /// Start a call to the named procedure
    pub fn new(procedure: &'static str) -> Self {
        Self {
            procedure,
            args: Vec::new(),
        }
    }

    /// Add a UUID argument
    pub fn uuid(mut self, name: &'static str, value: Uuid) -> Self {
        self.args.push((name, ProcArg::Uuid(value)));
        self
    }

    /// Add a text argument
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.args.push((name, ProcArg::Text(value.into())));
        self
    }

    /// Name of the procedure being called
    pub fn procedure(&self) -> &'static str {
        self.procedure
    }

    /// SQL for procedures that return rows
    fn row_query(&self) -> String {
        format!("SELECT * FROM {}({})", self.procedure, self.placeholders())
    }

    /// SQL for procedures that return their affected-row count as a scalar
    fn scalar_query(&self) -> String {
        format!("SELECT {}({})", self.procedure, self.placeholders())
    }

    fn placeholders(&self) -> String {
        self.args
            .iter()
            .enumerate()
            .map(|(index, (name, _))| format!("{} => ${}", name, index + 1))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Runs stored procedures over per-call pooled connections
///
/// Cloning is cheap; the underlying pool is shared.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    pool: PgPool,
}

impl QueryExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a row-returning procedure and materialize every row
    pub async fn run_query(&self, call: ProcCall) -> Result<Vec<Record>, ExecutorError> {
        let sql = call.row_query();
        tracing::debug!(procedure = call.procedure, "Executing query procedure");

        let mut query = sqlx::query(&sql);
        for (_, arg) in &call.args {
            query = match arg {
                ProcArg::Uuid(value) => query.bind(*value),
                ProcArg::Text(value) => query.bind(value.clone()),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(materialize).collect()
    }

    /// Run a row-returning procedure expected to yield at most one row
    ///
    /// `Ok(None)` when the procedure returns nothing: absence is a domain
    /// outcome for callers to interpret, not a fault.
    pub async fn run_single_row_query(
        &self,
        call: ProcCall,
    ) -> Result<Option<Record>, ExecutorError> {
        let sql = call.row_query();
        tracing::debug!(procedure = call.procedure, "Executing single-row procedure");

        let mut query = sqlx::query(&sql);
        for (_, arg) in &call.args {
            query = match arg {
                ProcArg::Uuid(value) => query.bind(*value),
                ProcArg::Text(value) => query.bind(value.clone()),
            };
        }

        let row = query.fetch_optional(&self.pool).await?;
        row.as_ref().map(materialize).transpose()
    }

    /// Run a mutation procedure and return the number of rows it affected
    pub async fn run_non_query(&self, call: ProcCall) -> Result<u64, ExecutorError> {
        let sql = call.scalar_query();
        tracing::debug!(procedure = call.procedure, "Executing mutation procedure");

        let mut query = sqlx::query_scalar::<sqlx::Postgres, i32>(&sql);
        for (_, arg) in &call.args {
            query = match arg {
                ProcArg::Uuid(value) => query.bind(*value),
                ProcArg::Text(value) => query.bind(value.clone()),
            };
        }

        let affected = query.fetch_one(&self.pool).await?;
        Ok(affected.max(0) as u64)
    }
}

/// Detach a live row into an owned record
fn materialize(row: &PgRow) -> Result<Record, ExecutorError> {
    let mut record = Record::new();

    for column in row.columns() {
        let name = column.name();
        let field = match column.type_info().name() {
            "UUID" => Field::Uuid(row.try_get::<Uuid, _>(column.ordinal())?),
            "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => {
                Field::Text(row.try_get::<String, _>(column.ordinal())?)
            }
            other => {
                return Err(ExecutorError::UnsupportedColumn {
                    column: name.to_string(),
                    type_name: other.to_string(),
                })
            }
        };
        record.push(name, field);
    }

    Ok(record)
}
