//! Fixture executor.
//!
//! Applies an [`Operation`] against a session, leaf by leaf, in declaration
//! order. The first failing statement stops the run; statements already
//! issued stay applied.

use crate::dialect::Dialect;
use crate::errors::{ExError, ExErrorKind, Result};
use crate::operation::{expand_statements, Operation};
use crate::session::{SessionSource, StoreSession};
use crate::{log_op_end, log_op_error, log_op_start};
use fixtrack_core_types::schema::OP_FIXTURE_EXECUTE;
use std::time::Instant;

/// Outcome of a successful execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Structural digest of the executed operation
    pub operation_digest: String,
    pub statements_executed: usize,
    pub rows_affected: usize,
}

/// Execute `op` on an open session.
///
/// # Errors
///
/// - `Format` - a generated value could not be produced; nothing was executed
/// - `Fixture` - statement `statement_index` failed; earlier statements were
///   applied, later ones were not. The driver error is the source.
pub fn execute(
    op: &Operation,
    session: &mut dyn StoreSession,
    dialect: &dyn Dialect,
) -> Result<ExecutionReport> {
    let started = Instant::now();
    let digest = op.digest()?;
    log_op_start!(OP_FIXTURE_EXECUTE, operation_digest = %digest);

    let result = run(op, session, dialect, &digest);
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => {
            log_op_end!(
                OP_FIXTURE_EXECUTE,
                duration_ms = duration_ms,
                operation_digest = %digest,
                statement_count = report.statements_executed,
                row_count = report.rows_affected
            );
        }
        Err(err) => {
            log_op_error!(
                OP_FIXTURE_EXECUTE,
                err,
                duration_ms = duration_ms,
                operation_digest = %digest,
                statement_index = err.statement_index()
            );
        }
    }
    result
}

fn run(
    op: &Operation,
    session: &mut dyn StoreSession,
    dialect: &dyn Dialect,
    digest: &str,
) -> Result<ExecutionReport> {
    let statements = expand_statements(op, dialect)?;
    let mut rows_affected = 0;

    for stmt in &statements {
        tracing::debug!(statement_index = stmt.index, sql = %stmt.sql, "fixture statement");
        let affected = session.execute(&stmt.sql).map_err(|source| {
            let mut err = ExError::new(ExErrorKind::Fixture)
                .with_op(OP_FIXTURE_EXECUTE)
                .with_statement_index(stmt.index)
                .with_statement(stmt.sql.clone())
                .with_message(format!(
                    "statement {} of {} failed",
                    stmt.index + 1,
                    statements.len()
                ));
            if let Some(table) = &stmt.table {
                err = err.with_table(table.clone());
            }
            err.with_source(source)
        })?;
        rows_affected += affected;
    }

    Ok(ExecutionReport {
        operation_digest: digest.to_string(),
        statements_executed: statements.len(),
        rows_affected,
    })
}

/// Execute `op` on a session opened from `source` for the duration of the call.
///
/// # Errors
///
/// - `Persistence` - the session could not be opened
/// - see [`execute`]
pub fn execute_with<S: SessionSource>(op: &Operation, source: &S) -> Result<ExecutionReport> {
    let mut session = source.open()?;
    execute(op, &mut session, source.dialect())
}
