#![forbid(unsafe_code)]

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::warn;

use super::super::IsolationPolicy;

/// Runs `body` in one `BEGIN IMMEDIATE` transaction under `isolation`.
/// Concurrent writers wait on the busy timeout.
///
/// Commits on success and rolls back explicitly on failure. The isolation
/// pragma is restored on both paths before the connection is handed back.
pub(in crate::store) fn with_write_transaction<T>(
    conn: &mut Connection,
    isolation: IsolationPolicy,
    body: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<T> {
    isolation.apply(conn)?;
    let outcome = run_transaction(conn, body);
    let restored = IsolationPolicy::restore(conn);
    let value = outcome?;
    restored?;
    Ok(value)
}

fn run_transaction<T>(
    conn: &mut Connection,
    body: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<T> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match body(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                warn!(error = %rollback_err, "rollback after failed statement did not complete");
            }
            Err(err)
        }
    }
}
