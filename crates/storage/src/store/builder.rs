#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use rusqlite::params_from_iter;
use tb_core::ids::SqlIdentifier;
use tb_core::schema::{ColumnDef, ID_COLUMN};
use tracing::{debug, error};

use super::support::{open_connection, with_write_transaction};
use super::{Deadline, SqlFailureKind, StoreConfig, StoreError, TableOp};

/// Builds and runs `CREATE TABLE` / `INSERT` / `DROP TABLE` statements from
/// runtime table, column and value names.
///
/// Every call opens its own connection, runs in its own transaction under the
/// configured isolation policy and closes the connection before returning.
/// Values are bound as parameters; identifiers are validated against the
/// configured `IdentifierPolicy` before they are written into SQL text.
#[derive(Clone, Debug)]
pub struct StatementBuilder {
    config: Arc<StoreConfig>,
    deadline: Deadline,
}

impl StatementBuilder {
    pub fn new(config: StoreConfig) -> Self {
        Self::from_shared(Arc::new(config), Deadline::none())
    }

    pub(in crate::store) fn from_shared(config: Arc<StoreConfig>, deadline: Deadline) -> Self {
        Self { config, deadline }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// `CREATE TABLE IF NOT EXISTS <table> (Id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, ...)`.
    pub fn create_table<S: AsRef<str>>(
        &self,
        table: &str,
        column_defs: &[S],
    ) -> Result<(), StoreError> {
        let table = self.table_identifier(table)?;
        if column_defs.is_empty() {
            return Err(StoreError::InvalidInput(
                "column definitions must not be empty",
            ));
        }

        let mut defs = Vec::with_capacity(column_defs.len());
        for fragment in column_defs {
            let fragment = fragment.as_ref();
            let def = ColumnDef::parse(fragment).map_err(|err| StoreError::InvalidColumnDef {
                fragment: fragment.to_string(),
                reason: err.message(),
            })?;
            if def.name().matches(ID_COLUMN) {
                return Err(StoreError::InvalidColumnDef {
                    fragment: fragment.to_string(),
                    reason: "the Id key column is implicit",
                });
            }
            self.check_column(&table, def.name())?;
            defs.push(def);
        }
        ensure_distinct(defs.iter().map(ColumnDef::name))?;

        let columns = defs
            .iter()
            .map(ColumnDef::to_sql)
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (Id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL, {columns})"
        );

        self.run(TableOp::CreateTable, &table, |tx| {
            tx.execute(&sql, [])?;
            Ok(())
        })
    }

    /// Inserts one row, binding every value as text in column order, and
    /// returns the generated `Id`.
    pub fn insert_row<C: AsRef<str>, V: AsRef<str>>(
        &self,
        table: &str,
        column_names: &[C],
        column_values: &[V],
    ) -> Result<i64, StoreError> {
        if column_names.len() != column_values.len() {
            return Err(StoreError::ColumnValueMismatch {
                columns: column_names.len(),
                values: column_values.len(),
            });
        }
        if column_names.is_empty() {
            return Err(StoreError::InvalidInput("insert needs at least one column"));
        }

        let table = self.table_identifier(table)?;
        let mut columns = Vec::with_capacity(column_names.len());
        for name in column_names {
            let column = identifier(name.as_ref())?;
            self.check_column(&table, &column)?;
            columns.push(column);
        }
        ensure_distinct(columns.iter())?;

        let names = columns
            .iter()
            .map(SqlIdentifier::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("INSERT INTO {table} ({names}) VALUES ({placeholders})");

        self.run(TableOp::InsertRow, &table, |tx| {
            tx.execute(
                &sql,
                params_from_iter(column_values.iter().map(|value| value.as_ref())),
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// `DROP TABLE IF EXISTS <table>`.
    pub fn drop_table(&self, table: &str) -> Result<(), StoreError> {
        let table = self.table_identifier(table)?;
        let sql = format!("DROP TABLE IF EXISTS {table}");

        self.run(TableOp::DropTable, &table, |tx| {
            tx.execute(&sql, [])?;
            Ok(())
        })
    }

    fn run<T>(
        &self,
        op: TableOp,
        table: &SqlIdentifier,
        body: impl FnOnce(&rusqlite::Transaction<'_>) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        self.deadline.check()?;
        debug!(
            op = op.as_str(),
            table = %table,
            isolation = self.config.isolation().as_str(),
            "running table statement"
        );

        let outcome = open_connection(&self.config, &self.deadline).and_then(|mut conn| {
            with_write_transaction(&mut conn, self.config.isolation(), body)
        });

        outcome.map_err(|source| {
            if SqlFailureKind::classify(&source) == SqlFailureKind::Interrupted
                && self.deadline.is_expired()
            {
                return StoreError::DeadlineExceeded;
            }
            error!(op = op.as_str(), table = %table, error = %source, "table operation failed");
            StoreError::TableOperation {
                op,
                table: table.to_string(),
                source,
            }
        })
    }

    fn table_identifier(&self, table: &str) -> Result<SqlIdentifier, StoreError> {
        let table = identifier(table)?;
        if !self.config.identifier_policy().allows_table(&table) {
            return Err(StoreError::InvalidIdentifier {
                identifier: table.into_string(),
                reason: "table is not part of the known schema",
            });
        }
        Ok(table)
    }

    fn check_column(&self, table: &SqlIdentifier, column: &SqlIdentifier) -> Result<(), StoreError> {
        if self.config.identifier_policy().allows_column(table, column) {
            return Ok(());
        }
        Err(StoreError::InvalidIdentifier {
            identifier: column.to_string(),
            reason: "column is not part of the known schema",
        })
    }
}

fn identifier(value: &str) -> Result<SqlIdentifier, StoreError> {
    SqlIdentifier::try_new(value).map_err(|err| StoreError::InvalidIdentifier {
        identifier: value.to_string(),
        reason: err.message(),
    })
}

fn ensure_distinct<'a>(names: impl Iterator<Item = &'a SqlIdentifier>) -> Result<(), StoreError> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name.as_str().to_ascii_lowercase()) {
            return Err(StoreError::InvalidIdentifier {
                identifier: name.to_string(),
                reason: "column is listed more than once",
            });
        }
    }
    Ok(())
}
