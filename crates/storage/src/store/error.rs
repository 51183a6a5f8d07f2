#![forbid(unsafe_code)]

use rusqlite::ErrorCode;

use super::queries::QueryKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableOp {
    CreateTable,
    InsertRow,
    DropTable,
}

impl TableOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateTable => "create_table",
            Self::InsertRow => "insert_row",
            Self::DropTable => "drop_table",
        }
    }
}

/// Coarse classification of an underlying SQLite failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlFailureKind {
    Constraint,
    Connectivity,
    Syntax,
    Schema,
    Interrupted,
    Other,
}

impl SqlFailureKind {
    pub fn classify(err: &rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(error, message) => {
                classify_code(error.code, message.as_deref())
            }
            rusqlite::Error::SqlInputError { error, msg, .. } => {
                classify_code(error.code, Some(msg.as_str()))
            }
            _ => Self::Other,
        }
    }
}

fn classify_code(code: ErrorCode, message: Option<&str>) -> SqlFailureKind {
    match code {
        ErrorCode::ConstraintViolation => SqlFailureKind::Constraint,
        ErrorCode::OperationInterrupted => SqlFailureKind::Interrupted,
        ErrorCode::CannotOpen
        | ErrorCode::NotADatabase
        | ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::PermissionDenied
        | ErrorCode::ReadOnly
        | ErrorCode::SystemIoFailure
        | ErrorCode::DiskFull => SqlFailureKind::Connectivity,
        _ => classify_message(message),
    }
}

fn classify_message(message: Option<&str>) -> SqlFailureKind {
    let Some(message) = message else {
        return SqlFailureKind::Other;
    };
    if message.contains("syntax error") {
        SqlFailureKind::Syntax
    } else if message.contains("no such table") || message.contains("no such column") {
        SqlFailureKind::Schema
    } else {
        SqlFailureKind::Other
    }
}

#[derive(Debug)]
pub enum StoreError {
    DriverInitialization(String),
    TableOperation {
        op: TableOp,
        table: String,
        source: rusqlite::Error,
    },
    Query {
        query: QueryKind,
        source: rusqlite::Error,
    },
    InvalidIdentifier {
        identifier: String,
        reason: &'static str,
    },
    InvalidColumnDef {
        fragment: String,
        reason: &'static str,
    },
    ColumnValueMismatch {
        columns: usize,
        values: usize,
    },
    InvalidInput(&'static str),
    DeadlineExceeded,
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DriverInitialization(_) => "DRIVER_INITIALIZATION",
            Self::TableOperation { .. } => "TABLE_OPERATION",
            Self::Query { .. } => "QUERY_EXECUTION",
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Self::InvalidColumnDef { .. } => "INVALID_COLUMN_DEF",
            Self::ColumnValueMismatch { .. } => "COLUMN_VALUE_MISMATCH",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
        }
    }

    /// `None` when the error was raised before any statement ran.
    pub fn failure_kind(&self) -> Option<SqlFailureKind> {
        match self {
            Self::TableOperation { source, .. } | Self::Query { source, .. } => {
                Some(SqlFailureKind::classify(source))
            }
            Self::DeadlineExceeded => Some(SqlFailureKind::Interrupted),
            _ => None,
        }
    }

    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::TableOperation { .. })
    }

    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::Query { .. })
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DriverInitialization(reason) => {
                write!(f, "driver initialization failed: {reason}")
            }
            Self::TableOperation { op, table, source } => write!(
                f,
                "table operation failed (op={}, table={table}): {source}",
                op.as_str()
            ),
            Self::Query { query, source } => {
                write!(f, "query failed (query={}): {source}", query.as_str())
            }
            Self::InvalidIdentifier { identifier, reason } => {
                write!(f, "invalid identifier {identifier:?}: {reason}")
            }
            Self::InvalidColumnDef { fragment, reason } => {
                write!(f, "invalid column definition {fragment:?}: {reason}")
            }
            Self::ColumnValueMismatch { columns, values } => write!(
                f,
                "column/value count mismatch (columns={columns}, values={values})"
            ),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TableOperation { source, .. } | Self::Query { source, .. } => Some(source),
            _ => None,
        }
    }
}
