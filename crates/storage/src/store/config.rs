#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tb_core::schema::IdentifierPolicy;

use super::StoreError;

pub const DATABASE_URL_ENV: &str = "TASKBOARD_DATABASE_URL";

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECTION_STRING_PREFIXES: &[&str] = &["jdbc:sqlite:", "sqlite://", "sqlite:"];

/// Isolation applied to every statement-builder transaction.
///
/// `ReadUncommitted` lets readers on a shared cache observe uncommitted
/// writes. It only changes behaviour when SQLite runs in shared-cache mode;
/// otherwise every connection is serializable anyway.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IsolationPolicy {
    #[default]
    ReadUncommitted,
    Serializable,
}

impl IsolationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "read_uncommitted",
            Self::Serializable => "serializable",
        }
    }

    pub(in crate::store) fn apply(self, conn: &Connection) -> rusqlite::Result<()> {
        conn.pragma_update(None, "read_uncommitted", self == Self::ReadUncommitted)
    }

    pub(in crate::store) fn restore(conn: &Connection) -> rusqlite::Result<()> {
        conn.pragma_update(None, "read_uncommitted", false)
    }
}

/// What the formatted query views do when a read fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadFailurePolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Log the failure and answer with the view's "nothing outstanding" value.
    FailOpen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    database_path: PathBuf,
    isolation: IsolationPolicy,
    read_failure: ReadFailurePolicy,
    identifier_policy: IdentifierPolicy,
    busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            isolation: IsolationPolicy::default(),
            read_failure: ReadFailurePolicy::default(),
            identifier_policy: IdentifierPolicy::default(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Accepts `jdbc:sqlite:<path>`, `sqlite:<path>`, `sqlite://<path>` or a bare path.
    pub fn from_connection_string(value: &str) -> Result<Self, StoreError> {
        let value = value.trim();
        let path = CONNECTION_STRING_PREFIXES
            .iter()
            .find_map(|prefix| value.strip_prefix(prefix))
            .unwrap_or(value);

        if path.is_empty() {
            return Err(StoreError::InvalidInput(
                "connection string does not name a database",
            ));
        }
        if path == ":memory:" || path.starts_with("file::memory:") {
            return Err(StoreError::InvalidInput(
                "in-memory databases do not outlive a single call",
            ));
        }

        Ok(Self::new(path))
    }

    pub fn from_env() -> Result<Self, StoreError> {
        let value = std::env::var(DATABASE_URL_ENV)
            .map_err(|_| StoreError::InvalidInput("TASKBOARD_DATABASE_URL is not set"))?;
        Self::from_connection_string(&value)
    }

    pub fn with_isolation(mut self, isolation: IsolationPolicy) -> Self {
        self.isolation = isolation;
        self
    }

    pub fn with_read_failure(mut self, policy: ReadFailurePolicy) -> Self {
        self.read_failure = policy;
        self
    }

    pub fn with_identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn isolation(&self) -> IsolationPolicy {
        self.isolation
    }

    pub fn read_failure(&self) -> ReadFailurePolicy {
        self.read_failure
    }

    pub fn identifier_policy(&self) -> IdentifierPolicy {
        self.identifier_policy
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}
