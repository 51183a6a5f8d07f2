#![forbid(unsafe_code)]

mod builder;
mod config;
mod deadline;
mod error;
mod queries;
mod requests;
mod schema;
mod support;

pub use builder::StatementBuilder;
pub use config::{DATABASE_URL_ENV, IsolationPolicy, ReadFailurePolicy, StoreConfig};
pub use deadline::{CancelHandle, Deadline};
pub use error::{SqlFailureKind, StoreError, TableOp};
pub use queries::QueryKind;
pub use requests::*;
pub use schema::TeardownReport;

use rusqlite::Connection;
use std::sync::{Arc, OnceLock};
use tb_core::schema::Table;
use tracing::info;

/// Oldest SQLite library the queries are written against.
const MIN_SQLITE_VERSION_NUMBER: i32 = 3_008_003;

/// Entry point to the task/project store.
///
/// Holds the configuration and hands out a fresh `StatementBuilder` per
/// request. Nothing else is kept between calls: every operation opens and
/// closes its own connection.
#[derive(Clone, Debug)]
pub struct TaskBoard {
    config: Arc<StoreConfig>,
    deadline: Deadline,
    driver: Arc<OnceLock<Result<(), String>>>,
}

impl TaskBoard {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Arc::new(config),
            deadline: Deadline::none(),
            driver: Arc::new(OnceLock::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// A handle that applies `deadline` to every operation it runs. Driver
    /// initialization state is shared with `self`.
    pub fn with_deadline(&self, deadline: Deadline) -> Self {
        Self {
            config: Arc::clone(&self.config),
            deadline,
            driver: Arc::clone(&self.driver),
        }
    }

    /// One-time driver setup. Later calls return the first outcome.
    pub fn initialize(&self) -> Result<(), StoreError> {
        self.driver
            .get_or_init(|| init_driver(&self.config))
            .clone()
            .map_err(StoreError::DriverInitialization)
    }

    pub fn session(&self) -> StatementBuilder {
        StatementBuilder::from_shared(Arc::clone(&self.config), self.deadline.clone())
    }

    pub fn add_project(&self, request: NewProject) -> Result<i64, StoreError> {
        self.initialize()?;
        request.validate()?;
        let (columns, values) = request.into_row();
        self.session()
            .insert_row(Table::Projects.name(), &columns, &values)
    }

    pub fn add_task(&self, request: NewTask) -> Result<i64, StoreError> {
        self.initialize()?;
        request.validate()?;
        let (columns, values) = request.into_row();
        self.session().insert_row(Table::Tasks.name(), &columns, &values)
    }
}

fn init_driver(config: &StoreConfig) -> Result<(), String> {
    let version = rusqlite::version_number();
    if version < MIN_SQLITE_VERSION_NUMBER {
        return Err(format!(
            "sqlite {} is older than the supported minimum",
            rusqlite::version()
        ));
    }

    if let Some(parent) = config
        .database_path()
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("cannot create {}: {err}", parent.display()))?;
    }

    Connection::open(config.database_path())
        .map_err(|err| format!("cannot open {}: {err}", config.database_path().display()))?;

    info!(
        path = %config.database_path().display(),
        sqlite = rusqlite::version(),
        "sqlite driver initialized"
    );
    Ok(())
}
