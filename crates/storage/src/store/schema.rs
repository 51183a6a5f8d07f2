#![forbid(unsafe_code)]

use tb_core::schema::Table;
use tracing::{info, warn};

use super::{StoreError, TaskBoard};

/// Outcome of `TaskBoard::drop_schema`. A failed drop never stops the next one.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub dropped: Vec<Table>,
    pub failed: Vec<(Table, StoreError)>,
}

impl TeardownReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl TaskBoard {
    /// Creates `Projects` and `Tasks` if they do not exist yet.
    pub fn initialize_schema(&self) -> Result<(), StoreError> {
        self.initialize()?;
        let session = self.session();
        for table in Table::ALL {
            session.create_table(table.name(), &table.column_defs())?;
        }
        info!(path = %self.config().database_path().display(), "schema ready");
        Ok(())
    }

    /// Drops `Projects`, then `Tasks`. Failures are logged and collected.
    pub fn drop_schema(&self) -> TeardownReport {
        let mut report = TeardownReport::default();
        if let Err(err) = self.initialize() {
            warn!(error = %err, "schema teardown skipped");
            let reason = match err {
                StoreError::DriverInitialization(reason) => reason,
                other => other.to_string(),
            };
            for table in Table::ALL {
                report
                    .failed
                    .push((table, StoreError::DriverInitialization(reason.clone())));
            }
            return report;
        }

        let session = self.session();
        for table in Table::ALL {
            match session.drop_table(table.name()) {
                Ok(()) => report.dropped.push(table),
                Err(err) => {
                    warn!(table = table.name(), error = %err, "drop failed, continuing teardown");
                    report.failed.push((table, err));
                }
            }
        }
        info!(
            dropped = report.dropped.len(),
            failed = report.failed.len(),
            "schema teardown finished"
        );
        report
    }
}
