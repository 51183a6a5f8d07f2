#![forbid(unsafe_code)]

mod sql;
mod views;

use rusqlite::{Connection, OptionalExtension, params};
use tb_core::calendar::{CalendarDay, MILLIS_PER_DAY};
use tb_core::model::{ActiveTask, OverdueResponsible, Project, Task};
use tracing::{debug, warn};

use super::support::{now_ms, open_connection};
use super::{ReadFailurePolicy, SqlFailureKind, StoreError, TaskBoard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    IncompleteProjects,
    IncompleteTaskCount,
    IncompleteTasksOf,
    ActiveTasks,
    OverdueResponsibles,
    Projects,
    Tasks,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IncompleteProjects => "incomplete_projects",
            Self::IncompleteTaskCount => "incomplete_task_count",
            Self::IncompleteTasksOf => "incomplete_tasks_of",
            Self::ActiveTasks => "active_tasks",
            Self::OverdueResponsibles => "overdue_responsibles",
            Self::Projects => "projects",
            Self::Tasks => "tasks",
        }
    }
}

impl TaskBoard {
    /// Titles of projects with at least one task that is not done.
    pub fn incomplete_projects(&self) -> Result<Vec<String>, StoreError> {
        self.read(QueryKind::IncompleteProjects, |conn| {
            let mut stmt = conn.prepare(sql::INCOMPLETE_PROJECTS)?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(row.get::<_, String>(0)?);
            }
            Ok(out)
        })
    }

    /// Tasks of the project titled `project_title` that are not done. A
    /// missing aggregate row counts as zero.
    pub fn incomplete_task_count(&self, project_title: &str) -> Result<i64, StoreError> {
        self.read(QueryKind::IncompleteTaskCount, |conn| {
            let count = conn
                .query_row(sql::INCOMPLETE_TASK_COUNT, params![project_title], |row| {
                    row.get::<_, i64>(0)
                })
                .optional()?;
            Ok(count.unwrap_or(0))
        })
    }

    pub fn incomplete_tasks_of(&self, responsible: &str) -> Result<Vec<String>, StoreError> {
        self.read(QueryKind::IncompleteTasksOf, |conn| {
            let mut stmt = conn.prepare(sql::INCOMPLETE_TASKS_OF)?;
            let mut rows = stmt.query(params![responsible])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(row.get::<_, String>(0)?);
            }
            Ok(out)
        })
    }

    /// Tasks whose window covers local midnight of `day`.
    pub fn tasks_active_on(&self, day: CalendarDay) -> Result<Vec<ActiveTask>, StoreError> {
        let day_start_ms = day
            .start_millis_local()
            .map_err(|err| StoreError::InvalidInput(err.message()))?;
        self.tasks_active_at(day_start_ms)
    }

    /// Tasks with `StartDate <= day_start_ms <= StartDate + Lasting days`.
    pub fn tasks_active_at(&self, day_start_ms: i64) -> Result<Vec<ActiveTask>, StoreError> {
        self.read(QueryKind::ActiveTasks, |conn| {
            let mut stmt = conn.prepare(sql::ACTIVE_TASKS)?;
            let mut rows = stmt.query(params![day_start_ms, MILLIS_PER_DAY])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(ActiveTask {
                    title: row.get(0)?,
                    responsible: row.get(1)?,
                });
            }
            Ok(out)
        })
    }

    pub fn overdue_responsibles(&self) -> Result<Vec<OverdueResponsible>, StoreError> {
        self.overdue_responsibles_at(now_ms())
    }

    /// Distinct (responsible, phone) pairs with an unfinished task whose window
    /// ended before `now_ms`.
    pub fn overdue_responsibles_at(
        &self,
        now_ms: i64,
    ) -> Result<Vec<OverdueResponsible>, StoreError> {
        self.read(QueryKind::OverdueResponsibles, |conn| {
            let mut stmt = conn.prepare(sql::OVERDUE_RESPONSIBLES)?;
            let mut rows = stmt.query(params![now_ms, MILLIS_PER_DAY])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(OverdueResponsible {
                    responsible: row.get(0)?,
                    phone: row.get(1)?,
                });
            }
            Ok(out)
        })
    }

    pub fn projects(&self) -> Result<Vec<Project>, StoreError> {
        self.read(QueryKind::Projects, |conn| {
            let mut stmt = conn.prepare(sql::ALL_PROJECTS)?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(Project {
                    id: row.get(0)?,
                    title: row.get(1)?,
                });
            }
            Ok(out)
        })
    }

    pub fn tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.read(QueryKind::Tasks, |conn| {
            let mut stmt = conn.prepare(sql::ALL_TASKS)?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(Task {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    responsible: row.get(2)?,
                    phone: row.get(3)?,
                    start_date_ms: row.get(4)?,
                    lasting_days: row.get(5)?,
                    is_done: row.get::<_, i64>(6)? != 0,
                    project_id: row.get(7)?,
                });
            }
            Ok(out)
        })
    }

    fn read<T>(
        &self,
        query: QueryKind,
        body: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        self.initialize()?;
        self.deadline.check()?;
        debug!(query = query.as_str(), "running query");

        let outcome = open_connection(self.config(), &self.deadline).and_then(|conn| body(&conn));
        outcome.map_err(|source| {
            if SqlFailureKind::classify(&source) == SqlFailureKind::Interrupted
                && self.deadline.is_expired()
            {
                return StoreError::DeadlineExceeded;
            }
            StoreError::Query { query, source }
        })
    }

    /// Applies `ReadFailurePolicy::FailOpen` to a read-tier failure.
    fn or_fail_open<T>(
        &self,
        result: Result<T, StoreError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, StoreError> {
        match result {
            Err(err)
                if err.is_read_failure()
                    && self.config().read_failure() == ReadFailurePolicy::FailOpen =>
            {
                warn!(error = %err, "query failed, answering with the empty result");
                Ok(fallback())
            }
            other => other,
        }
    }
}
