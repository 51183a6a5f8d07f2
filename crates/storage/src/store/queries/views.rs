#![forbid(unsafe_code)]

//! Text renderings of the report queries: one `\n`-terminated line per row,
//! or a fixed sentinel phrase when there is nothing to report.

use tb_core::calendar::CalendarDay;
use tb_core::report::{ALL_ON_TIME, ALL_PROJECTS_DONE, ALL_TASKS_DONE, NO_TASKS_TODAY, render_lines};

use super::super::{StoreError, TaskBoard};

impl TaskBoard {
    pub fn list_incomplete_projects(&self) -> Result<String, StoreError> {
        let rows = self.or_fail_open(self.incomplete_projects(), Vec::new)?;
        Ok(render_lines(&rows, ALL_PROJECTS_DONE))
    }

    pub fn count_incomplete_tasks(&self, project_title: &str) -> Result<i64, StoreError> {
        self.or_fail_open(self.incomplete_task_count(project_title), || 0)
    }

    pub fn list_incomplete_tasks_of(&self, responsible: &str) -> Result<String, StoreError> {
        let rows = self.or_fail_open(self.incomplete_tasks_of(responsible), Vec::new)?;
        Ok(render_lines(&rows, ALL_TASKS_DONE))
    }

    /// `month` is 1-based.
    pub fn tasks_active_on_date(
        &self,
        day: u32,
        month: u32,
        year: i32,
    ) -> Result<String, StoreError> {
        let day = CalendarDay::try_new(year, month, day)
            .map_err(|err| StoreError::InvalidInput(err.message()))?;
        let rows = self.or_fail_open(self.tasks_active_on(day), Vec::new)?;
        Ok(render_lines(&rows, NO_TASKS_TODAY))
    }

    pub fn list_overdue_responsibles(&self) -> Result<String, StoreError> {
        let rows = self.or_fail_open(self.overdue_responsibles(), Vec::new)?;
        Ok(render_lines(&rows, ALL_ON_TIME))
    }
}
