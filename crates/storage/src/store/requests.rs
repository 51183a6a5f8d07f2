#![forbid(unsafe_code)]

use tb_core::schema::Table;

use super::StoreError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
}

impl NewProject {
    pub(super) fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::InvalidInput("project title must not be empty"));
        }
        Ok(())
    }

    pub(super) fn into_row(self) -> (Vec<&'static str>, Vec<String>) {
        (Table::Projects.column_names(), vec![self.title])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub responsible: String,
    pub phone: String,
    pub start_date_ms: i64,
    pub lasting_days: i64,
    pub is_done: bool,
    pub project_id: i64,
}

impl NewTask {
    pub(super) fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::InvalidInput("task title must not be empty"));
        }
        if self.lasting_days < 0 {
            return Err(StoreError::InvalidInput("lasting days must not be negative"));
        }
        Ok(())
    }

    /// Values in `Table::Tasks` column order.
    pub(super) fn into_row(self) -> (Vec<&'static str>, Vec<String>) {
        let values = vec![
            self.title,
            self.responsible,
            self.phone,
            self.start_date_ms.to_string(),
            self.lasting_days.to_string(),
            if self.is_done { "1" } else { "0" }.to_string(),
            self.project_id.to_string(),
        ];
        (Table::Tasks.column_names(), values)
    }
}
