#![forbid(unsafe_code)]

use crate::calendar::TaskWindow;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub responsible: String,
    pub phone: String,
    pub start_date_ms: i64,
    pub lasting_days: i64,
    pub is_done: bool,
    pub project_id: i64,
}

impl Task {
    pub fn window(&self) -> TaskWindow {
        TaskWindow::new(self.start_date_ms, self.lasting_days)
    }

    pub fn is_overdue_at(&self, now_ms: i64) -> bool {
        self.window().is_overdue_at(now_ms, self.is_done)
    }
}

/// A task whose window covers the requested day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveTask {
    pub title: String,
    pub responsible: String,
}

/// A person with at least one overdue task.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverdueResponsible {
    pub responsible: String,
    pub phone: String,
}
