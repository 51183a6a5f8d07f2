#![forbid(unsafe_code)]

use crate::model::{ActiveTask, OverdueResponsible};

pub const ALL_PROJECTS_DONE: &str = "Все проекты выполнены";
pub const ALL_TASKS_DONE: &str = "Все задачи выполнены";
pub const NO_TASKS_TODAY: &str = "Нет задач на сегодня";
pub const ALL_ON_TIME: &str = "Все исполнители выполнили задачи в срок";

const RESPONSIBLE_LABEL: &str = ", ответственный: ";
const PHONE_LABEL: &str = ", телефон: ";

/// A row that renders as one `\n`-terminated line of a text report.
pub trait ReportLine {
    fn write_line(&self, out: &mut String);
}

impl ReportLine for String {
    fn write_line(&self, out: &mut String) {
        out.push_str(self);
        out.push('\n');
    }
}

impl ReportLine for ActiveTask {
    fn write_line(&self, out: &mut String) {
        out.push_str(&self.title);
        out.push_str(RESPONSIBLE_LABEL);
        out.push_str(&self.responsible);
        out.push('\n');
    }
}

impl ReportLine for OverdueResponsible {
    fn write_line(&self, out: &mut String) {
        out.push_str(&self.responsible);
        out.push_str(PHONE_LABEL);
        out.push_str(&self.phone);
        out.push('\n');
    }
}

/// Concatenates rows in order. Never returns an empty string: an empty fold
/// yields `sentinel`.
pub fn render_lines<T: ReportLine>(rows: &[T], sentinel: &str) -> String {
    let mut out = String::new();
    for row in rows {
        row.write_line(&mut out);
    }
    if out.is_empty() {
        return sentinel.to_string();
    }
    out
}
