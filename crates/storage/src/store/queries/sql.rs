#![forbid(unsafe_code)]

// Engine order everywhere: none of the report queries has an ORDER BY.
// Projected NULLs read as "" for text columns and 0 for numeric ones.

pub(super) const INCOMPLETE_PROJECTS: &str = "SELECT DISTINCT COALESCE(p.Title, '') \
     FROM Projects p \
     JOIN Tasks t ON p.Id = t.ProjectId \
     WHERE t.IsDone = 0";

pub(super) const INCOMPLETE_TASK_COUNT: &str = "SELECT COUNT(*) \
     FROM Tasks t \
     JOIN Projects p ON p.Id = t.ProjectId \
     WHERE p.Title = ?1 AND t.IsDone = 0";

pub(super) const INCOMPLETE_TASKS_OF: &str = "SELECT COALESCE(Title, '') \
     FROM Tasks \
     WHERE IsDone = 0 AND Responsible = ?1";

/// ?1 = start of the day, ?2 = milliseconds per day.
pub(super) const ACTIVE_TASKS: &str = "SELECT COALESCE(Title, ''), COALESCE(Responsible, '') \
     FROM Tasks \
     WHERE StartDate <= ?1 AND StartDate + Lasting * ?2 >= ?1";

/// ?1 = now, ?2 = milliseconds per day.
pub(super) const OVERDUE_RESPONSIBLES: &str = "SELECT DISTINCT COALESCE(Responsible, ''), COALESCE(Phone, '') \
     FROM Tasks \
     WHERE StartDate + Lasting * ?2 < ?1 AND IsDone = 0";

pub(super) const ALL_PROJECTS: &str = "SELECT Id, COALESCE(Title, '') FROM Projects ORDER BY Id ASC";

pub(super) const ALL_TASKS: &str = "SELECT Id, COALESCE(Title, ''), COALESCE(Responsible, ''), COALESCE(Phone, ''), \
     COALESCE(StartDate, 0), COALESCE(Lasting, 0), COALESCE(IsDone, 0), COALESCE(ProjectId, 0) \
     FROM Tasks \
     ORDER BY Id ASC";
