#![forbid(unsafe_code)]

mod store;

pub use store::*;
pub use tb_core::calendar::{CalendarDay, MILLIS_PER_DAY};
pub use tb_core::model::{ActiveTask, OverdueResponsible, Project, Task};
pub use tb_core::schema::{IdentifierPolicy, Table};
