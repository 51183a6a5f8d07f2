#![forbid(unsafe_code)]

use rusqlite::Connection;

use super::super::{Deadline, StoreConfig};

/// Opens a fresh connection for one operation. The caller owns it and closes
/// it by dropping it before returning.
pub(in crate::store) fn open_connection(
    config: &StoreConfig,
    deadline: &Deadline,
) -> rusqlite::Result<Connection> {
    let conn = Connection::open(config.database_path())?;
    conn.busy_timeout(config.busy_timeout())?;
    deadline.install(&conn);
    Ok(conn)
}
