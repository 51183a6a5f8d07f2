#![forbid(unsafe_code)]

mod connection;
mod time;
mod tx;

pub(super) use connection::open_connection;
pub(super) use time::now_ms;
pub(super) use tx::with_write_transaction;
