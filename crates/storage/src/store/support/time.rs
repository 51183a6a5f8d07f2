#![forbid(unsafe_code)]

pub(in crate::store) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
