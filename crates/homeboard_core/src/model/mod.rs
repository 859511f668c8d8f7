//! Dashboard domain model.
//!
//! # Responsibility
//! - Define the rows every dashboard screen reads and writes.
//! - Own field-level validation so repositories and services share one
//!   definition of a well-formed row.
//!
//! # Invariants
//! - Every persisted row carries an `OwnerTag`.
//! - Identifiers are random v4 UUIDs and never nil.
//! - Timestamps are Unix epoch milliseconds (UTC).

pub mod owner;
pub mod todo;
pub mod tuition;
pub mod working_day;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
