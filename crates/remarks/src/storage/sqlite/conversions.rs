//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, SubsecRound, Utc};
use remarks_core::comment::{Biz, Comment};
use rusqlite::Row;

/// Convert a SQLite row to a Comment.
///
/// Expected columns: id, commentator_id, biz, biz_id, content, parent_id,
/// root_id, reply_to_uid, created_at, updated_at
pub fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
    let biz_code: i32 = row.get(2)?;
    let created_at: i64 = row.get(8)?;
    let updated_at: i64 = row.get(9)?;

    Ok(Comment {
        id: row.get(0)?,
        commentator_id: row.get(1)?,
        biz: parse_biz(biz_code)?,
        biz_id: row.get(3)?,
        content: row.get(4)?,
        parent_id: row.get(5)?,
        root_id: row.get(6)?,
        reply_to_uid: row.get(7)?,
        created_at: parse_millis(created_at)?,
        updated_at: parse_millis(updated_at)?,
    })
}

/// Current time truncated to the stored millisecond precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Format a DateTime as unix milliseconds.
pub fn to_millis(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

fn parse_biz(code: i32) -> rusqlite::Result<Biz> {
    Biz::from_code(code).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Integer, Box::new(e))
    })
}

fn parse_millis(millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(rusqlite::Error::IntegralValueOutOfRange(
        8, millis,
    ))
}
