//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Timestamps are stored as unix milliseconds and `biz` as
//! its integer code.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Comments table. AUTOINCREMENT keeps ids strictly increasing and never
-- reused, which keyset pagination relies on.
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    commentator_id INTEGER NOT NULL,
    biz INTEGER NOT NULL,
    biz_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    parent_id INTEGER,
    root_id INTEGER,
    reply_to_uid INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Per-object comment counters
CREATE TABLE IF NOT EXISTS biz_comment_counts (
    biz INTEGER NOT NULL,
    biz_id INTEGER NOT NULL,
    count INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (biz, biz_id)
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_comments_biz_top_level ON comments(biz, biz_id, parent_id, updated_at);
CREATE INDEX IF NOT EXISTS idx_comments_parent_id ON comments(parent_id, id);
CREATE INDEX IF NOT EXISTS idx_comments_root_id ON comments(root_id, id);
"#;

const COMMENT_COLUMNS: &str =
    "id, commentator_id, biz, biz_id, content, parent_id, root_id, reply_to_uid, created_at, updated_at";

// Comment queries
pub const INSERT_COMMENT: &str = r#"
INSERT INTO comments (commentator_id, biz, biz_id, content, parent_id, root_id, reply_to_uid, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
"#;

pub fn select_comment_by_id() -> String {
    format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1")
}

pub fn select_top_level() -> String {
    format!(
        "SELECT {COMMENT_COLUMNS} FROM comments \
         WHERE biz = ?1 AND biz_id = ?2 AND id < ?3 AND parent_id IS NULL \
         ORDER BY updated_at DESC, id DESC \
         LIMIT ?4"
    )
}

pub fn select_replies_by_parent() -> String {
    format!(
        "SELECT {COMMENT_COLUMNS} FROM comments \
         WHERE parent_id = ?1 \
         ORDER BY id DESC \
         LIMIT ?3 OFFSET ?2"
    )
}

pub fn select_replies_by_root() -> String {
    format!(
        "SELECT {COMMENT_COLUMNS} FROM comments \
         WHERE root_id = ?1 AND id > ?2 \
         ORDER BY id ASC \
         LIMIT ?3"
    )
}

pub const DELETE_COMMENT_BY_AUTHOR: &str = r#"
DELETE FROM comments
WHERE id = ?1 AND commentator_id = ?2
"#;

pub const COUNT_COMMENTS_BY_OBJECT: &str = r#"
SELECT COUNT(*)
FROM comments
WHERE biz = ?1 AND biz_id = ?2
"#;

// Counter queries
pub const INCREMENT_COUNT: &str = r#"
INSERT INTO biz_comment_counts (biz, biz_id, count, created_at, updated_at)
VALUES (?1, ?2, 1, ?3, ?3)
ON CONFLICT (biz, biz_id) DO UPDATE SET count = count + 1, updated_at = excluded.updated_at
"#;

pub const DECREMENT_COUNT: &str = r#"
UPDATE biz_comment_counts
SET count = MAX(count - 1, 0), updated_at = ?3
WHERE biz = ?1 AND biz_id = ?2
"#;

pub const SELECT_COUNT: &str = r#"
SELECT count
FROM biz_comment_counts
WHERE biz = ?1 AND biz_id = ?2
"#;
