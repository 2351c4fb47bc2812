//! SQL migration definitions for the local posts database.
//!
//! Migrations are applied in order on database open. Each migration has a
//! version number and a batch of SQL statements.

/// A database migration with a version and SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Initial schema: blog_posts",
            sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Blog posts mirrored from (or standing in for) the remote collection
CREATE TABLE IF NOT EXISTS blog_posts (
    id          TEXT PRIMARY KEY,
    title       TEXT,
    excerpt     TEXT,
    category    TEXT,
    date        TEXT,
    read_time   TEXT,
    author      TEXT,
    image       TEXT,
    tags_json   TEXT,
    featured    INTEGER,
    imported_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_blog_posts_date ON blog_posts(date);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
        },
        Migration {
            version: 2,
            description: "Record whether each post id is an integer or text",
            sql: r#"
-- 'int' or 'text'; NULL for rows written before v2
ALTER TABLE blog_posts ADD COLUMN id_kind TEXT;

INSERT INTO schema_migrations (version) VALUES (2);
"#,
        },
    ]
}
