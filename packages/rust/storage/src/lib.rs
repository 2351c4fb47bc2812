//! libSQL storage layer for blog posts (offline / development content store).
//!
//! The [`Storage`] struct wraps a local libSQL database holding a
//! `blog_posts` table shaped like the remote collection. It implements
//! [`ContentStore`] so the feed can run entirely offline.
//!
//! **Access rules:**
//! - `avagenc import`: read-write via [`Storage::open`]
//! - Feed loads: read-only via [`Storage::open_readonly`]

mod migrations;

use std::path::Path;

use avagenc_content::ContentStore;
use avagenc_shared::{AvagencError, Post, PostId, Result};
use chrono::Utc;
use libsql::{Connection, Database, params};
use tracing::{info, instrument};

const POST_COLUMNS: &str =
    "id, title, excerpt, category, date, read_time, author, image, tags_json, featured, id_kind";

/// Undated posts sort first, matching the REST backend's `order=date.desc`.
const NEWEST_FIRST: &str = "ORDER BY date IS NULL DESC, date DESC";

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    readonly: bool,
}

impl Storage {
    /// Open or create a database at `path` in read-write mode.
    pub async fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AvagencError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AvagencError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| AvagencError::Storage(e.to_string()))?;

        let storage = Self {
            db,
            conn,
            readonly: false,
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Open an existing database at `path` in read-only mode.
    pub async fn open_readonly(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AvagencError::Storage(format!(
                "no posts database at {} (run `avagenc import` first)",
                path.display()
            )));
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AvagencError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| AvagencError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            readonly: true,
        })
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn
                    .execute_batch(migration.sql)
                    .await
                    .map_err(|e| {
                        AvagencError::Storage(format!(
                            "migration v{} failed: {e}",
                            migration.version
                        ))
                    })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    /// Ensure we're in read-write mode before writing.
    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            return Err(AvagencError::Storage(
                "database is opened in read-only mode".into(),
            ));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Post operations
    // -----------------------------------------------------------------------

    /// Insert a post, replacing any existing row with the same id.
    pub async fn upsert_post(&self, post: &Post) -> Result<()> {
        self.check_writable()?;
        let tags_json = post
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AvagencError::Storage(format!("encode tags: {e}")))?;
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO blog_posts (id, title, excerpt, category, date, read_time, author, image, tags_json, featured, imported_at, id_kind)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(id) DO UPDATE SET
                   title = excluded.title,
                   excerpt = excluded.excerpt,
                   category = excluded.category,
                   date = excluded.date,
                   read_time = excluded.read_time,
                   author = excluded.author,
                   image = excluded.image,
                   tags_json = excluded.tags_json,
                   featured = excluded.featured,
                   imported_at = excluded.imported_at,
                   id_kind = excluded.id_kind",
                params![
                    post.id.to_string(),
                    post.title.as_deref(),
                    post.excerpt.as_deref(),
                    post.category.as_deref(),
                    post.date.as_deref(),
                    post.read_time.as_deref(),
                    post.author.as_deref(),
                    post.image.as_deref(),
                    tags_json,
                    post.featured.map(i64::from),
                    now.as_str(),
                    id_kind(&post.id),
                ],
            )
            .await
            .map_err(|e| AvagencError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Upsert a batch of posts. Returns the number written.
    #[instrument(skip_all, fields(count = posts.len()))]
    pub async fn import_posts(&self, posts: &[Post]) -> Result<usize> {
        self.check_writable()?;
        for post in posts {
            self.upsert_post(post).await?;
        }
        info!(count = posts.len(), "imported posts");
        Ok(posts.len())
    }

    /// All posts, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts {NEWEST_FIRST}");
        let mut rows = self
            .conn
            .query(&sql, params![])
            .await
            .map_err(|e| AvagencError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AvagencError::Storage(e.to_string()))?
        {
            results.push(row_to_post(&row)?);
        }
        Ok(results)
    }

    /// Get a post by id.
    pub async fn get_post(&self, id: &PostId) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_posts WHERE id = ?1");
        let mut rows = self
            .conn
            .query(&sql, params![id.to_string()])
            .await
            .map_err(|e| AvagencError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_post(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(AvagencError::Storage(e.to_string())),
        }
    }

    /// Delete a post by id.
    pub async fn delete_post(&self, id: &PostId) -> Result<()> {
        self.check_writable()?;
        self.conn
            .execute("DELETE FROM blog_posts WHERE id = ?1", params![id.to_string()])
            .await
            .map_err(|e| AvagencError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Number of stored posts.
    pub async fn count_posts(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM blog_posts", params![])
            .await
            .map_err(|e| AvagencError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(row.get::<i64>(0).map(|n| n as u64).unwrap_or(0)),
            Ok(None) => Ok(0),
            Err(e) => Err(AvagencError::Storage(e.to_string())),
        }
    }
}

impl ContentStore for Storage {
    #[instrument(skip_all)]
    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let posts = self.list_posts().await?;
        info!(count = posts.len(), "loaded blog posts from local store");
        Ok(posts)
    }

    fn name(&self) -> &str {
        "local"
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn id_kind(id: &PostId) -> &'static str {
    match id {
        PostId::Int(_) => "int",
        PostId::Text(_) => "text",
    }
}

fn row_to_post(row: &libsql::Row) -> Result<Post> {
    let id: String = row
        .get(0)
        .map_err(|e| AvagencError::Storage(e.to_string()))?;
    let tags = match row.get::<String>(8).ok() {
        Some(json) => Some(
            serde_json::from_str::<Vec<String>>(&json)
                .map_err(|e| AvagencError::Storage(format!("invalid tags for post {id}: {e}")))?,
        ),
        None => None,
    };

    Ok(Post {
        id: match row.get::<String>(10).ok().as_deref() {
            Some("text") => PostId::Text(id),
            // Rows from before `id_kind` existed: infer from the text.
            _ => PostId::from(id),
        },
        title: row.get::<String>(1).ok(),
        excerpt: row.get::<String>(2).ok(),
        category: row.get::<String>(3).ok(),
        date: row.get::<String>(4).ok(),
        read_time: row.get::<String>(5).ok(),
        author: row.get::<String>(6).ok(),
        image: row.get::<String>(7).ok(),
        tags,
        featured: row.get::<i64>(9).ok().map(|v| v != 0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Create a temp file storage for testing.
    async fn test_storage() -> Storage {
        let tmp = std::env::temp_dir().join(format!("avagenc_test_{}.db", Uuid::now_v7()));
        Storage::open(&tmp).await.expect("open test db")
    }

    fn post(id: i64, date: &str, category: &str) -> Post {
        let mut p = Post::new(id);
        p.title = Some(format!("Post {id}"));
        p.date = Some(date.into());
        p.category = Some(category.into());
        p
    }

    #[tokio::test]
    async fn open_and_migrate() {
        let storage = test_storage().await;
        assert_eq!(storage.get_schema_version().await, 2);
    }

    #[tokio::test]
    async fn idempotent_migration() {
        let tmp = std::env::temp_dir().join(format!("avagenc_test_{}.db", Uuid::now_v7()));
        let _s1 = Storage::open(&tmp).await.expect("first open");
        drop(_s1);
        let s2 = Storage::open(&tmp).await.expect("second open");
        assert_eq!(s2.get_schema_version().await, 2);
    }

    #[tokio::test]
    async fn list_posts_newest_first() {
        let storage = test_storage().await;
        storage
            .import_posts(&[
                post(1, "2024-01-01", "Security"),
                post(3, "2024-03-01", "Automation"),
                post(2, "2024-02-01", "AI Technology"),
            ])
            .await
            .expect("import");

        let ids: Vec<PostId> = storage
            .fetch_posts()
            .await
            .expect("fetch")
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![PostId::Int(3), PostId::Int(2), PostId::Int(1)]);
        assert_eq!(storage.count_posts().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn optional_fields_roundtrip() {
        let storage = test_storage().await;

        let mut full = post(10, "2024-05-05", "Development");
        full.tags = Some(vec!["Rust".into(), "APIs".into()]);
        full.featured = Some(true);
        full.author = Some("Avagenc Team".into());
        full.read_time = Some("3 min read".into());

        let mut sparse = Post::new(PostId::Text("draft-note".into()));
        sparse.excerpt = Some("no title yet".into());

        storage.import_posts(&[full.clone(), sparse.clone()]).await.unwrap();

        assert_eq!(storage.get_post(&full.id).await.unwrap(), Some(full));
        assert_eq!(storage.get_post(&sparse.id).await.unwrap(), Some(sparse));
    }

    #[tokio::test]
    async fn text_ids_keep_their_kind() {
        let storage = test_storage().await;
        let padded = Post::new(PostId::Text("007".into()));
        let numeric_text = Post::new(PostId::Text("42".into()));
        let int = Post::new(7);
        storage
            .import_posts(&[padded.clone(), numeric_text.clone(), int.clone()])
            .await
            .unwrap();

        let got = storage.get_post(&padded.id).await.unwrap().unwrap();
        assert_eq!(got.id, PostId::Text("007".into()));
        assert_eq!(got.detail_path(), "/blog/007");

        let got = storage.get_post(&numeric_text.id).await.unwrap().unwrap();
        assert_eq!(serde_json::to_value(&got.id).unwrap(), serde_json::json!("42"));

        let got = storage.get_post(&int.id).await.unwrap().unwrap();
        assert_eq!(got.id, PostId::Int(7));
        assert_eq!(got.detail_path(), "/blog/7");
    }

    #[tokio::test]
    async fn undated_posts_list_first() {
        let storage = test_storage().await;
        let undated = Post::new(9);
        storage
            .import_posts(&[
                post(1, "2024-01-01", "Security"),
                undated,
                post(2, "2024-02-01", "Security"),
            ])
            .await
            .unwrap();

        let ids: Vec<PostId> = storage
            .list_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![PostId::Int(9), PostId::Int(2), PostId::Int(1)]);
    }

    #[tokio::test]
    async fn unreadable_row_fails_the_whole_list() {
        let storage = test_storage().await;
        storage
            .import_posts(&[
                post(1, "2024-03-01", "Security"),
                post(2, "2024-02-01", "Security"),
            ])
            .await
            .unwrap();
        storage
            .conn
            .execute(
                "INSERT INTO blog_posts (id, date, tags_json, imported_at, id_kind)
                 VALUES ('3', '2024-01-01', 'not json', 'now', 'int')",
                params![],
            )
            .await
            .unwrap();

        let err = storage.fetch_posts().await.unwrap_err();
        assert!(err.to_string().contains("invalid tags for post 3"));
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let storage = test_storage().await;
        storage.upsert_post(&post(1, "2024-01-01", "Security")).await.unwrap();

        let mut edited = post(1, "2024-01-01", "Security");
        edited.title = Some("Renamed".into());
        storage.upsert_post(&edited).await.unwrap();

        assert_eq!(storage.count_posts().await.unwrap(), 1);
        let got = storage.get_post(&PostId::Int(1)).await.unwrap().unwrap();
        assert_eq!(got.title.as_deref(), Some("Renamed"));

        storage.delete_post(&PostId::Int(1)).await.unwrap();
        assert_eq!(storage.count_posts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn readonly_rejects_writes() {
        let tmp = std::env::temp_dir().join(format!("avagenc_test_{}.db", Uuid::now_v7()));
        Storage::open(&tmp).await.expect("create");

        let ro = Storage::open_readonly(&tmp).await.expect("open readonly");
        let err = ro.upsert_post(&post(1, "2024-01-01", "Security")).await.unwrap_err();
        assert!(err.to_string().contains("read-only"));
        assert!(ro.fetch_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn readonly_requires_existing_file() {
        let tmp = std::env::temp_dir().join(format!("avagenc_missing_{}.db", Uuid::now_v7()));
        assert!(Storage::open_readonly(&tmp).await.is_err());
    }
}
