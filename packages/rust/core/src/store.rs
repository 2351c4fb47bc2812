//! Content store selection from configuration.

use avagenc_content::{ContentStore, RestContentStore, RestStoreOptions};
use avagenc_shared::{ContentBackend, Post, Result, StoreConfig};
use avagenc_storage::Storage;
use tracing::debug;

/// The store named by `content.backend`.
pub enum ConfiguredStore {
    Rest(RestContentStore),
    Local(Storage),
}

impl ConfiguredStore {
    /// Build the configured backend. The local database is opened read-only.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        debug!(backend = ?config.backend, "opening content store");
        match config.backend {
            ContentBackend::Rest => {
                let opts = RestStoreOptions::from_config(config)?;
                Ok(Self::Rest(RestContentStore::new(&opts)?))
            }
            ContentBackend::Local => Ok(Self::Local(Storage::open_readonly(&config.local_db).await?)),
        }
    }
}

impl ContentStore for ConfiguredStore {
    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        match self {
            Self::Rest(store) => store.fetch_posts().await,
            Self::Local(store) => store.fetch_posts().await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Rest(store) => store.name(),
            Self::Local(store) => store.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url::Url;

    fn config(backend: ContentBackend) -> StoreConfig {
        StoreConfig {
            backend,
            rest_url: None,
            table: "blogPosts".into(),
            api_key: None,
            local_db: std::env::temp_dir().join("avagenc-core-store-test-missing.db"),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn rest_backend_without_url_fails() {
        assert!(ConfiguredStore::open(&config(ContentBackend::Rest)).await.is_err());
    }

    #[tokio::test]
    async fn rest_backend_reads_remote_rows() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/rest/v1/blogPosts"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string(r#"[{"id": 1}, {"id": 2}]"#),
            )
            .mount(&server)
            .await;

        let mut cfg = config(ContentBackend::Rest);
        cfg.rest_url = Some(Url::parse(&server.uri()).unwrap());
        let store = ConfiguredStore::open(&cfg).await.unwrap();

        assert_eq!(store.name(), "rest");
        assert_eq!(store.fetch_posts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn local_backend_reads_imported_posts() {
        let path: PathBuf = std::env::temp_dir().join(format!(
            "avagenc-core-store-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        {
            let storage = Storage::open(&path).await.unwrap();
            storage.import_posts(&[Post::new(7)]).await.unwrap();
        }

        let mut cfg = config(ContentBackend::Local);
        cfg.local_db = path;
        let store = ConfiguredStore::open(&cfg).await.unwrap();

        assert_eq!(store.name(), "local");
        assert_eq!(store.fetch_posts().await.unwrap().len(), 1);
    }
}
