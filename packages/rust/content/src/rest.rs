//! PostgREST-backed content store (the Supabase REST API).
//!
//! Issues `GET <base>/rest/v1/<table>?select=*&order=date.desc`.

use std::time::Duration;

use avagenc_shared::{AvagencError, Post, Result, StoreConfig};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use crate::{ContentStore, USER_AGENT};

/// Connection settings for [`RestContentStore`].
#[derive(Debug, Clone)]
pub struct RestStoreOptions {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub base_url: Url,
    /// Collection to read.
    pub table: String,
    /// Sent as both `apikey` and bearer token when present.
    pub api_key: Option<String>,
    /// `None` means no client-side timeout.
    pub timeout: Option<Duration>,
}

impl RestStoreOptions {
    /// Build options from a resolved store config.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let base_url = config
            .rest_url
            .clone()
            .ok_or_else(|| AvagencError::config("content.rest_url is not set"))?;
        Ok(Self {
            base_url,
            table: config.table.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }
}

/// Reads posts from a PostgREST endpoint.
pub struct RestContentStore {
    client: Client,
    posts_url: Url,
    api_key: Option<String>,
}

impl RestContentStore {
    pub fn new(opts: &RestStoreOptions) -> Result<Self> {
        Ok(Self {
            client: build_client(opts.timeout)?,
            posts_url: posts_url(&opts.base_url, &opts.table)?,
            api_key: opts.api_key.clone(),
        })
    }

    /// The fully-qualified query URL this store reads from.
    pub fn posts_url(&self) -> &Url {
        &self.posts_url
    }
}

impl ContentStore for RestContentStore {
    #[instrument(skip_all, fields(url = %self.posts_url))]
    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let url = self.posts_url.as_str();
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AvagencError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AvagencError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AvagencError::Network(format!("{url}: failed to read body: {e}")))?;

        debug!(bytes = body.len(), "content store responded");

        let posts: Vec<Post> = serde_json::from_str(&body)
            .map_err(|e| AvagencError::parse(format!("{url}: invalid post rows: {e}")))?;

        info!(count = posts.len(), "fetched blog posts");
        Ok(posts)
    }

    fn name(&self) -> &str {
        "rest"
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build `<base>/rest/v1/<table>?select=*&order=date.desc`.
fn posts_url(base: &Url, table: &str) -> Result<Url> {
    if table.is_empty() {
        return Err(AvagencError::config("content.table must not be empty"));
    }

    let raw = format!(
        "{}/rest/v1/{table}",
        base.as_str().trim_end_matches('/')
    );
    let mut url = Url::parse(&raw)
        .map_err(|e| AvagencError::config(format!("invalid content store URL '{raw}': {e}")))?;
    url.query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("order", "date.desc");
    Ok(url)
}

fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AvagencError::Network(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use avagenc_shared::PostId;

    fn opts(base: &str, key: Option<&str>) -> RestStoreOptions {
        RestStoreOptions {
            base_url: Url::parse(base).unwrap(),
            table: "blogPosts".into(),
            api_key: key.map(String::from),
            timeout: None,
        }
    }

    #[test]
    fn posts_url_shape() {
        let store = RestContentStore::new(&opts("https://demo.supabase.co/", None)).unwrap();
        assert_eq!(
            store.posts_url().as_str(),
            "https://demo.supabase.co/rest/v1/blogPosts?select=*&order=date.desc"
        );
    }

    #[test]
    fn empty_table_rejected() {
        let mut o = opts("https://demo.supabase.co", None);
        o.table.clear();
        assert!(RestContentStore::new(&o).is_err());
    }

    #[tokio::test]
    async fn fetches_posts_in_store_order() {
        let server = wiremock::MockServer::start().await;

        let rows = std::fs::read_to_string("../../../fixtures/json/posts.fixture.json")
            .expect("read posts fixture");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/rest/v1/blogPosts"))
            .and(wiremock::matchers::query_param("select", "*"))
            .and(wiremock::matchers::query_param("order", "date.desc"))
            .and(wiremock::matchers::header("apikey", "anon-key"))
            .and(wiremock::matchers::header("authorization", "Bearer anon-key"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw(rows, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = RestContentStore::new(&opts(&server.uri(), Some("anon-key"))).unwrap();
        let posts = store.fetch_posts().await.unwrap();

        assert_eq!(posts.len(), 5);
        assert_eq!(posts[0].id, PostId::Int(5));
        assert_eq!(posts[4].id, PostId::Int(1));
    }

    #[tokio::test]
    async fn empty_rows_yield_empty_vec() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/rest/v1/blogPosts"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let store = RestContentStore::new(&opts(&server.uri(), None)).unwrap();
        assert!(store.fetch_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_error_is_network_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = RestContentStore::new(&opts(&server.uri(), None)).unwrap();
        let err = store.fetch_posts().await.unwrap_err();
        assert!(matches!(err, AvagencError::Network(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string(r#"{"message":"oops"}"#),
            )
            .mount(&server)
            .await;

        let store = RestContentStore::new(&opts(&server.uri(), None)).unwrap();
        let err = store.fetch_posts().await.unwrap_err();
        assert!(matches!(err, AvagencError::Parse { .. }));
    }
}
