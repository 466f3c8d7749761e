//! Remote data source: the links and categories documents.
//!
//! ### Fetch contract
//! - Both documents are requested together and awaited together.
//! - Any transport failure, timeout, non-2xx status or non-object JSON body
//!   fails the whole attempt; a partial pair is never returned.
//! - No retries.

use std::time::{Duration, Instant};

use reqwest::{Client, Url, header};
use serde::de::DeserializeOwned;

use terravue_core::{AppConfig, CategoriesDocument, Error, LinksDocument};

/// Configuration for the source client.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Links document URL
    pub links_url: String,
    /// Categories document URL
    pub categories_url: String,
    /// User agent string (default: "terravue/0.1")
    pub user_agent: String,
    /// Request timeout (default: 20s)
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SourceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            links_url: config.links_url.clone(),
            categories_url: config.categories_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
        }
    }
}

/// Both source documents from one fetch attempt.
#[derive(Debug, Clone, Default)]
pub struct SourceDocuments {
    pub links: LinksDocument,
    pub categories: CategoriesDocument,
}

/// Anything that can produce the two source documents.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<SourceDocuments, Error>;
}

/// HTTP client for the two source documents.
pub struct SourceClient {
    http: Client,
    links_url: Url,
    categories_url: Url,
}

impl SourceClient {
    /// Create a new source client with the given configuration.
    pub fn new(config: SourceConfig) -> Result<Self, Error> {
        let links_url = parse_url(&config.links_url)?;
        let categories_url = parse_url(&config.categories_url)?;

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, links_url, categories_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url, label: &str) -> Result<T, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("{label} document: {e}"))
                } else {
                    Error::FetchFailed(format!("{label} document: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("failed to fetch {label}: status {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::FetchFailed(format!("failed to read {label} document: {e}")))?;

        tracing::debug!(
            "fetched {} document from {} in {}ms ({} bytes)",
            label,
            url,
            start.elapsed().as_millis(),
            bytes.len()
        );

        serde_json::from_slice(&bytes).map_err(|e| Error::ParseFailed(format!("{label} document: {e}")))
    }
}

#[async_trait::async_trait]
impl DataSource for SourceClient {
    async fn fetch(&self) -> Result<SourceDocuments, Error> {
        let (links, categories) = tokio::try_join!(
            self.get_json::<LinksDocument>(&self.links_url, "links"),
            self.get_json::<CategoriesDocument>(&self.categories_url, "categories"),
        )?;

        Ok(SourceDocuments { links, categories })
    }
}

fn parse_url(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl(format!("unsupported scheme: {scheme}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubServer, unused_port};

    fn config_for(base: &str) -> SourceConfig {
        SourceConfig {
            links_url: format!("{base}/links.json"),
            categories_url: format!("{base}/categories.json"),
            timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_source_config_default() {
        let config = SourceConfig::default();
        assert!(config.links_url.ends_with("links.json"));
        assert_eq!(config.user_agent, "terravue/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20000));
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let config = SourceConfig { links_url: "file:///etc/passwd".into(), ..Default::default() };
        assert!(matches!(SourceClient::new(config), Err(Error::InvalidUrl(_))));

        let config = SourceConfig { categories_url: "not a url".into(), ..Default::default() };
        assert!(matches!(SourceClient::new(config), Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_both_documents() {
        let server = StubServer::start(vec![
            ("/links.json", 200, r#"{"a.com":{"categories":"streaming"},"b.org":"streaming"}"#),
            ("/categories.json", 200, r#"{"streaming":{"impact":"HIGH"}}"#),
        ])
        .await;

        let client = SourceClient::new(config_for(&server.base_url())).unwrap();
        let docs = client.fetch().await.unwrap();

        assert_eq!(docs.links.len(), 2);
        assert_eq!(docs.categories.lookup("streaming").impact.as_deref(), Some("HIGH"));
    }

    #[tokio::test]
    async fn test_non_success_status_fails_whole_fetch() {
        let server = StubServer::start(vec![
            ("/links.json", 200, r#"{"a.com":"streaming"}"#),
            ("/categories.json", 404, "not found"),
        ])
        .await;

        let client = SourceClient::new(config_for(&server.base_url())).unwrap();
        let result = client.fetch().await;
        assert!(matches!(result, Err(Error::HttpError(msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_non_object_body_is_parse_error() {
        let server = StubServer::start(vec![
            ("/links.json", 200, r#"["a.com"]"#),
            ("/categories.json", 200, "{}"),
        ])
        .await;

        let client = SourceClient::new(config_for(&server.base_url())).unwrap();
        assert!(matches!(client.fetch().await, Err(Error::ParseFailed(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_failure() {
        let port = unused_port().await;
        let client = SourceClient::new(config_for(&format!("http://127.0.0.1:{port}"))).unwrap();
        assert!(matches!(client.fetch().await, Err(Error::FetchFailed(_))));
    }
}
