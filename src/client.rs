//! REST backend client
//!
//! Sends registry records to the back-office API as JSON. Each resource is a
//! collection under the base URL:
//!
//! - `GET    {base}/{resource}` lists records
//! - `POST   {base}/{resource}` creates a record
//! - `PUT    {base}/{resource}/{id}` replaces a record
//! - `DELETE {base}/{resource}/{id}` removes a record
//!
//! Reference lists (storage locations) are cached after the first fetch.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lru::LruCache;
use reqwest::{Client, Response};
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::model::Resource;
use crate::traits::RegistryBackend;

/// Number of reference lists kept in the cache
const CACHE_ENTRIES: usize = 8;

/// Client for the back-office REST API
pub struct RestClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL without a trailing slash
    base_url: String,
    /// Cached reference lists by resource
    cache: Arc<Mutex<LruCache<Resource, Vec<Value>>>>,
}

impl RestClient {
    /// Creates a new client
    ///
    /// # Arguments
    /// - `base_url` - Base URL of the API (e.g., `http://localhost:3300`)
    /// - `timeout` - Per-request timeout
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .use_rustls_tls()
            .build()
            .context("Failed to build HTTP client")?;

        let capacity = NonZeroUsize::new(CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL of a collection, or of one record when `id` is given
    pub fn endpoint_url(&self, resource: Resource, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, resource.path(), id),
            None => format!("{}/{}", self.base_url, resource.path()),
        }
    }

    async fn invalidate(&self, resource: Resource) {
        if resource.is_reference() {
            self.cache.lock().await.pop(&resource);
        }
    }
}

/// Fails on a non-success status, keeping the body for the error message
async fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(%url, %status, "backend rejected request");
    if body.is_empty() {
        Err(anyhow::anyhow!("Request to {} failed: HTTP {}", url, status))
    } else {
        Err(anyhow::anyhow!(
            "Request to {} failed: HTTP {}: {}",
            url,
            status,
            body
        ))
    }
}

#[async_trait]
impl RegistryBackend for RestClient {
    async fn fetch(&self, resource: Resource) -> Result<Vec<Value>> {
        if resource.is_reference() {
            let mut cache = self.cache.lock().await;
            if let Some(records) = cache.get(&resource) {
                debug!(%resource, "serving reference list from cache");
                return Ok(records.clone());
            }
        }

        let url = self.endpoint_url(resource, None);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        let response = ensure_success(response, &url).await?;

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;

        let Value::Array(records) = body else {
            return Err(anyhow::anyhow!(
                "Unexpected response from {}: expected a JSON array",
                url
            ));
        };

        if resource.is_reference() {
            self.cache.lock().await.put(resource, records.clone());
        }

        Ok(records)
    }

    async fn create(&self, resource: Resource, body: Value) -> Result<Value> {
        let url = self.endpoint_url(resource, None);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        let response = ensure_success(response, &url).await?;
        self.invalidate(resource).await;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    async fn update(&self, resource: Resource, id: &str, body: Value) -> Result<Value> {
        let url = self.endpoint_url(resource, Some(id));
        debug!(%url, "PUT");
        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        let response = ensure_success(response, &url).await?;
        self.invalidate(resource).await;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<()> {
        let url = self.endpoint_url(resource, Some(id));
        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        ensure_success(response, &url).await?;
        self.invalidate(resource).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn client(base: &str) -> RestClient {
        RestClient::new(base, Duration::from_secs(1)).unwrap()
    }

    /// Reads one request, headers and body
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&request).to_string()
    }

    /// Serves the same response to every request and counts the requests
    async fn serve(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                read_request(&mut stream).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (base, hits)
    }

    #[test]
    fn test_endpoint_url_collection_and_record() {
        let c = client("http://localhost:3300");
        assert_eq!(
            c.endpoint_url(Resource::ConstructionSites, None),
            "http://localhost:3300/canteiros"
        );
        assert_eq!(
            c.endpoint_url(Resource::Vehicles, Some("42")),
            "http://localhost:3300/veiculos/42"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let c = client("http://localhost:3300/api/");
        assert_eq!(c.base_url(), "http://localhost:3300/api");
        assert_eq!(
            c.endpoint_url(Resource::StorageLocations, None),
            "http://localhost:3300/api/locais-armazenamento"
        );
    }

    #[tokio::test]
    async fn test_fetch_unreachable_server_fails() {
        let c = client("http://127.0.0.1:1");
        let err = c.fetch(Resource::Republics).await.unwrap_err();
        assert!(err.to_string().contains("Failed to connect"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (base, _) = serve("500 Internal Server Error", r#"{"error":"db down"}"#).await;
        let c = client(&base);

        let err = c.fetch(Resource::ConstructionSites).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("500"), "{}", message);
        assert!(message.contains("db down"), "{}", message);

        let err = c
            .create(Resource::Vehicles, serde_json::json!({ "frota": "F-1" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_array_body() {
        let (base, _) = serve("200 OK", "{}").await;
        let err = client(&base).fetch(Resource::Workers).await.unwrap_err();
        assert!(err.to_string().contains("Unexpected response"), "{}", err);
    }

    #[tokio::test]
    async fn test_reference_list_is_cached_until_a_write() {
        let (base, hits) = serve("200 OK", r#"[{"id":"1","nome":"Galpao 1"}]"#).await;
        let c = client(&base);

        let first = c.fetch(Resource::StorageLocations).await.unwrap();
        let second = c.fetch(Resource::StorageLocations).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0]["nome"], "Galpao 1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        c.create(Resource::StorageLocations, serde_json::json!({ "nome": "Galpao 3" }))
            .await
            .unwrap();
        c.fetch(Resource::StorageLocations).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_records_are_not_cached() {
        let (base, hits) = serve("200 OK", "[]").await;
        let c = client(&base);

        c.fetch(Resource::Vehicles).await.unwrap();
        c.fetch(Resource::Vehicles).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
