use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::coordinator::{RefreshCoordinator, RefreshTransport};
use super::errors::ClientError;

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Refreshes by calling the service's refresh endpoint. The refresh token
/// rides in the cookie jar, never in application code.
pub struct HttpRefreshTransport {
    client: reqwest::Client,
    refresh_url: String,
}

impl HttpRefreshTransport {
    /// `refresh_url` is the absolute URL of the refresh endpoint. The client
    /// must keep cookies so the refresh cookie set at login is sent back.
    pub fn new(refresh_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Ok(Self {
            client,
            refresh_url: refresh_url.into(),
        })
    }

    pub fn with_client(client: reqwest::Client, refresh_url: impl Into<String>) -> Self {
        Self {
            client,
            refresh_url: refresh_url.into(),
        }
    }
}

#[async_trait]
impl RefreshTransport for HttpRefreshTransport {
    async fn refresh(&self) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.refresh_url)
            .send()
            .await
            .map_err(|e| ClientError::Refresh(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Refresh(format!(
                "Refresh endpoint returned {}",
                response.status()
            )));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Refresh(e.to_string()))?;
        Ok(body.access_token)
    }
}

/// HTTP client that attaches the access token as a bearer header and, on a
/// 401, funnels through the coordinator and retries the request once with
/// the new token.
pub struct AuthHttpClient<T: RefreshTransport> {
    client: reqwest::Client,
    access_token: RwLock<Option<String>>,
    coordinator: RefreshCoordinator<T>,
}

impl<T: RefreshTransport> AuthHttpClient<T> {
    pub fn new(client: reqwest::Client, transport: T) -> Self {
        Self {
            client,
            access_token: RwLock::new(None),
            coordinator: RefreshCoordinator::new(transport),
        }
    }

    /// Seed the token after login or registration
    pub async fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = Some(token.into());
    }

    pub async fn clear_access_token(&self) {
        *self.access_token.write().await = None;
    }

    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ClientError> {
        self.request(Method::GET, url, None).await
    }

    pub async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ClientError> {
        self.request(Method::POST, url, Some(body.clone())).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self.send_once(method.clone(), url, body.as_ref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        // One coordinated refresh, then one retry. A second 401 surfaces
        // as-is; retrying further would loop on a dead session.
        match self.coordinator.authorization_expired().await {
            Ok(token) => {
                self.set_access_token(token).await;
                self.send_once(method, url, body.as_ref()).await
            }
            Err(err) => {
                // The session is gone; stop presenting the stale token
                self.clear_access_token().await;
                Err(err)
            }
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = self.client.request(method, url);
        if let Some(token) = self.access_token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    struct StubTransport {
        calls: Arc<AtomicUsize>,
        outcome: Result<String, ClientError>,
    }

    #[async_trait]
    impl RefreshTransport for StubTransport {
        async fn refresh(&self) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    /// Minimal server that answers 401 to everything, counting hits
    async fn serve_unauthorized(hits: Arc<AtomicUsize>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                hits.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
            }
        });
        format!("http://{addr}/protected")
    }

    #[tokio::test]
    async fn test_401_triggers_one_refresh_and_one_retry() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve_unauthorized(Arc::clone(&hits)).await;

        let calls = Arc::new(AtomicUsize::new(0));
        let client = AuthHttpClient::new(
            reqwest::Client::new(),
            StubTransport {
                calls: Arc::clone(&calls),
                outcome: Ok("fresh".to_string()),
            },
        );
        client.set_access_token("stale").await;

        // The server keeps answering 401; the second one must surface
        // instead of looping on further refreshes
        let response = client.get(&url).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.access_token().await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_access_token() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve_unauthorized(Arc::clone(&hits)).await;

        let client = AuthHttpClient::new(
            reqwest::Client::new(),
            StubTransport {
                calls: Arc::new(AtomicUsize::new(0)),
                outcome: Err(ClientError::Refresh("session revoked".to_string())),
            },
        );
        client.set_access_token("stale").await;

        let result = client.get(&url).await;
        assert!(matches!(result, Err(ClientError::Refresh(_))));
        // No retry was attempted and the dead token is gone
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(client.access_token().await.is_none());
    }
}
