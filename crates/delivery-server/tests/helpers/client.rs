//! In-process HTTP client for the delivery router.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Drives the router with `oneshot`, one cloned router per request.
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    /// GET /v1/delivery con los tres parametros.
    pub async fn delivery(&self, app: &str, country: &str, os: &str) -> TestResponse {
        self.get(&format!("/v1/delivery?app={app}&country={country}&os={os}"))
            .await
    }

    /// DELETE /v1/cache/campaigns/{campaign_id}
    pub async fn invalidate(&self, campaign_id: &str) -> TestResponse {
        self.delete(&format!("/v1/cache/campaigns/{campaign_id}"))
            .await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, &[]).await
    }

    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        self.send(Method::GET, uri, &headers).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, &[]).await
    }

    pub async fn send(&self, method: Method, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        let request = headers
            .iter()
            .fold(Request::builder().method(method).uri(uri), |builder, (name, value)| {
                builder.header(*name, *value)
            })
            .body(Body::empty())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let body = body.collect().await.unwrap().to_bytes().to_vec();

        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

/// Status, headers and the fully read body of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("invalid JSON body ({e}): {}", self.text()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            self.text()
        );
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(self.header(name).is_some(), "missing header '{name}'");
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        assert_eq!(self.header(name), Some(expected), "header '{name}'");
        self
    }
}
