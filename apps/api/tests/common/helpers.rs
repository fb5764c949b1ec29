//! Request builders and body parsing for router tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::fixtures::TEST_TOKEN;

/// Create a JSON POST request without credentials
pub fn json_post_request<T: Serialize>(uri: &str, body: &T) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Create a JSON POST request carrying the test bearer token
pub fn authorized_post_request<T: Serialize>(uri: &str, body: &T) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Create a GET request, optionally with the test bearer token
pub fn get_request(uri: &str, authorized: bool) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if authorized {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN));
    }
    builder.body(Body::empty()).unwrap()
}

/// Parse the response body as JSON
pub async fn parse_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read the response body as text
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
