//! Request builders and response readers for `tower::ServiceExt::oneshot` tests.

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, Response, header};
use serde_json::Value;

use crate::auth::MockAuth;

/// Build a request with an optional JSON body and optional auth.
pub fn request(
    method: Method,
    uri: &str,
    body: Option<Value>,
    auth: Option<&MockAuth>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth.header_value());
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid test request")
}

pub fn get(uri: &str, auth: Option<&MockAuth>) -> Request<Body> {
    request(Method::GET, uri, None, auth)
}

pub fn post(uri: &str, body: Value, auth: Option<&MockAuth>) -> Request<Body> {
    request(Method::POST, uri, Some(body), auth)
}

pub fn delete(uri: &str, auth: Option<&MockAuth>) -> Request<Body> {
    request(Method::DELETE, uri, None, auth)
}

/// Read the whole body as text.
pub async fn read_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 response body")
}

/// Read the whole body as JSON; `Value::Null` for an empty body.
pub async fn read_json(response: Response<Body>) -> Value {
    let text = read_text(response).await;
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).expect("JSON response body")
}
