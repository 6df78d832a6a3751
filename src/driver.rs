//! API driver
//!
//! Sends one request and hands back the response with its body parsed as
//! JSON. Calls block; tests run one after another.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::common::config::ApiConfig;
use crate::common::{Error, Result};
use crate::testing::RequestSpec;

/// A request ready to send
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Build a request from a suite template whose body has been rendered
    pub fn from_spec(spec: &RequestSpec, body: Option<Value>) -> Self {
        Self {
            method: spec.method.to_uppercase(),
            path: spec.path.clone(),
            query: spec.query.clone(),
            headers: spec.headers.clone(),
            body,
        }
    }
}

/// A received response
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON body; plain text becomes a string, an empty body null
    pub body: Value,
}

/// Issues requests against the API under test
pub trait ApiDriver {
    fn send(&mut self, request: &ApiRequest) -> Result<ApiResponse>;
}

impl<F> ApiDriver for F
where
    F: FnMut(&ApiRequest) -> Result<ApiResponse>,
{
    fn send(&mut self, request: &ApiRequest) -> Result<ApiResponse> {
        self(request)
    }
}

/// Blocking HTTP driver
pub struct HttpDriver {
    client: reqwest::blocking::Client,
    base_url: String,
    headers: HashMap<String, String>,
}

impl HttpDriver {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Request(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            headers: config.headers.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl ApiDriver for HttpDriver {
    fn send(&mut self, request: &ApiRequest) -> Result<ApiResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| Error::Request(format!("Invalid HTTP method '{}'", request.method)))?;
        let url = self.url(&request.path);
        tracing::debug!(method = %method, url = %url, "sending request");

        let mut builder = self.client.request(method, &url);
        for (name, value) in self.headers.iter().chain(request.headers.iter()) {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| Error::Request(format!("{} {}: {}", request.method, url, e)))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let text = response
            .text()
            .map_err(|e| Error::Request(format!("Failed to read response body: {}", e)))?;
        tracing::debug!(status, bytes = text.len(), "received response");

        Ok(ApiResponse {
            status,
            headers,
            body: parse_body(&text),
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Parse a response body as JSON, keeping non-JSON text as a string
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(r#"{"id": 1}"#), json!({"id": 1}));
        assert_eq!(parse_body("[1, 2]"), json!([1, 2]));
        assert_eq!(parse_body("  \n"), Value::Null);
        assert_eq!(parse_body("Not Found"), json!("Not Found"));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://api/", "/users"), "http://api/users");
        assert_eq!(join_url("http://api", "users/1"), "http://api/users/1");
        assert_eq!(join_url("http://api/v1", ""), "http://api/v1");
    }

    #[test]
    fn test_request_from_spec() {
        let spec: RequestSpec =
            serde_yaml::from_str("method: post\npath: /users\nquery: {page: '2'}").unwrap();
        let request = ApiRequest::from_spec(&spec, Some(json!({"name": "Ann"})));
        assert_eq!(request.method, "POST");
        assert_eq!(request.query.get("page").map(String::as_str), Some("2"));
        assert_eq!(request.body, Some(json!({"name": "Ann"})));
    }

    #[test]
    fn test_closure_driver() {
        let mut calls = 0;
        let mut driver = |request: &ApiRequest| -> Result<ApiResponse> {
            calls += 1;
            Ok(ApiResponse {
                status: 200,
                body: json!({"path": request.path}),
                ..ApiResponse::default()
            })
        };
        let response = driver
            .send(&ApiRequest {
                path: "/ping".into(),
                ..ApiRequest::default()
            })
            .unwrap();
        assert_eq!(response.body, json!({"path": "/ping"}));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_http_driver_connection_refused() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            headers: HashMap::new(),
        };
        let mut driver = HttpDriver::new(&config).unwrap();
        let err = driver
            .send(&ApiRequest {
                method: "GET".into(),
                path: "/".into(),
                ..ApiRequest::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::Request(_)));
    }
}
