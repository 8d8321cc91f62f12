//! Native invocation shapes.
//!
//! These mirror the API Gateway proxy integration (`path`, `httpMethod`,
//! `queryStringParameters` in; `statusCode`, `headers`, `body` out) so the same values work
//! for the managed runtime and for the local HTTP adapter.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const CONTENT_TYPE_HEADER: &str = "content-type";
pub const JSON_MIME_TYPE: &str = "application/json";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Inbound invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    http_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    query_string_parameters: BTreeMap<String, String>,
}

impl NativeEvent {
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        http_method: impl Into<String>,
        query_string_parameters: BTreeMap<String, String>,
    ) -> Self {
        Self {
            path: path.into(),
            http_method: http_method.into(),
            query_string_parameters,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    #[must_use]
    pub fn query_string_parameters(&self) -> &BTreeMap<String, String> {
        &self.query_string_parameters
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }
}

/// Handler result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeResponse {
    status_code: u16,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: String,
}

impl NativeResponse {
    #[must_use]
    pub fn new(status_code: u16, headers: BTreeMap<String, String>, body: String) -> Self {
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// 200 response with a JSON body.
    #[must_use]
    pub fn json_ok(body: String) -> Self {
        let headers = BTreeMap::from([(CONTENT_TYPE_HEADER.to_string(), JSON_MIME_TYPE.to_string())]);
        Self::new(200, headers, body)
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Declared content type (header names are matched case-insensitively).
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(CONTENT_TYPE_HEADER))
            .map(|(_, v)| v.as_str())
    }
}
