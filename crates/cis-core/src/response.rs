//! Response envelope and transport response types.
//!
//! Every CIS endpoint wraps its payload in the same JSON envelope:
//! `{success, errors, messages, result, result_info?}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Uniform JSON envelope returned by every CIS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope<R> {
    /// Operation success flag.
    pub success: bool,
    /// Error messages reported by the service.
    #[serde(default)]
    pub errors: Vec<Vec<String>>,
    /// Informational messages reported by the service.
    #[serde(default)]
    pub messages: Vec<Vec<String>>,
    /// Operation payload.
    pub result: R,
    /// Pagination metadata, present on list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_info: Option<ResultInfo>,
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResultInfo {
    /// Current page.
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
    /// Number of items on this page.
    pub count: i64,
    /// Total number of items.
    pub total_count: i64,
}

impl ResultInfo {
    /// Returns true if more pages follow the current one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.per_page > 0 && self.page * self.per_page < self.total_count
    }
}

/// Raw transport response, kept alongside decoded results and errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RawResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers, lower-cased names.
    pub headers: BTreeMap<String, String>,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Look up a response header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A decoded result together with the raw transport response it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedResponse<T> {
    /// Decoded result.
    pub result: T,
    /// Raw transport response.
    pub response: RawResponse,
}

impl<T> DetailedResponse<T> {
    /// HTTP status code of the response.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.response.status_code
    }

    /// Discard the raw response and keep only the decoded result.
    #[must_use]
    pub fn into_result(self) -> T {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_decodes_list_with_result_info() {
        let body = json!({
            "success": true,
            "errors": [["Errors"]],
            "messages": [["Messages"]],
            "result": ["a", "b"],
            "result_info": {"page": 1, "per_page": 20, "count": 2, "total_count": 2000}
        });

        let envelope: ResponseEnvelope<Vec<String>> = serde_json::from_value(body).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.errors, vec![vec!["Errors".to_string()]]);
        assert_eq!(envelope.result.len(), 2);
        let info = envelope.result_info.unwrap();
        assert_eq!(info.total_count, 2000);
        assert!(info.has_more());
    }

    #[test]
    fn envelope_tolerates_missing_messages() {
        let body = json!({"success": true, "result": {"id": "abc"}});
        let envelope: ResponseEnvelope<serde_json::Value> = serde_json::from_value(body).unwrap();
        assert!(envelope.errors.is_empty());
        assert!(envelope.messages.is_empty());
        assert!(envelope.result_info.is_none());
    }

    #[test]
    fn last_page_has_no_more() {
        let info = ResultInfo {
            page: 2,
            per_page: 5,
            count: 5,
            total_count: 10,
        };
        assert!(!info.has_more());
    }

    #[test]
    fn raw_response_header_lookup_is_case_insensitive() {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let raw = RawResponse {
            status_code: 200,
            headers,
            body: String::new(),
        };
        assert_eq!(raw.header("Content-Type"), Some("application/json"));
        assert_eq!(raw.header("x-missing"), None);
    }
}
