//! Error envelope returned by the API, both as a non-2xx body and mid-stream.

use crate::pipeline::ErrorEnvelope;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `{"detail": {"loc": [...], "msg": "...", "type": "..."}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: ApiErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Location of the offending input; entries are field names or indices.
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.error_type, self.msg)
    }
}

impl std::error::Error for ApiErrorDetail {}

impl ErrorEnvelope for ApiErrorResponse {
    fn into_error(self) -> Error {
        Error::Api(self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_display() {
        let raw = r#"{"detail":{"msg":"bad request","type":"invalid_request","loc":["body",0]}}"#;
        let env: ApiErrorResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(env.detail.to_string(), "(invalid_request) bad request");
        assert_eq!(env.detail.loc.len(), 2);
        assert!(matches!(env.into_error(), Error::Api(d) if d.msg == "bad request"));
    }
}
