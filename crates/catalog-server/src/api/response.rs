//! Error response envelope
//!
//! Every JSON error body has the same shape:
//!
//! ```json
//! {
//!   "success": false,
//!   "error": {
//!     "code": "VALIDATION_ERROR",
//!     "message": "Validation failed",
//!     "details": [{ "field": "name", "message": "The brand name is required." }]
//!   }
//! }
//! ```
//!
//! `details` is omitted when there is nothing structured to attach. Success
//! bodies are the serialized models themselves, without a wrapper. Admission
//! rejections (`429`) and auth challenges (`401`) carry no body at all.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let error = ErrorDetail {
            code: code.into(),
            message: message.into(),
            details: None,
        };
        Self { success: false, error }
    }

    /// Attach structured detail, e.g. the violation list on a 400
    pub fn details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }
}
