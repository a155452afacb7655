//! Uniform result shape returned by every public operation.

use serde::{Deserialize, Serialize};

use crate::error::DocError;

/// Outcome of one operation, serialisable for any presentation layer.
///
/// `success == false` means `data` is absent and `message` is a diagnostic.
/// `count` is the number of spans processed, `0` when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult<T = ()> {
    pub success: bool,
    pub message: String,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> OperationResult<T> {
    /// A successful result without data.
    pub fn ok(count: usize, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            count,
            data: None,
        }
    }

    /// A failed result carrying `"Error: <details>"`.
    pub fn failure(error: &DocError) -> Self {
        Self {
            success: false,
            message: format!("Error: {error}"),
            count: 0,
            data: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_without_data() {
        let result: OperationResult = OperationResult::ok(2, "Successfully replaced 2 occurrence(s)");
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "message": "Successfully replaced 2 occurrence(s)",
                "count": 2
            })
        );
    }

    #[test]
    fn test_failure_shape() {
        let result: OperationResult<String> = OperationResult::failure(&DocError::NoActiveDocument);
        assert!(!result.success);
        assert_eq!(result.message, "Error: no active document");
        assert_eq!(result.count, 0);
        assert!(result.data.is_none());
    }

    #[test]
    fn test_with_data() {
        let result = OperationResult::ok(1, "Found 1 occurrence(s)").with_data(vec![1, 2]);
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
