//! 服务调用错误
//!
//! 与追踪器配合：能取出消息的变体原样展示，`Unknown` 与无 detail 的 HTTP 错误走兜底文案。

use thiserror::Error;

use crate::tracker::FailureMessage;

/// 请求执行器可能返回的错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Http { status: u16, detail: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unknown error")]
    Unknown,
}

impl ApiError {
    pub fn http(status: u16, detail: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            detail: Some(detail.into()),
        }
    }
}

impl FailureMessage for ApiError {
    fn failure_message(&self) -> Option<String> {
        match self {
            ApiError::Http { detail, .. } => detail.clone(),
            ApiError::Network(msg) => Some(msg.clone()),
            ApiError::NotFound(what) => Some(format!("{what} not found")),
            ApiError::Decode(msg) => Some(format!("Invalid response: {msg}")),
            ApiError::Unknown => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{normalize_error, GENERIC_ERROR_MESSAGE};

    #[test]
    fn test_normalized_messages() {
        assert_eq!(
            normalize_error(&ApiError::http(500, "Failed to generate recommendations")),
            "Failed to generate recommendations"
        );
        assert_eq!(
            normalize_error(&ApiError::NotFound("Analysis a-1".into())),
            "Analysis a-1 not found"
        );
        assert_eq!(normalize_error(&ApiError::Unknown), GENERIC_ERROR_MESSAGE);
        assert_eq!(
            normalize_error(&ApiError::Http {
                status: 502,
                detail: None
            }),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_decode_from_serde() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::Decode(_)));
    }
}
