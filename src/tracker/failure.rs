//! 错误归一化：把请求执行器的失败转成可展示的一行文本

/// 失败值没有可用消息时的兜底文案
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// 能否从失败值中取出人类可读的消息
pub trait FailureMessage {
    fn failure_message(&self) -> Option<String>;
}

impl FailureMessage for String {
    fn failure_message(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl FailureMessage for &str {
    fn failure_message(&self) -> Option<String> {
        Some((*self).to_string())
    }
}

impl FailureMessage for anyhow::Error {
    fn failure_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// 原样取失败消息；缺失或全空白时回落到 [`GENERIC_ERROR_MESSAGE`]
pub fn normalize_error<E: FailureMessage + ?Sized>(err: &E) -> String {
    err.failure_message()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Opaque;

    impl FailureMessage for Opaque {
        fn failure_message(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_message_is_used() {
        assert_eq!(normalize_error(&"X".to_string()), "X");
        assert_eq!(normalize_error(&anyhow::anyhow!("disk full")), "disk full");
        // 不做裁剪
        assert_eq!(normalize_error(&"X "), "X ");
    }

    #[test]
    fn test_fallback_to_generic() {
        assert_eq!(normalize_error(&Opaque), GENERIC_ERROR_MESSAGE);
        assert_eq!(normalize_error(&"   "), GENERIC_ERROR_MESSAGE);
    }
}
