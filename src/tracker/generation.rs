//! 单调递增的调用代数：只有最新一次调用的结果才会写回状态

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

impl Generation {
    /// 进入新一代，返回新代号；之前捕获的代号全部失效
    pub(crate) fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_invalidates_previous() {
        let gen = Generation::default();
        let first = gen.advance();
        assert!(gen.is_current(first));
        let second = gen.advance();
        assert!(!gen.is_current(first));
        assert!(gen.is_current(second));
    }
}
