//! 单次请求追踪器
//!
//! execute(executor)：进入 Loading → 等待执行器 → 写回 Success / Failure。
//! 失败同时走两路：写入 state.error 供被动渲染，并把原始错误返回给调用方。

use std::future::Future;

use tokio::sync::watch;

use super::failure::{normalize_error, FailureMessage};
use super::generation::Generation;
use super::options::TrackerOptions;
use super::state::OperationState;

/// 追踪一个异步操作的 `{data, loading, error}`
pub struct OperationTracker<T> {
    state: watch::Sender<OperationState<T>>,
    generation: Generation,
    options: TrackerOptions<T>,
}

impl<T: Clone> OperationTracker<T> {
    pub fn new() -> Self {
        Self::with_options(TrackerOptions::default())
    }

    pub fn with_options(options: TrackerOptions<T>) -> Self {
        let (state, _) = watch::channel(OperationState::default());
        Self {
            state,
            generation: Generation::default(),
            options,
        }
    }

    /// 当前状态快照
    pub fn state(&self) -> OperationState<T> {
        self.state.borrow().clone()
    }

    /// 订阅状态变化（每次迁移都会通知）
    pub fn subscribe(&self) -> watch::Receiver<OperationState<T>> {
        self.state.subscribe()
    }

    /// 运行一次请求执行器。
    ///
    /// 只有最新一次调用的结果会写回状态并触发回调；被后续调用或 `reset` 取代的结果
    /// 仍原样返回给调用方，但不再改动状态。
    pub async fn execute<F, Fut, E>(&self, executor: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: FailureMessage,
    {
        let generation = self.begin();
        let outcome = executor().await;
        self.finish(generation, &outcome);
        outcome
    }

    /// 回到初始状态；进行中的调用随之作废
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            self.generation.advance();
            *s = OperationState::default();
        });
        tracing::debug!("operation tracker reset");
    }

    fn begin(&self) -> u64 {
        let reset_on_call = self.options.reset_on_call;
        let mut generation = 0;
        self.state.send_modify(|s| {
            generation = self.generation.advance();
            if reset_on_call {
                s.data = None;
            }
            s.loading = true;
            s.error = None;
        });
        tracing::debug!(generation, "operation started");
        generation
    }

    fn finish<E: FailureMessage>(&self, generation: u64, outcome: &Result<T, E>) {
        let settled = outcome.as_ref().map_err(|e| normalize_error(e));
        let applied = self.state.send_if_modified(|s| {
            if !self.generation.is_current(generation) {
                return false;
            }
            *s = OperationState {
                data: settled.as_ref().ok().map(|value| T::clone(value)),
                loading: false,
                error: settled.as_ref().err().cloned(),
            };
            true
        });
        if !applied {
            tracing::warn!(generation, "discarding stale operation result");
            return;
        }

        match settled {
            Ok(value) => {
                tracing::debug!(generation, "operation succeeded");
                self.options.notify_success(value);
            }
            Err(message) => {
                tracing::warn!(generation, error = %message, "operation failed");
                self.options.notify_error(&message);
            }
        }
    }
}

impl<T: Clone> Default for OperationTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}
