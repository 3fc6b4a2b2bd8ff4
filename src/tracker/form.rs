//! 表单提交追踪器
//!
//! submit 先同步校验：不通过则写 validation_error、结束 loading 并作废进行中的提交，不发起请求；
//! 通过后与 OperationTracker 语义一致（loading / error / 回调 / 失败返回给调用方）。

use std::future::Future;

use tokio::sync::watch;

use super::failure::{normalize_error, FailureMessage};
use super::generation::Generation;
use super::options::FormOptions;
use super::state::FormState;

/// 一次 submit 的结果
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome<R> {
    /// 校验通过且请求成功
    Submitted(R),
    /// 校验未通过，携带校验消息；执行器未被调用
    Rejected(String),
}

impl<R> SubmitOutcome<R> {
    pub fn submitted(self) -> Option<R> {
        match self {
            SubmitOutcome::Submitted(r) => Some(r),
            SubmitOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SubmitOutcome::Rejected(_))
    }
}

/// 追踪表单提交：I 为输入，R 为提交结果
pub struct FormTracker<I, R> {
    state: watch::Sender<FormState<R>>,
    generation: Generation,
    options: FormOptions<I, R>,
}

impl<I, R: Clone> FormTracker<I, R> {
    pub fn new() -> Self {
        Self::with_options(FormOptions::default())
    }

    pub fn with_options(options: FormOptions<I, R>) -> Self {
        let (state, _) = watch::channel(FormState::default());
        Self {
            state,
            generation: Generation::default(),
            options,
        }
    }

    pub fn state(&self) -> FormState<R> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState<R>> {
        self.state.subscribe()
    }

    /// 校验后提交
    pub async fn submit<F, Fut, E>(&self, form_data: I, executor: F) -> Result<SubmitOutcome<R>, E>
    where
        F: FnOnce(I) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: FailureMessage,
    {
        if let Some(message) = self.options.check(&form_data) {
            tracing::debug!(error = %message, "form rejected by validator");
            self.state.send_modify(|s| {
                self.generation.advance();
                s.loading = false;
                s.validation_error = Some(message.clone());
            });
            return Ok(SubmitOutcome::Rejected(message));
        }

        let reset_on_call = self.options.callbacks.reset_on_call;
        let mut generation = 0;
        self.state.send_modify(|s| {
            generation = self.generation.advance();
            s.validation_error = None;
            if reset_on_call {
                s.data = None;
            }
            s.loading = true;
            s.error = None;
        });
        tracing::debug!(generation, "form submission started");

        let outcome = executor(form_data).await;
        let settled = outcome.as_ref().map_err(|e| normalize_error(e));
        let applied = self.state.send_if_modified(|s| {
            if !self.generation.is_current(generation) {
                return false;
            }
            s.data = settled.as_ref().ok().map(|value| R::clone(value));
            s.loading = false;
            s.error = settled.as_ref().err().cloned();
            true
        });

        if !applied {
            tracing::warn!(generation, "discarding stale form result");
        } else {
            match settled {
                Ok(value) => {
                    tracing::debug!(generation, "form submitted");
                    self.options.callbacks.notify_success(value);
                }
                Err(message) => {
                    tracing::warn!(generation, error = %message, "form submission failed");
                    self.options.callbacks.notify_error(&message);
                }
            }
        }
        outcome.map(SubmitOutcome::Submitted)
    }

    /// 清空四个字段（含 validation_error）；进行中的提交随之作废
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            self.generation.advance();
            *s = FormState::default();
        });
        tracing::debug!("form tracker reset");
    }
}

impl<I, R: Clone> Default for FormTracker<I, R> {
    fn default() -> Self {
        Self::new()
    }
}
