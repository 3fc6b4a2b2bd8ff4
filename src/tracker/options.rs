//! 追踪器配置：成功 / 失败回调、调用前是否清空数据、表单校验器

use std::fmt;

pub type SuccessCallback<T> = Box<dyn Fn(&T) + Send + Sync>;
pub type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;
/// 返回 Some(消息) 表示校验不通过
pub type Validator<I> = Box<dyn Fn(&I) -> Option<String> + Send + Sync>;

/// 单次请求 / 分页追踪器的可选配置
pub struct TrackerOptions<T> {
    pub(crate) on_success: Option<SuccessCallback<T>>,
    pub(crate) on_error: Option<ErrorCallback>,
    /// 分页追踪器忽略此项：追加模式需要保留已加载数据
    pub(crate) reset_on_call: bool,
}

impl<T> Default for TrackerOptions<T> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_error: None,
            reset_on_call: true,
        }
    }
}

impl<T> TrackerOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// false 时加载期间保留上一次的 data
    pub fn reset_on_call(mut self, reset: bool) -> Self {
        self.reset_on_call = reset;
        self
    }

    pub(crate) fn notify_success(&self, value: &T) {
        if let Some(cb) = &self.on_success {
            cb(value);
        }
    }

    pub(crate) fn notify_error(&self, message: &str) {
        if let Some(cb) = &self.on_error {
            cb(message);
        }
    }
}

impl<T> fmt::Debug for TrackerOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerOptions")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("reset_on_call", &self.reset_on_call)
            .finish()
    }
}

/// 表单追踪器配置：I 为表单输入，R 为提交结果
pub struct FormOptions<I, R> {
    pub(crate) callbacks: TrackerOptions<R>,
    pub(crate) validate: Option<Validator<I>>,
}

impl<I, R> Default for FormOptions<I, R> {
    fn default() -> Self {
        Self {
            callbacks: TrackerOptions::default(),
            validate: None,
        }
    }
}

impl<I, R> FormOptions<I, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(mut self, validator: impl Fn(&I) -> Option<String> + Send + Sync + 'static) -> Self {
        self.validate = Some(Box::new(validator));
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&R) + Send + Sync + 'static) -> Self {
        self.callbacks = self.callbacks.on_success(callback);
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.callbacks = self.callbacks.on_error(callback);
        self
    }

    pub fn reset_on_call(mut self, reset: bool) -> Self {
        self.callbacks = self.callbacks.reset_on_call(reset);
        self
    }

    pub(crate) fn check(&self, input: &I) -> Option<String> {
        self.validate.as_ref().and_then(|v| v(input))
    }
}

impl<I, R> fmt::Debug for FormOptions<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("callbacks", &self.callbacks)
            .field("validate", &self.validate.is_some())
            .finish()
    }
}
