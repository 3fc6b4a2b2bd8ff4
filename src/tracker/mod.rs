//! 异步操作状态追踪：单次请求 / 分页列表 / 表单提交
//!
//! 三类追踪器彼此独立，共享同一生命周期：`Idle → Loading → Success | Failure → Idle`，
//! `reset` 可从任意状态回到 `Idle`。状态通过 watch 通道整体替换发布，UI 订阅即可重绘。

pub mod failure;
pub mod form;
mod generation;
pub mod operation;
pub mod options;
pub mod paginated;
pub mod state;

pub use failure::{normalize_error, FailureMessage, GENERIC_ERROR_MESSAGE};
pub use form::{FormTracker, SubmitOutcome};
pub use operation::OperationTracker;
pub use options::{FormOptions, TrackerOptions};
pub use paginated::{PageResult, PaginatedTracker, DEFAULT_PAGE_SIZE};
pub use state::{FormState, OperationState, PaginatedState, TrackerPhase};
