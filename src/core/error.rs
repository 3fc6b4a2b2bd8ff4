//! 流程错误
//!
//! 服务错误原样透传；其余为调用顺序不满足前置条件（属于调用方错误，不写入任何追踪器状态）。

use thiserror::Error;

use crate::api::ApiError;
use crate::core::state::FlowStep;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Chat has not been started")]
    ChatNotStarted,

    #[error("No uploaded image to analyze")]
    NoImage,

    #[error("No analysis to refresh")]
    NoAnalysis,

    #[error("Step {requested:?} is not available yet (current step: {current:?})")]
    StepNotReady { requested: FlowStep, current: FlowStep },
}
