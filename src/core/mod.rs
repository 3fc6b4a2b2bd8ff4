//! 核心编排层：流程错误、状态投影、步骤编排与命令循环

pub mod error;
pub mod orchestrator;
pub mod state;

pub use error::FlowError;
pub use orchestrator::{create_flow, FlowCommand, StyleFlow};
pub use state::{FlowSnapshot, FlowStep};
