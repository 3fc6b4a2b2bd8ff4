//! StyleAgent - 时尚推荐客户端
//!
//! 模块划分：
//! - **tracker**: 异步操作状态追踪（单次请求 / 分页 / 表单提交）
//! - **api**: 聊天、图片、推荐服务抽象与 Mock 实现（依赖注入，无全局单例）
//! - **screens**: 各步骤的界面上下文，持有追踪器与服务
//! - **core**: 流程编排（聊天 → 上传 → 分析 → 推荐）、状态投影与错误
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **observability**: 日志初始化

pub mod api;
pub mod config;
pub mod core;
pub mod observability;
pub mod screens;
pub mod tracker;

pub use crate::core::{create_flow, FlowCommand, FlowSnapshot, FlowStep, StyleFlow};
pub use crate::tracker::{FormTracker, OperationTracker, PaginatedTracker};
