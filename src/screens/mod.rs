//! 界面上下文：每个步骤持有自己的追踪器与注入的服务
//!
//! 不做渲染与路由；UI 层读取 state()/subscribe() 即可绘制。

pub mod analysis;
pub mod chat;
pub mod recommendations;
pub mod upload;

pub use analysis::AnalysisScreen;
pub use chat::{validate_message, ChatScreen};
pub use recommendations::{FeedSource, RecommendationsScreen};
pub use upload::{validate_upload, UploadScreen};
