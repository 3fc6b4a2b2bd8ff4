//! 服务层：聊天 / 图片 / 推荐的抽象与 Mock 实现
//!
//! 不使用全局单例：由调用方构造 [`Services`] 并注入各界面上下文，测试时可替换任意一项。

pub mod context;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

pub use error::ApiError;
pub use mock::{MockChatService, MockImageService, MockRecommendationService};
pub use traits::{ChatApi, ImageApi, RecommendationApi};
pub use types::*;

use crate::config::ApiSection;

/// 一组服务实例，按业务域划分
#[derive(Clone)]
pub struct Services {
    pub chat: Arc<dyn ChatApi>,
    pub images: Arc<dyn ImageApi>,
    pub recommendations: Arc<dyn RecommendationApi>,
}

impl Services {
    pub fn new(
        chat: Arc<dyn ChatApi>,
        images: Arc<dyn ImageApi>,
        recommendations: Arc<dyn RecommendationApi>,
    ) -> Self {
        Self {
            chat,
            images,
            recommendations,
        }
    }

    /// 全部使用 Mock 实现，延迟取自配置
    pub fn mock(api: &ApiSection) -> Self {
        let latency = Duration::from_millis(api.mock_latency_ms);
        tracing::info!(latency_ms = api.mock_latency_ms, "Using mock StyleAgent services");
        Self::new(
            Arc::new(MockChatService::new(latency)),
            Arc::new(MockImageService::new(latency)),
            Arc::new(MockRecommendationService::new(latency)),
        )
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
