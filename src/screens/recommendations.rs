//! 推荐步骤：推荐卡片分页列表（首屏替换、加载更多追加）、单卡反馈与相似穿搭

use std::sync::Arc;

use crate::api::{
    ApiError, FeedbackResponse, OutfitFeedback, OutfitRecommendation, RecommendationApi,
    RecommendationQuery, SimilarOutfits,
};
use crate::tracker::{
    OperationState, OperationTracker, PageResult, PaginatedState, PaginatedTracker,
};

/// 列表数据来源
#[derive(Clone, Debug, PartialEq)]
pub enum FeedSource {
    /// 按用户偏好与分析结果个性化
    Personalized(RecommendationQuery),
    /// 热门穿搭
    Trending,
}

/// 卡片展开时展示的相似穿搭数量
pub const SIMILAR_COUNT: u32 = 5;

pub struct RecommendationsScreen {
    recommendations: Arc<dyn RecommendationApi>,
    source: FeedSource,
    page_size: u32,
    list: PaginatedTracker<OutfitRecommendation>,
    feedback: OperationTracker<FeedbackResponse>,
    similar: OperationTracker<SimilarOutfits>,
}

impl RecommendationsScreen {
    pub fn new(recommendations: Arc<dyn RecommendationApi>, page_size: u32) -> Self {
        Self {
            recommendations,
            source: FeedSource::Trending,
            page_size: page_size.max(1),
            list: PaginatedTracker::new(),
            feedback: OperationTracker::new(),
            similar: OperationTracker::new(),
        }
    }

    /// 切换数据来源并加载第一页（替换已有列表）
    pub async fn load(&mut self, source: FeedSource) -> Result<PageResult<OutfitRecommendation>, ApiError> {
        self.source = source;
        let page_size = self.page_size;
        self.list
            .execute(|page, size| self.fetch(page, size), 1, page_size, false)
            .await
    }

    /// 追加下一页；没有更多或正在加载时返回 `Ok(None)`
    pub async fn load_more(&self) -> Result<Option<PageResult<OutfitRecommendation>>, ApiError> {
        self.list
            .load_more(|page, size| self.fetch(page, size), self.page_size)
            .await
    }

    pub async fn send_feedback(&self, feedback: OutfitFeedback) -> Result<FeedbackResponse, ApiError> {
        self.feedback
            .execute(|| self.recommendations.submit_feedback(feedback))
            .await
    }

    /// 某张卡片的相似穿搭；切换卡片时新结果替换旧结果
    pub async fn similar(&self, outfit_id: &str) -> Result<SimilarOutfits, ApiError> {
        self.similar
            .execute(|| self.recommendations.similar_outfits(outfit_id, SIMILAR_COUNT))
            .await
    }

    async fn fetch(&self, page: u32, size: u32) -> Result<PageResult<OutfitRecommendation>, ApiError> {
        match &self.source {
            FeedSource::Personalized(query) => {
                self.recommendations
                    .list_recommendations(query, page, size)
                    .await
            }
            FeedSource::Trending => self.recommendations.trending(page, size).await,
        }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    pub fn state(&self) -> PaginatedState<OutfitRecommendation> {
        self.list.state()
    }

    pub fn feedback_state(&self) -> OperationState<FeedbackResponse> {
        self.feedback.state()
    }

    pub fn similar_state(&self) -> OperationState<SimilarOutfits> {
        self.similar.state()
    }

    pub fn reset(&mut self) {
        self.source = FeedSource::Trending;
        self.list.reset();
        self.feedback.reset();
        self.similar.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::api::MockRecommendationService;

    /// 记录调用次数的包装，底层委托给 Mock
    struct Counting {
        inner: MockRecommendationService,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecommendationApi for Counting {
        async fn list_recommendations(
            &self,
            query: &RecommendationQuery,
            page: u32,
            size: u32,
        ) -> Result<PageResult<OutfitRecommendation>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.list_recommendations(query, page, size).await
        }

        async fn trending(&self, page: u32, size: u32) -> Result<PageResult<OutfitRecommendation>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.trending(page, size).await
        }

        async fn submit_feedback(&self, feedback: OutfitFeedback) -> Result<FeedbackResponse, ApiError> {
            self.inner.submit_feedback(feedback).await
        }

        async fn similar_outfits(&self, outfit_id: &str, n: u32) -> Result<SimilarOutfits, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.similar_outfits(outfit_id, n).await
        }
    }

    #[tokio::test]
    async fn test_load_all_pages() {
        let mut screen = RecommendationsScreen::new(Arc::new(MockRecommendationService::default()), 20);
        let first = screen.load(FeedSource::Trending).await.unwrap();
        assert_eq!(first.items.len(), 20);

        while screen.load_more().await.unwrap().is_some() {}
        let state = screen.state();
        assert_eq!(state.data.len() as u64, state.total);
        assert!(!state.has_more);
        // 趋势分降序
        assert!(state
            .data
            .windows(2)
            .all(|w| w[0].trend_score >= w[1].trend_score));
    }

    #[tokio::test]
    async fn test_double_load_more_single_request() {
        let api = Arc::new(Counting {
            inner: MockRecommendationService::default(),
            calls: AtomicUsize::new(0),
        });
        let mut screen = RecommendationsScreen::new(api.clone(), 10);
        screen.load(FeedSource::Personalized(RecommendationQuery::default())).await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);

        let (a, b) = futures_util::join!(screen.load_more(), screen.load_more());
        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_none());
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert_eq!(screen.state().data.len(), 20);
    }

    #[tokio::test]
    async fn test_feedback_error_is_tracked() {
        let screen = RecommendationsScreen::new(Arc::new(MockRecommendationService::default()), 10);
        let result = screen
            .send_feedback(OutfitFeedback {
                outfit_id: "missing".into(),
                liked: true,
                saved: false,
                purchased: false,
            })
            .await;
        assert!(result.is_err());
        assert_eq!(
            screen.feedback_state().error.as_deref(),
            Some("Outfit missing not found")
        );
    }

    #[tokio::test]
    async fn test_similar_outfits_tracked() {
        let mut screen = RecommendationsScreen::new(Arc::new(MockRecommendationService::default()), 10);
        let first = screen.load(FeedSource::Trending).await.unwrap();
        let card = &first.items[0];

        let similar = screen.similar(&card.outfit_id).await.unwrap();
        assert_eq!(similar.similar_outfits.len(), SIMILAR_COUNT as usize);
        assert!(similar
            .similar_outfits
            .iter()
            .all(|o| o.category == card.category));

        let state = screen.similar_state();
        assert!(!state.loading);
        assert_eq!(state.data, Some(similar));
        // 列表状态不受影响
        assert_eq!(screen.state().data.len(), 10);

        screen.reset();
        assert_eq!(screen.similar_state(), OperationState::default());
    }
}
