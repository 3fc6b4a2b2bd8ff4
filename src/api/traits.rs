//! 服务抽象
//!
//! 每个业务域一个 trait；界面上下文持有 `Arc<dyn ...>`，调用方法即得到可交给追踪器的请求执行器。

use async_trait::async_trait;

use crate::api::error::ApiError;
use crate::api::types::{
    AnalysisProgress, ConversationHistory, FeedbackResponse, ImageAnalysis, ImageUpload,
    OutfitFeedback, OutfitRecommendation, RecommendationQuery, SendMessageRequest,
    SendMessageResponse, SimilarOutfits, StartChatRequest, StartChatResponse, UploadResponse,
};
use crate::tracker::PageResult;

/// 造型访谈聊天
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn start_chat(&self, request: StartChatRequest) -> Result<StartChatResponse, ApiError>;

    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageResponse, ApiError>;

    /// 会话详情与按顺序排列的全部消息
    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationHistory, ApiError>;
}

/// 图片上传与分析
#[async_trait]
pub trait ImageApi: Send + Sync {
    async fn upload_image(&self, upload: ImageUpload) -> Result<UploadResponse, ApiError>;

    /// 对已上传图片发起分析，返回分析结果
    async fn analyze_image(&self, image_id: &str) -> Result<ImageAnalysis, ApiError>;

    async fn get_analysis(&self, analysis_id: &str) -> Result<ImageAnalysis, ApiError>;

    async fn analysis_status(&self, analysis_id: &str) -> Result<AnalysisProgress, ApiError>;
}

/// 穿搭推荐
#[async_trait]
pub trait RecommendationApi: Send + Sync {
    async fn list_recommendations(
        &self,
        query: &RecommendationQuery,
        page: u32,
        size: u32,
    ) -> Result<PageResult<OutfitRecommendation>, ApiError>;

    /// 按趋势分排序的热门穿搭
    async fn trending(&self, page: u32, size: u32) -> Result<PageResult<OutfitRecommendation>, ApiError>;

    async fn submit_feedback(&self, feedback: OutfitFeedback) -> Result<FeedbackResponse, ApiError>;

    /// 同类别的相似穿搭，最多 `n` 套（n 限定在 1..=20）
    async fn similar_outfits(&self, outfit_id: &str, n: u32) -> Result<SimilarOutfits, ApiError>;
}
