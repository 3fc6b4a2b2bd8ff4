//! 客户端数据模型：聊天、图片分析、穿搭推荐
//!
//! 字段命名与后端 JSON 保持一致（snake_case），枚举取小写字符串。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------- 聊天 ----------

/// 消息角色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// 单条聊天消息
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StartChatRequest {
    pub user_id: Option<String>,
    pub initial_message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartChatResponse {
    pub conversation_id: String,
    pub session_id: String,
    /// 欢迎语
    pub message: String,
    /// 访谈问题列表
    pub questions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message_id: String,
    pub response: String,
    pub conversation_status: String,
    #[serde(default)]
    pub user_context: UserContext,
    pub next_question: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
}

/// 从对话中抽取的用户偏好
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub occasion: Option<String>,
    pub style_preference: Option<String>,
    pub color_preference: Option<String>,
    pub budget: Option<String>,
    pub body_type: Option<String>,
}

impl UserContext {
    /// 用 other 中已知的字段覆盖自身，未知字段保留原值
    pub fn merge(&mut self, other: UserContext) {
        fn take(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }
        take(&mut self.occasion, other.occasion);
        take(&mut self.style_preference, other.style_preference);
        take(&mut self.color_preference, other.color_preference);
        take(&mut self.budget, other.budget);
        take(&mut self.body_type, other.body_type);
    }

    /// 场合、风格、预算三项齐备即可进入下一步
    pub fn is_complete(&self) -> bool {
        [&self.occasion, &self.style_preference, &self.budget]
            .iter()
            .all(|field| field.is_some())
    }
}

/// 会话详情与完整历史
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub conversation_id: String,
    /// "active" / "completed"
    pub status: String,
    pub messages: Vec<ChatMessage>,
    pub user_context: UserContext,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------- 图片 ----------

/// 待上传的图片
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub conversation_id: Option<String>,
}

impl ImageUpload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// 只输出字节数，图片内容可达数 MB
impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.size())
            .field("conversation_id", &self.conversation_id)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub image_id: String,
    pub image_url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Pear,
    Apple,
    Hourglass,
    Rectangle,
    InvertedTriangle,
}

/// 图中识别出的单件衣物
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub category: String,
    pub confidence: f32,
    pub color: String,
    pub style: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendElement {
    pub element: String,
    pub confidence: f32,
    pub category: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub analysis_id: String,
    pub image_id: String,
    pub status: AnalysisStatus,
    pub body_type: Option<BodyType>,
    pub body_type_confidence: Option<f32>,
    #[serde(default)]
    pub clothing_items: Vec<ClothingItem>,
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    #[serde(default)]
    pub style_attributes: Vec<String>,
    #[serde(default)]
    pub trend_elements: Vec<TrendElement>,
    pub overall_trend_score: Option<f32>,
    pub style_description: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 分析进度（轮询用）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub analysis_id: String,
    pub status: AnalysisStatus,
    /// 0-100；处理中且无法估算时为 None
    pub progress: Option<f32>,
    pub error_message: Option<String>,
}

// ---------- 推荐 ----------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitCategory {
    Casual,
    Business,
    Formal,
    Party,
    Date,
    Workout,
    Vacation,
    Seasonal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    AllSeason,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutfitItem {
    pub category: String,
    pub brand: Option<String>,
    pub color: String,
    pub price: Option<f64>,
}

/// 推荐卡片
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutfitRecommendation {
    pub outfit_id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: OutfitCategory,
    pub occasion: String,
    pub season: Season,
    #[serde(default)]
    pub style_tags: Vec<String>,
    pub items: Vec<OutfitItem>,
    pub total_price: Option<f64>,
    pub price_range: String,
    pub body_types: Vec<BodyType>,
    pub primary_colors: Vec<String>,
    pub trend_score: f32,
    pub style_match_score: f32,
    pub ai_caption: String,
}

/// 推荐查询条件
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationQuery {
    pub conversation_id: Option<String>,
    pub analysis_id: Option<String>,
    #[serde(default)]
    pub user_context: UserContext,
    pub body_type: Option<BodyType>,
    pub category: Option<OutfitCategory>,
    pub season: Option<Season>,
    pub max_price: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutfitFeedback {
    pub outfit_id: String,
    pub liked: bool,
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub purchased: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
}

/// 与某套穿搭相似的推荐
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarOutfits {
    pub reference_outfit_id: String,
    pub similar_outfits: Vec<OutfitRecommendation>,
    pub similarity_threshold: f32,
}
