//! Mock 服务（无需后端即可跑通整条流程）
//!
//! 返回确定性的假数据；可选模拟网络延迟。真实的视觉识别 / 检索 / 趋势打分均不在客户端实现。

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::context::{extract_context, next_question, INTERVIEW_QUESTIONS};
use crate::api::error::ApiError;
use crate::api::traits::{ChatApi, ImageApi, RecommendationApi};
use crate::api::types::{
    AnalysisProgress, AnalysisStatus, BodyType, ChatMessage, ClothingItem, ConversationHistory,
    FeedbackResponse, ImageAnalysis, ImageUpload, MessageRole, OutfitCategory, OutfitFeedback,
    OutfitItem, OutfitRecommendation, RecommendationQuery, Season, SendMessageRequest,
    SendMessageResponse, SimilarOutfits, StartChatRequest, StartChatResponse, TrendElement,
    UploadResponse, UserContext,
};
use crate::tracker::PageResult;

async fn pause(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

// ---------- 聊天 ----------

#[derive(Debug)]
struct Conversation {
    messages: Vec<ChatMessage>,
    context: UserContext,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Conversation {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            messages: Vec::new(),
            context: UserContext::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn status(&self) -> &'static str {
        if self.context.is_complete() {
            "completed"
        } else {
            "active"
        }
    }

    fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }
}

/// Mock 聊天：按固定问题顺序访谈，并用关键词抽取用户偏好
#[derive(Debug, Default)]
pub struct MockChatService {
    conversations: RwLock<HashMap<String, Conversation>>,
    latency: Duration,
}

impl MockChatService {
    pub fn new(latency: Duration) -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
            latency,
        }
    }
}

#[async_trait]
impl ChatApi for MockChatService {
    async fn start_chat(&self, request: StartChatRequest) -> Result<StartChatResponse, ApiError> {
        pause(self.latency).await;
        let conversation_id = Uuid::new_v4().to_string();
        let mut conversation = Conversation::new();
        if let Some(initial) = request.initial_message.filter(|m| !m.trim().is_empty()) {
            conversation.context.merge(extract_context(&initial));
            conversation.messages.push(ChatMessage::user(initial));
        }
        self.conversations
            .write()
            .await
            .insert(conversation_id.clone(), conversation);

        tracing::info!(conversation_id = %conversation_id, "conversation started");
        Ok(StartChatResponse {
            conversation_id,
            session_id: Uuid::new_v4().to_string(),
            message: "Hi! I'm StyleAI, your personal stylist. Let's find the right outfit for you."
                .to_string(),
            questions: INTERVIEW_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        })
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageResponse, ApiError> {
        pause(self.latency).await;
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(&request.conversation_id)
            .ok_or_else(|| ApiError::NotFound(format!("Conversation {}", request.conversation_id)))?;

        conversation.context.merge(extract_context(&request.message));
        conversation.messages.push(ChatMessage::user(request.message));

        let is_complete = conversation.context.is_complete();
        let next = if is_complete {
            None
        } else {
            next_question(conversation.user_turns()).map(str::to_string)
        };
        let response = match (&next, is_complete) {
            (_, true) => {
                "Great, I have everything I need. Upload a photo so I can check fit and colors."
                    .to_string()
            }
            (Some(question), false) => format!("Got it! {question}"),
            (None, false) => {
                "Thanks! Tell me a bit more about the occasion, your style and your budget.".to_string()
            }
        };
        conversation.messages.push(ChatMessage::assistant(response.clone()));
        conversation.updated_at = Utc::now();

        Ok(SendMessageResponse {
            message_id: Uuid::new_v4().to_string(),
            response,
            conversation_status: conversation.status().to_string(),
            user_context: conversation.context.clone(),
            next_question: next,
            is_complete,
        })
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationHistory, ApiError> {
        pause(self.latency).await;
        let conversations = self.conversations.read().await;
        let conversation = conversations
            .get(conversation_id)
            .ok_or_else(|| ApiError::NotFound(format!("Conversation {conversation_id}")))?;
        Ok(ConversationHistory {
            conversation_id: conversation_id.to_string(),
            status: conversation.status().to_string(),
            messages: conversation.messages.clone(),
            user_context: conversation.context.clone(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        })
    }
}

// ---------- 图片 ----------

/// Mock 图片服务：上传登记后返回固定的分析结果
#[derive(Debug, Default)]
pub struct MockImageService {
    images: RwLock<HashMap<String, UploadResponse>>,
    analyses: RwLock<HashMap<String, ImageAnalysis>>,
    latency: Duration,
}

impl MockImageService {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }
}

fn mock_analysis(image_id: &str) -> ImageAnalysis {
    ImageAnalysis {
        analysis_id: Uuid::new_v4().to_string(),
        image_id: image_id.to_string(),
        status: AnalysisStatus::Completed,
        body_type: Some(BodyType::Rectangle),
        body_type_confidence: Some(0.82),
        clothing_items: vec![
            ClothingItem {
                category: "blazer".into(),
                confidence: 0.91,
                color: "navy".into(),
                style: Some("tailored".into()),
            },
            ClothingItem {
                category: "trousers".into(),
                confidence: 0.87,
                color: "beige".into(),
                style: Some("straight".into()),
            },
        ],
        dominant_colors: vec!["navy".into(), "beige".into(), "white".into()],
        style_attributes: vec!["classic".into(), "minimalist".into()],
        trend_elements: vec![TrendElement {
            element: "relaxed tailoring".into(),
            confidence: 0.76,
            category: "silhouette".into(),
        }],
        overall_trend_score: Some(0.72),
        style_description: Some("A clean, tailored look in a neutral palette.".into()),
        error_message: None,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl ImageApi for MockImageService {
    async fn upload_image(&self, upload: ImageUpload) -> Result<UploadResponse, ApiError> {
        pause(self.latency).await;
        let image_id = Uuid::new_v4().to_string();
        let response = UploadResponse {
            image_url: format!("https://cdn.styleagent.local/uploads/{}/{}", image_id, upload.file_name),
            image_id: image_id.clone(),
            uploaded_at: Utc::now(),
        };
        self.images.write().await.insert(image_id, response.clone());
        tracing::info!(image_id = %response.image_id, bytes = upload.size(), "image uploaded");
        Ok(response)
    }

    async fn analyze_image(&self, image_id: &str) -> Result<ImageAnalysis, ApiError> {
        pause(self.latency).await;
        if !self.images.read().await.contains_key(image_id) {
            return Err(ApiError::NotFound(format!("Image {image_id}")));
        }
        let analysis = mock_analysis(image_id);
        self.analyses
            .write()
            .await
            .insert(analysis.analysis_id.clone(), analysis.clone());
        Ok(analysis)
    }

    async fn get_analysis(&self, analysis_id: &str) -> Result<ImageAnalysis, ApiError> {
        pause(self.latency).await;
        self.analyses
            .read()
            .await
            .get(analysis_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Analysis {analysis_id}")))
    }

    async fn analysis_status(&self, analysis_id: &str) -> Result<AnalysisProgress, ApiError> {
        let analysis = self.get_analysis(analysis_id).await?;
        let progress = match analysis.status {
            AnalysisStatus::Completed => Some(100.0),
            AnalysisStatus::Failed => Some(0.0),
            AnalysisStatus::Pending | AnalysisStatus::Processing => None,
        };
        Ok(AnalysisProgress {
            analysis_id: analysis.analysis_id,
            status: analysis.status,
            progress,
            error_message: analysis.error_message,
        })
    }
}

// ---------- 推荐 ----------

const CATALOGUE_SIZE: usize = 48;

const CATEGORIES: [(OutfitCategory, &str); 6] = [
    (OutfitCategory::Casual, "casual"),
    (OutfitCategory::Business, "work"),
    (OutfitCategory::Formal, "formal"),
    (OutfitCategory::Party, "party"),
    (OutfitCategory::Date, "date"),
    (OutfitCategory::Vacation, "vacation"),
];

const SEASONS: [Season; 5] = [
    Season::Spring,
    Season::Summer,
    Season::Fall,
    Season::Winter,
    Season::AllSeason,
];

const STYLE_TAGS: [&str; 5] = ["minimalist", "streetwear", "classic", "bohemian", "edgy"];

const PALETTES: [[&str; 2]; 4] = [
    ["black", "white"],
    ["navy", "beige"],
    ["grey", "pink"],
    ["brown", "green"],
];

/// 相似穿搭的默认阈值与得分（同类别即视为相似）
const SIMILARITY_THRESHOLD: f32 = 0.7;
const SIMILARITY_SCORE: f32 = 0.85;
const MAX_SIMILAR: u32 = 20;

const BODY_TYPES: [BodyType; 5] = [
    BodyType::Pear,
    BodyType::Apple,
    BodyType::Hourglass,
    BodyType::Rectangle,
    BodyType::InvertedTriangle,
];

fn price_range(price: f64) -> &'static str {
    match price {
        p if p < 100.0 => "budget",
        p if p < 200.0 => "mid",
        _ => "premium",
    }
}

fn catalogue_entry(i: usize) -> OutfitRecommendation {
    let (category, occasion) = CATEGORIES[i % CATEGORIES.len()];
    let style = STYLE_TAGS[i % STYLE_TAGS.len()];
    let palette = PALETTES[i % PALETTES.len()];
    let top_price = 30.0 + ((i * 37) % 120) as f64;
    let bottom_price = 30.0 + ((i * 53) % 120) as f64;
    let total = top_price + bottom_price;

    OutfitRecommendation {
        outfit_id: format!("outfit-{:03}", i + 1),
        title: format!("{} {} look #{}", style, occasion, i + 1),
        description: format!("A {style} outfit for {occasion} in {} and {}.", palette[0], palette[1]),
        image_url: format!("https://cdn.styleagent.local/outfits/{:03}.jpg", i + 1),
        category,
        occasion: occasion.to_string(),
        season: SEASONS[i % SEASONS.len()],
        style_tags: vec![style.to_string()],
        items: vec![
            OutfitItem {
                category: "top".into(),
                brand: None,
                color: palette[0].into(),
                price: Some(top_price),
            },
            OutfitItem {
                category: "bottom".into(),
                brand: None,
                color: palette[1].into(),
                price: Some(bottom_price),
            },
        ],
        total_price: Some(total),
        price_range: price_range(total).to_string(),
        body_types: vec![BODY_TYPES[i % BODY_TYPES.len()], BODY_TYPES[(i + 3) % BODY_TYPES.len()]],
        primary_colors: palette.iter().map(|c| c.to_string()).collect(),
        trend_score: ((i * 29) % 100) as f32 / 100.0,
        style_match_score: 0.4,
        ai_caption: format!("Effortless {style} styling for any {occasion} plan."),
    }
}

fn matches_query(outfit: &OutfitRecommendation, query: &RecommendationQuery) -> bool {
    query.category.map_or(true, |c| outfit.category == c)
        && query
            .season
            .map_or(true, |s| outfit.season == s || outfit.season == Season::AllSeason)
        && query
            .max_price
            .map_or(true, |max| outfit.total_price.map_or(true, |p| p <= max))
        && query.body_type.map_or(true, |b| outfit.body_types.contains(&b))
}

fn score(outfit: &OutfitRecommendation, context: &UserContext) -> f32 {
    let mut score = 0.4;
    if context.occasion.as_deref() == Some(outfit.occasion.as_str()) {
        score += 0.3;
    }
    if let Some(style) = &context.style_preference {
        if outfit.style_tags.contains(style) {
            score += 0.3;
        }
    }
    score
}

/// Mock 推荐：固定目录 + 条件过滤 + 简单匹配打分
#[derive(Debug)]
pub struct MockRecommendationService {
    catalogue: Vec<OutfitRecommendation>,
    feedback: RwLock<Vec<OutfitFeedback>>,
    latency: Duration,
}

impl MockRecommendationService {
    pub fn new(latency: Duration) -> Self {
        Self {
            catalogue: (0..CATALOGUE_SIZE).map(catalogue_entry).collect(),
            feedback: RwLock::new(Vec::new()),
            latency,
        }
    }

    /// 已收到的反馈（测试与调试用）
    pub async fn feedback(&self) -> Vec<OutfitFeedback> {
        self.feedback.read().await.clone()
    }
}

impl Default for MockRecommendationService {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl RecommendationApi for MockRecommendationService {
    async fn list_recommendations(
        &self,
        query: &RecommendationQuery,
        page: u32,
        size: u32,
    ) -> Result<PageResult<OutfitRecommendation>, ApiError> {
        pause(self.latency).await;
        let mut ranked: Vec<OutfitRecommendation> = self
            .catalogue
            .iter()
            .filter(|o| matches_query(o, query))
            .map(|o| OutfitRecommendation {
                style_match_score: score(o, &query.user_context),
                ..o.clone()
            })
            .collect();
        ranked.sort_by(|a, b| b.style_match_score.total_cmp(&a.style_match_score));

        tracing::debug!(matched = ranked.len(), page, size, "recommendations ranked");
        Ok(PageResult::slice(&ranked, page, size))
    }

    async fn trending(&self, page: u32, size: u32) -> Result<PageResult<OutfitRecommendation>, ApiError> {
        pause(self.latency).await;
        let mut ranked = self.catalogue.clone();
        ranked.sort_by(|a, b| b.trend_score.total_cmp(&a.trend_score));
        Ok(PageResult::slice(&ranked, page, size))
    }

    async fn submit_feedback(&self, feedback: OutfitFeedback) -> Result<FeedbackResponse, ApiError> {
        pause(self.latency).await;
        if !self.catalogue.iter().any(|o| o.outfit_id == feedback.outfit_id) {
            return Err(ApiError::NotFound(format!("Outfit {}", feedback.outfit_id)));
        }
        tracing::info!(outfit_id = %feedback.outfit_id, liked = feedback.liked, "feedback recorded");
        self.feedback.write().await.push(feedback);
        Ok(FeedbackResponse {
            success: true,
            message: "Feedback received successfully".to_string(),
        })
    }

    async fn similar_outfits(&self, outfit_id: &str, n: u32) -> Result<SimilarOutfits, ApiError> {
        pause(self.latency).await;
        let limit = n.clamp(1, MAX_SIMILAR) as usize;
        // 未知穿搭返回空列表而不是 404
        let similar_outfits = match self.catalogue.iter().find(|o| o.outfit_id == outfit_id) {
            Some(reference) => self
                .catalogue
                .iter()
                .filter(|o| o.outfit_id != outfit_id && o.category == reference.category)
                .take(limit)
                .map(|o| OutfitRecommendation {
                    style_match_score: SIMILARITY_SCORE,
                    ai_caption: format!("Similar {} style to your selected outfit", o.occasion),
                    ..o.clone()
                })
                .collect(),
            None => Vec::new(),
        };
        tracing::debug!(outfit_id, found = similar_outfits.len(), "similar outfits");
        Ok(SimilarOutfits {
            reference_outfit_id: outfit_id.to_string(),
            similar_outfits,
            similarity_threshold: SIMILARITY_THRESHOLD,
        })
    }
}
