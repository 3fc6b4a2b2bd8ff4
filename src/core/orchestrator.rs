//! 流程编排器：聊天 → 上传 → 分析 → 推荐
//!
//! StyleFlow 持有四个界面上下文并按顺序推进步骤；create_flow 在后台任务中消费 UI 命令，
//! 每条命令前后各发布一次 FlowSnapshot。

use tokio::sync::{mpsc, watch};

use crate::api::context::budget_ceiling;
use crate::api::{
    AnalysisProgress, FeedbackResponse, ImageAnalysis, ImageUpload, OutfitFeedback,
    OutfitRecommendation, RecommendationQuery, SendMessageResponse, Services, SimilarOutfits,
    StartChatResponse, UploadResponse,
};
use crate::config::AppConfig;
use crate::core::{FlowError, FlowSnapshot, FlowStep};
use crate::screens::{AnalysisScreen, ChatScreen, FeedSource, RecommendationsScreen, UploadScreen};
use crate::tracker::{normalize_error, PageResult, SubmitOutcome};

/// 从 UI 发往编排器的命令
#[derive(Debug, Clone)]
pub enum FlowCommand {
    /// 开始新会话（清空所有步骤）
    StartChat,
    SendMessage(String),
    Upload(ImageUpload),
    Analyze,
    PollAnalysis,
    /// 按对话偏好与分析结果加载推荐
    LoadRecommendations,
    LoadTrending,
    LoadMore,
    Feedback(OutfitFeedback),
    /// 展开某张卡片的相似穿搭
    ShowSimilar(String),
    Reset,
    Quit,
}

/// 四步流程
pub struct StyleFlow {
    step: FlowStep,
    chat: ChatScreen,
    upload: UploadScreen,
    analysis: AnalysisScreen,
    recommendations: RecommendationsScreen,
}

impl StyleFlow {
    pub fn new(cfg: &AppConfig, services: &Services) -> Self {
        Self {
            step: FlowStep::Chat,
            chat: ChatScreen::new(services.chat.clone(), cfg.chat.max_message_chars),
            upload: UploadScreen::new(services.images.clone(), cfg.upload.clone()),
            analysis: AnalysisScreen::new(services.images.clone()),
            recommendations: RecommendationsScreen::new(
                services.recommendations.clone(),
                cfg.pagination.page_size,
            ),
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    fn require(&self, requested: FlowStep) -> Result<(), FlowError> {
        if self.step < requested {
            return Err(FlowError::StepNotReady {
                requested,
                current: self.step,
            });
        }
        Ok(())
    }

    fn enter(&mut self, step: FlowStep) {
        if self.step != step {
            tracing::info!(from = ?self.step, to = ?step, "flow step changed");
            self.step = step;
        }
    }

    pub async fn start_chat(&mut self) -> Result<StartChatResponse, FlowError> {
        self.reset();
        Ok(self.chat.start(None).await?)
    }

    /// 访谈信息齐备后自动进入上传步骤
    pub async fn send_message(
        &mut self,
        text: impl Into<String>,
    ) -> Result<SubmitOutcome<SendMessageResponse>, FlowError> {
        let outcome = self.chat.send(text).await?;
        if self.chat.is_complete() && self.step == FlowStep::Chat {
            self.enter(FlowStep::Upload);
        }
        Ok(outcome)
    }

    /// 上传成功后回到分析步骤（重新上传会使旧分析作废）
    pub async fn upload(&mut self, mut upload: ImageUpload) -> Result<SubmitOutcome<UploadResponse>, FlowError> {
        self.require(FlowStep::Upload)?;
        upload.conversation_id = self.chat.conversation_id();
        let outcome = self.upload.upload(upload).await?;
        if let SubmitOutcome::Submitted(_) = &outcome {
            self.analysis.reset();
            self.enter(FlowStep::Analysis);
        }
        Ok(outcome)
    }

    pub async fn analyze(&mut self) -> Result<ImageAnalysis, FlowError> {
        self.require(FlowStep::Analysis)?;
        let image_id = self
            .upload
            .uploaded()
            .map(|u| u.image_id)
            .ok_or(FlowError::NoImage)?;
        let analysis = self.analysis.analyze(&image_id).await?;
        self.enter(FlowStep::Recommendations);
        Ok(analysis)
    }

    pub async fn poll_analysis(&self) -> Result<AnalysisProgress, FlowError> {
        self.require(FlowStep::Recommendations)?;
        self.analysis.poll_status().await
    }

    /// 由对话偏好、预算上限与分析出的体型组成推荐查询
    pub fn recommendation_query(&self) -> RecommendationQuery {
        let user_context = self.chat.user_context().clone();
        let analysis = self.analysis.current();
        RecommendationQuery {
            conversation_id: self.chat.conversation_id(),
            analysis_id: analysis.as_ref().map(|a| a.analysis_id.clone()),
            max_price: user_context.budget.as_deref().and_then(budget_ceiling),
            body_type: analysis.and_then(|a| a.body_type),
            user_context,
            category: None,
            season: None,
        }
    }

    pub async fn load_recommendations(&mut self) -> Result<PageResult<OutfitRecommendation>, FlowError> {
        self.require(FlowStep::Recommendations)?;
        let query = self.recommendation_query();
        Ok(self
            .recommendations
            .load(FeedSource::Personalized(query))
            .await?)
    }

    /// 热门穿搭不依赖前面的步骤
    pub async fn load_trending(&mut self) -> Result<PageResult<OutfitRecommendation>, FlowError> {
        Ok(self.recommendations.load(FeedSource::Trending).await?)
    }

    pub async fn load_more(&self) -> Result<Option<PageResult<OutfitRecommendation>>, FlowError> {
        Ok(self.recommendations.load_more().await?)
    }

    pub async fn send_feedback(&self, feedback: OutfitFeedback) -> Result<FeedbackResponse, FlowError> {
        Ok(self.recommendations.send_feedback(feedback).await?)
    }

    pub async fn similar_outfits(&self, outfit_id: &str) -> Result<SimilarOutfits, FlowError> {
        Ok(self.recommendations.similar(outfit_id).await?)
    }

    pub fn reset(&mut self) {
        self.chat.reset();
        self.upload.reset();
        self.analysis.reset();
        self.recommendations.reset();
        self.enter(FlowStep::Chat);
    }

    pub fn chat(&self) -> &ChatScreen {
        &self.chat
    }

    pub fn recommendations(&self) -> &RecommendationsScreen {
        &self.recommendations
    }

    /// 将各步骤状态投影为 UI 快照
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            step: self.step,
            busy: false,
            transcript: self.chat.transcript().to_vec(),
            user_context: self.chat.user_context().clone(),
            chat: self.chat.composer_state(),
            upload: self.upload.state(),
            analysis: self.analysis.state(),
            analysis_progress: self.analysis.progress_state(),
            recommendations: self.recommendations.state(),
            similar: self.recommendations.similar_state(),
            last_error: None,
        }
    }

    async fn handle(&mut self, cmd: FlowCommand) -> Result<(), FlowError> {
        match cmd {
            FlowCommand::StartChat => self.start_chat().await.map(drop),
            FlowCommand::SendMessage(text) => self.send_message(text).await.map(drop),
            FlowCommand::Upload(upload) => self.upload(upload).await.map(drop),
            FlowCommand::Analyze => self.analyze().await.map(drop),
            FlowCommand::PollAnalysis => self.poll_analysis().await.map(drop),
            FlowCommand::LoadRecommendations => self.load_recommendations().await.map(drop),
            FlowCommand::LoadTrending => self.load_trending().await.map(drop),
            FlowCommand::LoadMore => self.load_more().await.map(drop),
            FlowCommand::Feedback(feedback) => self.send_feedback(feedback).await.map(drop),
            FlowCommand::ShowSimilar(outfit_id) => self.similar_outfits(&outfit_id).await.map(drop),
            FlowCommand::Reset => {
                self.reset();
                Ok(())
            }
            FlowCommand::Quit => Ok(()),
        }
    }
}

fn describe(err: &FlowError) -> String {
    match err {
        FlowError::Api(api) => normalize_error(api),
        other => other.to_string(),
    }
}

/// 创建流程运行时：返回命令发送端与快照接收端；后台任务按序处理命令，直到 Quit 或发送端全部关闭。
pub fn create_flow(
    cfg: &AppConfig,
    services: Services,
) -> (mpsc::UnboundedSender<FlowCommand>, watch::Receiver<FlowSnapshot>) {
    let mut flow = StyleFlow::new(cfg, &services);
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<FlowCommand>();
    let (state_tx, state_rx) = watch::channel(FlowSnapshot::default());

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            if matches!(cmd, FlowCommand::Quit) {
                break;
            }
            tracing::debug!(command = ?cmd, "flow command");

            let mut busy = flow.snapshot();
            busy.busy = true;
            state_tx.send_replace(busy);

            let result = flow.handle(cmd).await;
            let mut snapshot = flow.snapshot();
            if let Err(e) = &result {
                tracing::warn!(error = %e, step = ?flow.step(), "flow command failed");
                snapshot.last_error = Some(describe(e));
            }
            state_tx.send_replace(snapshot);
        }
        tracing::info!("flow runtime stopped");
    });

    (cmd_tx, state_rx)
}
