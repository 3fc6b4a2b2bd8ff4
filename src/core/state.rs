//! 流程状态：FlowStep 与 UI 投影 FlowSnapshot
//!
//! UI 只持有轻量的快照；各步骤追踪器的完整状态由 StyleFlow 维护并投影到 FlowSnapshot。

use serde::Serialize;

use crate::api::{
    AnalysisProgress, ChatMessage, ImageAnalysis, OutfitRecommendation, SendMessageResponse,
    SimilarOutfits, UploadResponse, UserContext,
};
use crate::tracker::{FormState, OperationState, PaginatedState};

/// 流程步骤，按声明顺序推进
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum FlowStep {
    Chat,
    Upload,
    Analysis,
    Recommendations,
}

/// UI 看到的「投影」状态
#[derive(Clone, Debug, Serialize)]
pub struct FlowSnapshot {
    pub step: FlowStep,
    /// 命令处理中
    pub busy: bool,
    pub transcript: Vec<ChatMessage>,
    pub user_context: UserContext,
    pub chat: FormState<SendMessageResponse>,
    pub upload: FormState<UploadResponse>,
    pub analysis: OperationState<ImageAnalysis>,
    pub analysis_progress: OperationState<AnalysisProgress>,
    pub recommendations: PaginatedState<OutfitRecommendation>,
    pub similar: OperationState<SimilarOutfits>,
    /// 最近一次命令的错误（追踪器状态之外的调用方错误也会出现在这里）
    pub last_error: Option<String>,
}

impl Default for FlowSnapshot {
    fn default() -> Self {
        Self {
            step: FlowStep::Chat,
            busy: false,
            transcript: Vec::new(),
            user_context: UserContext::default(),
            chat: FormState::default(),
            upload: FormState::default(),
            analysis: OperationState::default(),
            analysis_progress: OperationState::default(),
            recommendations: PaginatedState::default(),
            similar: OperationState::default(),
            last_error: None,
        }
    }
}
