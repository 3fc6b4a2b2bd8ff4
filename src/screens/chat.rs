//! 聊天步骤：开始会话 + 逐条发送访谈回答 + 拉取服务端会话历史

use std::sync::Arc;

use crate::api::{
    ApiError, ChatApi, ChatMessage, ConversationHistory, SendMessageRequest, SendMessageResponse,
    StartChatRequest, StartChatResponse, UserContext,
};
use crate::core::FlowError;
use crate::tracker::{FormOptions, FormState, FormTracker, OperationState, OperationTracker, SubmitOutcome};

/// 空消息与超长消息不发送
pub fn validate_message(text: &str, max_chars: usize) -> Option<String> {
    if text.trim().is_empty() {
        Some("Message cannot be empty".to_string())
    } else if text.chars().count() > max_chars {
        Some(format!("Message must be at most {max_chars} characters"))
    } else {
        None
    }
}

pub struct ChatScreen {
    chat: Arc<dyn ChatApi>,
    session: OperationTracker<StartChatResponse>,
    composer: FormTracker<String, SendMessageResponse>,
    history: OperationTracker<ConversationHistory>,
    transcript: Vec<ChatMessage>,
    context: UserContext,
    complete: bool,
}

impl ChatScreen {
    pub fn new(chat: Arc<dyn ChatApi>, max_message_chars: usize) -> Self {
        let composer = FormTracker::with_options(
            FormOptions::new()
                .validate(move |text: &String| validate_message(text, max_message_chars)),
        );
        Self {
            chat,
            session: OperationTracker::new(),
            composer,
            history: OperationTracker::new(),
            transcript: Vec::new(),
            context: UserContext::default(),
            complete: false,
        }
    }

    /// 开始新会话；成功后清空旧记录并写入欢迎语与第一个问题
    pub async fn start(&mut self, initial_message: Option<String>) -> Result<StartChatResponse, ApiError> {
        let request = StartChatRequest {
            user_id: None,
            initial_message,
        };
        let started = self.session.execute(|| self.chat.start_chat(request)).await?;

        self.transcript.clear();
        self.transcript.push(ChatMessage::assistant(started.message.clone()));
        if let Some(first) = started.questions.first() {
            self.transcript.push(ChatMessage::assistant(first.clone()));
        }
        self.context = UserContext::default();
        self.complete = false;
        self.composer.reset();
        Ok(started)
    }

    /// 发送一条回答。校验不通过时返回 `Rejected`，不会调用后端。
    pub async fn send(&mut self, text: impl Into<String>) -> Result<SubmitOutcome<SendMessageResponse>, FlowError> {
        let conversation_id = self.conversation_id().ok_or(FlowError::ChatNotStarted)?;
        let text = text.into();
        let outcome = self
            .composer
            .submit(text.clone(), |message| {
                self.chat.send_message(SendMessageRequest {
                    conversation_id,
                    message,
                })
            })
            .await?;

        if let SubmitOutcome::Submitted(reply) = &outcome {
            self.transcript.push(ChatMessage::user(text));
            self.transcript.push(ChatMessage::assistant(reply.response.clone()));
            self.context = reply.user_context.clone();
            self.complete = reply.is_complete;
            tracing::debug!(complete = self.complete, "chat reply received");
        }
        Ok(outcome)
    }

    /// 服务端保存的完整会话（含发起时的初始消息）
    pub async fn load_history(&self) -> Result<ConversationHistory, FlowError> {
        let conversation_id = self.conversation_id().ok_or(FlowError::ChatNotStarted)?;
        let history = self
            .history
            .execute(|| self.chat.get_conversation(&conversation_id))
            .await?;
        Ok(history)
    }

    pub fn conversation_id(&self) -> Option<String> {
        self.session.state().data.map(|s| s.conversation_id)
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn user_context(&self) -> &UserContext {
        &self.context
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn session_state(&self) -> OperationState<StartChatResponse> {
        self.session.state()
    }

    pub fn composer_state(&self) -> FormState<SendMessageResponse> {
        self.composer.state()
    }

    pub fn history_state(&self) -> OperationState<ConversationHistory> {
        self.history.state()
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.composer.reset();
        self.history.reset();
        self.transcript.clear();
        self.context = UserContext::default();
        self.complete = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockChatService;

    fn screen() -> ChatScreen {
        ChatScreen::new(Arc::new(MockChatService::default()), 20)
    }

    #[test]
    fn test_validate_message() {
        assert_eq!(validate_message("  ", 10).as_deref(), Some("Message cannot be empty"));
        assert!(validate_message("hello", 10).is_none());
        assert!(validate_message("far too long message", 5).is_some());
    }

    #[tokio::test]
    async fn test_send_before_start_is_rejected() {
        let mut chat = screen();
        let err = chat.send("hello").await.unwrap_err();
        assert!(matches!(err, FlowError::ChatNotStarted));
    }

    #[tokio::test]
    async fn test_start_seeds_transcript() {
        let mut chat = screen();
        chat.start(None).await.unwrap();
        assert!(chat.conversation_id().is_some());
        assert_eq!(chat.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_message_sets_validation_error() {
        let mut chat = screen();
        chat.start(None).await.unwrap();
        let outcome = chat.send("   ").await.unwrap();
        assert!(outcome.is_rejected());
        assert_eq!(
            chat.composer_state().validation_error.as_deref(),
            Some("Message cannot be empty")
        );
        assert_eq!(chat.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_interview_reaches_completion() {
        let mut chat = screen();
        chat.start(None).await.unwrap();
        chat.send("office meeting").await.unwrap();
        chat.send("minimal please").await.unwrap();
        assert!(!chat.is_complete());
        chat.send("$100-200").await.unwrap();
        assert!(chat.is_complete());
        assert_eq!(chat.user_context().occasion.as_deref(), Some("work"));
        assert_eq!(chat.transcript().len(), 8);
    }

    #[tokio::test]
    async fn test_history_matches_server_side_messages() {
        let mut chat = screen();
        assert!(matches!(chat.load_history().await, Err(FlowError::ChatNotStarted)));

        chat.start(Some("dinner date".into())).await.unwrap();
        chat.send("bohemian").await.unwrap();
        let history = chat.load_history().await.unwrap();
        assert_eq!(history.messages.len(), 3);
        assert_eq!(history.user_context.occasion.as_deref(), Some("date"));
        assert_eq!(chat.history_state().data, Some(history));
    }
}
