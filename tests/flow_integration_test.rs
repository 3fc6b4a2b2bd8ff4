//! 流程集成测试：命令循环驱动完整流程，以及注入失败服务时的错误投影

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use styleagent::api::{
        ApiError, FeedbackResponse, ImageUpload, MockChatService, MockImageService,
        OutfitFeedback, OutfitRecommendation, RecommendationApi, RecommendationQuery, Services,
        SimilarOutfits,
    };
    use styleagent::config::AppConfig;
    use styleagent::tracker::PageResult;
    use styleagent::{create_flow, FlowCommand, FlowSnapshot, FlowStep};
    use tokio::sync::watch;

    /// 推荐服务始终返回 500
    struct BrokenRecommendations;

    #[async_trait]
    impl RecommendationApi for BrokenRecommendations {
        async fn list_recommendations(
            &self,
            _query: &RecommendationQuery,
            _page: u32,
            _size: u32,
        ) -> Result<PageResult<OutfitRecommendation>, ApiError> {
            Err(ApiError::http(500, "Failed to generate recommendations"))
        }

        async fn trending(&self, _page: u32, _size: u32) -> Result<PageResult<OutfitRecommendation>, ApiError> {
            Err(ApiError::Http {
                status: 503,
                detail: None,
            })
        }

        async fn submit_feedback(&self, _feedback: OutfitFeedback) -> Result<FeedbackResponse, ApiError> {
            Err(ApiError::Unknown)
        }

        async fn similar_outfits(&self, _outfit_id: &str, _n: u32) -> Result<SimilarOutfits, ApiError> {
            Err(ApiError::Network("connection reset".into()))
        }
    }

    fn photo() -> ImageUpload {
        ImageUpload {
            file_name: "look.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
            conversation_id: None,
        }
    }

    fn interview() -> Vec<FlowCommand> {
        vec![
            FlowCommand::StartChat,
            FlowCommand::SendMessage("Going to a party".into()),
            FlowCommand::SendMessage("Edgy and bold".into()),
            FlowCommand::SendMessage("$200 tops".into()),
            FlowCommand::Upload(photo()),
            FlowCommand::Analyze,
        ]
    }

    /// 依次发送命令并在 Quit 后取最终快照
    async fn run(services: Services, commands: Vec<FlowCommand>) -> FlowSnapshot {
        let (cmd_tx, mut state_rx): (_, watch::Receiver<FlowSnapshot>) =
            create_flow(&AppConfig::default(), services);
        for cmd in commands {
            cmd_tx.send(cmd).unwrap();
        }
        cmd_tx.send(FlowCommand::Quit).unwrap();
        while state_rx.changed().await.is_ok() {}
        let snapshot = state_rx.borrow().clone();
        snapshot
    }

    #[tokio::test]
    async fn test_full_flow_with_mock_services() {
        let mut commands = interview();
        commands.push(FlowCommand::PollAnalysis);
        commands.push(FlowCommand::LoadTrending);
        commands.push(FlowCommand::LoadMore);
        commands.push(FlowCommand::ShowSimilar("outfit-004".into()));

        let snapshot = run(Services::mock(&AppConfig::default().api), commands).await;

        assert_eq!(snapshot.step, FlowStep::Recommendations);
        assert!(!snapshot.busy);
        assert_eq!(snapshot.last_error, None);
        assert_eq!(snapshot.user_context.occasion.as_deref(), Some("party"));
        assert_eq!(snapshot.user_context.style_preference.as_deref(), Some("edgy"));
        assert!(snapshot.upload.data.is_some());
        assert!(snapshot.analysis.data.is_some());
        // 两页趋势列表，每页默认 20 条
        assert_eq!(snapshot.recommendations.data.len(), 40);
        assert!(snapshot.recommendations.has_more);
        assert_eq!(
            snapshot.analysis_progress.data.as_ref().and_then(|p| p.progress),
            Some(100.0)
        );
        let similar = snapshot.similar.data.expect("similar outfits loaded");
        assert_eq!(similar.reference_outfit_id, "outfit-004");
        assert_eq!(similar.similar_outfits.len(), 5);
    }

    #[tokio::test]
    async fn test_validation_error_is_projected() {
        let snapshot = run(
            Services::mock(&AppConfig::default().api),
            vec![FlowCommand::StartChat, FlowCommand::SendMessage("  ".into())],
        )
        .await;
        assert_eq!(snapshot.step, FlowStep::Chat);
        assert_eq!(
            snapshot.chat.validation_error.as_deref(),
            Some("Message cannot be empty")
        );
        assert_eq!(snapshot.chat.error, None);
        assert_eq!(snapshot.last_error, None);
    }

    #[tokio::test]
    async fn test_injected_failure_reaches_state_and_caller() {
        let services = Services::new(
            Arc::new(MockChatService::default()),
            Arc::new(MockImageService::default()),
            Arc::new(BrokenRecommendations),
        );
        let mut commands = interview();
        commands.push(FlowCommand::ShowSimilar("outfit-001".into()));
        commands.push(FlowCommand::LoadRecommendations);

        let snapshot = run(services, commands).await;
        assert_eq!(snapshot.similar.error.as_deref(), Some("connection reset"));
        assert_eq!(
            snapshot.recommendations.error.as_deref(),
            Some("Failed to generate recommendations")
        );
        assert_eq!(
            snapshot.last_error.as_deref(),
            Some("Failed to generate recommendations")
        );
        assert!(snapshot.recommendations.data.is_empty());
        assert!(!snapshot.recommendations.loading);
    }

    #[tokio::test]
    async fn test_out_of_order_command_reports_error() {
        let snapshot = run(
            Services::mock(&AppConfig::default().api),
            vec![FlowCommand::Analyze],
        )
        .await;
        assert_eq!(snapshot.step, FlowStep::Chat);
        assert!(snapshot
            .last_error
            .as_deref()
            .is_some_and(|e| e.contains("not available yet")));
    }
}
