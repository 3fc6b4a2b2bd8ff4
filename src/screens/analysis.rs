//! 分析步骤：对已上传图片发起分析；刷新时保留上一份结果直到新结果返回，另可轮询分析进度

use std::sync::Arc;

use crate::api::{AnalysisProgress, ApiError, ImageAnalysis, ImageApi};
use crate::core::FlowError;
use crate::tracker::{OperationState, OperationTracker, TrackerOptions};

pub struct AnalysisScreen {
    images: Arc<dyn ImageApi>,
    analysis: OperationTracker<ImageAnalysis>,
    progress: OperationTracker<AnalysisProgress>,
}

impl AnalysisScreen {
    pub fn new(images: Arc<dyn ImageApi>) -> Self {
        Self {
            images,
            analysis: OperationTracker::with_options(TrackerOptions::new().reset_on_call(false)),
            progress: OperationTracker::with_options(TrackerOptions::new().reset_on_call(false)),
        }
    }

    pub async fn analyze(&self, image_id: &str) -> Result<ImageAnalysis, ApiError> {
        self.analysis
            .execute(|| self.images.analyze_image(image_id))
            .await
    }

    /// 重新拉取当前分析
    pub async fn refresh(&self) -> Result<ImageAnalysis, FlowError> {
        let analysis_id = self
            .analysis
            .state()
            .data
            .map(|a| a.analysis_id)
            .ok_or(FlowError::NoAnalysis)?;
        let refreshed = self
            .analysis
            .execute(|| self.images.get_analysis(&analysis_id))
            .await?;
        Ok(refreshed)
    }

    /// 查询当前分析的处理进度
    pub async fn poll_status(&self) -> Result<AnalysisProgress, FlowError> {
        let analysis_id = self.current().map(|a| a.analysis_id).ok_or(FlowError::NoAnalysis)?;
        let progress = self
            .progress
            .execute(|| self.images.analysis_status(&analysis_id))
            .await?;
        Ok(progress)
    }

    pub fn current(&self) -> Option<ImageAnalysis> {
        self.analysis.state().data
    }

    pub fn state(&self) -> OperationState<ImageAnalysis> {
        self.analysis.state()
    }

    pub fn progress_state(&self) -> OperationState<AnalysisProgress> {
        self.progress.state()
    }

    pub fn reset(&self) {
        self.analysis.reset();
        self.progress.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ImageUpload, MockImageService};

    async fn uploaded(images: &MockImageService) -> String {
        images
            .upload_image(ImageUpload {
                file_name: "me.webp".into(),
                content_type: "image/webp".into(),
                bytes: vec![7; 32],
                conversation_id: None,
            })
            .await
            .unwrap()
            .image_id
    }

    #[tokio::test]
    async fn test_analyze_and_refresh() {
        let images = Arc::new(MockImageService::default());
        let image_id = uploaded(&images).await;
        let screen = AnalysisScreen::new(images);

        let analysis = screen.analyze(&image_id).await.unwrap();
        let refreshed = screen.refresh().await.unwrap();
        assert_eq!(analysis, refreshed);
        assert_eq!(screen.current(), Some(analysis));
    }

    #[tokio::test]
    async fn test_unknown_image_surfaces_error() {
        let screen = AnalysisScreen::new(Arc::new(MockImageService::default()));
        let err = screen.analyze("ghost").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound("Image ghost".into()));
        assert_eq!(screen.state().error.as_deref(), Some("Image ghost not found"));
    }

    #[tokio::test]
    async fn test_refresh_without_analysis() {
        let screen = AnalysisScreen::new(Arc::new(MockImageService::default()));
        assert!(matches!(screen.refresh().await, Err(FlowError::NoAnalysis)));
        assert!(matches!(screen.poll_status().await, Err(FlowError::NoAnalysis)));
    }

    #[tokio::test]
    async fn test_poll_status_after_analysis() {
        let images = Arc::new(MockImageService::default());
        let image_id = uploaded(&images).await;
        let screen = AnalysisScreen::new(images);
        let analysis = screen.analyze(&image_id).await.unwrap();

        let progress = screen.poll_status().await.unwrap();
        assert_eq!(progress.analysis_id, analysis.analysis_id);
        assert_eq!(progress.progress, Some(100.0));
        assert_eq!(screen.progress_state().data, Some(progress));

        screen.reset();
        assert_eq!(screen.progress_state(), OperationState::default());
    }
}
