//! 上传步骤：本地校验文件后再上传

use std::sync::Arc;

use crate::api::{ApiError, ImageApi, ImageUpload, UploadResponse};
use crate::config::UploadSection;
use crate::tracker::{FormOptions, FormState, FormTracker, SubmitOutcome};

/// 文件名、内容、类型、大小依次检查，返回第一条不通过的原因
pub fn validate_upload(upload: &ImageUpload, limits: &UploadSection) -> Option<String> {
    if upload.file_name.trim().is_empty() {
        return Some("Please choose an image to upload".to_string());
    }
    if upload.bytes.is_empty() {
        return Some("The selected file is empty".to_string());
    }
    if !limits
        .allowed_image_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&upload.content_type))
    {
        return Some(format!("Unsupported image type: {}", upload.content_type));
    }
    if upload.size() > limits.max_file_size {
        return Some(format!(
            "Image exceeds the {} MB limit",
            limits.max_file_size / (1024 * 1024)
        ));
    }
    None
}

pub struct UploadScreen {
    images: Arc<dyn ImageApi>,
    form: FormTracker<ImageUpload, UploadResponse>,
}

impl UploadScreen {
    pub fn new(images: Arc<dyn ImageApi>, limits: UploadSection) -> Self {
        let form = FormTracker::with_options(
            FormOptions::new()
                .validate(move |upload: &ImageUpload| validate_upload(upload, &limits))
                .on_success(|uploaded: &UploadResponse| {
                    tracing::info!(image_id = %uploaded.image_id, "upload finished");
                }),
        );
        Self { images, form }
    }

    pub async fn upload(&self, upload: ImageUpload) -> Result<SubmitOutcome<UploadResponse>, ApiError> {
        self.form
            .submit(upload, |upload| self.images.upload_image(upload))
            .await
    }

    /// 最近一次成功上传的结果
    pub fn uploaded(&self) -> Option<UploadResponse> {
        self.form.state().data
    }

    pub fn state(&self) -> FormState<UploadResponse> {
        self.form.state()
    }

    pub fn reset(&self) {
        self.form.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockImageService;

    fn image(content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            file_name: "look.png".into(),
            content_type: content_type.into(),
            bytes: vec![1; size],
            conversation_id: None,
        }
    }

    #[test]
    fn test_validate_upload_rules() {
        let limits = UploadSection {
            max_file_size: 8,
            allowed_image_types: vec!["image/png".into()],
        };
        assert!(validate_upload(&image("image/png", 4), &limits).is_none());
        assert!(validate_upload(&image("IMAGE/PNG", 4), &limits).is_none());
        assert_eq!(
            validate_upload(&image("image/gif", 4), &limits).as_deref(),
            Some("Unsupported image type: image/gif")
        );
        assert!(validate_upload(&image("image/png", 9), &limits).is_some());
        assert_eq!(
            validate_upload(&image("image/png", 0), &limits).as_deref(),
            Some("The selected file is empty")
        );
    }

    #[tokio::test]
    async fn test_rejected_upload_keeps_loading_false() {
        let screen = UploadScreen::new(Arc::new(MockImageService::default()), UploadSection::default());
        let outcome = screen.upload(image("application/pdf", 4)).await.unwrap();
        assert!(outcome.is_rejected());
        let state = screen.state();
        assert!(!state.loading);
        assert!(state.validation_error.is_some());
        assert!(screen.uploaded().is_none());
    }

    #[tokio::test]
    async fn test_successful_upload() {
        let screen = UploadScreen::new(Arc::new(MockImageService::default()), UploadSection::default());
        let outcome = screen.upload(image("image/png", 4)).await.unwrap();
        let uploaded = outcome.submitted().unwrap();
        assert_eq!(screen.uploaded(), Some(uploaded));
    }
}
