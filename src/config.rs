//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `STYLEAGENT__*` 覆盖（双下划线表示嵌套，如 `STYLEAGENT__PAGINATION__PAGE_SIZE=10`）。

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::tracker::DEFAULT_PAGE_SIZE;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub pagination: PaginationSection,
    #[serde(default)]
    pub upload: UploadSection,
    #[serde(default)]
    pub chat: ChatSection,
}

/// [app] 段
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
}

fn default_app_name() -> String {
    "StyleAgent".to_string()
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

/// [api] 段：后端地址与 Mock 延迟
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 单次请求超时（秒），由请求执行器自行施加
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Mock 服务模拟的网络延迟（毫秒），0 表示立即返回
    #[serde(default)]
    pub mock_latency_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            mock_latency_ms: 0,
        }
    }
}

/// [pagination] 段
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSection {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// [upload] 段：图片大小上限与允许的 MIME 类型
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSection {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
    #[serde(default = "default_allowed_image_types")]
    pub allowed_image_types: Vec<String>,
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

fn default_allowed_image_types() -> Vec<String> {
    vec!["image/jpeg".into(), "image/png".into(), "image/webp".into()]
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            allowed_image_types: default_allowed_image_types(),
        }
    }
}

/// [chat] 段
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSection {
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

fn default_max_message_chars() -> usize {
    1000
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
        }
    }
}

/// 相对工作目录查找的默认配置文件（crate 根目录或其子目录下运行均可找到）
const DEFAULT_CONFIG_FILES: [&str; 2] = ["config/default.toml", "../config/default.toml"];

/// 按优先级叠加配置源：默认文件 → 显式指定的文件 → `STYLEAGENT__*` 环境变量。
/// 不存在的文件直接跳过，全部缺失时得到各段的默认值。
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let default_file = DEFAULT_CONFIG_FILES
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf);
    let explicit_file = config_path.filter(|p| p.exists());

    let mut builder = config::Config::builder();
    for file in default_file.into_iter().chain(explicit_file) {
        tracing::debug!(path = %file.display(), "loading config file");
        builder = builder.add_source(config::File::from(file));
    }
    builder
        .add_source(env_overrides())
        .build()?
        .try_deserialize()
}

/// 列表型键用逗号分隔，如 `STYLEAGENT__UPLOAD__ALLOWED_IMAGE_TYPES=image/png,image/webp`
fn env_overrides() -> config::Environment {
    config::Environment::with_prefix("STYLEAGENT")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("upload.allowed_image_types")
}

/// 重新从磁盘与环境变量加载配置
pub fn reload_config() -> Result<AppConfig, config::ConfigError> {
    load_config(None)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.name, "StyleAgent");
        assert_eq!(cfg.pagination.page_size, 20);
        assert_eq!(cfg.upload.max_file_size, 10 * 1024 * 1024);
        assert_eq!(cfg.upload.allowed_image_types.len(), 3);
        assert_eq!(cfg.chat.max_message_chars, 1000);
    }

    #[test]
    fn test_load_from_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[pagination]\npage_size = 5\n\n[upload]\nallowed_image_types = [\"image/png\"]\n\n[api]\nmock_latency_ms = 25"
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.pagination.page_size, 5);
        assert_eq!(cfg.upload.allowed_image_types, vec!["image/png".to_string()]);
        assert_eq!(cfg.api.mock_latency_ms, 25);
        // 未出现的段保持默认
        assert_eq!(cfg.chat.max_message_chars, 1000);
    }

    #[test]
    fn test_missing_explicit_file_is_skipped() {
        let cfg = load_config(Some(PathBuf::from("no/such/styleagent.toml"))).unwrap();
        assert_eq!(cfg.pagination.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.upload.allowed_image_types.len(), 3);
    }
}
