use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 一次脚本化会话的输入
///
/// 简历可以是待上传的文件，也可以直接给文本；职位描述同理
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub resume_file: Option<PathBuf>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_file: Option<PathBuf>,
    #[serde(default)]
    pub job_text: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    /// 面试回答，按题目顺序
    #[serde(default)]
    pub answers: Vec<String>,
}

impl Scenario {
    /// 相对路径以场景文件所在目录为基准
    fn resolve_paths(mut self, base_dir: &Path) -> Self {
        self.resume_file = self.resume_file.map(|p| resolve(base_dir, p));
        self.job_file = self.job_file.map(|p| resolve(base_dir, p));
        self
    }

    /// 读取职位描述：优先 `job_text`，否则读 `job_file`
    pub async fn load_job_text(&self) -> AppResult<String> {
        if let Some(text) = &self.job_text {
            return Ok(text.clone());
        }
        match &self.job_file {
            Some(path) => fs::read_to_string(path)
                .await
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e)),
            None => Ok(String::new()),
        }
    }
}

fn resolve(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

/// 从 TOML 文件加载场景
pub async fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let scenario: Scenario = toml::from_str(&content)
        .map_err(|e| AppError::toml_parse_failed(path.display().to_string(), e))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    tracing::info!(
        "场景已加载: {} (回答 {} 条)",
        path.file_name().unwrap_or_default().to_string_lossy(),
        scenario.answers.len()
    );

    Ok(scenario.resolve_paths(base_dir))
}
