use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 远程分析服务地址（不带结尾的 `/`）
    pub api_base_url: String,
    /// 请求中携带的语言
    pub language: String,
    /// 请求中携带的性别（None 表示不发送该字段）
    pub gender: Option<String>,
    /// 导出文件存放目录
    pub output_dir: String,
    /// 场景文件（TOML）
    pub scenario_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 上传文件大小上限（MB）
    pub max_upload_mb: u64,
    // --- 导出文件名 ---
    pub docx_filename: String,
    pub pdf_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            language: "fr".to_string(),
            gender: Some("auto".to_string()),
            output_dir: "exports".to_string(),
            scenario_file: "scenario.toml".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            max_upload_mb: 8,
            docx_filename: "cv_optimise.docx".to_string(),
            pdf_filename: "linkedin.pdf".to_string(),
        }
    }
}

/// TOML 配置文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_base_url: Option<String>,
    language: Option<String>,
    gender: Option<String>,
    output_dir: Option<String>,
    scenario_file: Option<String>,
    verbose_logging: Option<bool>,
    output_log_file: Option<String>,
    max_upload_mb: Option<u64>,
    docx_filename: Option<String>,
    pdf_filename: Option<String>,
}

impl Config {
    /// 只从环境变量读取（未设置的项使用默认值）
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 读取 TOML 配置文件，再叠加环境变量
    ///
    /// 文件不存在时等同于 [`Config::from_env`]
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let mut config = Self::default();

        if path.exists() {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
            let file: ConfigFile = toml::from_str(&content)
                .map_err(|e| AppError::toml_parse_failed(path.display().to_string(), e))?;
            config.apply_file(file);
        }

        config.with_env_overrides()
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.language {
            self.language = v;
        }
        if let Some(v) = file.gender {
            self.gender = non_empty(v);
        }
        if let Some(v) = file.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = file.scenario_file {
            self.scenario_file = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = file.output_log_file {
            self.output_log_file = v;
        }
        if let Some(v) = file.max_upload_mb {
            self.max_upload_mb = v;
        }
        if let Some(v) = file.docx_filename {
            self.docx_filename = v;
        }
        if let Some(v) = file.pdf_filename {
            self.pdf_filename = v;
        }
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        let config = Self {
            api_base_url: std::env::var("CV_AGENT_API_URL").unwrap_or(self.api_base_url),
            language: std::env::var("CV_AGENT_LANGUAGE").unwrap_or(self.language),
            gender: match std::env::var("CV_AGENT_GENDER") {
                Ok(v) => non_empty(v),
                Err(_) => self.gender,
            },
            output_dir: std::env::var("CV_AGENT_OUTPUT_DIR").unwrap_or(self.output_dir),
            scenario_file: std::env::var("CV_AGENT_SCENARIO").unwrap_or(self.scenario_file),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            max_upload_mb: parse_env("MAX_UPLOAD_MB", "u64")?.unwrap_or(self.max_upload_mb),
            docx_filename: self.docx_filename,
            pdf_filename: self.pdf_filename,
        };
        config.normalized()
    }

    /// 去掉地址结尾的 `/` 并检查必填项
    fn normalized(mut self) -> AppResult<Self> {
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        if self.api_base_url.is_empty() {
            return Err(ConfigError::MissingValue {
                key: "api_base_url".to_string(),
            }
            .into());
        }
        Ok(self)
    }

    /// 上传大小上限（字节）
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.language, "fr");
        assert_eq!(config.gender.as_deref(), Some("auto"));
        assert_eq!(config.max_upload_bytes(), 8 * 1024 * 1024);
        assert_eq!(config.docx_filename, "cv_optimise.docx");
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = Config {
            api_base_url: "https://api.example.com/api/".to_string(),
            ..Config::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/api");
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let result = Config {
            api_base_url: " / ".to_string(),
            ..Config::default()
        }
        .normalized();
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingValue { .. }))
        ));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            api_base_url = "https://currivox.example/"
            gender = ""
            max_upload_mb = 2
            "#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file);

        assert_eq!(config.api_base_url, "https://currivox.example/");
        assert_eq!(config.gender, None);
        assert_eq!(config.max_upload_mb, 2);
        assert_eq!(config.language, "fr");
    }

    #[tokio::test]
    async fn test_load_missing_file_falls_back_to_defaults() {
        let config = Config::load("does-not-exist.toml").await;
        assert!(config.is_ok());
    }
}
