use thiserror::Error;

/// 远程操作错误
///
/// 网关、导入适配器、导出适配器返回的统一错误类型。
/// 每个变体对应一种失败来源，调用方可以据此区分暂时性失败和永久性失败。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    /// 没有拿到任何响应（连接失败、DNS、连接被重置等）
    #[error("网络请求失败 ({endpoint}): {message}")]
    NetworkFailure { endpoint: String, message: String },

    /// 服务端返回非 2xx 状态码，保留状态码和原始响应文本
    #[error("服务端拒绝请求 ({endpoint}): HTTP {status} {body}")]
    RemoteRejection {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// 2xx 响应体无法解析
    #[error("响应解析失败 ({endpoint}): {message}")]
    DecodeFailure { endpoint: String, message: String },

    /// 客户端前置检查未通过，没有发出任何请求
    #[error("{message}")]
    PreconditionFailure { message: String },

    /// 导出文件写入本地失败
    #[error("导出文件写入失败 ({target}): {message}")]
    DeliveryFailure { target: String, message: String },
}

impl OperationError {
    /// 创建前置检查失败错误
    pub fn precondition(message: impl Into<String>) -> Self {
        OperationError::PreconditionFailure {
            message: message.into(),
        }
    }

    /// 远程拒绝时的 HTTP 状态码
    pub fn status(&self) -> Option<u16> {
        match self {
            OperationError::RemoteRejection { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 是否可能是暂时性失败（网络问题、5xx、429）
    pub fn is_transient(&self) -> bool {
        match self {
            OperationError::NetworkFailure { .. } => true,
            OperationError::RemoteRejection { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// 是否在发出请求之前就被拦截
    pub fn is_precondition(&self) -> bool {
        matches!(self, OperationError::PreconditionFailure { .. })
    }
}

/// 应用程序错误类型
///
/// 只用于启动阶段（配置、场景文件、日志文件），
/// 会话中的远程操作一律使用 [`OperationError`]。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 文件读取失败
    #[error("读取文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 文件写入失败
    #[error("写入文件失败 ({path}): {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// HTTP 客户端构建失败
    #[error("HTTP 客户端初始化失败: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// 必填项为空
    #[error("配置项 {key} 不能为空")]
    MissingValue { key: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// 创建 TOML 解析错误
    pub fn toml_parse_failed(path: impl Into<String>, source: toml::de::Error) -> Self {
        AppError::TomlParse {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 远程操作结果类型
pub type OperationResult<T> = Result<T, OperationError>;
