//! 文档导入服务 - 业务能力层
//!
//! 只负责"上传简历并拿回文本"能力，不关心流程
//!
//! 文本提取可能部署在两个不同的路由上：
//! 主接口返回 404 / 501 时，用同一个文件重试一次备用接口。

use crate::clients::{Payload, RemoteGateway};
use crate::error::{OperationError, OperationResult};
use crate::infrastructure::UploadFile;
use crate::models::{ExtractedText, Operation};
use std::path::Path;
use tracing::{debug, info, warn};

/// 允许上传的扩展名
const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

/// 主接口返回这些状态码时才走备用接口
const FALLBACK_STATUSES: &[u16] = &[404, 501];

/// 读取本地文件，构造待上传文件
pub async fn read_document(path: &Path) -> OperationResult<UploadFile> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        OperationError::precondition(format!("无法读取文件 {}: {}", path.display(), e))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let mime = mime_for(&file_name).to_string();

    Ok(UploadFile {
        file_name,
        mime,
        bytes,
    })
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

fn mime_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// 文档导入服务
///
/// 职责：
/// - 上传前检查文件大小和类型
/// - 主接口 → （404/501 时）备用接口，最多两次请求
/// - 返回去掉首尾空白的文本
/// - 不写会话状态
pub struct IngestionService {
    gateway: RemoteGateway,
    max_upload_bytes: u64,
}

impl IngestionService {
    pub fn new(gateway: RemoteGateway, max_upload_bytes: u64) -> Self {
        Self {
            gateway,
            max_upload_bytes,
        }
    }

    /// 上传文档并返回提取出的文本
    ///
    /// # 参数
    /// - `file`: 待上传文件
    ///
    /// # 返回
    /// 返回去掉首尾空白的文本
    pub async fn import_document(&self, file: UploadFile) -> OperationResult<String> {
        self.check(&file)?;

        info!("📄 上传简历: {} ({} 字节)", file.file_name, file.bytes.len());

        let extracted = match self
            .gateway
            .invoke::<ExtractedText>(Operation::UploadPrimary, Payload::File(file.clone()))
            .await
        {
            Err(OperationError::RemoteRejection { status, .. })
                if FALLBACK_STATUSES.contains(&status) =>
            {
                warn!("主上传接口返回 HTTP {}，改用备用接口", status);
                self.gateway
                    .invoke::<ExtractedText>(Operation::UploadFallback, Payload::File(file))
                    .await?
            }
            other => other?,
        };

        let text = extracted.text.trim().to_string();
        debug!("提取文本长度: {} 字符", text.chars().count());
        Ok(text)
    }

    /// 上传前检查
    fn check(&self, file: &UploadFile) -> OperationResult<()> {
        let accepted = extension_of(&file.file_name)
            .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);
        if !accepted {
            return Err(OperationError::precondition(format!(
                "Format non supporté: {} (PDF, DOC, DOCX, TXT)",
                file.file_name
            )));
        }

        if file.bytes.len() as u64 > self.max_upload_bytes {
            return Err(OperationError::precondition(format!(
                "Fichier trop volumineux (> {} Mo)",
                self.max_upload_bytes / (1024 * 1024)
            )));
        }

        Ok(())
    }
}
