//! 导出服务 - 业务能力层
//!
//! 把聚合结果转换成可下载的文件，并交给下载目标
//!
//! 两种形式：
//! - DOCX：服务端直接返回二进制流
//! - PDF：服务端返回 `{ filename, data (base64), mime }`，本地解码

use crate::clients::{Payload, RemoteGateway};
use crate::error::{OperationError, OperationResult};
use crate::models::{DocxExportRequest, EncodedPdf, LinkedinResult, Operation, PdfExportRequest, RewriteResult};
use async_trait::async_trait;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PDF_MIME: &str = "application/pdf";

/// 标准字母表，`=` 补齐可有可无
const ENVELOPE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 可下载的文件
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 下载目标
///
/// 接收 artifact 的所有权，交付后缓冲区即被释放
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn deliver(&self, artifact: Artifact) -> OperationResult<PathBuf>;
}

/// 写入本地目录的下载目标
pub struct FileDownloadSink {
    output_dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl DownloadSink for FileDownloadSink {
    async fn deliver(&self, artifact: Artifact) -> OperationResult<PathBuf> {
        // 只取文件名部分，防止服务端给出的名字跳出目录
        let name = Path::new(&artifact.filename)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "export.bin".to_string());
        let target = self.output_dir.join(name);

        let delivery_failed = |e: std::io::Error| OperationError::DeliveryFailure {
            target: target.display().to_string(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(delivery_failed)?;
        tokio::fs::write(&target, &artifact.bytes)
            .await
            .map_err(delivery_failed)?;

        info!(
            "💾 已保存 {} ({}, {} 字节)",
            target.display(),
            artifact.mime,
            artifact.bytes.len()
        );
        Ok(target)
    }
}

/// 导出服务
///
/// 职责：
/// - 检查导出前置条件（不满足时不发请求）
/// - 调用导出接口并构造 [`Artifact`]
/// - 不写会话状态
pub struct ExportService {
    gateway: RemoteGateway,
    docx_filename: String,
    pdf_filename: String,
}

impl ExportService {
    pub fn new(
        gateway: RemoteGateway,
        docx_filename: impl Into<String>,
        pdf_filename: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            docx_filename: docx_filename.into(),
            pdf_filename: pdf_filename.into(),
        }
    }

    /// 导出改写后的简历为 DOCX
    ///
    /// # 参数
    /// - `rewrite`: 改写结果，没有时直接返回前置检查失败
    pub async fn export_docx(&self, rewrite: Option<&RewriteResult>) -> OperationResult<Artifact> {
        let rewrite = rewrite
            .ok_or_else(|| OperationError::precondition("Aucune réécriture à exporter."))?;

        let payload = Payload::json(Operation::ExportDocx, &DocxExportRequest::from(rewrite))?;
        let bytes = self
            .gateway
            .invoke_bytes(Operation::ExportDocx, payload)
            .await?;

        debug!("DOCX 导出完成: {} 字节", bytes.len());

        Ok(Artifact {
            filename: self.docx_filename.clone(),
            mime: DOCX_MIME.to_string(),
            bytes,
        })
    }

    /// 导出 LinkedIn About + Headline 为 PDF
    ///
    /// # 参数
    /// - `linkedin`: LinkedIn 文案，About 为空时直接返回前置检查失败
    /// - `full_name`: 姓名
    pub async fn export_about_pdf(
        &self,
        linkedin: Option<&LinkedinResult>,
        full_name: &str,
    ) -> OperationResult<Artifact> {
        let (headline, about) = linkedin
            .map(|li| (li.headline.as_str(), li.about.as_str()))
            .unwrap_or(("", ""));
        if about.is_empty() {
            return Err(OperationError::precondition("Pas de texte About."));
        }

        let request = PdfExportRequest {
            headline: headline.to_string(),
            about: about.to_string(),
            full_name: full_name.to_string(),
        };
        let envelope: EncodedPdf = self
            .gateway
            .invoke(Operation::ExportEncodedPdf, Payload::json(Operation::ExportEncodedPdf, &request)?)
            .await?;

        self.decode_envelope(envelope)
    }

    /// 解码 base64 信封
    ///
    /// 与浏览器 `atob` 一致：忽略任意位置的 ASCII 空白（按行折断的数据），不要求 `=` 补齐
    fn decode_envelope(&self, envelope: EncodedPdf) -> OperationResult<Artifact> {
        let compact: String = envelope
            .data
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = ENVELOPE_BASE64
            .decode(compact)
            .map_err(|e| OperationError::DecodeFailure {
                endpoint: Operation::ExportEncodedPdf.path().to_string(),
                message: format!("base64 解码失败: {}", e),
            })?;

        Ok(Artifact {
            filename: envelope
                .filename
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| self.pdf_filename.clone()),
            mime: envelope
                .mime
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| PDF_MIME.to_string()),
            bytes,
        })
    }
}
