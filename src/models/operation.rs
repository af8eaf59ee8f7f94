//! 远程操作标识
//!
//! 每个操作对应一个固定的路径和请求方法

use crate::infrastructure::HttpMethod;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Ping,
    /// 上传简历（主接口）
    UploadPrimary,
    /// 上传简历（备用接口）
    UploadFallback,
    Analyze,
    Rewrite,
    InterviewGenerate,
    InterviewScore,
    LinkedinOptimize,
    /// 导出 DOCX（二进制流）
    ExportDocx,
    /// 导出 PDF（base64 信封）
    ExportEncodedPdf,
}

impl Operation {
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Ping => "/ping",
            Operation::UploadPrimary => "/resume/upload",
            Operation::UploadFallback => "/ingest/pdf",
            Operation::Analyze => "/analyze-text",
            Operation::Rewrite => "/cv/rewrite",
            Operation::InterviewGenerate => "/interview/generate",
            Operation::InterviewScore => "/interview/score",
            Operation::LinkedinOptimize => "/linkedin/optimize",
            Operation::ExportDocx => "/export/docx",
            Operation::ExportEncodedPdf => "/linkedin/export/pdf-b64",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Operation::Ping => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// 拼接完整 URL（`base_url` 不带结尾 `/`）
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path())
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ping_is_get() {
        assert_eq!(Operation::Ping.method(), HttpMethod::Get);
        assert_eq!(Operation::UploadFallback.method(), HttpMethod::Post);
        assert_eq!(Operation::ExportDocx.method(), HttpMethod::Post);
    }

    #[test]
    fn test_url_join() {
        assert_eq!(
            Operation::ExportEncodedPdf.url("https://currivox-1.onrender.com"),
            "https://currivox-1.onrender.com/linkedin/export/pdf-b64"
        );
    }
}
