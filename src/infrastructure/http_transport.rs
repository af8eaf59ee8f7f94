//! HTTP 传输 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端资源，只暴露"发送一个请求"的能力

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::debug;

/// 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// 待上传的文件
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(JsonValue),
    /// multipart 表单，只有一个文件字段
    Multipart { field: String, file: UploadFile },
}

/// 一次 HTTP 请求
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: RequestBody,
}

/// 一次 HTTP 响应（状态码 + 原始字节）
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 响应体按 UTF-8 解码（非法字节替换）
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// 传输层错误：没有拿到任何响应
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP 客户端错误: {0}")]
    Client(#[from] reqwest::Error),

    #[error("无法连接 {url}: {message}")]
    Unreachable { url: String, message: String },
}

/// 传输能力
///
/// 职责：
/// - 发送请求，返回状态码和原始响应体
/// - 不判断状态码是否成功
/// - 不解析响应体
/// - 不认识具体的业务接口
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// 基于 reqwest 的传输实现
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// 创建新的传输（不设置超时，使用 reqwest 默认行为）
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cv-agent/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// 使用已有的 reqwest 客户端
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("发送请求: {:?} {}", request.method, request.url);

        let builder = self.client.request(request.method.into(), &request.url);
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { field, file } => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime)?;
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!("收到响应: HTTP {} ({} 字节)", status, body.len());

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: Vec::new(),
        };
        assert!(ok.is_success());

        let not_found = HttpResponse {
            status: 404,
            body: b"Not Found".to_vec(),
        };
        assert!(!not_found.is_success());
        assert_eq!(not_found.text(), "Not Found");
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(reqwest::Method::from(HttpMethod::Get), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(HttpMethod::Post), reqwest::Method::POST);
    }
}
