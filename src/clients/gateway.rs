/// 远程操作网关
///
/// 封装所有对分析服务的调用：一次请求，统一把结果归为成功或 [`OperationError`]
use crate::error::{OperationError, OperationResult};
use crate::infrastructure::{HttpRequest, HttpResponse, RequestBody, Transport, UploadFile};
use crate::models::Operation;
use crate::utils::logging::truncate_text;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};

/// 请求负载
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Json(JsonValue),
    File(UploadFile),
}

impl Payload {
    /// 序列化任意请求体为 JSON 负载
    ///
    /// 失败属于本地编码错误，不是用户能修正的前置条件
    pub fn json<T: Serialize>(operation: Operation, body: &T) -> OperationResult<Self> {
        serde_json::to_value(body).map(Payload::Json).map_err(|e| {
            OperationError::DecodeFailure {
                endpoint: operation.path().to_string(),
                message: format!("内部错误，请求体编码失败: {}", e),
            }
        })
    }
}

/// 远程操作网关
#[derive(Clone)]
pub struct RemoteGateway {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl RemoteGateway {
    /// 创建新的网关
    ///
    /// # 参数
    /// - `base_url`: 服务地址，不带结尾 `/`
    /// - `transport`: 实际发送请求的传输
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// 调用接口并把响应体解析为指定类型
    ///
    /// # 返回
    /// - 网络失败 → `NetworkFailure`
    /// - 非 2xx → `RemoteRejection`（带状态码和原始响应文本）
    /// - 解析失败 → `DecodeFailure`
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        operation: Operation,
        payload: Payload,
    ) -> OperationResult<T> {
        let response = self.invoke_raw(operation, payload).await?;
        serde_json::from_slice(&response.body).map_err(|e| {
            warn!("{} 响应解析失败: {}", operation, e);
            OperationError::DecodeFailure {
                endpoint: operation.path().to_string(),
                message: format!("{} (响应: {})", e, truncate_text(&response.text(), 200)),
            }
        })
    }

    /// 调用接口，返回原始 2xx 响应体（二进制流导出使用）
    pub async fn invoke_bytes(
        &self,
        operation: Operation,
        payload: Payload,
    ) -> OperationResult<Vec<u8>> {
        self.invoke_raw(operation, payload)
            .await
            .map(|response| response.body)
    }

    async fn invoke_raw(
        &self,
        operation: Operation,
        payload: Payload,
    ) -> OperationResult<HttpResponse> {
        let request = HttpRequest {
            method: operation.method(),
            url: operation.url(&self.base_url),
            body: match payload {
                Payload::None => RequestBody::Empty,
                Payload::Json(value) => RequestBody::Json(value),
                Payload::File(file) => RequestBody::Multipart {
                    field: "file".to_string(),
                    file,
                },
            },
        };

        debug!("调用 {} {}", operation.path(), request.url);

        let response = self.transport.send(request).await.map_err(|e| {
            warn!("{} 网络请求失败: {}", operation, e);
            OperationError::NetworkFailure {
                endpoint: operation.path().to_string(),
                message: e.to_string(),
            }
        })?;

        if !response.is_success() {
            let body = response.text();
            warn!(
                "{} 返回 HTTP {}: {}",
                operation,
                response.status,
                truncate_text(&body, 200)
            );
            return Err(OperationError::RemoteRejection {
                endpoint: operation.path().to_string(),
                status: response.status,
                body,
            });
        }

        Ok(response)
    }
}
