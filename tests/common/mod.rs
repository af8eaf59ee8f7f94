#![allow(dead_code)]

use async_trait::async_trait;
use cv_agent_client::infrastructure::{HttpRequest, HttpResponse, Transport, TransportError};
use cv_agent_client::services::FileDownloadSink;
use cv_agent_client::{Config, SessionOrchestrator};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://api.test";

/// 预设的一次响应
enum Scripted {
    Reply {
        status: u16,
        body: Vec<u8>,
        delay: Duration,
    },
    Unreachable,
}

/// 按路径脚本化的传输，记录所有请求
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
    }

    pub fn reply_json(&self, path: &str, status: u16, body: JsonValue) {
        self.reply_delayed(path, status, body, Duration::ZERO);
    }

    pub fn reply_delayed(&self, path: &str, status: u16, body: JsonValue, delay: Duration) {
        self.push(
            path,
            Scripted::Reply {
                status,
                body: body.to_string().into_bytes(),
                delay,
            },
        );
    }

    pub fn reply_raw(&self, path: &str, status: u16, body: &[u8]) {
        self.push(
            path,
            Scripted::Reply {
                status,
                body: body.to_vec(),
                delay: Duration::ZERO,
            },
        );
    }

    pub fn unreachable(&self, path: &str) {
        self.push(path, Scripted::Unreachable);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        let url = format!("{}{}", BASE_URL, path);
        self.requests()
            .into_iter()
            .filter(|r| r.url == url)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request
            .url
            .strip_prefix(BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        self.requests.lock().unwrap().push(request.clone());

        let next = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Scripted::Reply {
                status,
                body,
                delay,
            }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpResponse { status, body })
            }
            Some(Scripted::Unreachable) => Err(TransportError::Unreachable {
                url: request.url,
                message: "connection refused".to_string(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: b"{\"detail\":\"Not Found\"}".to_vec(),
            }),
        }
    }
}

pub fn test_config(output_dir: &TempDir) -> Config {
    Config {
        api_base_url: BASE_URL.to_string(),
        output_dir: output_dir.path().display().to_string(),
        ..Config::default()
    }
}

/// 编排器 + 脚本化传输 + 临时导出目录
pub fn orchestrator() -> (SessionOrchestrator, Arc<ScriptedTransport>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let transport = ScriptedTransport::new();
    let config = test_config(&dir);
    let sink = Arc::new(FileDownloadSink::new(dir.path()));
    let orchestrator = SessionOrchestrator::new(&config, transport.clone(), sink);
    (orchestrator, transport, dir)
}

pub fn five_questions() -> JsonValue {
    serde_json::json!({
        "questions": [
            "Présentez-vous.",
            "Parlez d'un projet difficile.",
            "Pourquoi ce poste ?",
            "Comment gérez-vous un conflit ?",
            "Où vous voyez-vous dans 5 ans ?"
        ]
    })
}

pub fn body_json(request: &HttpRequest) -> JsonValue {
    match &request.body {
        cv_agent_client::infrastructure::RequestBody::Json(value) => value.clone(),
        other => panic!("expected JSON body, got {:?}", other),
    }
}
