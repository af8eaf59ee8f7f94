//! # CV Agent Client
//!
//! 简历助手的客户端编排层：导入简历、与职位描述比对、改写、模拟面试、
//! 生成 LinkedIn 文案并导出文件。所有分析和生成都由远程服务完成，
//! 本 crate 只负责调用顺序、结果合并和失败恢复。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 客户端，只暴露 `Transport::send`
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - `RemoteGateway`，一次调用，统一成功 / 失败
//!
//! ### ③ 业务能力层（Services）
//! - `IngestionService` - 上传简历（主接口 + 备用接口）
//! - `ExportService` - DOCX / PDF 导出
//! - `Notifier` - 最近一条失败通知
//!
//! ### ④ 流程层（Workflow）
//! - `SessionStore` - 会话状态唯一写入口，过期结果丢弃
//! - `InterviewState` - 5 题面试状态机
//!
//! ### ⑤ 编排层（Orchestration）
//! - `SessionOrchestrator` - 每个用户动作一个方法
//! - `App` - 按场景文件跑完整会话
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{Payload, RemoteGateway};
pub use config::Config;
pub use error::{AppError, AppResult, OperationError, OperationResult};
pub use infrastructure::{ReqwestTransport, Transport};
pub use models::{ResultAggregate, ResultPatch, SessionState};
pub use orchestrator::{App, OperationOutcome, SessionOrchestrator};
pub use workflow::{InterviewPhase, InterviewState};
