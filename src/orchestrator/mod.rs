//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层持有会话状态和所有服务，是整个客户端的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `session_orchestrator` - 会话编排器
//! - 每个用户动作一个方法（analyze / rewrite / 面试 / LinkedIn / 导出）
//! - 领取票据、合并结果、丢弃过期结果
//! - 失败转成通知，不向外传播
//!
//! ### `app` - 脚本化会话
//! - 初始化日志和编排器
//! - 按场景文件依次（或并发）触发操作
//! - 输出会话汇总
//!
//! ## 层次关系
//!
//! ```text
//! app (一次完整会话)
//!     ↓
//! session_orchestrator (单个用户动作)
//!     ↓
//! workflow (SessionStore / InterviewState)
//!     ↓
//! services (导入 / 导出 / 通知)
//!     ↓
//! clients (RemoteGateway)
//!     ↓
//! infrastructure (Transport)
//! ```

pub mod app;
pub mod session_orchestrator;

// 重新导出主要类型
pub use app::{App, RunStats};
pub use session_orchestrator::{OperationOutcome, SessionOrchestrator};
