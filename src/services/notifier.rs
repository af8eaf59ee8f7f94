//! 通知服务 - 业务能力层
//!
//! 只负责"显示最近一条失败信息"能力。
//! 同一时间只有一条通知，新通知直接替换旧的，不排队。

use chrono::{DateTime, Local};
use std::sync::Mutex;
use tracing::warn;

/// 一条通知
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub raised_at: DateTime<Local>,
}

/// 通知通道
#[derive(Debug, Default)]
pub struct Notifier {
    current: Mutex<Option<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 显示一条通知，替换之前的
    pub fn notify(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("🔔 {}", message);
        *self.slot() = Some(Notification {
            message,
            raised_at: Local::now(),
        });
    }

    /// 清除当前通知
    pub fn clear(&self) {
        *self.slot() = None;
    }

    /// 当前通知
    pub fn current(&self) -> Option<Notification> {
        self.slot().clone()
    }

    /// 当前通知的文本
    pub fn message(&self) -> Option<String> {
        self.slot().as_ref().map(|n| n.message.clone())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Notification>> {
        // 锁内只做赋值，中毒时直接沿用内部数据
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
