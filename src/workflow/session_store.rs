//! 会话状态存储
//!
//! 会话状态的唯一写入入口。
//! 每个远程操作开始时领取一个票据，完成时只有票据仍是该类操作的最新票据才会写入，
//! 晚到的旧结果直接丢弃。

use crate::models::{reduce, SessionAction, SessionState};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// 会写入会话状态的操作类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Ping,
    Import,
    Analyze,
    Rewrite,
    InterviewGenerate,
    InterviewScore,
    Linkedin,
}

/// 操作票据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: OperationKind,
    pub seq: u64,
}

/// 完成时的写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// 已写入
    Applied,
    /// 票据已过期，结果被丢弃
    Stale,
    /// 票据有效，但当前状态下没有可写入的内容
    Rejected,
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    latest: HashMap<OperationKind, u64>,
    /// 每次 reset 加一，用于让 reset 之前的所有票据失效
    epoch: u64,
}

/// 会话状态存储
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<Inner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// 读取状态的一部分
    pub fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
        f(&self.lock().state)
    }

    /// 直接执行一个动作（用户输入等本地修改）
    pub fn dispatch(&self, action: SessionAction) {
        let mut inner = self.lock();
        if matches!(action, SessionAction::Reset) {
            inner.epoch += 1;
            inner.latest.clear();
        }
        let state = std::mem::take(&mut inner.state);
        inner.state = reduce(state, action);
    }

    /// 为一个远程操作领取票据，同类操作之前的票据随之失效
    pub fn begin(&self, kind: OperationKind) -> Ticket {
        let mut inner = self.lock();
        let seq = match inner.latest.get(&kind) {
            Some(seq) => seq + 1,
            None => (inner.epoch << 32) + 1,
        };
        inner.latest.insert(kind, seq);
        Ticket { kind, seq }
    }

    /// 票据是否仍是最新
    pub fn is_current(&self, ticket: Ticket) -> bool {
        Self::current_in(&self.lock(), ticket)
    }

    fn current_in(inner: &Inner, ticket: Ticket) -> bool {
        inner.latest.get(&ticket.kind) == Some(&ticket.seq)
    }

    /// 用远程结果完成一个操作
    ///
    /// `build` 在锁内基于最新状态计算要执行的动作，返回 None 表示无可写入内容
    pub fn complete(
        &self,
        ticket: Ticket,
        build: impl FnOnce(&SessionState) -> Option<SessionAction>,
    ) -> Completion {
        let mut inner = self.lock();
        if !Self::current_in(&inner, ticket) {
            debug!("丢弃过期结果: {:?}", ticket);
            return Completion::Stale;
        }

        match build(&inner.state) {
            Some(action) => {
                let state = std::mem::take(&mut inner.state);
                inner.state = reduce(state, action);
                Completion::Applied
            }
            None => Completion::Rejected,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // 锁内不跨 await，中毒时沿用内部数据
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalyzeResult, ResultPatch};

    fn analyze(score: f64) -> SessionAction {
        SessionAction::Merge(ResultPatch::analyze(AnalyzeResult {
            match_score: score,
            missing_keywords: Vec::new(),
            suggestions: Vec::new(),
            profile_summary: String::new(),
            cover_letter: String::new(),
        }))
    }

    fn score_of(store: &SessionStore) -> Option<f64> {
        store.read(|s| s.result.analyze.as_ref().map(|a| a.match_score))
    }

    #[test]
    fn test_latest_ticket_wins_regardless_of_completion_order() {
        let store = SessionStore::new();
        let first = store.begin(OperationKind::Analyze);
        let second = store.begin(OperationKind::Analyze);

        assert_eq!(store.complete(second, |_| Some(analyze(80.0))), Completion::Applied);
        assert_eq!(store.complete(first, |_| Some(analyze(30.0))), Completion::Stale);
        assert_eq!(score_of(&store), Some(80.0));
    }

    #[test]
    fn test_kinds_are_independent() {
        let store = SessionStore::new();
        let analyze_ticket = store.begin(OperationKind::Analyze);
        let _rewrite_ticket = store.begin(OperationKind::Rewrite);
        assert!(store.is_current(analyze_ticket));
    }

    #[test]
    fn test_reset_invalidates_in_flight_tickets() {
        let store = SessionStore::new();
        let ticket = store.begin(OperationKind::Analyze);
        store.dispatch(SessionAction::Reset);

        assert!(!store.is_current(ticket));
        assert_eq!(store.complete(ticket, |_| Some(analyze(50.0))), Completion::Stale);
        assert_eq!(score_of(&store), None);

        let fresh = store.begin(OperationKind::Analyze);
        assert!(fresh.seq > ticket.seq);
        assert_eq!(store.complete(fresh, |_| Some(analyze(50.0))), Completion::Applied);
    }

    #[test]
    fn test_rejected_build_leaves_state() {
        let store = SessionStore::new();
        store.dispatch(SessionAction::SetJobText("offre".to_string()));
        let ticket = store.begin(OperationKind::InterviewScore);
        assert_eq!(store.complete(ticket, |_| None), Completion::Rejected);
        assert_eq!(store.snapshot().job_text, "offre");
    }
}
