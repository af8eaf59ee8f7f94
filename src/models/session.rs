//! 会话状态
//!
//! 用户输入的文本 + 所有远程操作累积下来的结果。
//! 只能通过 [`reduce`] 修改，外部不直接改字段。

use crate::models::{AnalyzeResult, LinkedinResult, RewriteResult};
use crate::workflow::interview::InterviewState;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// 结果聚合
///
/// 每个顶层键是某一个远程操作最近一次成功的结果
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultAggregate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze: Option<AnalyzeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<RewriteResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<LinkedinResult>,
    pub interview: InterviewState,
}

/// 部分结果
///
/// 为 Some 的键覆盖聚合中的对应键，为 None 的键保持不变
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPatch {
    pub analyze: Option<AnalyzeResult>,
    pub rewrite: Option<RewriteResult>,
    pub linkedin: Option<LinkedinResult>,
    pub interview: Option<InterviewState>,
}

impl ResultPatch {
    pub fn analyze(result: AnalyzeResult) -> Self {
        Self {
            analyze: Some(result),
            ..Self::default()
        }
    }

    pub fn rewrite(result: RewriteResult) -> Self {
        Self {
            rewrite: Some(result),
            ..Self::default()
        }
    }

    pub fn linkedin(result: LinkedinResult) -> Self {
        Self {
            linkedin: Some(result),
            ..Self::default()
        }
    }

    pub fn interview(state: InterviewState) -> Self {
        Self {
            interview: Some(state),
            ..Self::default()
        }
    }
}

impl ResultAggregate {
    /// 浅合并：patch 中出现的顶层键覆盖，没出现的保留
    pub fn merge(self, patch: ResultPatch) -> Self {
        Self {
            analyze: patch.analyze.or(self.analyze),
            rewrite: patch.rewrite.or(self.rewrite),
            linkedin: patch.linkedin.or(self.linkedin),
            interview: patch.interview.unwrap_or(self.interview),
        }
    }
}

/// 会话状态
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionState {
    pub resume_text: String,
    pub job_text: String,
    /// 导出 PDF 时使用的姓名
    pub full_name: String,
    /// 最近一次 ping 的原始响应
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ping: Option<JsonValue>,
    pub result: ResultAggregate,
}

/// 会话状态的所有修改动作
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SetResumeText(String),
    SetJobText(String),
    SetFullName(String),
    SetDraftAnswer(String),
    RecordPing(JsonValue),
    Merge(ResultPatch),
    Reset,
}

/// 纯函数 reducer：(状态, 动作) → 新状态
pub fn reduce(state: SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::SetResumeText(text) => SessionState {
            resume_text: text,
            ..state
        },
        SessionAction::SetJobText(text) => SessionState {
            job_text: text,
            ..state
        },
        SessionAction::SetFullName(name) => SessionState {
            full_name: name,
            ..state
        },
        SessionAction::SetDraftAnswer(draft) => {
            let interview = state.result.interview.with_draft(draft);
            SessionState {
                result: state.result.merge(ResultPatch::interview(interview)),
                ..state
            }
        }
        SessionAction::RecordPing(value) => SessionState {
            last_ping: Some(value),
            ..state
        },
        SessionAction::Merge(patch) => SessionState {
            result: state.result.merge(patch),
            ..state
        },
        SessionAction::Reset => SessionState::default(),
    }
}
