//! 面试状态机
//!
//! 五道题的 问题 → 回答 → 评分 流程。
//! 状态只通过这里的转换函数改变，索引饱和与空回答拦截都在这里保证。

use crate::models::ScoredAnswer;
use serde::Serialize;
use thiserror::Error;

/// 每轮面试的题目数量
pub const QUESTION_COUNT: usize = 5;

/// 最后一题的索引
pub const LAST_INDEX: usize = QUESTION_COUNT - 1;

/// 面试阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum InterviewPhase {
    /// 尚未生成题目
    #[default]
    Empty,
    /// 正在回答第 i 题（0..=4）
    Active(usize),
    /// 五道题都已评分
    Complete,
}

/// 面试状态转换错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterviewError {
    #[error("面试题数量错误: 需要 {expected} 道，实际 {actual} 道")]
    WrongQuestionCount { expected: usize, actual: usize },

    #[error("评分结果已过期 (轮次 {expected}, 当前 {actual})")]
    StaleRound { expected: u64, actual: u64 },

    #[error("评分结果对应第 {expected} 题，当前状态为 {actual:?}")]
    IndexMoved {
        expected: usize,
        actual: InterviewPhase,
    },
}

/// 一次待评分的提交
///
/// 在发出评分请求前从状态中取出，评分回来后原样交回 [`InterviewState::record_answer`]
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAnswer {
    pub round: u64,
    pub index: usize,
    pub question: String,
    pub answer_text: String,
}

/// 面试子状态
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct InterviewState {
    questions: Vec<String>,
    phase: InterviewPhase,
    answers: Vec<ScoredAnswer>,
    draft_answer: String,
    /// 第几次生成题目，0 表示从未生成
    round: u64,
}

impl InterviewState {
    /// 用新生成的题目开始一轮面试
    ///
    /// 不论之前处于什么状态，都回到 `Active(0)`，回答清空。
    /// 多于 5 道只取前 5 道，少于 5 道视为错误。
    pub fn generated(questions: Vec<String>, previous_round: u64) -> Result<Self, InterviewError> {
        if questions.len() < QUESTION_COUNT {
            return Err(InterviewError::WrongQuestionCount {
                expected: QUESTION_COUNT,
                actual: questions.len(),
            });
        }

        let questions = questions.into_iter().take(QUESTION_COUNT).collect();
        Ok(Self {
            questions,
            phase: InterviewPhase::Active(0),
            answers: Vec::new(),
            draft_answer: String::new(),
            round: previous_round + 1,
        })
    }

    pub fn phase(&self) -> InterviewPhase {
        self.phase
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[ScoredAnswer] {
        &self.answers
    }

    pub fn draft_answer(&self) -> &str {
        &self.draft_answer
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// 当前题目索引
    ///
    /// 完成后停在最后一题（4），不会变成 5
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            InterviewPhase::Empty => None,
            InterviewPhase::Active(i) => Some(i),
            InterviewPhase::Complete => Some(LAST_INDEX),
        }
    }

    /// 当前可以回答的题目，完成后为 None
    pub fn current_question(&self) -> Option<&str> {
        match self.phase {
            InterviewPhase::Active(i) => self.questions.get(i).map(String::as_str),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == InterviewPhase::Complete
    }

    /// 替换草稿
    pub fn with_draft(&self, draft: impl Into<String>) -> Self {
        Self {
            draft_answer: draft.into(),
            ..self.clone()
        }
    }

    /// 取出待评分的提交
    ///
    /// 没有当前题目或草稿为空时返回 None，调用方应当什么都不做
    pub fn pending_submission(&self) -> Option<PendingAnswer> {
        let question = self.current_question()?;
        if question.is_empty() || self.draft_answer.is_empty() {
            return None;
        }
        let index = self.current_index()?;
        Some(PendingAnswer {
            round: self.round,
            index,
            question: question.to_string(),
            answer_text: self.draft_answer.clone(),
        })
    }

    /// 记录评分结果，返回新状态
    ///
    /// 追加一条回答、清空草稿、索引加一（在 4 处饱和）。
    /// 第 5 条回答记录后进入 `Complete`。
    pub fn record_answer(
        &self,
        pending: PendingAnswer,
        score: f64,
        tips: Vec<String>,
    ) -> Result<Self, InterviewError> {
        if pending.round != self.round {
            return Err(InterviewError::StaleRound {
                expected: pending.round,
                actual: self.round,
            });
        }
        if self.phase != InterviewPhase::Active(pending.index) {
            return Err(InterviewError::IndexMoved {
                expected: pending.index,
                actual: self.phase,
            });
        }

        let mut answers = self.answers.clone();
        answers.push(ScoredAnswer {
            question: pending.question,
            answer_text: pending.answer_text,
            score,
            tips,
        });

        let phase = if answers.len() >= QUESTION_COUNT {
            InterviewPhase::Complete
        } else {
            InterviewPhase::Active((pending.index + 1).min(LAST_INDEX))
        };

        Ok(Self {
            questions: self.questions.clone(),
            phase,
            answers,
            draft_answer: String::new(),
            round: self.round,
        })
    }
}
