//! 会话编排器 - 编排层
//!
//! ## 职责
//!
//! 用户的每个动作对应这里的一个方法：
//! 领取票据 → 从状态取输入 → 调用远程接口 → 把结果合并回状态。
//!
//! ## 失败处理
//!
//! - 每个方法自己处理自己的失败，转成一条通知，不向外传播
//! - 一个操作失败不影响其他正在进行或之后的操作
//! - 晚到的旧结果被丢弃（见 [`SessionStore`]）
//! - ping、导入、分析、LinkedIn 和 PDF 导出开始前先清除旧通知

use crate::clients::{Payload, RemoteGateway};
use crate::config::Config;
use crate::error::{AppResult, OperationError, OperationResult};
use crate::infrastructure::{ReqwestTransport, Transport, UploadFile};
use crate::models::{
    AnalyzeRequest, AnalyzeResult, InterviewQuestions, LinkedinResult, Operation, ResultPatch,
    RewriteResult, ScoreRequest, ScoreResponse, SessionAction, SessionState, TextPairRequest,
};
use crate::services::{
    read_document, Artifact, DownloadSink, ExportService, FileDownloadSink, IngestionService, Notification,
    Notifier,
};
use crate::workflow::{
    Completion, InterviewState, OperationKind, SessionStore, Ticket, QUESTION_COUNT,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 一次用户操作的结果
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// 结果已合并进会话状态
    Applied,
    /// 导出文件已交付
    Delivered(PathBuf),
    /// 前置条件不满足，什么都没做（例如空回答）
    Ignored,
    /// 结果晚到，已被更新的同类操作取代
    Stale,
    /// 失败，已发出通知
    Failed(OperationError),
}

impl OperationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, OperationOutcome::Applied | OperationOutcome::Delivered(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OperationOutcome::Failed(_))
    }
}

/// 正在进行的远程操作计数
struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 会话编排器
pub struct SessionOrchestrator {
    gateway: RemoteGateway,
    ingestion: IngestionService,
    export: ExportService,
    sink: Arc<dyn DownloadSink>,
    store: SessionStore,
    notifier: Notifier,
    language: String,
    gender: Option<String>,
    in_flight: AtomicUsize,
}

impl SessionOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - `config`: 程序配置
    /// - `transport`: 网络传输
    /// - `sink`: 导出文件的下载目标
    pub fn new(config: &Config, transport: Arc<dyn Transport>, sink: Arc<dyn DownloadSink>) -> Self {
        let gateway = RemoteGateway::new(config.api_base_url.clone(), transport);
        Self {
            ingestion: IngestionService::new(gateway.clone(), config.max_upload_bytes()),
            export: ExportService::new(
                gateway.clone(),
                config.docx_filename.clone(),
                config.pdf_filename.clone(),
            ),
            gateway,
            sink,
            store: SessionStore::new(),
            notifier: Notifier::new(),
            language: config.language.clone(),
            gender: config.gender.clone(),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// 使用 reqwest 传输和本地目录下载目标创建编排器
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        let sink = Arc::new(FileDownloadSink::new(&config.output_dir));
        Ok(Self::new(config, transport, sink))
    }

    // ========== 状态读取 ==========

    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    /// 是否有远程操作正在进行
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    // ========== 本地修改 ==========

    pub fn set_resume_text(&self, text: impl Into<String>) {
        self.store.dispatch(SessionAction::SetResumeText(text.into()));
    }

    pub fn set_job_text(&self, text: impl Into<String>) {
        self.store.dispatch(SessionAction::SetJobText(text.into()));
    }

    pub fn set_full_name(&self, name: impl Into<String>) {
        self.store.dispatch(SessionAction::SetFullName(name.into()));
    }

    pub fn set_draft_answer(&self, draft: impl Into<String>) {
        self.store.dispatch(SessionAction::SetDraftAnswer(draft.into()));
    }

    pub fn clear_notification(&self) {
        self.notifier.clear();
    }

    /// 重置会话，正在进行的操作结果全部作废
    pub fn reset(&self) {
        info!("🔄 重置会话");
        self.store.dispatch(SessionAction::Reset);
        self.notifier.clear();
    }

    // ========== 远程操作 ==========

    /// 检查服务是否在线，原始响应保存在 `last_ping`
    pub async fn ping(&self) -> OperationOutcome {
        self.notifier.clear();
        let ticket = self.store.begin(OperationKind::Ping);
        let result = self
            .track(self.gateway.invoke::<JsonValue>(Operation::Ping, Payload::None))
            .await;
        self.finish(ticket, "Erreur ping", result, |value, _| {
            Some(SessionAction::RecordPing(value))
        })
    }

    /// 上传本地文件作为简历
    pub async fn import_path(&self, path: &Path) -> OperationOutcome {
        self.notifier.clear();
        match read_document(path).await {
            Ok(file) => self.import_document(file).await,
            Err(err) => self.fail("upload failed", err),
        }
    }

    /// 上传简历，成功后用提取的文本替换简历文本
    pub async fn import_document(&self, file: UploadFile) -> OperationOutcome {
        self.notifier.clear();
        let ticket = self.store.begin(OperationKind::Import);
        let result = self.track(self.ingestion.import_document(file)).await;
        self.finish(ticket, "upload failed", result, |text, _| {
            Some(SessionAction::SetResumeText(text))
        })
    }

    /// 简历与职位匹配分析
    pub async fn analyze(&self) -> OperationOutcome {
        self.notifier.clear();
        let ticket = self.store.begin(OperationKind::Analyze);
        let request = self.profile_request();
        info!("🔍 正在分析匹配度...");

        let result = self
            .track(self.call::<_, AnalyzeResult>(Operation::Analyze, &request))
            .await;
        self.finish(ticket, "Erreur analyse", result, |analysis, _| {
            info!("✓ 匹配度: {}", analysis.match_score);
            Some(SessionAction::Merge(ResultPatch::analyze(analysis.normalized())))
        })
    }

    /// 按职位改写简历
    pub async fn rewrite(&self) -> OperationOutcome {
        let ticket = self.store.begin(OperationKind::Rewrite);
        let request = self.text_pair_request();
        info!("✍️ 正在改写简历...");

        let result = self
            .track(self.call::<_, RewriteResult>(Operation::Rewrite, &request))
            .await;
        self.finish(ticket, "Erreur réécriture", result, |rewrite, _| {
            Some(SessionAction::Merge(ResultPatch::rewrite(rewrite)))
        })
    }

    /// 生成 LinkedIn Headline + About
    pub async fn optimize_linkedin(&self) -> OperationOutcome {
        self.notifier.clear();
        let ticket = self.store.begin(OperationKind::Linkedin);
        let request = self.profile_request();
        info!("💼 正在生成 LinkedIn 文案...");

        let result = self
            .track(self.call::<_, LinkedinResult>(Operation::LinkedinOptimize, &request))
            .await;
        self.finish(ticket, "Erreur LinkedIn", result, |linkedin, _| {
            Some(SessionAction::Merge(ResultPatch::linkedin(linkedin)))
        })
    }

    /// 生成 5 道面试题，重新开始一轮面试
    pub async fn generate_interview(&self) -> OperationOutcome {
        // 上一轮未返回的评分由轮次检查拦截，见 InterviewState::record_answer
        let ticket = self.store.begin(OperationKind::InterviewGenerate);
        let request = self.text_pair_request();
        info!("🎤 正在生成面试题...");

        let result = self
            .track(self.call::<_, InterviewQuestions>(Operation::InterviewGenerate, &request))
            .await
            .and_then(|q| {
                if q.questions.len() < QUESTION_COUNT {
                    Err(OperationError::DecodeFailure {
                        endpoint: Operation::InterviewGenerate.path().to_string(),
                        message: format!(
                            "需要 {} 道面试题，实际返回 {} 道",
                            QUESTION_COUNT,
                            q.questions.len()
                        ),
                    })
                } else {
                    Ok(q)
                }
            });

        self.finish(ticket, "Erreur entretien", result, |q, state| {
            if q.questions.len() > QUESTION_COUNT {
                warn!("返回了 {} 道面试题，只保留前 {} 道", q.questions.len(), QUESTION_COUNT);
            }
            InterviewState::generated(q.questions, state.result.interview.round())
                .ok()
                .map(|interview| SessionAction::Merge(ResultPatch::interview(interview)))
        })
    }

    /// 提交当前草稿并评分
    ///
    /// 没有当前题目或草稿为空时什么都不做
    pub async fn submit_answer(&self) -> OperationOutcome {
        let Some(pending) = self
            .store
            .read(|s| s.result.interview.pending_submission())
        else {
            debug!("没有可提交的回答，忽略");
            return OperationOutcome::Ignored;
        };

        let ticket = self.store.begin(OperationKind::InterviewScore);
        let request = ScoreRequest {
            answer: pending.answer_text.clone(),
            job: self.store.read(|s| s.job_text.clone()),
        };
        info!("📝 正在评分第 {} 题...", pending.index + 1);

        let result = self
            .track(self.call::<_, ScoreResponse>(Operation::InterviewScore, &request))
            .await;
        self.finish(ticket, "Erreur score", result, move |response, state| {
            info!("✓ 第 {} 题得分: {}", pending.index + 1, response.score);
            match state
                .result
                .interview
                .record_answer(pending, response.score, response.tips)
            {
                Ok(next) => Some(SessionAction::Merge(ResultPatch::interview(next))),
                Err(e) => {
                    debug!("评分结果无法写入: {}", e);
                    None
                }
            }
        })
    }

    /// 设置草稿并提交
    pub async fn answer(&self, text: impl Into<String>) -> OperationOutcome {
        self.set_draft_answer(text);
        self.submit_answer().await
    }

    /// 导出改写后的简历为 DOCX
    pub async fn export_docx(&self) -> OperationOutcome {
        let rewrite = self.store.read(|s| s.result.rewrite.clone());
        info!("📦 导出 DOCX...");
        let result = self.track(self.export.export_docx(rewrite.as_ref())).await;
        self.deliver("Export DOCX", result).await
    }

    /// 导出 LinkedIn About 为 PDF
    pub async fn export_about_pdf(&self) -> OperationOutcome {
        self.notifier.clear();
        let (linkedin, full_name) = self
            .store
            .read(|s| (s.result.linkedin.clone(), s.full_name.clone()));
        info!("📦 导出 PDF...");
        let result = self
            .track(self.export.export_about_pdf(linkedin.as_ref(), &full_name))
            .await;
        self.deliver("Export PDF", result).await
    }

    // ========== 内部辅助 ==========

    fn profile_request(&self) -> AnalyzeRequest {
        self.store.read(|s| AnalyzeRequest {
            resume: s.resume_text.clone(),
            job: s.job_text.clone(),
            language: self.language.clone(),
            gender: self.gender.clone(),
        })
    }

    fn text_pair_request(&self) -> TextPairRequest {
        self.store.read(|s| TextPairRequest {
            resume: s.resume_text.clone(),
            job: s.job_text.clone(),
            language: self.language.clone(),
        })
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: Operation,
        body: &B,
    ) -> OperationResult<T> {
        self.gateway
            .invoke(operation, Payload::json(operation, body)?)
            .await
    }

    async fn track<F: Future>(&self, fut: F) -> F::Output {
        let _guard = InFlightGuard::enter(&self.in_flight);
        fut.await
    }

    /// 把远程结果写回状态，失败时发出通知
    fn finish<T>(
        &self,
        ticket: Ticket,
        label: &str,
        result: OperationResult<T>,
        build: impl FnOnce(T, &SessionState) -> Option<SessionAction>,
    ) -> OperationOutcome {
        match result {
            Ok(value) => match self.store.complete(ticket, |state| build(value, state)) {
                Completion::Applied => OperationOutcome::Applied,
                Completion::Stale | Completion::Rejected => {
                    info!("⏭️ {:?} 结果已过期，丢弃", ticket.kind);
                    OperationOutcome::Stale
                }
            },
            Err(err) => self.fail(label, err),
        }
    }

    async fn deliver(&self, label: &str, result: OperationResult<Artifact>) -> OperationOutcome {
        let delivered = match result {
            Ok(artifact) => self.sink.deliver(artifact).await,
            Err(err) => Err(err),
        };
        match delivered {
            Ok(path) => OperationOutcome::Delivered(path),
            Err(err) => self.fail(label, err),
        }
    }

    fn fail(&self, label: &str, err: OperationError) -> OperationOutcome {
        let message = match &err {
            OperationError::PreconditionFailure { message } => message.clone(),
            other => format!("{}: {}", label, other),
        };
        if err.is_transient() {
            debug!("{} 可能是暂时性失败，可以重试", label);
        }
        self.notifier.notify(message);
        OperationOutcome::Failed(err)
    }
}
