//! 脚本化会话 - 编排层
//!
//! ## 职责
//!
//! 本模块是二进制程序的入口，按场景文件跑完一次完整会话。
//!
//! ## 核心流程
//!
//! 1. **初始化**：日志文件、配置、编排器
//! 2. **导入**：ping → 上传简历（或直接使用文本）→ 职位描述
//! 3. **并发分析**：analyze / rewrite / LinkedIn 同时发出，互不影响
//! 4. **面试**：生成 5 道题，逐题提交回答
//! 5. **导出**：DOCX + PDF
//! 6. **汇总**：输出会话状态

use crate::config::Config;
use crate::models::{load_scenario, Scenario};
use crate::orchestrator::session_orchestrator::{OperationOutcome, SessionOrchestrator};
use crate::utils::logging::{init_log_file, log_session_summary, log_startup};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: SessionOrchestrator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config.api_base_url, &config.language);

        let orchestrator =
            SessionOrchestrator::from_config(&config).context("无法创建会话编排器")?;

        Ok(Self {
            config,
            orchestrator,
        })
    }

    /// 使用已有的编排器（测试时注入脚本化传输）
    pub fn with_orchestrator(config: Config, orchestrator: SessionOrchestrator) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator {
        &self.orchestrator
    }

    /// 读取配置中的场景文件并运行
    pub async fn run(&self) -> Result<RunStats> {
        let path = Path::new(&self.config.scenario_file);
        info!("\n📁 正在加载场景: {}", path.display());
        let scenario = load_scenario(path)
            .await
            .with_context(|| format!("无法加载场景文件: {}", path.display()))?;

        self.run_scenario(&scenario).await
    }

    /// 运行一个场景
    pub async fn run_scenario(&self, scenario: &Scenario) -> Result<RunStats> {
        let orch = &self.orchestrator;
        let mut stats = RunStats::default();

        // ========== 1. 服务检查 ==========
        stats.record("ping", orch.ping().await);
        if let Some(pong) = orch.snapshot().last_ping {
            info!("🏓 ping: {}", pong);
        }

        // ========== 2. 输入 ==========
        if let Some(path) = &scenario.resume_file {
            stats.record("import", orch.import_path(path).await);
        }
        if let Some(text) = &scenario.resume_text {
            if scenario.resume_file.is_none() {
                orch.set_resume_text(text.clone());
            }
        }
        orch.set_job_text(scenario.load_job_text().await?);
        if let Some(name) = &scenario.full_name {
            orch.set_full_name(name.clone());
        }

        // ========== 3. 并发分析 ==========
        let (analyze, rewrite, linkedin) = tokio::join!(
            orch.analyze(),
            orch.rewrite(),
            orch.optimize_linkedin()
        );
        stats.record("analyze", analyze);
        stats.record("rewrite", rewrite);
        stats.record("linkedin", linkedin);

        // ========== 4. 面试 ==========
        let generated = orch.generate_interview().await;
        let interview_ready = generated.is_applied();
        stats.record("interview", generated);

        if interview_ready {
            for answer in &scenario.answers {
                if orch.snapshot().result.interview.is_complete() {
                    warn!("面试已完成，忽略多余的回答");
                    break;
                }
                stats.record("score", orch.answer(answer.clone()).await);
            }
        }

        // ========== 5. 导出 ==========
        let (docx, pdf) = tokio::join!(orch.export_docx(), orch.export_about_pdf());
        stats.record("export docx", docx);
        stats.record("export pdf", pdf);

        // ========== 6. 汇总 ==========
        log_session_summary(&orch.snapshot(), stats.failed, &self.config.output_log_file);
        if let Some(notification) = orch.notification() {
            warn!("最后一条通知: {}", notification.message);
        }

        Ok(stats)
    }
}

/// 会话统计
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunStats {
    pub applied: usize,
    pub ignored: usize,
    pub stale: usize,
    pub failed: usize,
}

impl RunStats {
    fn record(&mut self, step: &str, outcome: OperationOutcome) {
        match outcome {
            OperationOutcome::Applied => {
                info!("✓ {}", step);
                self.applied += 1;
            }
            OperationOutcome::Delivered(path) => {
                info!("✓ {} → {}", step, path.display());
                self.applied += 1;
            }
            OperationOutcome::Ignored => {
                info!("- {} 已跳过", step);
                self.ignored += 1;
            }
            OperationOutcome::Stale => {
                info!("- {} 结果已过期", step);
                self.stale += 1;
            }
            OperationOutcome::Failed(e) => {
                warn!("❌ {} 失败: {}", step, e);
                self.failed += 1;
            }
        }
    }
}
