/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::error::{AppError, AppResult};
use crate::models::SessionState;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 debug / info。
/// 重复调用不会报错（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n简历助手会话日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `api_base_url`: 服务地址
/// - `language`: 请求语言
pub fn log_startup(api_base_url: &str, language: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 简历助手会话");
    info!("🌐 服务地址: {}", api_base_url);
    info!("🗣️ 语言: {}", language);
    info!("{}", "=".repeat(60));
}

/// 记录会话汇总
///
/// # 参数
/// - `state`: 会话结束时的状态
/// - `failed`: 失败的操作数
/// - `log_file_path`: 日志文件路径
pub fn log_session_summary(state: &SessionState, failed: usize, log_file_path: &str) {
    let result = &state.result;
    info!("\n{}", "=".repeat(60));
    info!("📊 会话汇总");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("简历: {}", truncate_text(&state.resume_text, 60));
    if let Some(analyze) = &result.analyze {
        info!("✅ 匹配度: {}", analyze.match_score);
        info!("   缺失关键词: {}", analyze.missing_keywords.join(", "));
    }
    if let Some(rewrite) = &result.rewrite {
        info!("✅ 改写 Headline: {}", rewrite.headline);
    }
    if let Some(linkedin) = &result.linkedin {
        info!("✅ LinkedIn Headline: {}", linkedin.headline);
    }
    for (i, answer) in result.interview.answers().iter().enumerate() {
        info!(
            "🎤 Q{}. {} → {} ({})",
            i + 1,
            truncate_text(&answer.question, 50),
            answer.score,
            answer.tips.join(" • ")
        );
    }
    info!("❌ 失败操作: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
