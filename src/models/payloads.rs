//! 远程接口的请求体和响应体
//!
//! 字段名与服务端 JSON 保持一致

use serde::{Deserialize, Serialize};

// ========== 请求体 ==========

/// 分析请求 / LinkedIn 优化请求
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub resume: String,
    pub job: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// 改写请求 / 面试题生成请求
#[derive(Debug, Clone, Serialize)]
pub struct TextPairRequest {
    pub resume: String,
    pub job: String,
    pub language: String,
}

/// 回答评分请求
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRequest {
    pub answer: String,
    pub job: String,
}

/// DOCX 导出请求
#[derive(Debug, Clone, Serialize)]
pub struct DocxExportRequest {
    pub headline: String,
    pub bullets: Vec<String>,
    pub skills: Vec<String>,
}

impl From<&RewriteResult> for DocxExportRequest {
    fn from(rewrite: &RewriteResult) -> Self {
        Self {
            headline: rewrite.headline.clone(),
            bullets: rewrite.bullets.clone(),
            skills: rewrite.skills.clone(),
        }
    }
}

/// PDF 导出请求
#[derive(Debug, Clone, Serialize)]
pub struct PdfExportRequest {
    pub headline: String,
    pub about: String,
    pub full_name: String,
}

// ========== 响应体 ==========

/// 文档提取结果
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractedText {
    #[serde(default)]
    pub text: String,
}

/// 匹配分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    /// 匹配度 0-100
    pub match_score: f64,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub profile_summary: String,
    #[serde(default)]
    pub cover_letter: String,
}

impl AnalyzeResult {
    /// 缺失关键词按集合处理：去重，保留首次出现的顺序
    pub fn normalized(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.missing_keywords.retain(|k| seen.insert(k.clone()));
        self
    }
}

/// 改写结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteResult {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// LinkedIn 文案
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedinResult {
    pub headline: String,
    pub about: String,
}

/// 服务端有时用 `summary` 代替 `about`
#[derive(Debug, Deserialize)]
struct RawLinkedin {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    about: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

impl<'de> Deserialize<'de> for LinkedinResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawLinkedin::deserialize(deserializer)?;
        let about = raw
            .about
            .filter(|a| !a.is_empty())
            .or(raw.summary)
            .unwrap_or_default();
        Ok(Self {
            headline: raw.headline.unwrap_or_default(),
            about,
        })
    }
}

/// 面试题生成结果
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InterviewQuestions {
    #[serde(default)]
    pub questions: Vec<String>,
}

/// 回答评分结果
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// 一条已评分的回答
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAnswer {
    pub question: String,
    pub answer_text: String,
    pub score: f64,
    pub tips: Vec<String>,
}

/// base64 编码的 PDF 信封
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EncodedPdf {
    #[serde(default)]
    pub filename: Option<String>,
    pub data: String,
    #[serde(default)]
    pub mime: Option<String>,
}
