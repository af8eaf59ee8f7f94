pub mod loaders;
pub mod operation;
pub mod payloads;
pub mod session;

pub use loaders::{load_scenario, Scenario};
pub use operation::Operation;
pub use payloads::{
    AnalyzeRequest, AnalyzeResult, DocxExportRequest, EncodedPdf, ExtractedText,
    InterviewQuestions, LinkedinResult, PdfExportRequest, RewriteResult, ScoreRequest,
    ScoreResponse, ScoredAnswer, TextPairRequest,
};
pub use session::{reduce, ResultAggregate, ResultPatch, SessionAction, SessionState};
