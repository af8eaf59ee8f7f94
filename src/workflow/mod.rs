pub mod interview;
pub mod session_store;

pub use interview::{InterviewError, InterviewPhase, InterviewState, PendingAnswer, QUESTION_COUNT};
pub use session_store::{Completion, OperationKind, SessionStore, Ticket};
