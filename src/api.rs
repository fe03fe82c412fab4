//! StudyNest API module
//!
//! Provides the authenticated request client with refresh recovery and the
//! typed endpoint wrappers the pages consume.

pub mod error;
mod study;
pub mod study_api;

pub use error::ApiError;
pub use study::StudyClient;
pub use study_api::StudyApi;
pub use study_api::model::{
    AuthSession, Badge, ChatMessage, ChatRole, DayPlan, LofiStation, LofiTrack, PlanRequest,
    ProgressSummary, SessionStatus, StudySession, Subject, SubjectDraft, UserProfile,
};
