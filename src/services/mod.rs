//! External collaborators and study helpers
//!
//! The generative-text provider and the profile store sit behind traits so
//! handlers and the focus controller never depend on a concrete backend.

pub mod gemini;
pub mod generator;
pub mod profiles;
pub mod reflection;
pub mod study_plan;

// Re-export main types
pub use gemini::GeminiClient;
pub use generator::{AnswerFeedback, FlashcardDraft, GenerateError, TextGenerator, UnconfiguredGenerator};
pub use profiles::{MemoryProfileStore, ProfileStore, RegisterProfile};
pub use reflection::{fallback_questions, ReflectionGenerator, ReflectionQuestion, DEFAULT_QUESTION_COUNT};
pub use study_plan::{build_study_plan, PlanDay, PlanSession, StudyPlan};
