//! Conversation orchestration on top of the model gateway and the tool
//! registry.
//!
//! [`ChatOrchestrator`] drives the streaming chat workflow; a caller gets
//! incremental [`ChatUpdate`]s over a channel. [`CourseGenerator`] is the
//! single-shot specialization that turns one free-text prompt into one
//! `create_course_with_lessons` invocation.

mod error;
mod generate;
mod orchestrator;
mod prompt;
mod update;

pub use error::ChatError;
pub use generate::{CourseGenerator, GeneratedCourse, GenerationFailure};
pub use orchestrator::ChatOrchestrator;
pub use update::ChatUpdate;
