//! Core types shared across the CourseForge pipeline.
//!
//! This crate defines the vocabulary the rest of the workspace speaks:
//! conversation messages, model-proposed course/lesson drafts, the
//! [`CatalogTool`] trait with its structured outcomes, slug derivation,
//! and an injectable randomness seam for the tools that make random picks.

pub mod draft;
pub mod message;
pub mod random;
pub mod slug;
pub mod tool;

pub use draft::{CourseDraft, CourseLevel, DraftError, LessonDraft, LessonKind};
pub use message::{ChatMessage, Role};
pub use random::{IndexPicker, RandomPicker, SequencePicker};
pub use slug::{slugify, unique_slug};
pub use tool::{CatalogTool, ToolDeclaration, ToolFailure, ToolOutcome};
