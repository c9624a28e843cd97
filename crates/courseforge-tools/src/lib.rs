//! The fixed set of named, schema-validated operations the model may
//! invoke against the catalog.
//!
//! Four tools are read-only; `create_course_with_lessons` is the single
//! side-effecting one. Every tool deserializes a typed argument struct
//! before touching the store, so invalid arguments short-circuit with a
//! structured error and no side effect.

mod args;
mod categories;
mod courses;
mod create_course;
mod lessons;
mod registry;

pub use categories::ListCategoriesTool;
pub use courses::{ListAllCoursesTool, SearchCoursesTool};
pub use create_course::{CREATE_COURSE_TOOL, CreateCourseTool, THUMBNAILS};
pub use lessons::ListLessonsTool;
pub use registry::{CatalogToolRegistry, ToolRegistry};
