//! SQLite-backed catalog store.
//!
//! The pipeline does not own long-lived state of its own; every tool reads
//! and writes the surrounding catalog entities (courses, lessons,
//! categories, users) through [`CatalogStore`].

mod error;
mod rows;
mod store;

pub use error::{CatalogError, CatalogResult};
pub use rows::{
    CategoryRow, CourseCounts, CourseFilter, CourseRow, LessonRow, NewCourse, NewLesson, UserRow,
};
pub use store::CatalogStore;
