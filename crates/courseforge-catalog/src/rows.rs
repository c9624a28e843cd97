//! Typed rows and insert payloads for the catalog tables.

use chrono::{DateTime, Utc};
use courseforge_core::{CourseLevel, LessonKind};
use serde::{Deserialize, Serialize};

/// A persisted course as exposed over the API and to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    pub duration: String,
    pub price: f64,
    pub status: String,
    pub rating: f64,
    pub enrollment_count: i64,
    pub tags: Vec<String>,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub thumbnail: String,
    pub instructor_id: String,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

/// A persisted lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRow {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    pub duration: String,
    pub content: String,
    pub position: i64,
    pub is_free: bool,
    pub created_at: DateTime<Utc>,
}

/// A catalog category with its explicit display ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub display_order: i64,
}

/// A user account; instructors have `role == "instructor"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// Aggregate counts backing `GET /ai/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseCounts {
    pub total: i64,
    pub ai_generated: i64,
}

/// Search filter for courses. Absent fields are simply omitted from the
/// query; an all-absent filter behaves like an unfiltered list.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    /// Case-insensitive substring over title, description and category.
    pub query: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact level match.
    pub level: Option<CourseLevel>,
    pub limit: u32,
}

/// Payload for inserting a course row.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    pub duration: String,
    pub price: f64,
    pub status: String,
    pub tags: Vec<String>,
    pub prerequisites: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub thumbnail: String,
    pub instructor_id: String,
    pub ai_generated: bool,
}

/// Payload for inserting a lesson row.
#[derive(Debug, Clone)]
pub struct NewLesson {
    pub course_id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub kind: LessonKind,
    pub duration: String,
    pub content: String,
    pub position: i64,
    pub is_free: bool,
}
