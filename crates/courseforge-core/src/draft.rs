//! Model-proposed course and lesson drafts.
//!
//! A draft is ephemeral: it exists only between the model emitting a
//! `create_course_with_lessons` tool call and the catalog committing rows.
//! Drafts are validated before any side effect happens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty level of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "beginner" => Some(CourseLevel::Beginner),
            "intermediate" => Some(CourseLevel::Intermediate),
            "advanced" => Some(CourseLevel::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of content a lesson carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Text,
    Quiz,
    Assignment,
}

impl LessonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonKind::Video => "video",
            LessonKind::Text => "text",
            LessonKind::Quiz => "quiz",
            LessonKind::Assignment => "assignment",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "video" => Some(LessonKind::Video),
            "text" => Some(LessonKind::Text),
            "quiz" => Some(LessonKind::Quiz),
            "assignment" => Some(LessonKind::Assignment),
            _ => None,
        }
    }
}

/// A not-yet-persisted lesson proposed by the model.
///
/// The `position` of a lesson is never trusted from model output; the
/// creation tool assigns positions from list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    /// Duration label as the model produced it, e.g. "12 min".
    #[serde(default)]
    pub duration: String,
    /// Content outline for the lesson body.
    #[serde(default)]
    pub content: String,
}

/// A not-yet-persisted course proposed by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: CourseLevel,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub lessons: Vec<LessonDraft>,
}

/// Validation failures for a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("course title must not be empty")]
    EmptyTitle,
    #[error("course description must not be empty")]
    EmptyDescription,
    #[error("course category must not be empty")]
    EmptyCategory,
    #[error("lesson {index} has an empty title")]
    EmptyLessonTitle { index: usize },
}

impl CourseDraft {
    /// Check the structural invariants a draft must hold before the
    /// creation tool may touch the catalog. An empty lesson list is valid:
    /// the course is still created with zero lessons.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::EmptyDescription);
        }
        if self.category.trim().is_empty() {
            return Err(DraftError::EmptyCategory);
        }
        for (index, lesson) in self.lessons.iter().enumerate() {
            if lesson.title.trim().is_empty() {
                return Err(DraftError::EmptyLessonTitle { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_draft() -> CourseDraft {
        CourseDraft {
            title: "HTTP Caching from Scratch".into(),
            description: "Cache-Control, ETags and CDNs".into(),
            category: "Web Development".into(),
            level: CourseLevel::Beginner,
            duration: "3 hours".into(),
            tags: vec!["http".into(), "caching".into()],
            prerequisites: vec![],
            learning_objectives: vec!["Understand cache headers".into()],
            lessons: vec![LessonDraft {
                title: "Why caches exist".into(),
                description: "Latency and origin offload".into(),
                kind: LessonKind::Video,
                duration: "10 min".into(),
                content: "CDN basics".into(),
            }],
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(sample_draft().validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut draft = sample_draft();
        draft.title = "  ".into();
        assert_eq!(draft.validate(), Err(DraftError::EmptyTitle));
    }

    #[test]
    fn empty_lesson_list_is_valid() {
        let mut draft = sample_draft();
        draft.lessons.clear();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn lesson_with_blank_title_is_rejected() {
        let mut draft = sample_draft();
        draft.lessons[0].title = "".into();
        assert_eq!(
            draft.validate(),
            Err(DraftError::EmptyLessonTitle { index: 0 })
        );
    }

    #[test]
    fn draft_deserializes_from_model_arguments() {
        let args = json!({
            "title": "Intro to SQL",
            "description": "Joins and indexes",
            "category": "Databases",
            "level": "intermediate",
            "duration": "2 hours",
            "tags": ["sql"],
            "learningObjectives": ["Write a join"],
            "lessons": [
                {"title": "SELECT basics", "type": "video", "duration": "8 min"}
            ]
        });

        let draft: CourseDraft = serde_json::from_value(args).unwrap();
        assert_eq!(draft.level, CourseLevel::Intermediate);
        assert_eq!(draft.lessons[0].kind, LessonKind::Video);
        assert!(draft.prerequisites.is_empty());
    }

    #[test]
    fn unknown_level_fails_deserialization() {
        let args = json!({
            "title": "t", "description": "d", "category": "c",
            "level": "wizard"
        });
        assert!(serde_json::from_value::<CourseDraft>(args).is_err());
    }
}
