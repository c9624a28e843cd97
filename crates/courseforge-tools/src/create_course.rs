//! The single side-effecting tool: `create_course_with_lessons`.
//!
//! Creation runs in stages: validate the draft, resolve an instructor,
//! commit the course row, then commit all lessons in one transaction. A
//! lesson failure after the course committed is reported as its own
//! failure kind that names the already-created course.

use courseforge_catalog::{CatalogStore, NewCourse, NewLesson};
use courseforge_core::{
    CatalogTool, CourseDraft, IndexPicker, ToolFailure, ToolOutcome, unique_slug,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::args::parse_args;

pub const CREATE_COURSE_TOOL: &str = "create_course_with_lessons";

/// Thumbnails are assigned from a fixed pool; the platform does not
/// generate imagery.
pub const THUMBNAILS: [&str; 6] = [
    "/thumbnails/abstract-01.jpg",
    "/thumbnails/abstract-02.jpg",
    "/thumbnails/abstract-03.jpg",
    "/thumbnails/abstract-04.jpg",
    "/thumbnails/abstract-05.jpg",
    "/thumbnails/abstract-06.jpg",
];

/// Persists a model-drafted course and its lessons into the catalog.
pub struct CreateCourseTool {
    store: CatalogStore,
    picker: Arc<dyn IndexPicker>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCourseArgs {
    #[serde(flatten)]
    draft: CourseDraft,
    instructor_id: Option<String>,
}

impl CreateCourseTool {
    pub fn new(store: CatalogStore, picker: Arc<dyn IndexPicker>) -> Self {
        Self { store, picker }
    }

    /// Resolve the owning instructor: the requested one if it exists and
    /// is an instructor, otherwise a random instructor account.
    fn resolve_instructor(&self, requested: Option<&str>) -> Result<String, ToolFailure> {
        if let Some(id) = requested {
            match self.store.instructor(id) {
                Ok(Some(user)) => return Ok(user.id),
                Ok(None) => {
                    warn!(instructor_id = id, "requested instructor not found, falling back");
                }
                Err(e) => return Err(ToolFailure::store(e.to_string())),
            }
        }
        let instructors = self
            .store
            .instructors()
            .map_err(|e| ToolFailure::store(e.to_string()))?;
        let idx = self
            .picker
            .pick_index(instructors.len())
            .ok_or(ToolFailure::NoInstructors)?;
        Ok(instructors[idx].id.clone())
    }

    fn pick_thumbnail(&self) -> String {
        // The pool is non-empty, so the pick never misses.
        let idx = self.picker.pick_index(THUMBNAILS.len()).unwrap_or(0);
        THUMBNAILS[idx].to_string()
    }

    fn create(&self, args: CreateCourseArgs) -> Result<Value, ToolFailure> {
        let draft = args.draft;
        draft
            .validate()
            .map_err(|e| ToolFailure::invalid_arguments(e.to_string()))?;

        let instructor_id = self.resolve_instructor(args.instructor_id.as_deref())?;

        let new_course = NewCourse {
            slug: unique_slug(&draft.title),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            level: draft.level,
            duration: draft.duration,
            price: 0.0,
            status: "published".to_string(),
            tags: draft.tags,
            prerequisites: draft.prerequisites,
            learning_objectives: draft.learning_objectives,
            thumbnail: self.pick_thumbnail(),
            instructor_id,
            ai_generated: true,
        };

        let course = self
            .store
            .insert_course(&new_course)
            .map_err(|e| ToolFailure::store(e.to_string()))?
            .ok_or_else(|| ToolFailure::Custom {
                category: "store".to_string(),
                message: "course creation failed".to_string(),
            })?;

        let lessons: Vec<NewLesson> = draft
            .lessons
            .into_iter()
            .enumerate()
            .map(|(i, lesson)| NewLesson {
                course_id: course.id.clone(),
                slug: unique_slug(&lesson.title),
                title: lesson.title,
                description: lesson.description,
                kind: lesson.kind,
                duration: lesson.duration,
                content: lesson.content,
                position: i as i64 + 1,
                is_free: i == 0,
            })
            .collect();

        let lessons_created =
            self.store
                .insert_lessons(&lessons)
                .map_err(|e| ToolFailure::LessonsFailed {
                    course_id: course.id.clone(),
                    message: e.to_string(),
                })?;

        info!(
            course_id = %course.id,
            slug = %course.slug,
            lessons = lessons_created,
            "created course"
        );

        Ok(json!({
            "success": true,
            "course": course,
            "lessonsCreated": lessons_created,
            "message": format!(
                "Course '{}' created with {} lessons",
                course.title, lessons_created
            ),
        }))
    }
}

impl CatalogTool for CreateCourseTool {
    fn name(&self) -> &str {
        CREATE_COURSE_TOOL
    }

    fn description(&self) -> &str {
        "Create a new published course together with its lessons. The \
         first lesson is free; lesson order follows the list order."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Course title."},
                "description": {"type": "string", "description": "What the course covers."},
                "category": {"type": "string", "description": "Catalog category name."},
                "level": {
                    "type": "string",
                    "enum": ["beginner", "intermediate", "advanced"]
                },
                "duration": {"type": "string", "description": "Total duration label, e.g. '6 hours'."},
                "tags": {"type": "array", "items": {"type": "string"}},
                "prerequisites": {"type": "array", "items": {"type": "string"}},
                "learningObjectives": {"type": "array", "items": {"type": "string"}},
                "instructorId": {
                    "type": "string",
                    "description": "Owning instructor; a random instructor is assigned when absent or unknown."
                },
                "lessons": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "description": {"type": "string"},
                            "type": {
                                "type": "string",
                                "enum": ["video", "text", "quiz", "assignment"]
                            },
                            "duration": {"type": "string"},
                            "content": {"type": "string"}
                        },
                        "required": ["title", "type"]
                    }
                }
            },
            "required": ["title", "description", "category", "level"]
        })
    }

    fn invoke(&self, args: Value) -> ToolOutcome {
        let args: CreateCourseArgs = match parse_args(args) {
            Ok(args) => args,
            Err(reason) => return ToolOutcome::failed(reason),
        };
        match self.create(args) {
            Ok(value) => ToolOutcome::success(value),
            Err(reason) => ToolOutcome::failed(reason),
        }
    }
}
