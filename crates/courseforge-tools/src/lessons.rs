//! The `list_lessons` tool.

use courseforge_catalog::CatalogStore;
use courseforge_core::{CatalogTool, ToolFailure, ToolOutcome};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::args::parse_args;

/// Lessons are capped hard: the model reads them as context and never
/// needs more than a screenful.
const LESSON_LIMIT: u32 = 20;

/// Lists lessons for a course and/or matching a free-text query.
pub struct ListLessonsTool {
    store: CatalogStore,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListLessonsArgs {
    course_id: Option<String>,
    query: Option<String>,
}

impl ListLessonsTool {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }
}

impl CatalogTool for ListLessonsTool {
    fn name(&self) -> &str {
        "list_lessons"
    }

    fn description(&self) -> &str {
        "List lessons, optionally scoped to one course and/or filtered by \
         a case-insensitive text query, in position order."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "courseId": {
                    "type": "string",
                    "description": "Restrict to lessons of this course."
                },
                "query": {
                    "type": "string",
                    "description": "Case-insensitive substring matched against lesson title and description."
                }
            }
        })
    }

    fn invoke(&self, args: Value) -> ToolOutcome {
        let args: ListLessonsArgs = match parse_args(args) {
            Ok(args) => args,
            Err(reason) => return ToolOutcome::failed(reason),
        };
        match self.store.list_lessons(
            args.course_id.as_deref(),
            args.query.as_deref(),
            LESSON_LIMIT,
        ) {
            Ok(lessons) => ToolOutcome::success(json!({
                "total": lessons.len(),
                "lessons": lessons,
            })),
            Err(e) => ToolOutcome::failed(ToolFailure::store(e.to_string())),
        }
    }
}
