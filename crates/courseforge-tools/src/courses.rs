//! Read-only course tools: `list_all_courses` and `search_courses`.

use courseforge_catalog::{CatalogStore, CourseFilter};
use courseforge_core::{CatalogTool, CourseLevel, ToolFailure, ToolOutcome};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::args::parse_args;

const DEFAULT_LIST_LIMIT: u32 = 50;
const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Lists the catalog ordered by rating and popularity.
pub struct ListAllCoursesTool {
    store: CatalogStore,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListAllCoursesArgs {
    limit: Option<u32>,
}

impl ListAllCoursesTool {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }
}

impl CatalogTool for ListAllCoursesTool {
    fn name(&self) -> &str {
        "list_all_courses"
    }

    fn description(&self) -> &str {
        "List courses in the catalog, highest rated and most enrolled first."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of courses to return (default 50)."
                }
            }
        })
    }

    fn invoke(&self, args: Value) -> ToolOutcome {
        let args: ListAllCoursesArgs = match parse_args(args) {
            Ok(args) => args,
            Err(reason) => return ToolOutcome::failed(reason),
        };
        let limit = args.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        match self.store.list_courses(limit) {
            Ok(courses) => ToolOutcome::success(json!({
                "total": courses.len(),
                "courses": courses,
            })),
            Err(e) => ToolOutcome::failed(ToolFailure::store(e.to_string())),
        }
    }
}

/// Filtered course search over title, description, category and level.
pub struct SearchCoursesTool {
    store: CatalogStore,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchCoursesArgs {
    query: Option<String>,
    category: Option<String>,
    level: Option<CourseLevel>,
    limit: Option<u32>,
}

impl SearchCoursesTool {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }
}

impl CatalogTool for SearchCoursesTool {
    fn name(&self) -> &str {
        "search_courses"
    }

    fn description(&self) -> &str {
        "Search courses by free text, category and difficulty level. \
         All filters are optional and combined with AND."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Case-insensitive substring matched against title, description and category."
                },
                "category": {
                    "type": "string",
                    "description": "Exact category name."
                },
                "level": {
                    "type": "string",
                    "enum": ["beginner", "intermediate", "advanced"],
                    "description": "Difficulty level."
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results (default 20)."
                }
            }
        })
    }

    fn invoke(&self, args: Value) -> ToolOutcome {
        let args: SearchCoursesArgs = match parse_args(args) {
            Ok(args) => args,
            Err(reason) => return ToolOutcome::failed(reason),
        };
        let filter = CourseFilter {
            query: args.query,
            category: args.category,
            level: args.level,
            limit: args.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        };
        match self.store.search_courses(&filter) {
            Ok(courses) => ToolOutcome::success(json!({
                "total": courses.len(),
                "courses": courses,
            })),
            Err(e) => ToolOutcome::failed(ToolFailure::store(e.to_string())),
        }
    }
}
