//! The `list_categories` tool.

use courseforge_catalog::CatalogStore;
use courseforge_core::{CatalogTool, ToolFailure, ToolOutcome};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::args::parse_args;

/// Lists all catalog categories in display order. Takes no arguments.
pub struct ListCategoriesTool {
    store: CatalogStore,
}

#[derive(Deserialize)]
struct ListCategoriesArgs {}

impl ListCategoriesTool {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }
}

impl CatalogTool for ListCategoriesTool {
    fn name(&self) -> &str {
        "list_categories"
    }

    fn description(&self) -> &str {
        "List all course categories in their display order."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    fn invoke(&self, args: Value) -> ToolOutcome {
        if let Err(reason) = parse_args::<ListCategoriesArgs>(args) {
            return ToolOutcome::failed(reason);
        }
        match self.store.list_categories() {
            Ok(categories) => ToolOutcome::success(json!({
                "total": categories.len(),
                "categories": categories,
            })),
            Err(e) => ToolOutcome::failed(ToolFailure::store(e.to_string())),
        }
    }
}
