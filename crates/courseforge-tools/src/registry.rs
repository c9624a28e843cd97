//! In-memory registry that routes tool calls to implementations.

use courseforge_catalog::CatalogStore;
use courseforge_core::{CatalogTool, IndexPicker, ToolDeclaration, ToolOutcome};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::categories::ListCategoriesTool;
use crate::courses::{ListAllCoursesTool, SearchCoursesTool};
use crate::create_course::CreateCourseTool;
use crate::lessons::ListLessonsTool;

/// Dispatch surface for tool calls coming out of the model stream.
pub trait ToolRegistry: Send + Sync {
    /// Execute the named tool. Returns `None` when no such tool exists.
    fn dispatch(&self, name: &str, args: Value) -> Option<ToolOutcome>;

    /// Declarations advertised to the model gateway.
    fn declarations(&self) -> Vec<ToolDeclaration>;
}

/// The catalog tool set, held as trait objects for uniform dispatch.
#[derive(Clone, Default)]
pub struct CatalogToolRegistry {
    tools: Vec<Arc<dyn CatalogTool>>,
}

impl CatalogToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn with_tool(mut self, tool: Arc<dyn CatalogTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// The four read-only tools the chat assistant gets.
    pub fn read_only(store: CatalogStore) -> Self {
        Self::new()
            .with_tool(Arc::new(ListAllCoursesTool::new(store.clone())))
            .with_tool(Arc::new(SearchCoursesTool::new(store.clone())))
            .with_tool(Arc::new(ListLessonsTool::new(store.clone())))
            .with_tool(Arc::new(ListCategoriesTool::new(store)))
    }

    /// Only the side-effecting creation tool, for the course generation
    /// workflow.
    pub fn creation(store: CatalogStore, picker: Arc<dyn IndexPicker>) -> Self {
        Self::new().with_tool(Arc::new(CreateCourseTool::new(store, picker)))
    }

    /// Everything: the four read-only tools plus the creation tool.
    pub fn full(store: CatalogStore, picker: Arc<dyn IndexPicker>) -> Self {
        Self::read_only(store.clone()).with_tool(Arc::new(CreateCourseTool::new(store, picker)))
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolRegistry for CatalogToolRegistry {
    fn dispatch(&self, name: &str, args: Value) -> Option<ToolOutcome> {
        let tool = self.tools.iter().find(|t| t.name() == name)?;
        debug!(tool = name, "dispatching tool call");
        Some(tool.invoke(args))
    }

    fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.iter().map(|t| t.declaration()).collect()
    }
}
