//! MCP tools module
//!
//! One tool per query operation of the four datasets, plus `health_check`.

pub mod books;
pub mod dictionary;
pub mod encyclopedia;
pub mod health;
pub mod library;

use crate::data::FoodService;
use crate::error::Error;
use async_trait::async_trait;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult, Tool as McpTool};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Tool trait
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool definition
    fn definition(&self) -> McpTool;

    /// Execute tool
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError>;
}

/// Tool registry
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    #[must_use]
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register tool
    #[must_use]
    pub fn register<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Get all tool definitions
    #[must_use]
    pub fn get_tools(&self) -> Vec<McpTool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Names of all registered tools
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.definition().name).collect()
    }

    /// Execute tool
    ///
    /// Missing arguments (`null`) are treated as an empty object so that
    /// tools without required parameters can be called bare.
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let arguments = match arguments {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            other => other,
        };

        for tool in &self.tools {
            if tool.definition().name == name {
                tracing::debug!("执行工具: {name}");
                return tool.execute(arguments).await;
            }
        }

        Err(CallToolError::unknown_tool(name.to_string()))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create default tool registry
#[must_use]
pub fn create_default_registry(service: &Arc<FoodService>) -> ToolRegistry {
    ToolRegistry::new()
        .register(dictionary::ListCategoriesToolImpl::new(service.clone()))
        .register(dictionary::GetCategoryToolImpl::new(service.clone()))
        .register(dictionary::SearchDictionaryToolImpl::new(service.clone()))
        .register(dictionary::TranslateWordToolImpl::new(service.clone()))
        .register(dictionary::DictionaryStatsToolImpl::new(service.clone()))
        .register(books::ListBooksToolImpl::new(service.clone()))
        .register(books::GetBookToolImpl::new(service.clone()))
        .register(books::SearchBooksToolImpl::new(service.clone()))
        .register(books::BooksByAuthorToolImpl::new(service.clone()))
        .register(books::BooksByLanguageToolImpl::new(service.clone()))
        .register(books::BookStatsToolImpl::new(service.clone()))
        .register(library::ListCookbooksToolImpl::new(service.clone()))
        .register(library::GetCookbookToolImpl::new(service.clone()))
        .register(library::GetRecipeToolImpl::new(service.clone()))
        .register(library::SearchRecipesToolImpl::new(service.clone()))
        .register(library::FilterRecipesToolImpl::new(service.clone()))
        .register(library::LibraryStatsToolImpl::new(service.clone()))
        .register(encyclopedia::ListEntriesToolImpl::new(service.clone()))
        .register(encyclopedia::GetEntryToolImpl::new(service.clone()))
        .register(encyclopedia::SearchEntriesToolImpl::new(service.clone()))
        .register(encyclopedia::EntryRelationsToolImpl::new(service.clone()))
        .register(encyclopedia::ListRegionsToolImpl)
        .register(encyclopedia::ListRelationshipsToolImpl)
        .register(encyclopedia::EncyclopediaStatsToolImpl::new(service.clone()))
        .register(health::HealthCheckToolImpl::new(service.clone()))
}

/// Deserialize tool arguments, reporting failures as invalid arguments
pub(crate) fn parse_args<T: DeserializeOwned>(
    tool: &str,
    arguments: serde_json::Value,
) -> std::result::Result<T, CallToolError> {
    serde_json::from_value(arguments).map_err(|e| {
        CallToolError::invalid_arguments(tool, Some(format!("参数解析失败: {e}")))
    })
}

/// Render a serializable value as a pretty JSON text result
pub(crate) fn json_result<T: Serialize + ?Sized>(
    value: &T,
) -> std::result::Result<CallToolResult, CallToolError> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| CallToolError::from_message(format!("JSON 序列化失败: {e}")))?;
    Ok(CallToolResult::text_content(vec![content.into()]))
}

/// Map a crate error onto the MCP error space
///
/// Caller mistakes (unknown keys, bad parameters) become invalid arguments,
/// everything else is reported as an internal failure.
pub(crate) fn tool_error(tool: &str, err: Error) -> CallToolError {
    if err.is_client_error() {
        CallToolError::invalid_arguments(tool, Some(err.to_string()))
    } else {
        tracing::error!("工具 {tool} 执行失败: {err}");
        CallToolError::from_message(err.to_string())
    }
}
