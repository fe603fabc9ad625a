//! 食谱库工具
#![allow(missing_docs)]

use crate::data::library::{self, RecipeFilter};
use crate::data::FoodService;
use crate::tools::{json_result, parse_args, tool_error, Tool};
use crate::utils::validation;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 列出食谱书
#[macros::mcp_tool(
    name = "list_cookbooks",
    title = "列出食谱书",
    description = "列出食谱库中的全部食谱书，包括可读名称和食谱数量。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListCookbooksTool {}

/// 获取食谱书
#[macros::mcp_tool(
    name = "get_cookbook",
    title = "获取食谱书",
    description = "获取一本食谱书中的全部食谱，链接和图片均为绝对地址。食谱书不存在时返回可用列表。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCookbookTool {
    /// 食谱书名称
    #[json_schema(title = "食谱书", description = "食谱书键名")]
    pub cookbook: String,
}

/// 获取单个食谱
#[macros::mcp_tool(
    name = "get_recipe",
    title = "获取食谱",
    description = "按食谱键获取单个食谱。可指定食谱书，未指定时在整个库中查找。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetRecipeTool {
    /// 食谱键
    #[json_schema(title = "食谱键", description = "食谱在食谱书中的键名")]
    pub key: String,

    /// 食谱书名称
    #[json_schema(title = "食谱书", description = "限定的食谱书（可选）")]
    pub cookbook: Option<String>,
}

/// 搜索食谱
#[macros::mcp_tool(
    name = "search_recipes",
    title = "搜索食谱",
    description = "在德语/英语标题、德语转写和泰语名称中做不区分大小写的子串搜索。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchRecipesTool {
    /// 搜索关键词
    #[json_schema(title = "搜索查询", description = "搜索关键词，例如：curry、ต้มยำ、Suppe")]
    pub query: String,
}

/// 过滤食谱
#[macros::mcp_tool(
    name = "filter_recipes",
    title = "过滤食谱",
    description = "按地区和食谱书过滤食谱，两个条件同时生效，未设置的条件不参与过滤。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct FilterRecipesTool {
    /// 地区
    #[json_schema(title = "地区", description = "食谱所属地区，不区分大小写，例如：Isaan")]
    pub region: Option<String>,

    /// 食谱书
    #[json_schema(title = "食谱书", description = "食谱书键名，不区分大小写")]
    pub cookbook: Option<String>,
}

/// 食谱库统计
#[macros::mcp_tool(
    name = "library_stats",
    title = "食谱库统计",
    description = "统计食谱书数量、食谱总数、每本食谱书的食谱数量以及地区分布，按数量降序。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct LibraryStatsTool {}

/// 列出食谱书工具实现
pub struct ListCookbooksToolImpl {
    service: Arc<FoodService>,
}

impl ListCookbooksToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for ListCookbooksToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        ListCookbooksTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: ListCookbooksTool = parse_args("list_cookbooks", arguments)?;
        let lib = self
            .service
            .library()
            .await
            .map_err(|e| tool_error("list_cookbooks", e))?;

        json_result(&library::list_cookbooks(&lib))
    }
}

/// 获取食谱书工具实现
pub struct GetCookbookToolImpl {
    service: Arc<FoodService>,
}

impl GetCookbookToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetCookbookToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetCookbookTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: GetCookbookTool = parse_args("get_cookbook", arguments)?;
        validation::require("cookbook", &params.cookbook)
            .map_err(|e| tool_error("get_cookbook", e))?;

        let lib = self
            .service
            .library()
            .await
            .map_err(|e| tool_error("get_cookbook", e))?;
        let view = library::get_cookbook(&lib, params.cookbook.trim())
            .map_err(|e| tool_error("get_cookbook", e))?;

        json_result(&view)
    }
}

/// 获取食谱工具实现
pub struct GetRecipeToolImpl {
    service: Arc<FoodService>,
}

impl GetRecipeToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetRecipeToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetRecipeTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: GetRecipeTool = parse_args("get_recipe", arguments)?;
        validation::require("key", &params.key).map_err(|e| tool_error("get_recipe", e))?;
        let cookbook = params
            .cookbook
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let lib = self
            .service
            .library()
            .await
            .map_err(|e| tool_error("get_recipe", e))?;
        let recipe = library::get_recipe(&lib, cookbook, params.key.trim())
            .map_err(|e| tool_error("get_recipe", e))?;

        json_result(&recipe)
    }
}

/// 搜索食谱工具实现
pub struct SearchRecipesToolImpl {
    service: Arc<FoodService>,
}

impl SearchRecipesToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchRecipesToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        SearchRecipesTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: SearchRecipesTool = parse_args("search_recipes", arguments)?;
        validation::validate_search_query(&params.query)
            .map_err(|e| tool_error("search_recipes", e))?;

        let lib = self
            .service
            .library()
            .await
            .map_err(|e| tool_error("search_recipes", e))?;
        let found = library::search_recipes(&lib, params.query.trim());

        json_result(&serde_json::json!({
            "query": params.query,
            "count": found.len(),
            "recipes": found,
        }))
    }
}

/// 过滤食谱工具实现
pub struct FilterRecipesToolImpl {
    service: Arc<FoodService>,
}

impl FilterRecipesToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for FilterRecipesToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        FilterRecipesTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: FilterRecipesTool = parse_args("filter_recipes", arguments)?;
        let filter = RecipeFilter {
            region: params.region.filter(|r| !r.trim().is_empty()),
            cookbook: params.cookbook.filter(|c| !c.trim().is_empty()),
        };

        let lib = self
            .service
            .library()
            .await
            .map_err(|e| tool_error("filter_recipes", e))?;
        let found = library::filter_recipes(&lib, &filter);

        json_result(&serde_json::json!({
            "count": found.len(),
            "recipes": found,
        }))
    }
}

/// 食谱库统计工具实现
pub struct LibraryStatsToolImpl {
    service: Arc<FoodService>,
}

impl LibraryStatsToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for LibraryStatsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        LibraryStatsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: LibraryStatsTool = parse_args("library_stats", arguments)?;
        let lib = self
            .service
            .library()
            .await
            .map_err(|e| tool_error("library_stats", e))?;

        json_result(&library::stats(&lib))
    }
}
