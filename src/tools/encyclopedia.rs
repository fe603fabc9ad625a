//! 美食百科工具
#![allow(missing_docs)]

use crate::data::encyclopedia::{self, EntryFilter};
use crate::data::FoodService;
use crate::tools::{json_result, parse_args, tool_error, Tool};
use crate::utils::validation;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 列出百科条目
#[macros::mcp_tool(
    name = "list_entries",
    title = "列出百科条目",
    description = "列出美食百科条目摘要。可按标签和地区过滤；地区可以是 central、north、isaan、south 或任一语言的地区名称。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListEntriesTool {
    /// 标签
    #[json_schema(title = "标签", description = "条目标签，不区分大小写")]
    pub tag: Option<String>,

    /// 地区
    #[json_schema(title = "地区", description = "地区键或名称，例如：isaan、Nordthailand、ภาคใต้")]
    pub region: Option<String>,

    /// 是否返回完整条目
    #[json_schema(title = "完整条目", description = "为 true 时返回完整条目而非摘要", default = false)]
    pub full: Option<bool>,
}

/// 获取百科条目
#[macros::mcp_tool(
    name = "get_entry",
    title = "获取百科条目",
    description = "按泰语名称、条目 ID、别名或转写获取一个百科条目的完整内容。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetEntryTool {
    /// 条目名称
    #[json_schema(title = "名称", description = "泰语名称、ID、别名或转写，例如：ต้มยำกุ้ง、Tom Yam Gung")]
    pub name: String,
}

/// 搜索百科
#[macros::mcp_tool(
    name = "search_entries",
    title = "搜索百科",
    description = "在名称、别名以及德语/英语的转写、摘要、描述、标签和地区中搜索，结果保持原始顺序。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchEntriesTool {
    /// 搜索关键词
    #[json_schema(title = "搜索查询", description = "搜索关键词，例如：curry、Fischsauce")]
    pub query: String,

    /// 结果数量限制
    #[json_schema(title = "结果限制", description = "返回的最大结果数量（可选）", minimum = 1)]
    pub limit: Option<u32>,
}

/// 条目关系
#[macros::mcp_tool(
    name = "entry_relations",
    title = "条目关系",
    description = "列出一个百科条目在德语和英语部分中的关系链接（usedBy、uses、fits、fittedBy、variations、variationOf）。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct EntryRelationsTool {
    /// 条目名称
    #[json_schema(title = "名称", description = "泰语名称、ID、别名或转写")]
    pub name: String,
}

/// 列出地区
#[macros::mcp_tool(
    name = "list_regions",
    title = "列出泰国地区",
    description = "列出泰国的四个美食地区（central、north、isaan、south）及其泰文、德语和英语名称。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListRegionsTool {}

/// 列出关系类型
#[macros::mcp_tool(
    name = "list_relationships",
    title = "列出关系类型",
    description = "列出百科条目的六种关系字段及其德语和英语说明。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListRelationshipsTool {}

/// 百科统计
#[macros::mcp_tool(
    name = "encyclopedia_stats",
    title = "百科统计",
    description = "统计百科条目数量、图片和语言覆盖情况，以及地区和标签分布。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct EncyclopediaStatsTool {}

/// 列出条目工具实现
pub struct ListEntriesToolImpl {
    service: Arc<FoodService>,
}

impl ListEntriesToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for ListEntriesToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        ListEntriesTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: ListEntriesTool = parse_args("list_entries", arguments)?;
        let filter = EntryFilter {
            tag: params.tag.filter(|t| !t.trim().is_empty()),
            region: params.region.filter(|r| !r.trim().is_empty()),
        };

        let data = self
            .service
            .encyclopedia()
            .await
            .map_err(|e| tool_error("list_entries", e))?;

        if params.full.unwrap_or(false) {
            let entries = encyclopedia::filter_entries(&data, &filter);
            json_result(&serde_json::json!({"count": entries.len(), "entries": entries}))
        } else {
            let entries = encyclopedia::list_entries(&data, &filter);
            json_result(&serde_json::json!({"count": entries.len(), "entries": entries}))
        }
    }
}

/// 获取条目工具实现
pub struct GetEntryToolImpl {
    service: Arc<FoodService>,
}

impl GetEntryToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetEntryToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetEntryTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: GetEntryTool = parse_args("get_entry", arguments)?;
        validation::require("name", &params.name).map_err(|e| tool_error("get_entry", e))?;

        let data = self
            .service
            .encyclopedia()
            .await
            .map_err(|e| tool_error("get_entry", e))?;
        let entry =
            encyclopedia::get_entry(&data, &params.name).map_err(|e| tool_error("get_entry", e))?;

        json_result(entry)
    }
}

/// 搜索百科工具实现
pub struct SearchEntriesToolImpl {
    service: Arc<FoodService>,
}

impl SearchEntriesToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchEntriesToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        SearchEntriesTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: SearchEntriesTool = parse_args("search_entries", arguments)?;
        validation::validate_search_query(&params.query)
            .map_err(|e| tool_error("search_entries", e))?;
        let limit = validation::validate_limit(params.limit)
            .map_err(|e| tool_error("search_entries", e))?;

        let data = self
            .service
            .encyclopedia()
            .await
            .map_err(|e| tool_error("search_entries", e))?;
        let found = encyclopedia::search_entries(&data, params.query.trim(), limit);

        json_result(&serde_json::json!({
            "query": params.query,
            "count": found.len(),
            "entries": found,
        }))
    }
}

/// 条目关系工具实现
pub struct EntryRelationsToolImpl {
    service: Arc<FoodService>,
}

impl EntryRelationsToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for EntryRelationsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        EntryRelationsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: EntryRelationsTool = parse_args("entry_relations", arguments)?;
        validation::require("name", &params.name).map_err(|e| tool_error("entry_relations", e))?;

        let data = self
            .service
            .encyclopedia()
            .await
            .map_err(|e| tool_error("entry_relations", e))?;
        let relations = encyclopedia::entry_relations(&data, &params.name)
            .map_err(|e| tool_error("entry_relations", e))?;

        json_result(&relations)
    }
}

/// 列出地区工具实现（固定参考表，不需要获取数据集）
pub struct ListRegionsToolImpl;

#[async_trait]
impl Tool for ListRegionsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        ListRegionsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: ListRegionsTool = parse_args("list_regions", arguments)?;
        json_result(encyclopedia::list_regions())
    }
}

/// 列出关系类型工具实现
pub struct ListRelationshipsToolImpl;

#[async_trait]
impl Tool for ListRelationshipsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        ListRelationshipsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: ListRelationshipsTool = parse_args("list_relationships", arguments)?;
        json_result(encyclopedia::list_relationships())
    }
}

/// 百科统计工具实现
pub struct EncyclopediaStatsToolImpl {
    service: Arc<FoodService>,
}

impl EncyclopediaStatsToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for EncyclopediaStatsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        EncyclopediaStatsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: EncyclopediaStatsTool = parse_args("encyclopedia_stats", arguments)?;
        let data = self
            .service
            .encyclopedia()
            .await
            .map_err(|e| tool_error("encyclopedia_stats", e))?;

        json_result(&encyclopedia::stats(&data))
    }
}
