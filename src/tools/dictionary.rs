//! 食物词典工具
#![allow(missing_docs)]

use crate::data::{dictionary, FoodService};
use crate::tools::{json_result, parse_args, tool_error, Tool};
use crate::utils::validation;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 列出词典分类
#[macros::mcp_tool(
    name = "list_categories",
    title = "列出词典分类",
    description = "列出泰国美食词典的全部分类，包括可读名称和词条数量。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListCategoriesTool {}

/// 获取分类下的词条
#[macros::mcp_tool(
    name = "get_category",
    title = "获取词典分类",
    description = "获取一个词典分类中的全部词条（泰语、德语/英语释义和转写）。分类不存在时返回可用分类列表。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCategoryTool {
    /// 分类名称
    #[json_schema(title = "分类", description = "分类键名，例如：gemuese、kraeuter_und_gewuerze")]
    pub category: String,
}

/// 搜索词典
#[macros::mcp_tool(
    name = "search_dictionary",
    title = "搜索词典",
    description = "在泰语词条、德语/英语释义和转写中做不区分大小写的子串搜索，结果保持词典原始顺序。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchDictionaryTool {
    /// 搜索关键词
    #[json_schema(title = "搜索查询", description = "泰语、德语或英语关键词，例如：curry、พริก、Zitronengras")]
    pub query: String,

    /// 限定分类
    #[json_schema(title = "分类", description = "只在该分类中搜索（可选）")]
    pub category: Option<String>,
}

/// 翻译泰语词条
#[macros::mcp_tool(
    name = "translate_word",
    title = "翻译泰语词条",
    description = "精确查找一个泰语词条并返回其德语/英语释义。找不到时建议使用 search_dictionary 模糊搜索。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct TranslateWordTool {
    /// 泰语词条
    #[json_schema(title = "泰语词条", description = "要翻译的泰语词，例如：มะเขือ")]
    pub word: String,
}

/// 词典统计
#[macros::mcp_tool(
    name = "dictionary_stats",
    title = "词典统计",
    description = "统计词典的分类数、词条总数以及每个分类的词条数量（按数量降序）。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct DictionaryStatsTool {}

/// 列出分类工具实现
pub struct ListCategoriesToolImpl {
    service: Arc<FoodService>,
}

impl ListCategoriesToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for ListCategoriesToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        ListCategoriesTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: ListCategoriesTool = parse_args("list_categories", arguments)?;
        let dictionary = self
            .service
            .dictionary()
            .await
            .map_err(|e| tool_error("list_categories", e))?;

        json_result(&dictionary::list_categories(&dictionary))
    }
}

/// 获取分类工具实现
pub struct GetCategoryToolImpl {
    service: Arc<FoodService>,
}

impl GetCategoryToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetCategoryToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetCategoryTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: GetCategoryTool = parse_args("get_category", arguments)?;
        validation::require("category", &params.category)
            .map_err(|e| tool_error("get_category", e))?;

        let dictionary = self
            .service
            .dictionary()
            .await
            .map_err(|e| tool_error("get_category", e))?;
        let view = dictionary::get_category(&dictionary, params.category.trim())
            .map_err(|e| tool_error("get_category", e))?;

        json_result(&view)
    }
}

/// 搜索词典工具实现
pub struct SearchDictionaryToolImpl {
    service: Arc<FoodService>,
}

impl SearchDictionaryToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchDictionaryToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        SearchDictionaryTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: SearchDictionaryTool = parse_args("search_dictionary", arguments)?;
        validation::validate_search_query(&params.query)
            .map_err(|e| tool_error("search_dictionary", e))?;

        let dictionary = self
            .service
            .dictionary()
            .await
            .map_err(|e| tool_error("search_dictionary", e))?;
        let category = params
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let hits = dictionary::search_terms(&dictionary, params.query.trim(), category)
            .map_err(|e| tool_error("search_dictionary", e))?;

        json_result(&serde_json::json!({
            "query": params.query,
            "count": hits.len(),
            "results": hits,
        }))
    }
}

/// 翻译工具实现
pub struct TranslateWordToolImpl {
    service: Arc<FoodService>,
}

impl TranslateWordToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for TranslateWordToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        TranslateWordTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: TranslateWordTool = parse_args("translate_word", arguments)?;
        validation::require("word", &params.word).map_err(|e| tool_error("translate_word", e))?;

        let dictionary = self
            .service
            .dictionary()
            .await
            .map_err(|e| tool_error("translate_word", e))?;

        match dictionary::translate_word(&dictionary, params.word.trim()) {
            Some(record) => json_result(&record),
            None => Ok(CallToolResult::text_content(vec![format!(
                "词典中没有词条「{}」。可以使用 search_dictionary 进行模糊搜索。",
                params.word.trim()
            )
            .into()])),
        }
    }
}

/// 词典统计工具实现
pub struct DictionaryStatsToolImpl {
    service: Arc<FoodService>,
}

impl DictionaryStatsToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for DictionaryStatsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        DictionaryStatsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: DictionaryStatsTool = parse_args("dictionary_stats", arguments)?;
        let dictionary = self
            .service
            .dictionary()
            .await
            .map_err(|e| tool_error("dictionary_stats", e))?;

        json_result(&dictionary::stats(&dictionary))
    }
}
