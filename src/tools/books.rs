//! 书目工具
#![allow(missing_docs)]

use crate::data::books::{self, BookFilter};
use crate::data::FoodService;
use crate::tools::{json_result, parse_args, tool_error, Tool};
use crate::utils::validation;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 列出书目
#[macros::mcp_tool(
    name = "list_books",
    title = "列出书目",
    description = "列出泰国烹饪书目。可按语言、级别、作者、出版年份、出版社和馆藏位置过滤，多个条件同时生效。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListBooksTool {
    /// 语言代码
    #[json_schema(title = "语言", description = "语言代码，精确匹配，例如：de、en、th")]
    pub lang: Option<String>,

    /// 级别
    #[json_schema(title = "级别", description = "难度级别，精确匹配")]
    pub level: Option<String>,

    /// 作者
    #[json_schema(title = "作者", description = "作者名称的一部分，不区分大小写")]
    pub author: Option<String>,

    /// 出版年份
    #[json_schema(title = "年份", description = "出版年份，精确匹配，例如：2019")]
    pub year: Option<String>,

    /// 出版社
    #[json_schema(title = "出版社", description = "出版社名称的一部分，不区分大小写")]
    pub publisher: Option<String>,

    /// 馆藏位置
    #[json_schema(title = "位置", description = "馆藏位置，不区分大小写")]
    pub location: Option<String>,
}

/// 按 ISBN 获取书目
#[macros::mcp_tool(
    name = "get_book",
    title = "获取书目",
    description = "按 ISBN 获取一本书的完整信息，包括购买链接。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetBookTool {
    /// ISBN
    #[json_schema(title = "ISBN", description = "书目的 ISBN，例如：9781580082846")]
    pub isbn: String,
}

/// 搜索书目
#[macros::mcp_tool(
    name = "search_books",
    title = "搜索书目",
    description = "在标题、作者、简介和全文字段中做不区分大小写的子串搜索。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchBooksTool {
    /// 搜索关键词
    #[json_schema(title = "搜索查询", description = "搜索关键词，例如：street food、Isaan")]
    pub query: String,
}

/// 按作者查找
#[macros::mcp_tool(
    name = "books_by_author",
    title = "按作者查找书目",
    description = "查找作者名称包含给定文本的全部书目，找不到时返回错误。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct BooksByAuthorTool {
    /// 作者
    #[json_schema(title = "作者", description = "作者名称或其一部分")]
    pub author: String,
}

/// 按语言查找
#[macros::mcp_tool(
    name = "books_by_language",
    title = "按语言查找书目",
    description = "查找指定语言的全部书目，找不到时列出现有语言。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct BooksByLanguageTool {
    /// 语言代码
    #[json_schema(title = "语言", description = "语言代码，例如：de、en、th")]
    pub lang: String,
}

/// 书目统计
#[macros::mcp_tool(
    name = "book_stats",
    title = "书目统计",
    description = "按语言、级别、作者、出版社、年份和馆藏位置统计书目数量，每个维度按数量降序。",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct BookStatsTool {}

impl From<ListBooksTool> for BookFilter {
    fn from(params: ListBooksTool) -> Self {
        let non_blank = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        BookFilter {
            lang: non_blank(params.lang),
            level: non_blank(params.level),
            author: non_blank(params.author),
            year: non_blank(params.year),
            publisher: non_blank(params.publisher),
            location: non_blank(params.location),
        }
    }
}

/// 列出书目工具实现
pub struct ListBooksToolImpl {
    service: Arc<FoodService>,
}

impl ListBooksToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for ListBooksToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        ListBooksTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: ListBooksTool = parse_args("list_books", arguments)?;
        let filter = BookFilter::from(params);

        let all = self
            .service
            .books()
            .await
            .map_err(|e| tool_error("list_books", e))?;
        let found = books::list_books(&all, &filter);

        json_result(&serde_json::json!({
            "count": found.len(),
            "books": found,
        }))
    }
}

/// 获取书目工具实现
pub struct GetBookToolImpl {
    service: Arc<FoodService>,
}

impl GetBookToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetBookToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetBookTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: GetBookTool = parse_args("get_book", arguments)?;
        validation::require("isbn", &params.isbn).map_err(|e| tool_error("get_book", e))?;

        let all = self
            .service
            .books()
            .await
            .map_err(|e| tool_error("get_book", e))?;
        let book =
            books::get_book(&all, params.isbn.trim()).map_err(|e| tool_error("get_book", e))?;

        json_result(book)
    }
}

/// 搜索书目工具实现
pub struct SearchBooksToolImpl {
    service: Arc<FoodService>,
}

impl SearchBooksToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchBooksToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        SearchBooksTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: SearchBooksTool = parse_args("search_books", arguments)?;
        validation::validate_search_query(&params.query)
            .map_err(|e| tool_error("search_books", e))?;

        let all = self
            .service
            .books()
            .await
            .map_err(|e| tool_error("search_books", e))?;
        let found = books::search_books(&all, params.query.trim());

        json_result(&serde_json::json!({
            "query": params.query,
            "count": found.len(),
            "books": found,
        }))
    }
}

/// 按作者查找工具实现
pub struct BooksByAuthorToolImpl {
    service: Arc<FoodService>,
}

impl BooksByAuthorToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for BooksByAuthorToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        BooksByAuthorTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: BooksByAuthorTool = parse_args("books_by_author", arguments)?;
        validation::require("author", &params.author)
            .map_err(|e| tool_error("books_by_author", e))?;

        let all = self
            .service
            .books()
            .await
            .map_err(|e| tool_error("books_by_author", e))?;
        let found = books::books_by_author(&all, params.author.trim())
            .map_err(|e| tool_error("books_by_author", e))?;

        json_result(&found)
    }
}

/// 按语言查找工具实现
pub struct BooksByLanguageToolImpl {
    service: Arc<FoodService>,
}

impl BooksByLanguageToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for BooksByLanguageToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        BooksByLanguageTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: BooksByLanguageTool = parse_args("books_by_language", arguments)?;
        validation::require("lang", &params.lang)
            .map_err(|e| tool_error("books_by_language", e))?;

        let all = self
            .service
            .books()
            .await
            .map_err(|e| tool_error("books_by_language", e))?;
        let found = books::books_by_language(&all, params.lang.trim())
            .map_err(|e| tool_error("books_by_language", e))?;

        json_result(&found)
    }
}

/// 书目统计工具实现
pub struct BookStatsToolImpl {
    service: Arc<FoodService>,
}

impl BookStatsToolImpl {
    #[must_use]
    pub fn new(service: Arc<FoodService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for BookStatsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        BookStatsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: BookStatsTool = parse_args("book_stats", arguments)?;
        let all = self
            .service
            .books()
            .await
            .map_err(|e| tool_error("book_stats", e))?;

        json_result(&books::stats(&all))
    }
}
