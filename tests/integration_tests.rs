//! 集成测试

use async_trait::async_trait;
use rust_mcp_sdk::schema::{CallToolResult, ContentBlock};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thai_food_mcp::cache::ManualClock;
use thai_food_mcp::config::SourcesConfig;
use thai_food_mcp::error::{Error, Result};
use thai_food_mcp::fetch::{DatasetSource, HttpFetcher};
use thai_food_mcp::tools::create_default_registry;
use thai_food_mcp::utils::HttpClientBuilder;
use thai_food_mcp::FoodService;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const HOST: &str = "https://data.example";
const TTL: Duration = Duration::from_secs(300);

/// 内存数据源，按 URL 返回固定文档并统计调用次数
struct StaticSource {
    documents: HashMap<String, Value>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl StaticSource {
    fn new(documents: HashMap<String, Value>) -> Self {
        Self {
            documents,
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| Error::fetch(url, "HTTP 状态码: 404 Not Found"))
    }
}

fn dictionary_json() -> Value {
    json!({
        "gemuese": {
            "มะเขือ": {
                "meaning_de": "Aubergine",
                "meaning_en": "eggplant",
                "trans_de": "makhuea",
                "trans_en": "makhuea"
            },
            "พริก": {
                "meaning_de": "Chili",
                "meaning_en": "chili",
                "trans_de": "phrik",
                "trans_en": "phrik"
            }
        },
        "kraeuter_und_gewuerze": {
            "ใบมะกรูด": {
                "meaning_de": "Kaffirlimettenblatt",
                "meaning_en": "kaffir lime leaf",
                "trans_de": "bai makrut",
                "trans_en": "bai makrut"
            }
        }
    })
}

fn books_json() -> Value {
    json!([
        {
            "title": "Thai Basics",
            "author": "Somchai",
            "year": 2019,
            "lang": "de",
            "isbn": "978-3-8338-1234-5",
            "level": 1,
            "publisher": "GU",
            "shop": "amazon",
            "target": " 3833812345 "
        },
        {
            "title": "Isaan Street Food",
            "author": "Malee",
            "year": "2021",
            "lang": "en",
            "isbn": 9781234567890_u64,
            "level": "2",
            "publisher": "Hardie"
        }
    ])
}

fn library_json() -> Value {
    json!({
        "currys": {
            "gaeng_khiao_wan": {
                "title_de": "Grünes Curry",
                "title_en": "Green curry",
                "transcript_de": "Gaeng Khiao Wan",
                "thai": "แกงเขียวหวาน",
                "region": "Zentralthailand",
                "url_de": "rezepte/gaeng-khiao-wan.html",
                "url_en": "/recipes/green-curry.html",
                "imageUrl": "/img/gaeng.jpg"
            }
        },
        "salate": {
            "som_tam": {
                "title_de": "Papayasalat",
                "title_en": "Papaya salad",
                "transcript_de": "Som Tam",
                "thai": "ส้มตำ",
                "region": "Isaan",
                "url_de": "https://elsewhere.example/som-tam"
            }
        }
    })
}

fn encyclopedia_json() -> Value {
    let entries: Vec<Value> = ["ใบมะกรูด", "มะกรูด", "ข่า", "ตะไคร้", "พริกแกง"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "thaiName": name,
                "alternativeNames": [format!("kraut {i}")],
                "imageUrl": format!("bild-{i}.jpg"),
                "de": {
                    "transcription": format!("kraut-{i}"),
                    "summary": "Ein Kraut der thailändischen Küche",
                    "tags": ["kraut"],
                    "regions": ["ภาคกลาง"]
                }
            })
        })
        .collect();
    Value::Array(entries)
}

fn all_documents(sources: &SourcesConfig) -> HashMap<String, Value> {
    HashMap::from([
        (sources.dictionary.dataset_url.clone(), dictionary_json()),
        (sources.books.dataset_url.clone(), books_json()),
        (sources.library.dataset_url.clone(), library_json()),
        (sources.encyclopedia.dataset_url.clone(), encyclopedia_json()),
    ])
}

fn service_with(source: Arc<StaticSource>, clock: Arc<ManualClock>) -> Arc<FoodService> {
    Arc::new(FoodService::with_clock(
        source,
        SourcesConfig::for_host(HOST),
        TTL,
        clock,
    ))
}

fn test_service() -> (Arc<FoodService>, Arc<StaticSource>, Arc<ManualClock>) {
    let sources = SourcesConfig::for_host(HOST);
    let source = Arc::new(StaticSource::new(all_documents(&sources)));
    let clock = Arc::new(ManualClock::new());
    (service_with(source.clone(), clock.clone()), source, clock)
}

fn text_of(result: &CallToolResult) -> String {
    match &result.content[0] {
        ContentBlock::TextContent(text) => text.text.clone(),
        other => panic!("期望文本内容，实际为 {other:?}"),
    }
}

fn json_of(result: &CallToolResult) -> Value {
    serde_json::from_str(&text_of(result)).expect("工具结果应为 JSON")
}

// ============================================================================
// 工具注册表测试
// ============================================================================

/// 测试默认注册表包含全部工具
#[tokio::test]
async fn test_registry_tool_names() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);
    let names = registry.tool_names();

    assert_eq!(names.len(), 25);
    for expected in [
        "list_categories",
        "translate_word",
        "get_book",
        "get_recipe",
        "search_entries",
        "list_regions",
        "health_check",
    ] {
        assert!(names.iter().any(|n| n == expected), "缺少工具 {expected}");
    }
    assert_eq!(registry.get_tools().len(), names.len());
}

/// 测试未知工具
#[tokio::test]
async fn test_unknown_tool() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);
    assert!(registry.execute_tool("nope", json!({})).await.is_err());
}

// ============================================================================
// 词典工具测试
// ============================================================================

/// 测试精确翻译
#[tokio::test]
async fn test_translate_word() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);

    let result = registry
        .execute_tool("translate_word", json!({"word": "มะเขือ"}))
        .await
        .unwrap();
    let record = json_of(&result);
    assert_eq!(record["category"], "gemuese");
    assert_eq!(record["meaning_de"], "Aubergine");

    let result = registry
        .execute_tool("translate_word", json!({"word": "ไม่มี"}))
        .await
        .unwrap();
    assert!(text_of(&result).contains("search_dictionary"));
}

/// 测试分类列表保持原始顺序，未知分类返回错误
#[tokio::test]
async fn test_categories() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);

    let result = registry
        .execute_tool("list_categories", Value::Null)
        .await
        .unwrap();
    let categories = json_of(&result);
    assert_eq!(categories[0]["name"], "gemuese");
    assert_eq!(categories[1]["display_name"], "Kraeuter Und Gewuerze");
    assert_eq!(categories[0]["term_count"], 2);

    assert!(registry
        .execute_tool("get_category", json!({"category": "obst"}))
        .await
        .is_err());
}

/// 测试词典搜索
#[tokio::test]
async fn test_search_dictionary() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);

    let result = registry
        .execute_tool("search_dictionary", json!({"query": "CHILI"}))
        .await
        .unwrap();
    let found = json_of(&result);
    assert_eq!(found["count"], 1);
    assert_eq!(found["results"][0]["thai"], "พริก");

    let result = registry
        .execute_tool("search_dictionary", json!({"query": "chili", "category": ""}))
        .await
        .unwrap();
    assert_eq!(json_of(&result)["count"], 1);

    let result = registry
        .execute_tool(
            "search_dictionary",
            json!({"query": "a", "category": " kraeuter_und_gewuerze "}),
        )
        .await
        .unwrap();
    assert_eq!(json_of(&result)["count"], 1);

    assert!(registry
        .execute_tool("search_dictionary", json!({"query": "  "}))
        .await
        .is_err());
}

// ============================================================================
// 书目与食谱工具测试
// ============================================================================

/// 测试购买链接生成
#[tokio::test]
async fn test_get_book_affiliate_url() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);

    let result = registry
        .execute_tool("get_book", json!({"isbn": "978-3-8338-1234-5"}))
        .await
        .unwrap();
    let book = json_of(&result);
    assert_eq!(book["url"], "https://www.amazon.de/dp/3833812345");
    assert!(book.get("target").is_none());

    let result = registry
        .execute_tool("get_book", json!({"isbn": "9781234567890"}))
        .await
        .unwrap();
    assert!(json_of(&result).get("url").is_none());
}

/// 测试按语言过滤书目
#[tokio::test]
async fn test_list_books_by_language() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);

    let result = registry
        .execute_tool("list_books", json!({"lang": "EN"}))
        .await
        .unwrap();
    let listed = json_of(&result);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["books"][0]["title"], "Isaan Street Food");
}

/// 测试食谱链接改写
#[tokio::test]
async fn test_get_recipe_urls() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);

    let result = registry
        .execute_tool("get_recipe", json!({"key": "gaeng_khiao_wan"}))
        .await
        .unwrap();
    let recipe = json_of(&result);
    assert_eq!(recipe["cookbook"], "currys");
    assert_eq!(
        recipe["url_de"],
        "https://data.example/de/rezepte/gaeng-khiao-wan.html"
    );
    assert_eq!(
        recipe["url_en"],
        "https://data.example/en/recipes/green-curry.html"
    );
    assert_eq!(recipe["imageUrl"], "https://data.example/images/img/gaeng.jpg");

    let result = registry
        .execute_tool("get_recipe", json!({"key": "som_tam", "cookbook": "salate"}))
        .await
        .unwrap();
    assert_eq!(json_of(&result)["url_de"], "https://elsewhere.example/som-tam");

    assert!(registry
        .execute_tool("get_recipe", json!({"key": "som_tam", "cookbook": "currys"}))
        .await
        .is_err());
}

// ============================================================================
// 百科工具测试
// ============================================================================

/// 测试静态地区表
#[tokio::test]
async fn test_list_regions() {
    let (service, source, _) = test_service();
    let registry = create_default_registry(&service);

    let result = registry
        .execute_tool("list_regions", json!({}))
        .await
        .unwrap();
    let regions = json_of(&result);
    assert_eq!(regions.as_array().map(Vec::len), Some(4));
    assert_eq!(source.calls(), 0);
}

/// 测试百科搜索的结果数量限制与图片地址
#[tokio::test]
async fn test_search_entries_limit() {
    let (service, _, _) = test_service();
    let registry = create_default_registry(&service);

    let result = registry
        .execute_tool("search_entries", json!({"query": "kraut", "limit": 2}))
        .await
        .unwrap();
    let found = json_of(&result);
    assert_eq!(found["count"], 2);
    assert_eq!(found["entries"][0]["thaiName"], "ใบมะกรูด");
    assert_eq!(
        found["entries"][0]["imageUrl"],
        "https://data.example/media/bild-0.jpg"
    );

    let result = registry
        .execute_tool("search_entries", json!({"query": "kraut"}))
        .await
        .unwrap();
    assert_eq!(json_of(&result)["count"], 5);

    assert!(registry
        .execute_tool("search_entries", json!({"query": "kraut", "limit": 0}))
        .await
        .is_err());
}

// ============================================================================
// 缓存行为测试
// ============================================================================

/// 测试 TTL 内复用快照，过期后重新获取
#[tokio::test]
async fn test_ttl_expiry() {
    let (service, source, clock) = test_service();

    service.dictionary().await.unwrap();
    service.dictionary().await.unwrap();
    assert_eq!(source.calls(), 1);

    clock.advance(TTL - Duration::from_secs(1));
    service.dictionary().await.unwrap();
    assert_eq!(source.calls(), 1);

    clock.advance(Duration::from_secs(2));
    service.dictionary().await.unwrap();
    assert_eq!(source.calls(), 2);
}

/// 测试并发请求只触发一次获取
#[tokio::test]
async fn test_single_flight_fetch() {
    let sources = SourcesConfig::for_host(HOST);
    let source = Arc::new(
        StaticSource::new(all_documents(&sources)).with_delay(Duration::from_millis(50)),
    );
    let service = service_with(source.clone(), Arc::new(ManualClock::new()));

    let (a, b, c) = tokio::join!(service.books(), service.books(), service.books());
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
    assert_eq!(source.calls(), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
}

/// 测试预热、缓存状态与清空
#[tokio::test]
async fn test_warm_up_and_clear() {
    let (service, source, _) = test_service();

    assert!(service.cache_status().iter().all(|s| !s.cached));
    assert!(service.warm_up().await.is_empty());
    assert_eq!(source.calls(), 4);
    assert!(service.cache_status().iter().all(|s| s.cached));

    service.clear_all();
    assert!(service.cache_status().iter().all(|s| !s.cached));
    service.library().await.unwrap();
    assert_eq!(source.calls(), 5);
}

/// 测试获取失败不写入缓存
#[tokio::test]
async fn test_fetch_failure_is_not_cached() {
    let sources = SourcesConfig::for_host(HOST);
    let mut documents = all_documents(&sources);
    documents.remove(&sources.encyclopedia.dataset_url);
    let source = Arc::new(StaticSource::new(documents));
    let service = service_with(source.clone(), Arc::new(ManualClock::new()));

    assert_eq!(service.warm_up().await, vec!["encyclopedia"]);

    let registry = create_default_registry(&service);
    assert!(registry
        .execute_tool("get_entry", json!({"name": "ข่า"}))
        .await
        .is_err());
    assert_eq!(source.calls(), 5);
}

/// 测试数据格式错误被报告为获取错误
#[tokio::test]
async fn test_malformed_dataset() {
    let sources = SourcesConfig::for_host(HOST);
    let mut documents = all_documents(&sources);
    documents.insert(sources.books.dataset_url.clone(), json!({"not": "a list"}));
    let service = service_with(
        Arc::new(StaticSource::new(documents)),
        Arc::new(ManualClock::new()),
    );

    let err = service.books().await.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
}

// ============================================================================
// HTTP 获取测试
// ============================================================================

/// 启动只响应一次的本地 HTTP 服务，返回数据集 URL
async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}/data/dictionary.json")
}

fn local_fetcher() -> HttpFetcher {
    let client = HttpClientBuilder::new()
        .use_system_proxy(false)
        .timeout(Some(Duration::from_secs(5)))
        .build()
        .unwrap();
    HttpFetcher::new(client)
}

/// 测试成功获取 JSON
#[tokio::test]
async fn test_http_fetch_json() {
    let url = serve_once(
        "200 OK",
        "application/json; charset=utf-8",
        r#"{"gemuese": {}}"#,
    )
    .await;
    let value = local_fetcher().fetch_json(&url).await.unwrap();
    assert_eq!(value, json!({"gemuese": {}}));
}

/// 测试非 2xx 状态码
#[tokio::test]
async fn test_http_fetch_status_error() {
    let url = serve_once("500 Internal Server Error", "application/json", "{}").await;
    let err = local_fetcher().fetch_json(&url).await.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
    assert!(err.to_string().contains("500"));
}

/// 测试非 JSON 内容类型
#[tokio::test]
async fn test_http_fetch_wrong_content_type() {
    let url = serve_once("200 OK", "text/html", "<html></html>").await;
    let err = local_fetcher().fetch_json(&url).await.unwrap_err();
    assert!(err.to_string().contains("text/html"));
}

/// 测试无法解析的 JSON
#[tokio::test]
async fn test_http_fetch_bad_json() {
    let url = serve_once("200 OK", "application/json", "{not json").await;
    let err = local_fetcher().fetch_json(&url).await.unwrap_err();
    assert!(err.to_string().contains("JSON"));
}
