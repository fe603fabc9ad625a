//! Thai Food MCP 服务器主程序

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thai_food_mcp::config::AppConfig;
use thai_food_mcp::server::transport::{self, TransportMode};
use thai_food_mcp::{FoodServer, FoodService};

#[derive(Parser)]
#[command(name = "thai-food-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "泰国美食数据 MCP 服务器：词典、书目、食谱库与美食百科", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// 启用调试日志
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动服务器
    Serve {
        /// 传输模式 [stdio, http, sse, hybrid]
        #[arg(short, long)]
        mode: Option<String>,

        /// 监听主机
        #[arg(long)]
        host: Option<String>,

        /// 监听端口
        #[arg(short, long)]
        port: Option<u16>,

        /// 启动时不预热数据集
        #[arg(long)]
        no_warm_up: bool,
    },

    /// 生成配置文件
    Config {
        /// 输出文件路径
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },

    /// 直接调用一个工具
    Test {
        /// 工具名称，例如 translate_word、search_recipes、list_regions
        #[arg(short, long, default_value = "list_categories")]
        tool: String,

        /// JSON 格式的工具参数，例如 '{"word": "มะเขือ"}'
        #[arg(short, long)]
        args: Option<String>,
    },

    /// 检查数据源和缓存状态
    Health {
        /// 检查类型 [all, external, internal]
        #[arg(short = 't', long, default_value = "all")]
        check_type: String,

        /// 详细输出
        #[arg(short, long)]
        verbose: bool,
    },

    /// 显示版本信息
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            mode,
            host,
            port,
            no_warm_up,
        } => {
            let mut config = load_config(&cli.config, host, port, mode)?;
            if no_warm_up {
                config.cache.warm_on_start = false;
            }
            init_logging(&config, cli.debug)?;
            serve_command(config).await?;
        }
        Commands::Config { output, force } => {
            config_command(&output, force)?;
        }
        Commands::Test { tool, args } => {
            let config = load_config(&cli.config, None, None, None)?;
            init_logging(&config, cli.debug)?;
            test_command(config, &tool, args.as_deref()).await?;
        }
        Commands::Health {
            check_type,
            verbose,
        } => {
            let config = load_config(&cli.config, None, None, None)?;
            init_logging(&config, cli.debug)?;
            health_command(config, &check_type, verbose).await?;
        }
        Commands::Version => {
            version_command();
        }
    }

    Ok(())
}

/// 初始化日志系统，debug 模式覆盖配置中的日志级别
fn init_logging(config: &AppConfig, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut logging = config.logging.clone();
    if debug {
        logging.level = "debug".to_string();
    }
    thai_food_mcp::init_logging_with_config(&logging)
        .map_err(|e| format!("初始化日志系统失败: {e}"))?;
    Ok(())
}

/// 加载配置：配置文件，然后环境变量，最后命令行参数
fn load_config(
    config_path: &Path,
    host: Option<String>,
    port: Option<u16>,
    mode: Option<String>,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = if config_path.exists() {
        AppConfig::from_file(config_path).map_err(|e| format!("加载配置文件失败: {e}"))?
    } else {
        AppConfig::default()
    };

    config
        .apply_env()
        .map_err(|e| format!("读取环境变量失败: {e}"))?;

    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(m) = mode {
        config.server.transport_mode = m.to_lowercase();
    }

    config
        .validate()
        .map_err(|e| format!("配置验证失败: {e}"))?;

    Ok(config)
}

/// 启动服务器命令
async fn serve_command(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mode: TransportMode = config.server.transport_mode.parse()?;

    tracing::info!("启动 Thai Food MCP 服务器 v{}", thai_food_mcp::VERSION);

    let server = FoodServer::new(config).map_err(|e| format!("创建服务器失败: {e}"))?;
    server.warm_up().await;

    tracing::info!("使用 {mode} 传输模式");
    transport::run_server_with_mode(&server, mode)
        .await
        .map_err(|e| format!("{mode} 服务器运行失败: {e}"))?;

    Ok(())
}

/// 生成配置文件命令
fn config_command(output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!("配置文件已存在: {}，使用 --force 覆盖", output.display()).into());
    }

    AppConfig::default()
        .save_to_file(output)
        .map_err(|e| format!("保存配置文件失败: {e}"))?;

    println!("配置文件已生成: {}", output.display());
    println!("请根据需要编辑配置文件。");

    Ok(())
}

/// 执行一个工具并打印文本结果
async fn run_tool(
    config: AppConfig,
    tool: &str,
    arguments: serde_json::Value,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = Arc::new(FoodService::from_config(&config)?);
    let registry = thai_food_mcp::tools::create_default_registry(&service);

    let result = registry
        .execute_tool(tool, arguments)
        .await
        .map_err(|e| format!("工具执行失败: {e}"))?;

    for content in &result.content {
        match content {
            rust_mcp_sdk::schema::ContentBlock::TextContent(text_content) => {
                println!("{}", text_content.text);
            }
            other => println!("非文本内容: {other:?}"),
        }
    }
    Ok(())
}

/// 测试工具命令
async fn test_command(
    config: AppConfig,
    tool: &str,
    args: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let arguments = match args {
        Some(raw) => serde_json::from_str(raw).map_err(|e| format!("参数不是有效的 JSON: {e}"))?,
        None => serde_json::Value::Null,
    };

    tracing::info!("测试工具: {tool}");
    run_tool(config, tool, arguments).await
}

/// 健康检查命令
async fn health_command(
    config: AppConfig,
    check_type: &str,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let arguments = serde_json::json!({
        "check_type": check_type,
        "verbose": verbose,
    });
    run_tool(config, "health_check", arguments).await
}

/// 版本命令
fn version_command() {
    println!("Thai Food MCP 服务器 v{}", env!("CARGO_PKG_VERSION"));
    println!("构建时间: {}", env!("BUILD_TIMESTAMP"));
    println!("Git 提交: {}", env!("GIT_COMMIT"));
    println!("Rust 版本: {}", env!("RUST_VERSION"));
}
