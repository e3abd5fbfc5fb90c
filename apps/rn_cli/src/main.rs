// roadnet\apps\rn_cli\src/main.rs

//! RoadNet 命令行界面
//!
//! 解析 OpenDRIVE 地图并重建离散路网的命令行工具。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// RoadNet OpenDRIVE 路网重建命令行工具
#[derive(Parser)]
#[command(name = "rn_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "OpenDRIVE road network reconstruction", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 重建路网并导出
    Build(commands::build::BuildArgs),
    /// 显示地图信息
    Info(commands::info::InfoArgs),
    /// 校验地图可解析性
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Build(args) => commands::build::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
