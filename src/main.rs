use clap::Parser;
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::warn;

// 从 lib.rs 导入模块
use autograder::cli::{self, Cli};
use autograder::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // 启动前预处理 //

    setup_panic!();
    let args = Cli::parse();

    // 初始化配置
    AppConfig::init(args.config.as_deref()).expect("Failed to initialize configuration");
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting {} v{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    // 预处理完成 //

    if let Err(e) = cli::run(args).await {
        #[cfg(debug_assertions)]
        eprintln!("{}", e.format_colored());
        #[cfg(not(debug_assertions))]
        eprintln!("{}", e.format_simple());
        std::process::exit(1);
    }

    Ok(())
}
