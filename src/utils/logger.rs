use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "ticket_checkout";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Compact,
    Json,
}

/// `--verbose` 時開啟本 crate 的 debug，其他 crate 維持 info
fn cli_directive(verbose: bool) -> String {
    if verbose {
        format!("{}=debug,info", CRATE_TARGET)
    } else {
        format!("{}=info", CRATE_TARGET)
    }
}

/// 設定檔給的 level 不分大小寫，空值退回 info
fn level_directive(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    let level = if level.is_empty() { "info" } else { level.as_str() };
    format!("{}={}", CRATE_TARGET, level)
}

/// RUST_LOG 優先於程式給的預設值
fn init(default_directive: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("⚠️ Logger already initialized: {}", e);
    }
}

pub fn init_cli_logger(verbose: bool) {
    init(&cli_directive(verbose), LogFormat::Compact);
}

/// JSON 格式輸出，方便 CI 收集場景結果
pub fn init_json_logger(level: &str) {
    init(&level_directive(level), LogFormat::Json);
}
