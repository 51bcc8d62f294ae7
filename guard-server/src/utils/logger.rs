//! Logging Infrastructure
//!
//! 日志初始化：`RUST_LOG` 优先，其次配置的默认级别。
//! 提供日志目录时额外写按日滚动的文件日志。

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system.
///
/// * `default_level` - fallback filter when `RUST_LOG` is unset (e.g. "info")
/// * `log_dir` - optional directory for daily rolling file output
pub fn init_logger_with_file(
    default_level: Option<&str>,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let level = default_level.unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(dir) = log_dir {
        fs::create_dir_all(Path::new(dir))?;
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "guard-server");
        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file_appender))
            .with_filter(EnvFilter::new(level));
        registry.with(console_layer).with(file_layer).try_init()?;
    } else {
        registry.with(console_layer).try_init()?;
    }

    Ok(())
}
