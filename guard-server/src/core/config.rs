use std::path::PathBuf;
use std::time::Duration;

use crate::db::repository::ApprovalPolicy;
use crate::utils::time::HOUR_MS;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/guard-server | 工作目录（数据库、日志） |
/// | HTTP_PORT | 3000 | HTTP API 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | GRANT_WINDOW_HOURS | 8 | 远程批准的有效时长 |
/// | REQUEST_TTL_HOURS | 24 | 未处理审批请求的存活时长 |
/// | LOCATION_TIMEOUT_SECS | 30 | 设备定位硬超时 |
/// | SWEEP_INTERVAL_SECS | 600 | 过期审批记账任务间隔 |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 批准后访问窗口（小时）
    pub grant_window_hours: i64,
    /// 审批请求 TTL（小时）
    pub request_ttl_hours: i64,
    /// 设备定位硬超时（秒）
    pub location_timeout_secs: u64,
    /// 过期审批清理任务间隔（秒）
    pub sweep_interval_secs: u64,
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/guard-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            grant_window_hours: std::env::var("GRANT_WINDOW_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            request_ttl_hours: std::env::var("REQUEST_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            location_timeout_secs: std::env::var("LOCATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
        }
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    pub fn approval_policy(&self) -> ApprovalPolicy {
        ApprovalPolicy {
            grant_window_ms: self.grant_window_hours * HOUR_MS,
            request_ttl_ms: self.request_ttl_hours * HOUR_MS,
        }
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_secs(self.location_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
