//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`logger`] - tracing 日志初始化
//! - [`time`] - 时间戳工具

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResult};
pub use time::now_millis;
