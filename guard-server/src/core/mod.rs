//! 核心模块 - 服务器配置、状态与生命周期
//!
//! - [`Config`] - 服务器配置
//! - [`GuardState`] - 服务器状态
//! - [`Server`] - HTTP 服务器
//! - [`tasks`] - 后台任务管理

pub mod config;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use server::Server;
pub use state::GuardState;
