//! Guard Server - 工厂地理围栏访问控制服务
//!
//! 仪表盘的位置信任子系统：判定一次登录/会话的物理位置是否落在
//! 配置的工厂区域内，不在时驱动异步的管理员审批流程。
//!
//! # 模块结构
//!
//! ```text
//! guard-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器、后台任务
//! ├── auth/          # 转发身份与角色检查
//! ├── db/            # 嵌入式 SurrealDB：模型与仓储
//! ├── geofence/      # 纯函数地理围栏判定 (Haversine)
//! ├── location/      # 设备定位接口（带硬超时）
//! ├── access/        # 通行检查编排 (Evaluate → Log → Approve-or-Alert)
//! ├── notify/        # 通知出口接口
//! ├── stats/         # 通行统计聚合
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod access;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod geofence;
pub mod location;
pub mod notify;
pub mod stats;
pub mod utils;

// Re-export 公共类型
pub use access::{AccessDecision, AccessGuard, AccessOutcome};
pub use auth::{ActorRole, CurrentActor};
pub use core::{Config, GuardState, Server};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;
