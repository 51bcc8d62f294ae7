//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`access`] - 通行检查与审批轮询
//! - [`approvals`] - 审批队列（管理员）
//! - [`zones`] - 区域管理（管理员）
//! - [`alerts`] - 违规告警（管理员)
//! - [`statistics`] - 通行统计（管理员）

pub mod access;
pub mod alerts;
pub mod approvals;
pub mod health;
pub mod statistics;
pub mod zones;

use axum::Router;

use crate::core::GuardState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<GuardState> {
    Router::new()
        .merge(health::router())
        .merge(access::router())
        .merge(approvals::router())
        .merge(zones::router())
        .merge(alerts::router())
        .merge(statistics::router())
}
