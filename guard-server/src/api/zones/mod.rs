//! Zone API 模块
//!
//! 区域配置由管理员维护，全部路由走管理员角色检查。

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::GuardState;

pub fn router() -> Router<GuardState> {
    Router::new().nest("/api/zones", routes())
}

fn routes() -> Router<GuardState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/toggle", post(handler::toggle))
        .layer(middleware::from_fn(require_admin))
}
