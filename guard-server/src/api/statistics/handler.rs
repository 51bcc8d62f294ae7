//! Statistics API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::GuardState;
use crate::stats::{self, Stats};
use crate::utils::time::DAY_MS;
use crate::utils::{AppError, AppResult, now_millis};

const DEFAULT_WINDOW_DAYS: u32 = 30;
const MAX_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub window_days: Option<u32>,
}

/// GET /api/statistics?window_days=30 - trailing-window access stats
pub async fn get_stats(
    State(state): State<GuardState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<Stats>> {
    let window_days = query.window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if window_days == 0 || window_days > MAX_WINDOW_DAYS {
        return Err(AppError::validation(format!(
            "window_days must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }

    let cutoff = now_millis() - i64::from(window_days) * DAY_MS;
    let records = state.attempts().find_since(cutoff).await?;
    Ok(Json(stats::aggregate(&records, window_days)))
}
