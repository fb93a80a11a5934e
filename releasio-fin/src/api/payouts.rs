//! Payout-run ledger: recording and listing distributions
//!
//! Recording a run IS the distribution; no real funds move. Each month can
//! be distributed at most once, and only months that actually have royalty
//! data can be distributed.

use axum::{
    extract::{Path, State},
    Json,
};

use releasio_common::db::models::PayoutRun;
use releasio_common::db::queries;
use releasio_common::royalty;
use releasio_common::Error;

use crate::api::ApiError;
use crate::AppState;

/// POST /api/financials/payouts/:month/distribute
///
/// Record the payout run for a month, capturing the total owed to
/// collaborators at distribution time.
pub async fn distribute_payouts(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<PayoutRun>, ApiError> {
    let releases = queries::load_releases(&state.db).await?;
    let summary = royalty::aggregate(&releases)
        .into_iter()
        .find(|s| s.month == month)
        .ok_or_else(|| Error::NotFound(format!("No royalty data for month {}", month)))?;

    if let Some(existing) = queries::get_payout_run(&state.db, &month).await? {
        return Err(Error::Conflict(format!(
            "Payouts for {} already distributed on {}",
            month, existing.paid_date
        ))
        .into());
    }

    let run = PayoutRun {
        month: summary.month,
        total_payouts: summary.total_payouts,
        paid_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
    };
    queries::insert_payout_run(&state.db, &run).await?;

    Ok(Json(run))
}

/// GET /api/financials/payouts
///
/// The recorded payout runs, most recent month first.
pub async fn list_payout_runs(
    State(state): State<AppState>,
) -> Result<Json<Vec<PayoutRun>>, ApiError> {
    Ok(Json(queries::list_payout_runs(&state.db).await?))
}
