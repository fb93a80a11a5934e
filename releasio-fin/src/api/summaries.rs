//! Derived financials: monthly payout summaries, per-collaborator
//! breakdowns, and the all-months overview
//!
//! Every handler here recomputes its response from the source releases;
//! nothing derived is read from or written to the database.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use releasio_common::catalog::CollaboratorRole;
use releasio_common::db::models::PayoutStatus;
use releasio_common::db::queries;
use releasio_common::royalty::{self, FinancialOverview, PayoutSummary};
use releasio_common::{Error, Result};

use crate::api::ApiError;
use crate::AppState;

/// One month's payout summary annotated with its distribution state
#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    #[serde(flatten)]
    pub summary: PayoutSummary,
    pub status: PayoutStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<String>,
}

/// One collaborator's row in a month's breakdown
#[derive(Debug, Serialize)]
pub struct CollaboratorShareRow {
    pub collaborator_id: Uuid,
    /// Unknown when the collaborator record has been removed
    pub name: Option<String>,
    pub role: Option<CollaboratorRole>,
    pub amount: f64,
    pub details: Vec<String>,
}

/// Per-collaborator breakdown for one month, artist net included
#[derive(Debug, Serialize)]
pub struct CollaboratorBreakdownResponse {
    pub month: String,
    pub artist_name: String,
    pub artist_net: f64,
    pub total_earnings: i64,
    pub shares: Vec<CollaboratorShareRow>,
}

async fn derive_summaries(state: &AppState) -> Result<Vec<PayoutSummary>> {
    let releases = queries::load_releases(&state.db).await?;
    Ok(royalty::aggregate(&releases))
}

fn find_month(summaries: Vec<PayoutSummary>, month: &str) -> Result<PayoutSummary> {
    summaries
        .into_iter()
        .find(|s| s.month == month)
        .ok_or_else(|| Error::NotFound(format!("No royalty data for month {}", month)))
}

async fn annotate(state: &AppState, summaries: Vec<PayoutSummary>) -> Result<Vec<MonthlySummary>> {
    let runs: HashMap<String, String> = queries::list_payout_runs(&state.db)
        .await?
        .into_iter()
        .map(|run| (run.month, run.paid_date))
        .collect();

    Ok(summaries
        .into_iter()
        .map(|summary| {
            let paid_date = runs.get(&summary.month).cloned();
            MonthlySummary {
                status: if paid_date.is_some() {
                    PayoutStatus::Paid
                } else {
                    PayoutStatus::Pending
                },
                paid_date,
                summary,
            }
        })
        .collect())
}

/// GET /api/financials/summaries
///
/// All monthly payout summaries, most recent month first.
pub async fn list_summaries(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<MonthlySummary>>, ApiError> {
    let summaries = derive_summaries(&state).await?;
    Ok(Json(annotate(&state, summaries).await?))
}

/// GET /api/financials/summaries/:month
pub async fn get_summary(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> std::result::Result<Json<MonthlySummary>, ApiError> {
    let summary = find_month(derive_summaries(&state).await?, &month)?;
    let mut annotated = annotate(&state, vec![summary]).await?;
    Ok(Json(annotated.remove(0)))
}

/// GET /api/financials/summaries/:month/collaborators
///
/// The month's payouts grouped by collaborator, with a breakdown line per
/// contributing release/split, plus the artist's net under the configured
/// artist name.
pub async fn get_summary_collaborators(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> std::result::Result<Json<CollaboratorBreakdownResponse>, ApiError> {
    let summary = find_month(derive_summaries(&state).await?, &month)?;

    let collaborators: HashMap<Uuid, (String, CollaboratorRole)> =
        queries::list_collaborators(&state.db)
            .await?
            .into_iter()
            .map(|c| (c.id, (c.name, c.role)))
            .collect();

    let shares = royalty::group_payouts_by_collaborator(&summary)
        .into_iter()
        .map(|(collaborator_id, share)| {
            let known = collaborators.get(&collaborator_id);
            CollaboratorShareRow {
                collaborator_id,
                name: known.map(|(name, _)| name.clone()),
                role: known.map(|(_, role)| *role),
                amount: share.amount,
                details: share.details,
            }
        })
        .collect();

    Ok(Json(CollaboratorBreakdownResponse {
        artist_name: queries::artist_name(&state.db).await?,
        artist_net: summary.artist_net,
        total_earnings: summary.total_earnings,
        month: summary.month,
        shares,
    }))
}

/// GET /api/financials/overview
///
/// Earnings, payouts and artist net summed across all months.
pub async fn get_overview(
    State(state): State<AppState>,
) -> std::result::Result<Json<FinancialOverview>, ApiError> {
    let summaries = derive_summaries(&state).await?;
    Ok(Json(royalty::overview(&summaries)))
}
