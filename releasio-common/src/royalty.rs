//! Royalty aggregation and payout derivation
//!
//! Rolls per-release monthly royalty entries up into per-month payout
//! summaries according to each release's master splits. Everything here is
//! a pure function of its input: summaries are recomputed from the source
//! releases on every call and are never persisted or mutated in place.
//!
//! Amount semantics:
//! - earnings are integers in currency minor units (cents)
//! - a payout is `earnings * percentage / 100` in f64, unrounded, so
//!   fractional cents can and do appear
//! - the artist net for a month is total earnings minus total payouts and
//!   goes negative when a release's splits total more than 100%
//!
//! Splits are deliberately not validated here. The editing surface rejects
//! over-100% totals before save ([`crate::catalog::validate_splits`]); the
//! aggregator trusts whatever it is handed and stays failure-free.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Release;

/// One collaborator's computed share of one royalty entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub collaborator_id: Uuid,
    pub release_id: Uuid,
    pub release_title: String,
    /// The royalty entry's total earnings this payout derives from (cents)
    pub earnings: i64,
    /// The split percentage applied, as stored on the release
    pub split_percentage: f64,
    /// `earnings * split_percentage / 100`, unrounded
    pub payout_amount: f64,
}

/// Monthly aggregate of earnings, collaborator payouts and artist net
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutSummary {
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Sum of all releases' earnings for this month (cents)
    pub total_earnings: i64,
    /// Sum of all payout amounts for this month
    pub total_payouts: f64,
    /// `total_earnings - total_payouts`; negative if splits exceed 100%
    pub artist_net: f64,
    /// Every payout contributing to `total_payouts`, in input order
    pub payouts: Vec<Payout>,
}

/// One collaborator's aggregated share of a single month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaboratorShare {
    /// Total owed to the collaborator this month, across all releases
    pub amount: f64,
    /// One human-readable line per contributing release/split,
    /// e.g. `$12.34 from "Midnight Signal" (30%)`
    pub details: Vec<String>,
}

/// Rollup across all months (the three headline figures of the
/// financials screen)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialOverview {
    pub total_earnings: i64,
    pub total_payouts: f64,
    pub artist_net: f64,
}

struct MonthAccumulator {
    total_earnings: i64,
    payouts: Vec<Payout>,
}

/// Derive per-month payout summaries from a set of releases.
///
/// Single pass over the releases in the order given:
/// - every royalty entry adds its earnings to its month's total; repeated
///   months (across releases or within one release) accumulate, nothing
///   is deduplicated
/// - every royalty entry also produces one [`Payout`] per master split on
///   its release
/// - a release without royalty data contributes nothing; royalty data
///   without splits contributes its full earnings to the artist net
///
/// The result holds one summary per distinct month key, sorted by month
/// descending (plain string comparison, correct for fixed-width `YYYY-MM`
/// keys).
pub fn aggregate(releases: &[Release]) -> Vec<PayoutSummary> {
    let mut months: BTreeMap<String, MonthAccumulator> = BTreeMap::new();

    for release in releases {
        for entry in &release.royalty_data {
            let acc = months.entry(entry.month.clone()).or_insert_with(|| MonthAccumulator {
                total_earnings: 0,
                payouts: Vec::new(),
            });
            acc.total_earnings += entry.earnings;

            for split in &release.master_splits {
                let payout_amount = entry.earnings as f64 * (split.percentage / 100.0);
                acc.payouts.push(Payout {
                    collaborator_id: split.collaborator_id,
                    release_id: release.id,
                    release_title: release.title.clone(),
                    earnings: entry.earnings,
                    split_percentage: split.percentage,
                    payout_amount,
                });
            }
        }
    }

    let mut summaries: Vec<PayoutSummary> = months
        .into_iter()
        .map(|(month, acc)| {
            let total_payouts: f64 = acc.payouts.iter().map(|p| p.payout_amount).sum();
            PayoutSummary {
                month,
                total_earnings: acc.total_earnings,
                total_payouts,
                artist_net: acc.total_earnings as f64 - total_payouts,
                payouts: acc.payouts,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.month.cmp(&a.month));
    summaries
}

/// Group one month's payouts by collaborator, summing amounts and
/// collecting a breakdown line per contributing release/split.
pub fn group_payouts_by_collaborator(summary: &PayoutSummary) -> BTreeMap<Uuid, CollaboratorShare> {
    let mut shares: BTreeMap<Uuid, CollaboratorShare> = BTreeMap::new();

    for payout in &summary.payouts {
        let share = shares.entry(payout.collaborator_id).or_insert_with(|| CollaboratorShare {
            amount: 0.0,
            details: Vec::new(),
        });
        share.amount += payout.payout_amount;
        share.details.push(format!(
            "${:.2} from \"{}\" ({}%)",
            payout.payout_amount / 100.0,
            payout.release_title,
            payout.split_percentage
        ));
    }

    shares
}

/// Sum earnings, payouts and artist net across all monthly summaries.
pub fn overview(summaries: &[PayoutSummary]) -> FinancialOverview {
    FinancialOverview {
        total_earnings: summaries.iter().map(|s| s.total_earnings).sum(),
        total_payouts: summaries.iter().map(|s| s.total_payouts).sum(),
        artist_net: summaries.iter().map(|s| s.artist_net).sum(),
    }
}
