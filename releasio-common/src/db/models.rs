//! Database models

use serde::{Deserialize, Serialize};

/// A key/value setting row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Distribution state of a month's payouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutStatus {
    Pending,
    Paid,
}

/// A recorded payout distribution for one month.
///
/// A month is `Pending` until a run is recorded for it; recording the run
/// is the distribution (no real funds move). At most one run exists per
/// month. The payout total is captured at distribution time so the ledger
/// keeps what was actually distributed even if royalty entries are edited
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRun {
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Total distributed to collaborators, captured at distribution time
    pub total_payouts: f64,
    /// Date the run was recorded, `YYYY-MM-DD`
    pub paid_date: String,
}
