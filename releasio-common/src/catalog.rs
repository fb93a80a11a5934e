//! Catalog types: releases, royalty entries, master splits, collaborators
//!
//! These are the source-of-truth records every financial figure is derived
//! from. Royalty earnings are stored in currency minor units (cents);
//! presentation-layer formatting belongs to callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Role a collaborator plays on a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollaboratorRole {
    Producer,
    #[serde(rename = "Featured Artist")]
    FeaturedArtist,
    Remixer,
    #[serde(rename = "Session Musician")]
    SessionMusician,
}

impl CollaboratorRole {
    /// Display / storage form of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorRole::Producer => "Producer",
            CollaboratorRole::FeaturedArtist => "Featured Artist",
            CollaboratorRole::Remixer => "Remixer",
            CollaboratorRole::SessionMusician => "Session Musician",
        }
    }

    /// Parse the storage form back into a role
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Producer" => Some(CollaboratorRole::Producer),
            "Featured Artist" => Some(CollaboratorRole::FeaturedArtist),
            "Remixer" => Some(CollaboratorRole::Remixer),
            "Session Musician" => Some(CollaboratorRole::SessionMusician),
            _ => None,
        }
    }
}

/// A collaborator who can hold master splits on releases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: Uuid,
    pub name: String,
    pub role: CollaboratorRole,
    pub email: String,
}

/// A percentage of one release's master-recording earnings allocated to a
/// collaborator. The remainder (100 minus the sum of all splits) accrues
/// to the primary artist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasterSplit {
    pub collaborator_id: Uuid,
    /// Percentage share, 0-100. Splits on a release are not required to
    /// sum to 100.
    pub percentage: f64,
}

/// Recorded earnings for one release in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyEntry {
    /// Month key in `YYYY-MM` form. Used as a grouping key and compared
    /// lexically, which orders correctly because the form is fixed-width.
    pub month: String,
    /// Earnings in currency minor units (cents)
    pub earnings: i64,
}

/// A musical release (single, EP or album) with its royalty history and
/// master splits. Missing `royalty_data` or `master_splits` in serialized
/// form deserialize as empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: Uuid,
    pub artist: String,
    pub title: String,
    pub release_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub master_splits: Vec<MasterSplit>,
    #[serde(default)]
    pub royalty_data: Vec<RoyaltyEntry>,
}

/// Check that a month key is in `YYYY-MM` form with a real month number.
///
/// Royalty ingestion rejects malformed keys at the edge; everything
/// downstream (aggregation, sorting) trusts the fixed-width form.
pub fn is_valid_month_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit) || !bytes[5..].iter().all(u8::is_ascii_digit) {
        return false;
    }
    matches!(&key[5..7], "01" | "02" | "03" | "04" | "05" | "06" | "07" | "08" | "09" | "10" | "11" | "12")
}

/// Validate a master split list before it is saved to a release.
///
/// The aggregator itself never validates splits (it is a trust-the-input
/// reducer); this rule applies only at the editing surface, matching what
/// the splits editor enforces before save:
/// - every percentage is finite and within 0-100
/// - no collaborator appears twice
/// - the total does not exceed 100 (the artist share cannot go negative)
pub fn validate_splits(splits: &[MasterSplit]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    let mut total = 0.0_f64;

    for split in splits {
        if !split.percentage.is_finite() || split.percentage < 0.0 || split.percentage > 100.0 {
            return Err(Error::InvalidInput(format!(
                "Split percentage {} for collaborator {} is outside 0-100",
                split.percentage, split.collaborator_id
            )));
        }
        if !seen.insert(split.collaborator_id) {
            return Err(Error::InvalidInput(format!(
                "Collaborator {} appears more than once in splits",
                split.collaborator_id
            )));
        }
        total += split.percentage;
    }

    if total > 100.0 {
        return Err(Error::InvalidInput(format!(
            "Split percentages total {}%, must be 100% or less",
            total
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(pct: f64) -> MasterSplit {
        MasterSplit {
            collaborator_id: Uuid::new_v4(),
            percentage: pct,
        }
    }

    #[test]
    fn test_month_key_accepts_valid_keys() {
        assert!(is_valid_month_key("2024-01"));
        assert!(is_valid_month_key("1999-12"));
    }

    #[test]
    fn test_month_key_rejects_malformed_keys() {
        assert!(!is_valid_month_key("2024-13"));
        assert!(!is_valid_month_key("2024-00"));
        assert!(!is_valid_month_key("2024-1"));
        assert!(!is_valid_month_key("2024/01"));
        assert!(!is_valid_month_key("202401"));
        assert!(!is_valid_month_key(""));
        assert!(!is_valid_month_key("24-01"));
    }

    #[test]
    fn test_validate_splits_accepts_partial_total() {
        let splits = vec![split(30.0), split(20.0)];
        assert!(validate_splits(&splits).is_ok());
    }

    #[test]
    fn test_validate_splits_accepts_exact_hundred() {
        let splits = vec![split(60.0), split(40.0)];
        assert!(validate_splits(&splits).is_ok());
    }

    #[test]
    fn test_validate_splits_rejects_total_over_hundred() {
        let splits = vec![split(60.0), split(50.0)];
        assert!(validate_splits(&splits).is_err());
    }

    #[test]
    fn test_validate_splits_rejects_out_of_range_percentage() {
        assert!(validate_splits(&[split(-1.0)]).is_err());
        assert!(validate_splits(&[split(101.0)]).is_err());
        assert!(validate_splits(&[split(f64::NAN)]).is_err());
    }

    #[test]
    fn test_validate_splits_rejects_duplicate_collaborator() {
        let id = Uuid::new_v4();
        let splits = vec![
            MasterSplit { collaborator_id: id, percentage: 10.0 },
            MasterSplit { collaborator_id: id, percentage: 20.0 },
        ];
        assert!(validate_splits(&splits).is_err());
    }

    #[test]
    fn test_validate_splits_accepts_empty_list() {
        assert!(validate_splits(&[]).is_ok());
    }

    #[test]
    fn test_role_round_trips_through_storage_form() {
        for role in [
            CollaboratorRole::Producer,
            CollaboratorRole::FeaturedArtist,
            CollaboratorRole::Remixer,
            CollaboratorRole::SessionMusician,
        ] {
            assert_eq!(CollaboratorRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(CollaboratorRole::parse("Roadie"), None);
    }

    #[test]
    fn test_release_deserializes_with_missing_lists() {
        let json = r#"{
            "id": "6f2b0e1a-0d3c-4f6e-9b3a-2c9d1e8f7a65",
            "artist": "Nova Hart",
            "title": "Midnight Signal",
            "release_date": null
        }"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert!(release.master_splits.is_empty());
        assert!(release.royalty_data.is_empty());
    }
}
