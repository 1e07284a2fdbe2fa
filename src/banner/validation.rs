//! Content-time banner checks.
//!
//! Validation collects every problem in one pass so a content author sees the
//! whole list at once. It never panics and never short-circuits.

use super::types::Banner;
use crate::core::constants::RATE_SUM_EPSILON;
use crate::items::{Catalog, ItemId, Rarity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IssueKind {
    RateSum { sum: f64 },
    InvalidRate { rarity: Rarity, value: f64 },
    EmptyPool,
    UnknownItem { item_id: ItemId },
    EmptyTier { rarity: Rarity },
    ZeroPityThreshold,
    FeaturedNotInPool { item_id: ItemId },
    RateUpShareOutOfRange { share: f64 },
    RateUpWithoutFeatured,
    FeaturedWithoutRateUp,
    UnreachableItem { item_id: ItemId, rarity: Rarity },
    DuplicatePoolEntry { item_id: ItemId },
    WindowEndsBeforeStart,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::RateUpWithoutFeatured
            | IssueKind::FeaturedWithoutRateUp
            | IssueKind::UnreachableItem { .. }
            | IssueKind::DuplicatePoolEntry { .. }
            | IssueKind::WindowEndsBeforeStart => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::RateSum { sum } => {
                write!(f, "rates sum to {sum}, expected 1 ± {RATE_SUM_EPSILON}")
            }
            IssueKind::InvalidRate { rarity, value } => {
                write!(f, "{rarity} rate {value} is outside [0, 1]")
            }
            IssueKind::EmptyPool => write!(f, "item pool is empty"),
            IssueKind::UnknownItem { item_id } => {
                write!(f, "pool item '{item_id}' is not in the catalog")
            }
            IssueKind::EmptyTier { rarity } => {
                write!(f, "{rarity} has a positive rate but no pool items")
            }
            IssueKind::ZeroPityThreshold => write!(f, "pity threshold must be positive"),
            IssueKind::FeaturedNotInPool { item_id } => {
                write!(f, "featured item '{item_id}' is not in the pool")
            }
            IssueKind::RateUpShareOutOfRange { share } => {
                write!(f, "rate-up share {share} is outside [0, 1]")
            }
            IssueKind::RateUpWithoutFeatured => {
                write!(f, "rate-up share is set but no items are featured")
            }
            IssueKind::FeaturedWithoutRateUp => {
                write!(f, "featured items have no rate-up share")
            }
            IssueKind::UnreachableItem { item_id, rarity } => {
                write!(f, "'{item_id}' is {rarity}, which has a zero rate")
            }
            IssueKind::DuplicatePoolEntry { item_id } => {
                write!(f, "'{item_id}' appears in the pool more than once")
            }
            IssueKind::WindowEndsBeforeStart => {
                write!(f, "activity window ends before it starts")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
}

impl From<IssueKind> for ValidationIssue {
    fn from(kind: IssueKind) -> Self {
        Self {
            severity: kind.severity(),
            kind,
        }
    }
}

/// Every issue found for one banner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub banner_id: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, kind: IssueKind) {
        self.issues.push(kind.into());
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors().map(|i| i.kind.to_string()).collect();
        if messages.is_empty() {
            write!(f, "no errors")
        } else {
            write!(f, "{}", messages.join("; "))
        }
    }
}

/// Checks a banner against the catalog it will draw from.
pub fn validate_banner(banner: &Banner, catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport {
        banner_id: banner.id.clone(),
        issues: Vec::new(),
    };
    let rates = &banner.rate_table;

    for rarity in Rarity::ALL {
        let value = rates.get(rarity);
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            report.push(IssueKind::InvalidRate { rarity, value });
        }
    }
    let sum = rates.sum();
    if !sum.is_finite() || (sum - 1.0).abs() > RATE_SUM_EPSILON {
        report.push(IssueKind::RateSum { sum });
    }

    if banner.item_pool.is_empty() {
        report.push(IssueKind::EmptyPool);
    }

    let mut seen = BTreeSet::new();
    let mut covered = BTreeSet::new();
    for item_id in &banner.item_pool {
        if !seen.insert(item_id.as_str()) {
            report.push(IssueKind::DuplicatePoolEntry {
                item_id: item_id.clone(),
            });
            continue;
        }
        match catalog.get(item_id) {
            None => report.push(IssueKind::UnknownItem {
                item_id: item_id.clone(),
            }),
            Some(item) => {
                covered.insert(item.rarity);
                // Legendaries stay reachable through pity at any rate.
                if item.rarity != Rarity::Legendary && rates.get(item.rarity) <= 0.0 {
                    report.push(IssueKind::UnreachableItem {
                        item_id: item_id.clone(),
                        rarity: item.rarity,
                    });
                }
            }
        }
    }

    for rarity in rates.positive_tiers() {
        if !covered.contains(&rarity) {
            report.push(IssueKind::EmptyTier { rarity });
        }
    }
    // Pity forces legendary regardless of its rate.
    if rates.get(Rarity::Legendary) <= 0.0 && !covered.contains(&Rarity::Legendary) {
        report.push(IssueKind::EmptyTier {
            rarity: Rarity::Legendary,
        });
    }

    if banner.pity_threshold == 0 {
        report.push(IssueKind::ZeroPityThreshold);
    }

    for featured in &banner.featured_item_ids {
        if !seen.contains(featured.as_str()) {
            report.push(IssueKind::FeaturedNotInPool {
                item_id: featured.clone(),
            });
        }
    }

    let share = banner.featured_rate_up_share;
    if !share.is_finite() || !(0.0..=1.0).contains(&share) {
        report.push(IssueKind::RateUpShareOutOfRange { share });
    } else if share > 0.0 && banner.featured_item_ids.is_empty() {
        report.push(IssueKind::RateUpWithoutFeatured);
    } else if share == 0.0 && !banner.featured_item_ids.is_empty() {
        report.push(IssueKind::FeaturedWithoutRateUp);
    }

    if banner.window.is_inverted() {
        report.push(IssueKind::WindowEndsBeforeStart);
    }

    report
}
