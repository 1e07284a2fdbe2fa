//! Content pack loading.
//!
//! A pack is a JSON document with the item catalog and the banners that draw
//! from it. Every banner is validated before it is published; a banner with
//! errors is reported and left out of the registry.

use crate::banner::{validate_banner, Banner, BannerRegistry, ValidationReport};
use crate::core::error::{GachaError, SaveError};
use crate::items::{Catalog, GachaItem};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPack {
    #[serde(default)]
    pub name: String,
    pub items: Vec<GachaItem>,
    #[serde(default)]
    pub banners: Vec<Banner>,
}

impl ContentPack {
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SaveError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A pack after validation: the catalog, the banners that passed, and one
/// report per banner entry (including rejected and superseded ones).
#[derive(Debug, Clone, Default)]
pub struct LoadedContent {
    pub catalog: Catalog,
    pub registry: BannerRegistry,
    pub reports: Vec<ValidationReport>,
    /// Entries with validation errors. These entries were not published.
    pub rejected: Vec<String>,
    /// Later entries that repeat an id without raising its version. The
    /// earlier entry with that id stays live.
    pub superseded: Vec<String>,
}

impl LoadedContent {
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Builds the catalog and publishes every banner that validates.
///
/// Fails only when the catalog itself cannot be built (duplicate item ids);
/// banner problems are collected in the returned reports.
pub fn load(pack: ContentPack) -> Result<LoadedContent, GachaError> {
    let catalog = Catalog::from_items(pack.items)?;
    let mut registry = BannerRegistry::new();
    let mut reports = Vec::with_capacity(pack.banners.len());
    let mut rejected = Vec::new();
    let mut superseded = Vec::new();

    for banner in pack.banners {
        let banner_id = banner.id.clone();
        let repeat = registry.contains(&banner_id).then(|| banner.clone());
        match registry.publish(banner, &catalog) {
            Ok((_, report)) => {
                for warning in report.warnings() {
                    tracing::warn!(banner = %banner_id, "{}", warning.kind);
                }
                reports.push(report);
            }
            Err(GachaError::InvalidBanner { report, .. }) => {
                for issue in &report.issues {
                    tracing::warn!(banner = %banner_id, severity = ?issue.severity, "{}", issue.kind);
                }
                rejected.push(banner_id);
                reports.push(report);
            }
            Err(GachaError::StaleBannerVersion { offered, live, .. }) => {
                tracing::warn!(
                    banner = %banner_id,
                    offered,
                    live,
                    "banner id repeated, keeping the earlier entry"
                );
                if let Some(repeat) = repeat {
                    reports.push(validate_banner(&repeat, &catalog));
                }
                superseded.push(banner_id);
            }
            Err(err) => {
                tracing::warn!(banner = %banner_id, "{err}");
                rejected.push(banner_id);
            }
        }
    }

    tracing::info!(
        pack = %pack.name,
        items = catalog.len(),
        banners = registry.len(),
        rejected = rejected.len(),
        superseded = superseded.len(),
        "content pack loaded"
    );

    Ok(LoadedContent {
        catalog,
        registry,
        reports,
        rejected,
        superseded,
    })
}

/// The built-in standard pack: a small staff catalog and one standard banner.
pub fn standard_pack() -> ContentPack {
    use crate::banner::RateTable;
    use crate::items::Rarity;

    let roster: [(&str, Rarity, &str); 12] = [
        ("intern", Rarity::Common, "Intern"),
        ("qa-tester", Rarity::Common, "QA Tester"),
        ("support-agent", Rarity::Common, "Support Agent"),
        ("junior-dev", Rarity::Uncommon, "Junior Developer"),
        ("designer", Rarity::Uncommon, "Designer"),
        ("senior-dev", Rarity::Rare, "Senior Developer"),
        ("data-scientist", Rarity::Rare, "Data Scientist"),
        ("staff-engineer", Rarity::Epic, "Staff Engineer"),
        ("product-lead", Rarity::Epic, "Product Lead"),
        ("cto", Rarity::Legendary, "Visionary CTO"),
        ("serial-founder", Rarity::Legendary, "Serial Founder"),
        ("ai-researcher", Rarity::Legendary, "AI Researcher"),
    ];
    let items: Vec<GachaItem> = roster
        .iter()
        .map(|(id, rarity, name)| {
            GachaItem::new(*id, *rarity, *name, "staff").with_payload(format!("staff/{id}"))
        })
        .collect();
    let pool = items.iter().map(|i| i.id.clone()).collect();

    ContentPack {
        name: "standard".to_string(),
        items,
        banners: vec![Banner::new("standard", RateTable::standard(), pool)
            .with_name("Standard Recruitment")
            .with_featured(["cto"], 0.5)],
    }
}
