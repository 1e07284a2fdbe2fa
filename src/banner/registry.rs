use super::types::Banner;
use super::validation::{validate_banner, ValidationReport};
use crate::core::error::GachaError;
use crate::items::Catalog;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Live banners keyed by id. A banner only becomes reachable here after it
/// passes validation; republishing swaps in a newer version without touching
/// the `Arc` held by any in-flight pull.
#[derive(Debug, Clone, Default)]
pub struct BannerRegistry {
    banners: BTreeMap<String, Arc<Banner>>,
}

impl BannerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and publishes a banner. Warnings are returned alongside the
    /// published banner; any error rejects it.
    pub fn publish(
        &mut self,
        banner: Banner,
        catalog: &Catalog,
    ) -> Result<(Arc<Banner>, ValidationReport), GachaError> {
        let report = validate_banner(&banner, catalog);
        if report.has_errors() {
            return Err(GachaError::InvalidBanner {
                banner_id: banner.id,
                report,
            });
        }

        if let Some(live) = self.banners.get(&banner.id) {
            if banner.version <= live.version {
                return Err(GachaError::StaleBannerVersion {
                    banner_id: banner.id,
                    offered: banner.version,
                    live: live.version,
                });
            }
        }

        tracing::info!(
            banner = %banner.id,
            version = banner.version,
            pool = banner.item_pool.len(),
            warnings = report.warnings().count(),
            "banner published"
        );
        let banner = Arc::new(banner);
        self.banners.insert(banner.id.clone(), Arc::clone(&banner));
        Ok((banner, report))
    }

    pub fn get(&self, id: &str) -> Result<Arc<Banner>, GachaError> {
        self.banners
            .get(id)
            .cloned()
            .ok_or_else(|| GachaError::UnknownBanner(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.banners.contains_key(id)
    }

    /// Banners whose activity window contains `now`, in id order.
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Arc<Banner>> {
        self.banners
            .values()
            .filter(|b| b.is_active(now))
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Banner>> {
        self.banners.values()
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}
