//! Simulation report generation.

use crate::banner::RateTable;
use crate::history::PullStats;
use crate::items::Rarity;
use serde::Serialize;

/// Per-player outcome kept for distribution analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRun {
    pub player_index: u32,
    pub stats: PullStats,
    pub final_pity: u32,
    pub distinct_items: usize,
}

/// Aggregated results from a simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub banner_id: String,
    pub declared: RateTable,
    pub pity_threshold: u32,
    pub num_players: u32,
    pub totals: PullStats,
    pub pool_size: usize,
    pub avg_distinct_items: f64,
    pub runs: Vec<PlayerRun>,
}

impl SimReport {
    pub fn from_runs(
        banner_id: &str,
        declared: RateTable,
        pity_threshold: u32,
        pool_size: usize,
        runs: Vec<PlayerRun>,
    ) -> Self {
        let mut totals = PullStats::default();
        for run in &runs {
            totals.merge(&run.stats);
        }
        let num_players = runs.len() as u32;
        let avg_distinct_items = runs.iter().map(|r| r.distinct_items as f64).sum::<f64>()
            / num_players.max(1) as f64;

        Self {
            banner_id: banner_id.to_string(),
            declared,
            pity_threshold,
            num_players,
            totals,
            pool_size,
            avg_distinct_items,
            runs,
        }
    }

    /// Empirical minus declared rate for a tier.
    pub fn deviation(&self, rarity: Rarity) -> f64 {
        self.totals.rate(rarity) - self.declared.get(rarity)
    }

    /// Average pulls per legendary, including pity legendaries.
    pub fn pulls_per_legendary(&self) -> Option<f64> {
        let hits = self.totals.legendary_hits();
        (hits > 0).then(|| self.totals.total_pulls as f64 / hits as f64)
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    PULL SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Banner: {}  Players: {}  Pulls: {}\n\n",
            self.banner_id, self.num_players, self.totals.total_pulls
        ));

        report.push_str("── RARITY DISTRIBUTION ──────────────────────────────────────────\n");
        report.push_str("  Rarity       Declared   Observed   Deviation   Count\n");
        report.push_str("  ──────       ────────   ────────   ─────────   ─────\n");
        for rarity in Rarity::DRAW_ORDER {
            report.push_str(&format!(
                "  {:<10}   {:>7.3}%   {:>7.3}%   {:>+8.3}%   {}\n",
                rarity.name(),
                self.declared.get(rarity) * 100.0,
                self.totals.rate(rarity) * 100.0,
                self.deviation(rarity) * 100.0,
                self.totals.count(rarity)
            ));
        }
        report.push('\n');

        report.push_str("── PITY ─────────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Threshold:           {}\n", self.pity_threshold));
        report.push_str(&format!(
            "  Pity Legendaries:    {}\n",
            self.totals.pity_triggers
        ));
        report.push_str(&format!(
            "  Longest Dry Streak:  {}\n",
            self.totals.max_legendary_gap
        ));
        match self.pulls_per_legendary() {
            Some(avg) => report.push_str(&format!("  Pulls per Legendary: {:.1}\n\n", avg)),
            None => report.push_str("  Pulls per Legendary: n/a\n\n"),
        }

        report.push_str("── COLLECTION ───────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Featured Hits:       {}\n",
            self.totals.featured_hits
        ));
        report.push_str(&format!(
            "  Duplicates:          {} ({:.1}%)\n",
            self.totals.duplicates,
            self.totals.duplicates as f64 / self.totals.total_pulls.max(1) as f64 * 100.0
        ));
        report.push_str(&format!(
            "  Avg Distinct Items:  {:.1} / {}\n",
            self.avg_distinct_items, self.pool_size
        ));

        if self.totals.max_legendary_gap > self.pity_threshold as u64 {
            report.push_str("  ⚠️  A dry streak exceeded the pity threshold\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
