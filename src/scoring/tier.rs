//! Readiness tiers shared by the scorer, the terminal output and the UI badge.
//!
//! `TIERS` is the only place the 40/70 split is written down. The HTTP layer
//! serves it verbatim so the frontend colors badges from the same table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HealthTier {
    OnTrack,
    NeedsAttention,
    AtRisk,
}

/// A closed score range mapped to a tier.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TierBand {
    pub tier: HealthTier,
    pub min_score: u8,
    pub max_score: u8,
    pub color: &'static str,
    pub label: &'static str,
}

/// Score bands, lowest first. Together they cover 0..=100 without overlap.
pub static TIERS: [TierBand; 3] = [
    TierBand {
        tier: HealthTier::AtRisk,
        min_score: 0,
        max_score: 40,
        color: "red",
        label: "At Risk",
    },
    TierBand {
        tier: HealthTier::NeedsAttention,
        min_score: 41,
        max_score: 70,
        color: "yellow",
        label: "Needs Attention",
    },
    TierBand {
        tier: HealthTier::OnTrack,
        min_score: 71,
        max_score: 100,
        color: "green",
        label: "On Track",
    },
];

impl HealthTier {
    pub fn from_score(score: u8) -> Self {
        TIERS
            .iter()
            .find(|band| score >= band.min_score && score <= band.max_score)
            .map(|band| band.tier)
            // Scores above 100 never come out of the engine
            .unwrap_or(HealthTier::OnTrack)
    }

    pub fn band(self) -> &'static TierBand {
        match self {
            HealthTier::AtRisk => &TIERS[0],
            HealthTier::NeedsAttention => &TIERS[1],
            HealthTier::OnTrack => &TIERS[2],
        }
    }

    pub fn color(self) -> &'static str {
        self.band().color
    }

    pub fn label(self) -> &'static str {
        self.band().label
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthTier::OnTrack => "on_track",
            HealthTier::NeedsAttention => "needs_attention",
            HealthTier::AtRisk => "at_risk",
        }
    }
}

impl std::fmt::Display for HealthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(HealthTier::from_score(100), HealthTier::OnTrack);
        assert_eq!(HealthTier::from_score(71), HealthTier::OnTrack);
        assert_eq!(HealthTier::from_score(70), HealthTier::NeedsAttention);
        assert_eq!(HealthTier::from_score(41), HealthTier::NeedsAttention);
        assert_eq!(HealthTier::from_score(40), HealthTier::AtRisk);
        assert_eq!(HealthTier::from_score(0), HealthTier::AtRisk);
    }

    #[test]
    fn test_tiers_cover_full_range() {
        for score in 0..=100u8 {
            let matches = TIERS
                .iter()
                .filter(|b| score >= b.min_score && score <= b.max_score)
                .count();
            assert_eq!(matches, 1, "score {} matched {} bands", score, matches);
        }
    }

    #[test]
    fn test_band_lookup_matches_table() {
        for band in &TIERS {
            assert_eq!(band.tier.band(), band);
        }
    }

    #[test]
    fn test_colors_and_labels() {
        assert_eq!(HealthTier::OnTrack.color(), "green");
        assert_eq!(HealthTier::NeedsAttention.color(), "yellow");
        assert_eq!(HealthTier::AtRisk.color(), "red");
        assert_eq!(HealthTier::AtRisk.label(), "At Risk");
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&HealthTier::NeedsAttention).unwrap();
        assert_eq!(json, "\"needs_attention\"");
        assert_eq!(HealthTier::NeedsAttention.to_string(), "needs_attention");
    }
}
