use serde::{Deserialize, Serialize};

/// Penalty policy for the health score.
///
/// Every category subtracts `min(count * per_item, cap)` from a base of 100.
/// A category left out (or set to `null`) is disabled: its facts are still
/// reported, but it never costs points.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   overdue_milestones: { per_item: 5, cap: 30 }
///   upcoming_no_action: { per_item: 3, cap: 15, window: "7days" }
///   missing_parties: { per_item: 10, cap: 30 }
///   missing_documents:
///     per_item: 10
///     cap: 20
///     required:
///       - { name: contract, patterns: ["*contract*"] }
///   pace_ratio: { per_item: 4, cap: 20 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Per overdue milestone
    #[serde(default)]
    pub overdue_milestones: Option<PenaltyRule>,

    /// Per not-started milestone due inside the window
    #[serde(default)]
    pub upcoming_no_action: Option<UpcomingConfig>,

    /// Per missing required party role
    #[serde(default)]
    pub missing_parties: Option<PartiesConfig>,

    /// Per missing required document
    #[serde(default)]
    pub missing_documents: Option<DocumentsConfig>,

    /// Per milestone that can't be finished at one-per-day before closing
    #[serde(default)]
    pub pace_ratio: Option<PenaltyRule>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            overdue_milestones: Some(PenaltyRule {
                per_item: 5,
                cap: 30,
            }),
            upcoming_no_action: Some(UpcomingConfig {
                per_item: 3,
                cap: 15,
                window: "7days".to_string(),
            }),
            missing_parties: Some(PartiesConfig {
                per_item: 10,
                cap: 30,
                require_lender_when_financed: true,
            }),
            missing_documents: Some(DocumentsConfig {
                per_item: 10,
                cap: 20,
                required: vec![RequiredDocument::contract()],
            }),
            pace_ratio: Some(PenaltyRule {
                per_item: 4,
                cap: 20,
            }),
        }
    }
}

/// Fixed points per item, capped per category.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PenaltyRule {
    pub per_item: u32,
    pub cap: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UpcomingConfig {
    pub per_item: u32,
    pub cap: u32,

    /// How far ahead to look, humantime syntax (e.g. "7days", "1week").
    /// Rounded down to whole days.
    #[serde(default = "default_window")]
    pub window: String,
}

fn default_window() -> String {
    "7days".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartiesConfig {
    pub per_item: u32,
    pub cap: u32,

    /// Expect a lender when financing_type is set and not "cash"
    #[serde(default = "default_true")]
    pub require_lender_when_financed: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DocumentsConfig {
    pub per_item: u32,
    pub cap: u32,

    #[serde(default)]
    pub required: Vec<RequiredDocument>,
}

/// A document every confirmed transaction must carry.
///
/// Satisfied by a document whose category equals `name`, or whose file name
/// matches one of `patterns` (glob, case-insensitive).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RequiredDocument {
    pub name: String,

    #[serde(default)]
    pub patterns: Vec<String>,
}

impl RequiredDocument {
    /// The purchase contract, found by category or a `*contract*` file name
    pub fn contract() -> Self {
        Self {
            name: "contract".to_string(),
            patterns: vec!["*contract*".to_string()],
        }
    }
}

impl UpcomingConfig {
    pub fn rule(&self) -> PenaltyRule {
        PenaltyRule {
            per_item: self.per_item,
            cap: self.cap,
        }
    }
}

impl PartiesConfig {
    pub fn rule(&self) -> PenaltyRule {
        PenaltyRule {
            per_item: self.per_item,
            cap: self.cap,
        }
    }
}

impl DocumentsConfig {
    pub fn rule(&self) -> PenaltyRule {
        PenaltyRule {
            per_item: self.per_item,
            cap: self.cap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(
            config.overdue_milestones,
            Some(PenaltyRule {
                per_item: 5,
                cap: 30
            })
        );
        assert_eq!(config.upcoming_no_action.unwrap().window, "7days");
        assert!(config.missing_parties.unwrap().require_lender_when_financed);
        assert_eq!(config.missing_documents.unwrap().required[0].name, "contract");
        assert_eq!(config.pace_ratio.unwrap().per_item, 4);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
overdue_milestones:
  per_item: 20
  cap: 90
upcoming_no_action:
  per_item: 10
  cap: 40
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config.overdue_milestones,
            Some(PenaltyRule {
                per_item: 20,
                cap: 90
            })
        );
        assert_eq!(config.upcoming_no_action.unwrap().window, "7days");
        assert!(config.missing_parties.is_none());
        assert!(config.missing_documents.is_none());
        assert!(config.pace_ratio.is_none());
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.overdue_milestones.is_none());
        assert!(config.upcoming_no_action.is_none());
        assert!(config.missing_parties.is_none());
        assert!(config.missing_documents.is_none());
        assert!(config.pace_ratio.is_none());
    }

    #[test]
    fn test_required_documents_parse() {
        let yaml = r#"
per_item: 10
cap: 20
required:
  - name: contract
    patterns: ["*contract*", "*purchase*agreement*"]
  - name: disclosure
"#;
        let config: DocumentsConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.required.len(), 2);
        assert_eq!(config.required[0].patterns.len(), 2);
        assert!(config.required[1].patterns.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "overdue_milestones: { per_item: 5, cap: 30, weight: 2 }";
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
