use std::io::IsTerminal;

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::scoring::{HealthResult, HealthTier, TierBand};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Score padded to 3 chars, colored by tier
pub fn format_score(score: u8, tier: HealthTier, use_colors: bool) -> String {
    paint_score(format!("{:>3}", score), tier, use_colors)
}

fn paint_score(text: String, tier: HealthTier, use_colors: bool) -> String {
    if !use_colors {
        return text;
    }
    match tier {
        HealthTier::OnTrack => text.green().bold().to_string(),
        HealthTier::NeedsAttention => text.yellow().bold().to_string(),
        HealthTier::AtRisk => text.red().bold().to_string(),
    }
}

/// A scored transaction for the ranked table
pub struct ScoredTransaction<'a> {
    pub id: &'a str,
    pub closing_date: Option<NaiveDate>,
    pub result: &'a HealthResult,
}

/// Multi-line view of one result: score, categories, blockers, next steps
pub fn format_health_detail(id: &str, result: &HealthResult, use_colors: bool) -> String {
    let b = &result.breakdown;
    let days = match b.pace_ratio.days_to_close {
        Some(d) => d.to_string(),
        None => "n/a".to_string(),
    };

    let mut lines = vec![
        format!(
            "{}  {}  {}",
            if use_colors {
                id.bold().to_string()
            } else {
                id.to_string()
            },
            paint_score(result.score.to_string(), result.status, use_colors),
            result.status.label()
        ),
        format!(
            "  Overdue milestones:   {:>3} ({} found)",
            -(b.overdue_milestones.penalty as i64),
            b.overdue_milestones.count
        ),
        format!(
            "  Upcoming, no action:  {:>3} ({} found)",
            -(b.upcoming_no_action.penalty as i64),
            b.upcoming_no_action.count
        ),
        format!(
            "  Missing parties:      {:>3} [{}]",
            -(b.missing_parties.penalty as i64),
            b.missing_parties.details.join(", ")
        ),
        format!(
            "  Missing documents:    {:>3} [{}]",
            -(b.missing_documents.penalty as i64),
            b.missing_documents.details.join(", ")
        ),
        format!(
            "  Pace to close:        {:>3} ({} remaining, {} days)",
            -(b.pace_ratio.penalty as i64),
            b.pace_ratio.remaining_milestones,
            days
        ),
        format!(
            "  Checklist:            {}/{} milestones done, contract {}, {} parties",
            result.readiness.milestones_completed,
            result.readiness.milestones_total,
            if result.readiness.has_contract { "on file" } else { "missing" },
            result.readiness.party_count
        ),
    ];

    if !result.blockers.is_empty() {
        lines.push(String::new());
        lines.push(if use_colors {
            "Blockers:".red().bold().to_string()
        } else {
            "Blockers:".to_string()
        });
        lines.extend(result.blockers.iter().map(|b| format!("  - {}", b)));
    }

    if !result.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Next steps:".to_string());
        lines.extend(result.recommendations.iter().map(|r| format!("  - {}", r)));
    }

    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Ranked table: Index, Score, Closing date, Id, first blocker (if any).
/// No headers. Index column: 3 chars (fits "99."), right-aligned.
pub fn format_health_table(rows: &[ScoredTransaction], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No transactions found.".to_string();
    }

    let term_width = get_terminal_width();
    let separator = "  ";

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format_score(row.result.score, row.result.status, use_colors);
            let closing = row
                .closing_date
                .map_or_else(|| "----------".to_string(), |d| d.to_string());
            let note = row.result.blockers.first().map(String::as_str).unwrap_or("");

            // index + score + closing + id + separators
            let fixed_width = 3 + 1 + 3 + separator.len() * 3 + closing.len() + row.id.len();
            let note = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(note, width - fixed_width),
                Some(_) => truncate(note, 20),
                None => note.to_string(),
            };

            let index_str = if use_colors {
                index_str.dimmed().to_string()
            } else {
                index_str
            };
            let line = format!(
                "{} {}{}{}{}{}",
                index_str, score_str, separator, closing, separator, row.id
            );
            if note.is_empty() {
                line
            } else {
                format!("{}{}{}", line, separator, note)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tab-separated values for scripting
/// Columns: id, score, status, closing_date (no headers, no colors)
pub fn format_tsv(rows: &[ScoredTransaction]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}",
                row.id,
                row.result.score,
                row.result.status,
                row.closing_date.map(|d| d.to_string()).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The tier table as printed by `deal-health tiers`
pub fn format_tiers(tiers: &[TierBand], use_colors: bool) -> String {
    tiers
        .iter()
        .rev()
        .map(|band| {
            let range = format!("{:>3}-{:<3}", band.min_score, band.max_score);
            let label = format!("{:<16}", band.label);
            let range = if use_colors {
                match band.tier {
                    HealthTier::OnTrack => range.green().to_string(),
                    HealthTier::NeedsAttention => range.yellow().to_string(),
                    HealthTier::AtRisk => range.red().to_string(),
                }
            } else {
                range
            };
            format!("{}  {}{}  {}", range, label, band.tier, band.color)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::engine::{CountPenalty, DetailPenalty, HealthBreakdown, PacePenalty};
    use crate::scoring::{ReadinessSummary, TIERS};

    fn sample_result() -> HealthResult {
        HealthResult {
            score: 63,
            status: HealthTier::NeedsAttention,
            color: "yellow".to_string(),
            breakdown: HealthBreakdown {
                overdue_milestones: CountPenalty { count: 2, penalty: 10 },
                upcoming_no_action: CountPenalty { count: 1, penalty: 3 },
                missing_parties: DetailPenalty {
                    details: vec!["buyer_agent".to_string()],
                    penalty: 10,
                },
                missing_documents: DetailPenalty {
                    details: vec!["contract".to_string()],
                    penalty: 10,
                },
                pace_ratio: PacePenalty {
                    remaining_milestones: 5,
                    days_to_close: Some(4),
                    penalty: 4,
                },
            },
            readiness: ReadinessSummary {
                milestones_completed: 3,
                milestones_total: 8,
                has_contract: false,
                party_count: 2,
            },
            blockers: vec!["Missing required party: buyer_agent".to_string()],
            recommendations: vec!["Add the buyer_agent to the transaction".to_string()],
        }
    }

    #[test]
    fn test_format_score_plain() {
        assert_eq!(format_score(7, HealthTier::AtRisk, false), "  7");
        assert_eq!(format_score(100, HealthTier::OnTrack, false), "100");
    }

    #[test]
    fn test_format_health_detail() {
        let output = format_health_detail("txn-1", &sample_result(), false);
        assert!(output.starts_with("txn-1  63  Needs Attention"));
        assert!(output.contains("Overdue milestones:   -10 (2 found)"));
        assert!(output.contains("Missing parties:      -10 [buyer_agent]"));
        assert!(output.contains("Pace to close:         -4 (5 remaining, 4 days)"));
        assert!(output.contains("Checklist:            3/8 milestones done, contract missing, 2 parties"));
        assert!(output.contains("Blockers:\n  - Missing required party: buyer_agent"));
        assert!(output.contains("Next steps:\n  - Add the buyer_agent to the transaction"));
    }

    #[test]
    fn test_format_health_detail_colored_header_unpadded() {
        let mut result = sample_result();
        result.score = 7;
        result.status = HealthTier::AtRisk;
        let output = format_health_detail("txn-1", &result, true);
        let header = output.lines().next().unwrap();
        assert!(header.contains(&"7".red().bold().to_string()));
        assert!(!header.contains("  7"));
    }

    #[test]
    fn test_format_health_detail_without_closing_date() {
        let mut result = sample_result();
        result.breakdown.pace_ratio.days_to_close = None;
        result.blockers.clear();
        let output = format_health_detail("txn-1", &result, false);
        assert!(output.contains("n/a days"));
        assert!(!output.contains("Blockers:"));
    }

    #[test]
    fn test_format_health_table_empty() {
        assert_eq!(format_health_table(&[], false), "No transactions found.");
    }

    #[test]
    fn test_format_health_table_rows() {
        let result = sample_result();
        let rows = vec![
            ScoredTransaction {
                id: "txn-1",
                closing_date: NaiveDate::from_ymd_opt(2026, 10, 22),
                result: &result,
            },
            ScoredTransaction {
                id: "txn-2",
                closing_date: None,
                result: &result,
            },
        ];
        let output = format_health_table(&rows, false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1.  63  2026-10-22  txn-1"));
        assert!(lines[1].starts_with(" 2.  63  ----------  txn-2"));
    }

    #[test]
    fn test_format_tsv() {
        let result = sample_result();
        let rows = vec![ScoredTransaction {
            id: "txn-1",
            closing_date: None,
            result: &result,
        }];
        assert_eq!(format_tsv(&rows), "txn-1\t63\tneeds_attention\t");
    }

    #[test]
    fn test_format_tiers_highest_first() {
        let output = format_tiers(&TIERS, false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("On Track"));
        assert!(lines[0].contains(" 71-100"));
        assert!(lines[2].contains("at_risk"));
        assert!(lines[2].ends_with("red"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer line", 8), "a lon...");
    }
}
