use super::config::{PenaltyRule, ScoringConfig};
use super::factors::parse_window_days;
use glob::Pattern;

const MAX_SCORE: u32 = 100;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(rule) = config.overdue_milestones {
        check_rule("scoring.overdue_milestones", rule, &mut errors);
    }

    if let Some(ref upcoming) = config.upcoming_no_action {
        check_rule("scoring.upcoming_no_action", upcoming.rule(), &mut errors);
        if let Err(e) = parse_window_days(&upcoming.window) {
            errors.push(format!(
                "scoring.upcoming_no_action.window: invalid '{}' - {}",
                upcoming.window, e
            ));
        }
    }

    if let Some(ref parties) = config.missing_parties {
        check_rule("scoring.missing_parties", parties.rule(), &mut errors);
    }

    if let Some(ref documents) = config.missing_documents {
        check_rule("scoring.missing_documents", documents.rule(), &mut errors);
        for (i, required) in documents.required.iter().enumerate() {
            if required.name.trim().is_empty() {
                errors.push(format!(
                    "scoring.missing_documents.required[{}].name: must not be empty",
                    i
                ));
            }
            for (j, pattern) in required.patterns.iter().enumerate() {
                if let Err(e) = Pattern::new(pattern) {
                    errors.push(format!(
                        "scoring.missing_documents.required[{}].patterns[{}]: invalid '{}' - {}",
                        i, j, pattern, e
                    ));
                }
            }
        }
    }

    if let Some(rule) = config.pace_ratio {
        check_rule("scoring.pace_ratio", rule, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rule(path: &str, rule: PenaltyRule, errors: &mut Vec<String>) {
    if rule.cap > MAX_SCORE {
        errors.push(format!("{}.cap: must be at most {}", path, MAX_SCORE));
    }
    if rule.per_item > rule.cap {
        errors.push(format!(
            "{}.per_item: {} exceeds cap {}",
            path, rule.per_item, rule.cap
        ));
    }
}
