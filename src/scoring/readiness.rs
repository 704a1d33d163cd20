use serde::{Deserialize, Serialize};

use crate::snapshot::{Milestone, Transaction};

/// Facts gathered by the engine, turned into readable next steps.
pub struct ReadinessFacts<'a> {
    pub transaction: &'a Transaction,
    pub overdue: &'a [&'a Milestone],
    pub upcoming: &'a [&'a Milestone],
    pub missing_parties: &'a [String],
    pub missing_documents: &'a [String],
    pub remaining: u32,
    pub days_to_close: Option<i64>,
    pub shortfall: u32,
}

/// Closing checklist counts reported next to the score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessSummary {
    pub milestones_completed: u32,
    pub milestones_total: u32,
    pub has_contract: bool,
    pub party_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readiness {
    pub blockers: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Blockers are hard stops for closing; recommendations are soft next steps.
/// Output order is fixed so identical facts give identical lists.
pub fn assess_readiness(facts: &ReadinessFacts) -> Readiness {
    let mut readiness = Readiness::default();
    let closing_passed = facts.days_to_close.is_some_and(|d| d < 0);
    let confirmed = !facts.transaction.is_draft();

    if confirmed && !facts.overdue.is_empty() {
        readiness
            .blockers
            .push(format!("{} overdue milestone(s)", facts.overdue.len()));
    }
    for role in facts.missing_parties {
        readiness
            .blockers
            .push(format!("Missing required party: {}", role));
    }
    for doc in facts.missing_documents {
        readiness
            .blockers
            .push(format!("Missing required document: {}", doc));
    }
    if confirmed && facts.transaction.closing_date.is_none() {
        readiness.blockers.push("Closing date not set".to_string());
    }
    if closing_passed && facts.remaining > 0 {
        if let Some(closing) = facts.transaction.closing_date {
            readiness.blockers.push(format!(
                "Closing date {} has passed with {} incomplete milestone(s)",
                closing, facts.remaining
            ));
        }
    }

    for m in facts.overdue {
        let mut line = format!("Follow up on overdue milestone '{}'", m.display_name());
        if let Some(due) = m.due_date {
            line.push_str(&format!(" (due {}", due));
            if let Some(role) = m.responsible_party_role.as_deref() {
                line.push_str(&format!(", owner: {}", role));
            }
            line.push(')');
        }
        readiness.recommendations.push(line);
    }

    for m in facts.upcoming {
        let line = match m.due_date {
            Some(due) => format!("Start '{}' before {}", m.display_name(), due),
            None => format!("Start '{}'", m.display_name()),
        };
        readiness.recommendations.push(line);
    }

    if facts.shortfall > 0 && !closing_passed {
        if let Some(days) = facts.days_to_close {
            readiness.recommendations.push(format!(
                "{} milestone(s) remain with {} day(s) to close; accelerate them or request a closing extension",
                facts.remaining, days
            ));
        }
    }

    if confirmed && facts.transaction.closing_date.is_none() {
        readiness
            .recommendations
            .push("Set a closing date to track pace to close".to_string());
    }

    for role in facts.missing_parties {
        readiness
            .recommendations
            .push(format!("Add the {} to the transaction", role));
    }
    for doc in facts.missing_documents {
        readiness
            .recommendations
            .push(format!("Upload the {} document", doc));
    }

    readiness
}
