use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use serde::{Deserialize, Serialize};

use super::config::{RequiredDocument, ScoringConfig};
use super::factors;
use super::readiness::{assess_readiness, ReadinessFacts, ReadinessSummary};
use super::tier::HealthTier;
use crate::snapshot::{MilestoneStatus, TransactionSnapshot};

const BASE_SCORE: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountPenalty {
    pub count: u32,
    pub penalty: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailPenalty {
    pub details: Vec<String>,
    pub penalty: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PacePenalty {
    pub remaining_milestones: u32,
    pub days_to_close: Option<i64>, // None when there is no closing date
    pub penalty: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthBreakdown {
    pub overdue_milestones: CountPenalty,
    pub upcoming_no_action: CountPenalty,
    pub missing_parties: DetailPenalty,
    pub missing_documents: DetailPenalty,
    pub pace_ratio: PacePenalty,
}

impl HealthBreakdown {
    pub fn total_penalty(&self) -> u32 {
        self.overdue_milestones.penalty
            + self.upcoming_no_action.penalty
            + self.missing_parties.penalty
            + self.missing_documents.penalty
            + self.pace_ratio.penalty
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResult {
    pub score: u8,
    pub status: HealthTier,
    pub color: String,
    pub breakdown: HealthBreakdown,
    pub readiness: ReadinessSummary,
    pub blockers: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Score a transaction snapshot.
///
/// Starts from 100 and subtracts each category's capped penalty. `now` is the
/// only notion of time used; the result depends on nothing else.
pub fn compute_health(
    snapshot: &TransactionSnapshot,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> HealthResult {
    let today: NaiveDate = now.date_naive();
    let transaction = &snapshot.transaction;
    let milestones = &snapshot.milestones;
    let confirmed = !transaction.is_draft();

    // Overdue milestones
    let overdue = factors::overdue_milestones(milestones, today);
    let overdue_count = overdue.len() as u32;
    let overdue_penalty = config
        .overdue_milestones
        .map_or(0, |rule| rule.apply(overdue_count));

    // Upcoming, not started. Without a policy we still look a week ahead
    // so the facts stay meaningful.
    let window_days = config
        .upcoming_no_action
        .as_ref()
        .and_then(|c| factors::parse_window_days(&c.window).ok())
        .unwrap_or(7);
    let upcoming = factors::upcoming_no_action(milestones, today, window_days);
    let upcoming_count = upcoming.len() as u32;
    let upcoming_penalty = config
        .upcoming_no_action
        .as_ref()
        .map_or(0, |c| c.rule().apply(upcoming_count));

    // Missing parties (drafts are exempt)
    let missing_parties = if confirmed {
        let require_lender = config
            .missing_parties
            .as_ref()
            .map_or(true, |c| c.require_lender_when_financed);
        let required = factors::required_roles(transaction, require_lender);
        factors::missing_roles(&required, &snapshot.parties)
    } else {
        Vec::new()
    };
    let parties_penalty = config
        .missing_parties
        .as_ref()
        .map_or(0, |c| c.rule().apply(missing_parties.len() as u32));

    // Missing documents (drafts are exempt)
    let missing_documents: Vec<String> = match (&config.missing_documents, confirmed) {
        (Some(docs), true) => docs
            .required
            .iter()
            .filter(|req| !factors::has_document(req, &snapshot.documents, transaction))
            .map(|req| req.name.clone())
            .collect(),
        _ => Vec::new(),
    };
    let documents_penalty = config
        .missing_documents
        .as_ref()
        .map_or(0, |c| c.rule().apply(missing_documents.len() as u32));

    // Pace: remaining milestones vs days to close
    let remaining = factors::remaining_milestones(milestones);
    let days_to_close = factors::days_to_close(transaction.closing_date, today);
    let shortfall = days_to_close.map_or(0, |days| factors::pace_shortfall(remaining, days));
    let pace_penalty = config.pace_ratio.map_or(0, |rule| rule.apply(shortfall));

    let breakdown = HealthBreakdown {
        overdue_milestones: CountPenalty {
            count: overdue_count,
            penalty: overdue_penalty,
        },
        upcoming_no_action: CountPenalty {
            count: upcoming_count,
            penalty: upcoming_penalty,
        },
        missing_parties: DetailPenalty {
            details: missing_parties,
            penalty: parties_penalty,
        },
        missing_documents: DetailPenalty {
            details: missing_documents,
            penalty: documents_penalty,
        },
        pace_ratio: PacePenalty {
            remaining_milestones: remaining,
            days_to_close,
            penalty: pace_penalty,
        },
    };

    // The configured contract rule if there is one, else the built-in
    let contract_rule = config
        .missing_documents
        .as_ref()
        .and_then(|docs| {
            docs.required
                .iter()
                .find(|req| req.name.eq_ignore_ascii_case("contract"))
                .cloned()
        })
        .unwrap_or_else(RequiredDocument::contract);
    let summary = ReadinessSummary {
        milestones_completed: milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Completed)
            .count() as u32,
        milestones_total: milestones.len() as u32,
        has_contract: factors::has_document(&contract_rule, &snapshot.documents, transaction),
        party_count: snapshot.parties.len() as u32,
    };

    let readiness = assess_readiness(&ReadinessFacts {
        transaction,
        overdue: &overdue,
        upcoming: &upcoming,
        missing_parties: &breakdown.missing_parties.details,
        missing_documents: &breakdown.missing_documents.details,
        remaining,
        days_to_close,
        shortfall,
    });

    // Clamp to 0..=100
    let score = BASE_SCORE.saturating_sub(breakdown.total_penalty()) as u8;
    let status = HealthTier::from_score(score);

    HealthResult {
        score,
        status,
        color: status.color().to_string(),
        breakdown,
        readiness: summary,
        blockers: readiness.blockers,
        recommendations: readiness.recommendations,
    }
}

/// Sort key that ranks transactions riskiest first: lowest score, then the
/// soonest closing (undated last), then id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskRank<'a> {
    pub score: u8,
    pub closing_date: Option<NaiveDate>,
    pub id: &'a str,
}

impl Ord for RiskRank<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| match (self.closing_date, other.closing_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.id.cmp(other.id))
    }
}

impl PartialOrd for RiskRank<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
