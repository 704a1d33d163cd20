use anyhow::{bail, Result};
use chrono::{Days, NaiveDate};
use glob::{MatchOptions, Pattern};

use super::config::{PenaltyRule, RequiredDocument};
use crate::snapshot::{Document, Milestone, MilestoneStatus, Party, RepresentationSide, Transaction};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

impl PenaltyRule {
    /// Points for `count` items, capped
    pub fn apply(&self, count: u32) -> u32 {
        count.saturating_mul(self.per_item).min(self.cap)
    }
}

/// Parse a lookahead window like "7days" or "1week" into whole days.
pub fn parse_window_days(s: &str) -> Result<i64> {
    let duration = humantime::parse_duration(s.trim())?;
    let days = duration.as_secs() / SECS_PER_DAY;
    if days == 0 {
        bail!("window must be at least one day: {}", s)
    }
    Ok(days as i64)
}

pub fn overdue_milestones(milestones: &[Milestone], today: NaiveDate) -> Vec<&Milestone> {
    milestones.iter().filter(|m| m.is_overdue(today)).collect()
}

/// Not-started milestones due between today and today + window (inclusive).
/// A window past the end of the calendar reaches `NaiveDate::MAX`.
pub fn upcoming_no_action(
    milestones: &[Milestone],
    today: NaiveDate,
    window_days: i64,
) -> Vec<&Milestone> {
    let horizon = today
        .checked_add_days(Days::new(window_days.max(0) as u64))
        .unwrap_or(NaiveDate::MAX);
    milestones
        .iter()
        .filter(|m| m.status == MilestoneStatus::NotStarted)
        .filter(|m| m.due_date.is_some_and(|due| due >= today && due <= horizon))
        .collect()
}

pub fn remaining_milestones(milestones: &[Milestone]) -> u32 {
    milestones.iter().filter(|m| m.is_remaining()).count() as u32
}

/// Roles a confirmed transaction must have, in reporting order.
pub fn required_roles(transaction: &Transaction, require_lender: bool) -> Vec<&'static str> {
    let mut roles = match transaction.representation_side {
        Some(RepresentationSide::Buyer) => vec!["buyer", "buyer_agent"],
        Some(RepresentationSide::Seller) => vec!["seller", "seller_agent"],
        Some(RepresentationSide::Dual) => vec!["buyer", "buyer_agent", "seller", "seller_agent"],
        None => vec!["buyer", "seller"],
    };
    if require_lender && transaction.is_financed() {
        roles.push("lender");
    }
    roles
}

pub fn missing_roles(required: &[&str], parties: &[Party]) -> Vec<String> {
    required
        .iter()
        .filter(|role| !parties.iter().any(|p| p.role.trim().eq_ignore_ascii_case(role)))
        .map(|role| role.to_string())
        .collect()
}

/// Whether `required` is satisfied by any document (or, for the contract,
/// by the transaction's contract URL).
pub fn has_document(
    required: &RequiredDocument,
    documents: &[Document],
    transaction: &Transaction,
) -> bool {
    if required.name.eq_ignore_ascii_case("contract")
        && transaction
            .contract_document_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    {
        return true;
    }

    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };
    // Invalid patterns are reported by validate_scoring and skipped here
    let patterns: Vec<Pattern> = required
        .patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    documents.iter().any(|doc| {
        let category_match = doc
            .category
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(&required.name));
        let name_match = doc
            .name
            .as_deref()
            .is_some_and(|name| patterns.iter().any(|p| p.matches_with(name, options)));
        category_match || name_match
    })
}

/// Days from `today` to the closing date, negative once it has passed.
pub fn days_to_close(closing_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    closing_date.map(|closing| (closing - today).num_days())
}

/// Milestones that can't be finished at one per day before closing.
pub fn pace_shortfall(remaining: u32, days_to_close: i64) -> u32 {
    let available = days_to_close.max(0).min(u32::MAX as i64) as u32;
    remaining.saturating_sub(available)
}
