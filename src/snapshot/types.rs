use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Everything the health engine needs to know about one transaction.
///
/// Assembled by a [`TransactionStore`](crate::store::TransactionStore) and
/// never mutated by scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionSnapshot {
    pub transaction: Transaction,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub status: TransactionStatus,
    /// Blank strings read as absent
    #[serde(default, deserialize_with = "deserialize_side")]
    pub representation_side: Option<RepresentationSide>,
    #[serde(default)]
    pub financing_type: Option<String>, // "cash", "conventional", "fha", ...
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub contract_execution_date: Option<NaiveDate>,
    #[serde(default)]
    pub contract_document_url: Option<String>,
}

impl Transaction {
    /// Drafts are not yet confirmed and skip party/document checks
    pub fn is_draft(&self) -> bool {
        self.status == TransactionStatus::Draft
    }

    /// True when a lender is expected: financing is set and isn't cash
    pub fn is_financed(&self) -> bool {
        self.financing_type
            .as_deref()
            .map(str::trim)
            .is_some_and(|f| !f.is_empty() && !f.eq_ignore_ascii_case("cash"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Draft,
    Confirmed,
    Active,
    Closed,
    Cancelled,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RepresentationSide {
    Buyer,
    Seller,
    Dual,
}

const SIDES: &[&str] = &["buyer", "seller", "dual"];

fn deserialize_side<'de, D>(deserializer: D) -> Result<Option<RepresentationSide>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let side = match raw.as_deref().map(str::trim) {
        None | Some("") => return Ok(None),
        Some(side) => side.to_ascii_lowercase(),
    };
    match side.as_str() {
        "buyer" => Ok(Some(RepresentationSide::Buyer)),
        "seller" => Ok(Some(RepresentationSide::Seller)),
        "dual" => Ok(Some(RepresentationSide::Dual)),
        other => Err(<D::Error as de::Error>::unknown_variant(other, SIDES)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub status: MilestoneStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub responsible_party_role: Option<String>,
}

impl Milestone {
    /// Title for messages, falling back to the id
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.id,
        }
    }

    /// Still has work left. `pending_date` milestones wait on another event
    /// and are not counted.
    pub fn is_remaining(&self) -> bool {
        !matches!(
            self.status,
            MilestoneStatus::Completed | MilestoneStatus::PendingDate
        )
    }

    /// Past due relative to `today`. Milestones without a due date never are.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_remaining() && self.due_date.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[serde(alias = "pending")]
    NotStarted,
    InProgress,
    Completed,
    Overdue,
    PendingDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Party {
    pub role: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(default, alias = "content_type")]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn milestone(status: MilestoneStatus, due: Option<&str>) -> Milestone {
        Milestone {
            id: "m1".to_string(),
            title: None,
            status,
            due_date: due.map(date),
            responsible_party_role: None,
        }
    }

    #[test]
    fn test_parse_minimal_snapshot() {
        let json = r#"{"transaction": {"id": "t1", "status": "confirmed"}}"#;
        let snapshot: TransactionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.transaction.id, "t1");
        assert_eq!(snapshot.transaction.status, TransactionStatus::Confirmed);
        assert!(snapshot.transaction.closing_date.is_none());
        assert!(snapshot.milestones.is_empty());
        assert!(snapshot.parties.is_empty());
        assert!(snapshot.documents.is_empty());
    }

    #[test]
    fn test_blank_representation_side_is_absent() {
        let json = r#"{"transaction": {"id": "t", "status": "confirmed", "representation_side": ""}}"#;
        let snapshot: TransactionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.transaction.representation_side, None);

        let txn: Transaction =
            serde_json::from_str(r#"{"id": "t", "status": "active", "representation_side": null}"#)
                .unwrap();
        assert_eq!(txn.representation_side, None);

        let txn: Transaction =
            serde_json::from_str(r#"{"id": "t", "status": "active", "representation_side": " Dual "}"#)
                .unwrap();
        assert_eq!(txn.representation_side, Some(RepresentationSide::Dual));
    }

    #[test]
    fn test_unknown_representation_side_rejected() {
        let json = r#"{"id": "t", "status": "active", "representation_side": "landlord"}"#;
        let err = serde_json::from_str::<Transaction>(json).unwrap_err();
        assert!(err.to_string().contains("unknown variant `landlord`"));
    }

    #[test]
    fn test_unknown_transaction_status_is_other() {
        let json = r#"{"id": "t1", "status": "under_review"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.status, TransactionStatus::Other);
        assert!(!txn.is_draft());
    }

    #[test]
    fn test_pending_is_alias_for_not_started() {
        let json = r#"{"id": "m1", "status": "pending", "due_date": "2026-10-20"}"#;
        let m: Milestone = serde_json::from_str(json).unwrap();
        assert_eq!(m.status, MilestoneStatus::NotStarted);
        assert_eq!(m.due_date, Some(date("2026-10-20")));
    }

    #[test]
    fn test_document_accepts_content_type() {
        let json = r#"{"content_type": "contract"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.category.as_deref(), Some("contract"));
    }

    #[test]
    fn test_is_financed() {
        let mut txn: Transaction =
            serde_json::from_str(r#"{"id": "t1", "status": "active"}"#).unwrap();
        assert!(!txn.is_financed());

        txn.financing_type = Some("Cash".to_string());
        assert!(!txn.is_financed());

        txn.financing_type = Some("conventional".to_string());
        assert!(txn.is_financed());
    }

    #[test]
    fn test_overdue_requires_due_date() {
        let today = date("2026-10-18");
        assert!(!milestone(MilestoneStatus::Overdue, None).is_overdue(today));
        assert!(milestone(MilestoneStatus::InProgress, Some("2026-10-17")).is_overdue(today));
        assert!(!milestone(MilestoneStatus::InProgress, Some("2026-10-18")).is_overdue(today));
        assert!(!milestone(MilestoneStatus::Completed, Some("2026-10-01")).is_overdue(today));
        assert!(!milestone(MilestoneStatus::PendingDate, Some("2026-10-01")).is_overdue(today));
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let mut m = milestone(MilestoneStatus::NotStarted, None);
        assert_eq!(m.display_name(), "m1");
        m.title = Some("Appraisal".to_string());
        assert_eq!(m.display_name(), "Appraisal");
    }
}
