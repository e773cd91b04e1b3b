// ABOUTME: Domain types for proposals, line items, and pipeline status
// ABOUTME: Wire format uses camelCase names for generated proposal payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One priced unit of work or material in a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
    /// Expected to equal `quantity * unit_price`. Not enforced after model
    /// output or user edits; callers that change quantity or unit price are
    /// responsible for calling [`LineItem::recompute_total`]. A missing value
    /// deserializes to 0.
    #[serde(rename = "totalPrice", default)]
    pub total_price: f64,
}

impl LineItem {
    /// Recompute the total after a quantity or unit price change.
    pub fn recompute_total(&mut self) {
        self.total_price = self.quantity * self.unit_price;
    }
}

/// The generated artifact for one customer request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(rename = "proposalText")]
    pub proposal_text: String,
    /// Order is presentation-significant: it drives displayed position
    /// numbers and export outline numbers, nothing else.
    #[serde(rename = "lineItems")]
    pub line_items: Vec<LineItem>,
}

/// Pipeline status of a stored proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Sent,
    FollowUp,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Sent => "sent",
            ProposalStatus::FollowUp => "follow-up",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(ProposalStatus::Draft),
            "sent" => Some(ProposalStatus::Sent),
            "follow-up" => Some(ProposalStatus::FollowUp),
            "accepted" => Some(ProposalStatus::Accepted),
            "rejected" => Some(ProposalStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted proposal record as returned by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProposal {
    pub id: String,
    pub customer_name: String,
    pub proposal_text: String,
    pub line_items: Vec<LineItem>,
    pub total_value: f64,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for saving a proposal. An absent id inserts a new record; a present
/// id updates the existing record in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProposalInput {
    #[serde(default)]
    pub id: Option<String>,
    pub customer_name: String,
    pub proposal_text: String,
    pub line_items: Vec<LineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_item_wire_names() {
        let item = LineItem {
            description: "Install network socket".to_string(),
            quantity: 10.0,
            unit: "piece".to_string(),
            unit_price: 85.0,
            total_price: 850.0,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["unitPrice"], 85.0);
        assert_eq!(json["totalPrice"], 850.0);
    }

    #[test]
    fn test_line_item_missing_total_price_defaults_to_zero() {
        let item: LineItem = serde_json::from_value(serde_json::json!({
            "description": "Cable run",
            "quantity": 150.0,
            "unit": "m",
            "unitPrice": 3.5
        }))
        .unwrap();

        assert_eq!(item.total_price, 0.0);
    }

    #[test]
    fn test_recompute_total() {
        let mut item = LineItem {
            description: "Technician".to_string(),
            quantity: 4.0,
            unit: "h".to_string(),
            unit_price: 75.0,
            total_price: 0.0,
        };

        item.recompute_total();
        assert_eq!(item.total_price, 300.0);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ProposalStatus::Draft,
            ProposalStatus::Sent,
            ProposalStatus::FollowUp,
            ProposalStatus::Accepted,
            ProposalStatus::Rejected,
        ] {
            assert_eq!(ProposalStatus::parse(status.as_str()), Some(status));
        }

        assert_eq!(ProposalStatus::parse("archived"), None);
        assert_eq!(ProposalStatus::default(), ProposalStatus::Draft);
    }

    #[test]
    fn test_status_serde_uses_kebab_case() {
        let json = serde_json::to_string(&ProposalStatus::FollowUp).unwrap();
        assert_eq!(json, "\"follow-up\"");

        let parsed: ProposalStatus = serde_json::from_str("\"follow-up\"").unwrap();
        assert_eq!(parsed, ProposalStatus::FollowUp);
    }
}
