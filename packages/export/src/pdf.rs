// ABOUTME: Narrative document export for a full proposal
// ABOUTME: Plain-text stand-in for a paginated PDF renderer

use chrono::Utc;
use tracing::debug;

use crate::blob::{BlobClient, ExportResult};
use offerkit_core::Proposal;

/// Exports the proposal text plus a numbered listing of line items as a flat
/// UTF-8 text stream. A real deployment would render a paginated PDF here;
/// the text file keeps the export contract in place until one exists.
pub struct PdfExporter {
    blob: BlobClient,
}

impl PdfExporter {
    pub fn new(blob: BlobClient) -> Self {
        Self { blob }
    }

    /// Serialize the proposal and publish the document, returning the public
    /// URL or `None` when no storage token is configured.
    pub async fn export(&self, proposal: &Proposal) -> ExportResult<Option<String>> {
        let text = render_narrative(proposal);
        let filename = format!("proposal-{}.txt", Utc::now().timestamp_millis());
        debug!(
            "Rendering narrative export with {} items",
            proposal.line_items.len()
        );

        self.blob.put(&filename, text, "text/plain").await
    }
}

/// Render the narrative document: header, proposal text, then one numbered
/// line per item.
pub fn render_narrative(proposal: &Proposal) -> String {
    let mut text = String::from("Proposal\n\n");
    text.push_str(&proposal.proposal_text);
    text.push_str("\n\nLine items:\n");

    for (i, item) in proposal.line_items.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} | {} {} | {:.2} €\n",
            i + 1,
            item.description,
            item.quantity,
            item.unit,
            item.total_price
        ));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use offerkit_core::LineItem;

    fn proposal() -> Proposal {
        Proposal {
            proposal_text: "Dear customer, thank you for your inquiry.".to_string(),
            line_items: vec![
                LineItem {
                    description: "Install network socket".to_string(),
                    quantity: 10.0,
                    unit: "piece".to_string(),
                    unit_price: 85.0,
                    total_price: 850.0,
                },
                LineItem {
                    description: "Run Cat-7 cable".to_string(),
                    quantity: 150.0,
                    unit: "m".to_string(),
                    unit_price: 3.5,
                    total_price: 525.0,
                },
            ],
        }
    }

    #[test]
    fn test_render_contains_proposal_text_and_numbered_items() {
        let text = render_narrative(&proposal());

        assert!(text.starts_with("Proposal\n\n"));
        assert!(text.contains("Dear customer, thank you for your inquiry."));
        assert!(text.contains("1. Install network socket | 10 piece | 850.00 €\n"));
        assert!(text.contains("2. Run Cat-7 cable | 150 m | 525.00 €\n"));
    }

    #[test]
    fn test_render_preserves_item_order() {
        let text = render_narrative(&proposal());
        let first = text.find("Install network socket").unwrap();
        let second = text.find("Run Cat-7 cable").unwrap();

        assert!(first < second);
    }
}
