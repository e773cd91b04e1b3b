// ABOUTME: Shared utility functions for Offerkit
// ABOUTME: ID generation and total value computation

use uuid::Uuid;

use crate::types::LineItem;

/// Generate a unique proposal record ID.
pub fn generate_proposal_id() -> String {
    Uuid::new_v4().to_string()
}

/// Sum the total price across all line items.
///
/// Items deserialized without a total carry 0, so absent values contribute
/// nothing to the sum.
pub fn total_value(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.total_price).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(total_price: f64) -> LineItem {
        LineItem {
            description: "item".to_string(),
            quantity: 1.0,
            unit: "piece".to_string(),
            unit_price: total_price,
            total_price,
        }
    }

    #[test]
    fn test_generate_proposal_id_is_unique() {
        let id1 = generate_proposal_id();
        let id2 = generate_proposal_id();

        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
    }

    #[test]
    fn test_total_value_sums_line_items() {
        let items = vec![item(100.0), item(0.0), item(525.0)];
        assert_eq!(total_value(&items), 625.0);
    }

    #[test]
    fn test_total_value_empty_is_zero() {
        assert_eq!(total_value(&[]), 0.0);
    }
}
