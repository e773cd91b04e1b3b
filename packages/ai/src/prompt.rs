// ABOUTME: Prompt assembly for proposal generation
// ABOUTME: Carries the hard-coded pricing context used to bias estimates

/// Hard-coded pricing examples standing in for a retrieval pipeline over
/// past proposals.
pub(crate) const PRICING_CONTEXT: &str = "\
CONTEXT FROM SIMILAR PAST PROPOSALS:
- Project \"Meier office refit\": 10x network socket installed, 150m cable run. Price per socket: 85 EUR. Price per meter of cable: 3.50 EUR.
- Project \"Schmidt new build\": complete electrical installation for 120 sqm. Lump sum: 12,000 EUR.
- Material costs: Cat-7 cable 1.20 EUR/m, network socket 25 EUR each.
- Technician hourly rate: 75 EUR/h.";

pub(crate) const SYSTEM_PROMPT: &str = "You are an experienced estimator at an electrical contracting business. \
You draft complete, professional proposals with realistic quantities and prices.";

pub(crate) fn build_prompt(request_details: &str) -> String {
    format!(
        "Analyze the following customer request. Use the provided context from past proposals \
to calculate realistic line items, quantities, and prices.\n\
Write a complete, professional proposal text (salutation, introduction, description of the \
work, closing) and a structured list of all line items. For every item, set totalPrice to \
quantity * unitPrice.\n\n\
CUSTOMER REQUEST:\n---\n{request_details}\n---\n\n{PRICING_CONTEXT}\n"
    )
}
