// ABOUTME: Core types, validation, and utilities for Offerkit
// ABOUTME: Foundational package shared across all Offerkit packages

pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{LineItem, Proposal, ProposalStatus, SaveProposalInput, StoredProposal};

// Re-export utilities
pub use utils::{generate_proposal_id, total_value};

// Re-export validation
pub use validation::{validate_customer_name, validate_request_details, ValidationError};
