// ABOUTME: Input validation for proposal requests and saves
// ABOUTME: Rejects empty required fields before any downstream work happens

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request details must not be empty")]
    EmptyRequestDetails,

    #[error("Customer name must not be empty")]
    EmptyCustomerName,
}

/// Validate the free-text customer request before any model call is made.
pub fn validate_request_details(details: &str) -> Result<(), ValidationError> {
    if details.trim().is_empty() {
        return Err(ValidationError::EmptyRequestDetails);
    }
    Ok(())
}

/// Validate the customer name on a save.
pub fn validate_customer_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyCustomerName);
    }
    Ok(())
}
