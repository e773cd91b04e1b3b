// ABOUTME: HTTP request handlers for proposal generation, saving, and pipeline tracking
// ABOUTME: Maps every internal failure to one of the fixed user-facing error strings

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::response::{error_response, ok_or_internal_error};
use crate::state::AppState;
use offerkit_ai::GenerateError;
use offerkit_core::{
    validate_customer_name, validate_request_details, Proposal, ProposalStatus, SaveProposalInput,
};
use offerkit_export::ExportError;
use offerkit_storage::StorageError;

// User-facing error strings. Raw provider and store errors are logged, never
// surfaced.
const MSG_MISSING_API_KEY: &str =
    "OpenAI API key missing. Set the OPENAI_API_KEY environment variable for this deployment.";
const MSG_MISSING_REQUEST_DETAILS: &str = "Please provide the details of the customer request.";
const MSG_PRIMARY_EXHAUSTED: &str = "Your OpenAI quota is exhausted. Optionally configure a second key via the OPENAI_FALLBACK_KEY environment variable, or top up your account.";
const MSG_ALL_EXHAUSTED: &str =
    "Both the primary and the fallback key are out of quota. Please check your OpenAI dashboard.";
const MSG_PROVIDER_FAILURE: &str = "An unexpected error occurred during the AI calculation. Please try again or contact support.";
const MSG_MISSING_CUSTOMER_NAME: &str = "Please provide the customer name.";
const MSG_SAVE_FAILED: &str = "Failed to save the proposal.";
const MSG_PROPOSAL_NOT_FOUND: &str = "Proposal not found.";
const MSG_LIST_FAILED: &str = "Failed to list proposals.";
const MSG_STATUS_UPDATE_FAILED: &str = "Failed to update the proposal status.";

fn generate_error_response(err: &GenerateError) -> Response {
    let (status, message) = match err {
        GenerateError::MissingApiKey => (StatusCode::INTERNAL_SERVER_ERROR, MSG_MISSING_API_KEY),
        GenerateError::PrimaryQuotaExhausted => (StatusCode::BAD_GATEWAY, MSG_PRIMARY_EXHAUSTED),
        GenerateError::AllKeysExhausted => (StatusCode::BAD_GATEWAY, MSG_ALL_EXHAUSTED),
        GenerateError::Provider(_) => (StatusCode::BAD_GATEWAY, MSG_PROVIDER_FAILURE),
    };
    error_response(status, message)
}

#[derive(Deserialize)]
pub struct GenerateProposalRequest {
    #[serde(rename = "requestDetails", default)]
    pub request_details: String,
}

#[derive(Serialize)]
pub struct GenerateProposalResponse {
    pub proposal: Proposal,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: Option<String>,
    #[serde(rename = "gaebUrl")]
    pub gaeb_url: Option<String>,
}

/// Generate a priced proposal draft from a free-text customer request, then
/// publish both document exports as a best-effort side channel.
pub async fn generate_proposal(
    State(state): State<AppState>,
    Json(request): Json<GenerateProposalRequest>,
) -> Response {
    // Checked before any model call.
    if !state.generator.has_api_key() {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_MISSING_API_KEY);
    }

    if validate_request_details(&request.request_details).is_err() {
        return error_response(StatusCode::BAD_REQUEST, MSG_MISSING_REQUEST_DETAILS);
    }

    info!(
        "Generating proposal for request of {} chars",
        request.request_details.len()
    );

    let proposal = match state.generator.generate(&request.request_details).await {
        Ok(proposal) => proposal,
        Err(err) => {
            error!("Proposal generation failed: {}", err);
            return generate_error_response(&err);
        }
    };

    // Both exports run concurrently; each is best-effort and degrades to a
    // missing URL rather than failing the submission.
    let (pdf_result, gaeb_result) = tokio::join!(
        state.pdf_exporter.export(&proposal),
        state.gaeb_exporter.export(&proposal.line_items),
    );
    let pdf_url = degrade_export(pdf_result, "narrative");
    let gaeb_url = degrade_export(gaeb_result, "GAEB");

    if pdf_url.is_none() || gaeb_url.is_none() {
        warn!("Documents were not uploaded. Set BLOB_READ_WRITE_TOKEN to enable downloads.");
    }

    (
        StatusCode::OK,
        Json(GenerateProposalResponse {
            proposal,
            pdf_url,
            gaeb_url,
        }),
    )
        .into_response()
}

fn degrade_export(result: Result<Option<String>, ExportError>, kind: &str) -> Option<String> {
    match result {
        Ok(url) => url,
        Err(err) => {
            warn!("{} export failed: {}", kind, err);
            None
        }
    }
}

/// Save (insert or update) an edited proposal.
pub async fn save_proposal(
    State(state): State<AppState>,
    Json(input): Json<SaveProposalInput>,
) -> Response {
    if validate_customer_name(&input.customer_name).is_err() {
        return error_response(StatusCode::BAD_REQUEST, MSG_MISSING_CUSTOMER_NAME);
    }

    info!(
        "Saving proposal for {} ({} line items, id: {:?})",
        input.customer_name,
        input.line_items.len(),
        input.id
    );

    match state.storage.save_proposal(&input).await {
        Ok(stored) => (
            StatusCode::OK,
            Json(json!({ "success": true, "proposalId": stored.id })),
        )
            .into_response(),
        Err(StorageError::NotFound(id)) => {
            warn!("Save targeted missing proposal {}", id);
            error_response(StatusCode::NOT_FOUND, MSG_PROPOSAL_NOT_FOUND)
        }
        Err(err) => {
            error!("Failed to save proposal: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_SAVE_FAILED)
        }
    }
}

/// List all proposals for the pipeline board, newest first.
pub async fn list_proposals(State(state): State<AppState>) -> Response {
    ok_or_internal_error(state.storage.list_proposals().await, MSG_LIST_FAILED)
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ProposalStatus,
}

/// Move a proposal to a new pipeline status.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Response {
    match state.storage.update_status(&id, request.status).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(StorageError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, MSG_PROPOSAL_NOT_FOUND)
        }
        Err(err) => {
            error!("Failed to update proposal status: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_STATUS_UPDATE_FAILED)
        }
    }
}

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
