// ABOUTME: Primary/fallback orchestration for proposal generation
// ABOUTME: One fallback hop across two API keys and two model tiers, gated on quota

use thiserror::Error;
use tracing::{info, warn};

use crate::client::{GenerationClient, GenerationError};
use offerkit_core::Proposal;

/// Model used with the primary API key.
pub const PRIMARY_MODEL: &str = "gpt-4o";
/// Cheaper model tier used with the fallback key once the primary quota is gone.
pub const FALLBACK_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No OpenAI API key configured")]
    MissingApiKey,

    #[error("Primary API key quota exhausted and no fallback key configured")]
    PrimaryQuotaExhausted,

    #[error("Both primary and fallback API key quotas exhausted")]
    AllKeysExhausted,

    #[error(transparent)]
    Provider(#[from] GenerationError),
}

/// Credentials for the generator, passed in explicitly at construction time.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Required for generation to function at all.
    pub primary_api_key: Option<String>,
    /// Optional; enables the single fallback attempt on quota exhaustion.
    pub fallback_api_key: Option<String>,
}

/// Sequences up to two generation attempts across the two key/model tiers.
///
/// Quota exhaustion is the only failure that triggers the second attempt: a
/// different key and model tier can plausibly succeed where the first ran out
/// of allowance. Every other provider failure is non-retryable here. There is
/// no backoff and no retry policy, just the one fallback hop.
pub struct ProposalGenerator {
    client: GenerationClient,
    config: GeneratorConfig,
}

impl ProposalGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            client: GenerationClient::new(),
            config,
        }
    }

    /// Creates a generator with a specific client (used in tests).
    pub fn with_client(config: GeneratorConfig, client: GenerationClient) -> Self {
        Self { client, config }
    }

    /// Whether a primary API key is configured.
    pub fn has_api_key(&self) -> bool {
        matches!(self.config.primary_api_key.as_deref(), Some(key) if !key.is_empty())
    }

    /// Draft a proposal for the given customer request.
    pub async fn generate(&self, request_details: &str) -> Result<Proposal, GenerateError> {
        let primary_key = self
            .config
            .primary_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GenerateError::MissingApiKey)?;

        match self
            .client
            .generate(request_details, PRIMARY_MODEL, primary_key)
            .await
        {
            Ok(proposal) => {
                info!(
                    "Proposal generated with primary key: {} line items",
                    proposal.line_items.len()
                );
                Ok(proposal)
            }
            Err(err) if err.is_quota_exhausted() => {
                warn!("Primary API key quota exhausted, trying fallback key");

                let Some(fallback_key) = self
                    .config
                    .fallback_api_key
                    .as_deref()
                    .filter(|key| !key.is_empty())
                else {
                    return Err(GenerateError::PrimaryQuotaExhausted);
                };

                match self
                    .client
                    .generate(request_details, FALLBACK_MODEL, fallback_key)
                    .await
                {
                    Ok(proposal) => {
                        info!(
                            "Proposal generated with fallback key: {} line items",
                            proposal.line_items.len()
                        );
                        Ok(proposal)
                    }
                    Err(err) if err.is_quota_exhausted() => Err(GenerateError::AllKeysExhausted),
                    Err(err) => Err(GenerateError::Provider(err)),
                }
            }
            Err(err) => Err(GenerateError::Provider(err)),
        }
    }
}
