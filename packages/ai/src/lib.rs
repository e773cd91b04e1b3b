// ABOUTME: AI-assisted proposal drafting for Offerkit
// ABOUTME: OpenAI structured-output client and primary/fallback key orchestration

pub mod client;
pub mod generator;
mod prompt;

// Re-export client types
pub use client::{GenerationClient, GenerationError, GenerationResult};

// Re-export generator types
pub use generator::{GenerateError, GeneratorConfig, ProposalGenerator, FALLBACK_MODEL, PRIMARY_MODEL};
