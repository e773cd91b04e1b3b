// ABOUTME: Shared application state for API handlers
// ABOUTME: Wires storage, generator, and exporters together once at startup

use std::sync::Arc;

use sqlx::SqlitePool;

use offerkit_ai::ProposalGenerator;
use offerkit_export::{BlobClient, GaebExporter, PdfExporter};
use offerkit_storage::ProposalStorage;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<ProposalStorage>,
    pub generator: Arc<ProposalGenerator>,
    pub gaeb_exporter: Arc<GaebExporter>,
    pub pdf_exporter: Arc<PdfExporter>,
}

impl AppState {
    pub fn new(pool: SqlitePool, generator: ProposalGenerator, blob: BlobClient) -> Self {
        Self {
            storage: Arc::new(ProposalStorage::new(pool)),
            generator: Arc::new(generator),
            gaeb_exporter: Arc::new(GaebExporter::new(blob.clone())),
            pdf_exporter: Arc::new(PdfExporter::new(blob)),
        }
    }
}
