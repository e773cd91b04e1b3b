// ABOUTME: Document export for Offerkit proposals
// ABOUTME: Blob store upload plus GAEB tender and narrative text serializers

pub mod blob;
pub mod gaeb;
pub mod pdf;

// Re-export main types
pub use blob::{BlobClient, ExportError, ExportResult};
pub use gaeb::GaebExporter;
pub use pdf::PdfExporter;
