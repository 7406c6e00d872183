//! Application Layer
//!
//! Orchestrates between the UI (CLI/GUI) and the vision, domain and
//! storage layers.
//!
//! - `scan_service`: image → plate → ledger transition
//! - `query_service`: slot and history views for display

pub mod query_service;
pub mod scan_service;

// Re-export main types for convenience
pub use query_service::{LotSnapshot, SlotView};
pub use scan_service::{
    process_plate_text, scan_image, Pipeline, ProcessedScan, ScanResult, ScanServiceError,
};
