//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - The filter capability shared by both filter kinds
//! - The reconciliation API driven by the protocol layer

pub mod inbound;

pub use inbound::{ReconciliationApi, SetFilter};
