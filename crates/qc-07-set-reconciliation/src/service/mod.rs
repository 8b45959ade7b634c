//! Service Layer
//!
//! Contains the application service that drives one side of a
//! reconciliation through the domain types.

pub mod reconciler;

pub use reconciler::Reconciler;
