//! # Simulation Driver Tests
//!
//! End-to-end runs of the clock-edge driver plus the loader, signature
//! extraction and tracing it relies on.


/// Signature range resolution and output format.
pub mod signature;
