//! DevEx Client - transport shell for the DevEx dashboard
//!
//! Wraps the pure `devex-core` logic with the I/O it leaves out:
//! - Trait-based transports (HTTP backend, in-memory mock)
//! - Concurrent dashboard loads that tolerate partial failure
//! - Initiative submission after local validation
//! - YAML / environment configuration and the `devex-dashboard` CLI
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           DashboardService              │
//! │  (loads inputs, submits initiatives)    │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │DevexTransport│      │ devex-core  │
//! │ (HTTP/Mock) │       │ (pure fold, │
//! │             │       │  builder)   │
//! └─────────────┘       └─────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod service;
pub mod transport;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use service::{DashboardService, InitiativeReceipt, ServiceError};
pub use transport::{DevexTransport, HttpTransport, MockTransport, TransportError};
