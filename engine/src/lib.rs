//! Agora engine: runs governance proposals and collateralized loans.
//!
//! The engine is the single entry point a host talks to. It:
//! - Decodes wire calls into typed proposal and loan operations
//! - Serializes operations per entity and commits them all-or-nothing
//! - Routes value transfers through the host's payment rail
//! - Loads its configuration from TOML and reports through `tracing` and Prometheus

pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod locks;
pub mod logging;
pub mod metrics;
pub mod operation;
pub mod tracing_spans;
pub mod wire_message;

pub use config::EngineConfig;
pub use dispatcher::{Engine, EngineStore};
pub use error::EngineError;
pub use logging::{init_logging, LogFormat};
pub use metrics::EngineMetrics;
pub use operation::{LoanOp, ProposalOp};
pub use wire_message::{wire_identity, Call, Entity, Outcome, Status};
