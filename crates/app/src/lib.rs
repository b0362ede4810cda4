//! # Thanksync application
//!
//! Process wiring for the `thanksync` binary: command-line flags, tracing
//! setup and the dependency container that connects the infrastructure
//! adapters to the sync service.

pub mod cli;
pub mod context;
pub mod telemetry;

pub use cli::Cli;
pub use context::AppContext;
pub use telemetry::init_tracing;
